use std::fs;
use std::io::{
  self,
  Write
};
use std::path::{
  Path,
  PathBuf
};

use tempfile::NamedTempFile;
use tracing::{
  debug,
  info
};

use super::StoragePort;
use crate::error::StorageError;

/// Directory-backed storage: key `k` lives in `<dir>/k.json`, and every save
/// replaces the file atomically.
#[derive(Debug, Clone)]
pub struct FileStorage {
  dir: PathBuf
}

impl FileStorage {
  #[tracing::instrument(skip(dir))]
  pub fn open(
    dir: &Path
  ) -> Result<Self, StorageError> {
    fs::create_dir_all(dir).map_err(
      |source| StorageError::Io {
        path: dir.to_path_buf(),
        source
      }
    )?;
    info!(dir = %dir.display(), "opened file storage");
    Ok(Self {
      dir: dir.to_path_buf()
    })
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  pub fn path_for(
    &self,
    key: &str
  ) -> Result<PathBuf, StorageError> {
    let valid = !key.is_empty()
      && key.chars().all(|c| {
        c.is_ascii_alphanumeric()
          || c == '-'
          || c == '_'
      });
    if !valid {
      return Err(StorageError::Backend {
        key:     key.to_string(),
        message: "keys must be plain \
                  file stems"
          .to_string()
      });
    }
    Ok(self.dir.join(format!("{key}.json")))
  }
}

impl StoragePort for FileStorage {
  fn load(
    &self,
    key: &str
  ) -> Result<Option<String>, StorageError>
  {
    let path = self.path_for(key)?;
    debug!(file = %path.display(), "reading");
    match fs::read_to_string(&path) {
      | Ok(text) => Ok(Some(text)),
      | Err(error)
        if error.kind()
          == io::ErrorKind::NotFound =>
      {
        Ok(None)
      }
      | Err(source) => {
        Err(StorageError::Io { path, source })
      }
    }
  }

  fn save(
    &mut self,
    key: &str,
    value: &str
  ) -> Result<(), StorageError> {
    let path = self.path_for(key)?;
    debug!(file = %path.display(), bytes = value.len(), "writing atomically");

    let io_error = |source| {
      StorageError::Io {
        path: path.clone(),
        source
      }
    };
    let mut temp =
      NamedTempFile::new_in(&self.dir)
        .map_err(io_error)?;
    temp
      .write_all(value.as_bytes())
      .map_err(io_error)?;
    temp.flush().map_err(io_error)?;
    temp.persist(&path).map_err(|err| {
      StorageError::Io {
        path: path.clone(),
        source: err.error
      }
    })?;
    Ok(())
  }
}
