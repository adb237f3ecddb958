use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
  #[error("failed to access {}: {source}", .path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error
  },
  #[error("failed to encode {key}: {source}")]
  Encode {
    key:    String,
    #[source]
    source: serde_json::Error
  },
  #[error("storage backend rejected {key}: {message}")]
  Backend {
    key:     String,
    message: String
  }
}

/// Why a drag payload was refused before reaching the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
  #[error("drag payload is empty")]
  Empty,
  #[error("drag payload is not an integer: {0:?}")]
  NotAnInteger(String),
  #[error("task id {0} is out of range")]
  OutOfRange(i64)
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to access {}: {source}", .path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error
  },
  #[error("invalid config ({}): {source}", origin_label(.origin))]
  Parse {
    origin: Option<PathBuf>,
    #[source]
    source: toml::de::Error
  },
  #[error("unknown config key: {0}")]
  UnknownKey(String),
  #[error("invalid value for {key}: {value:?}")]
  InvalidValue {
    key:   String,
    value: String
  },
  #[error("invalid calendar month: {0}")]
  InvalidCalendar(String),
  #[error("cannot determine a data directory")]
  NoDataDir
}

fn origin_label(
  origin: &Option<PathBuf>
) -> String {
  origin
    .as_ref()
    .map(|path| path.display().to_string())
    .unwrap_or_else(|| "inline".to_string())
}

#[derive(Debug, Error)]
pub enum PlannerError {
  #[error(transparent)]
  Storage(#[from] StorageError)
}
