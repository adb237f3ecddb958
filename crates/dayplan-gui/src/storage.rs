use dayplan_core::{
  StorageError,
  StoragePort
};
use wasm_bindgen::JsValue;

/// `window.localStorage` as a [`StoragePort`].
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

impl BrowserStorage {
  fn local_storage(
    key: &str
  ) -> Result<web_sys::Storage, StorageError>
  {
    web_sys::window()
      .and_then(|window| {
        window
          .local_storage()
          .ok()
          .flatten()
      })
      .ok_or_else(|| {
        StorageError::Backend {
          key:     key.to_string(),
          message: "localStorage is not \
                    available"
            .to_string()
        }
      })
  }
}

fn backend_error(
  key: &str,
  error: JsValue
) -> StorageError {
  StorageError::Backend {
    key:     key.to_string(),
    message: format!("{error:?}")
  }
}

impl StoragePort for BrowserStorage {
  fn load(
    &self,
    key: &str
  ) -> Result<Option<String>, StorageError>
  {
    Self::local_storage(key)?
      .get_item(key)
      .map_err(|error| {
        backend_error(key, error)
      })
  }

  fn save(
    &mut self,
    key: &str,
    value: &str
  ) -> Result<(), StorageError> {
    Self::local_storage(key)?
      .set_item(key, value)
      .map_err(|error| {
        backend_error(key, error)
      })
  }
}
