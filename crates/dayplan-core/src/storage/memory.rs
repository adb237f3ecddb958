use std::collections::BTreeMap;

use super::StoragePort;
use crate::error::StorageError;

/// In-process storage, for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
  entries: BTreeMap<String, String>
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_entry(
    mut self,
    key: &str,
    value: &str
  ) -> Self {
    self
      .entries
      .insert(key.to_string(), value.to_string());
    self
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<&str> {
    self.entries.get(key).map(String::as_str)
  }
}

impl StoragePort for MemoryStorage {
  fn load(
    &self,
    key: &str
  ) -> Result<Option<String>, StorageError>
  {
    Ok(self.entries.get(key).cloned())
  }

  fn save(
    &mut self,
    key: &str,
    value: &str
  ) -> Result<(), StorageError> {
    self
      .entries
      .insert(key.to_string(), value.to_string());
    Ok(())
  }
}
