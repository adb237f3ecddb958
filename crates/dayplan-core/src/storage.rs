//! Key-value persistence behind the planner.
//!
//! Collections are stored whole, as one JSON document per key.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{
  debug,
  warn
};

use crate::error::StorageError;

#[cfg(not(target_arch = "wasm32"))]
mod file;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;
pub use memory::MemoryStorage;

pub const TASKS_KEY: &str = "tasks";
pub const EVENTS_KEY: &str = "events";

pub trait StoragePort {
  fn load(
    &self,
    key: &str
  ) -> Result<Option<String>, StorageError>;

  fn save(
    &mut self,
    key: &str,
    value: &str
  ) -> Result<(), StorageError>;
}

/// Reads the collection under `key`. Anything missing, unreadable or
/// malformed comes back as an empty collection.
#[tracing::instrument(skip(port))]
pub fn load_collection<T, P>(
  port: &P,
  key: &str
) -> Vec<T>
where
  T: DeserializeOwned,
  P: StoragePort + ?Sized
{
  let raw = match port.load(key) {
    | Ok(Some(raw)) => raw,
    | Ok(None) => {
      debug!("nothing stored yet");
      return Vec::new();
    }
    | Err(error) => {
      warn!(%error, "failed reading stored collection; starting empty");
      return Vec::new();
    }
  };

  match serde_json::from_str::<Vec<T>>(&raw)
  {
    | Ok(items) => {
      debug!(
        count = items.len(),
        "loaded collection"
      );
      items
    }
    | Err(error) => {
      warn!(%error, "stored collection is malformed; starting empty");
      Vec::new()
    }
  }
}

#[tracing::instrument(skip(port, items), fields(count = items.len()))]
pub fn save_collection<T, P>(
  port: &mut P,
  key: &str,
  items: &[T]
) -> Result<(), StorageError>
where
  T: Serialize,
  P: StoragePort + ?Sized
{
  let json = serde_json::to_string(items)
    .map_err(|source| {
      StorageError::Encode {
        key: key.to_string(),
        source
      }
    })?;
  port.save(key, &json)
}
