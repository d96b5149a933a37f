use std::collections::HashMap;
use std::sync::Mutex;

use super::{storage_error, KeyValueStorage};
use crate::error::Result;

/// In-process storage for tests and hosts without a persistent medium.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let guard = self
            .items
            .lock()
            .map_err(|error| storage_error("Memory storage poisoned", error))?;
        Ok(guard.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self
            .items
            .lock()
            .map_err(|error| storage_error("Memory storage poisoned", error))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
