use std::path::PathBuf;

use super::{storage_error, KeyValueStorage};
use crate::error::Result;

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|error| storage_error(&format!("Failed to read {}", path.display()), error))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|error| {
            storage_error(
                &format!("Failed to create state directory {}", self.dir.display()),
                error,
            )
        })?;
        let path = self.path_for(key);
        std::fs::write(&path, value)
            .map_err(|error| storage_error(&format!("Failed to write {}", path.display()), error))
    }
}
