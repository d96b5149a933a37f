//! Single-record settings store.
//!
//! The panel keeps exactly one [`Settings`] record under a fixed key. The
//! record is written wholesale; readers get defaults whenever the stored
//! value is missing or unreadable.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::{Error, Result};
use crate::models::Settings;

/// Storage key of the settings record.
pub const SETTINGS_KEY: &str = "calAlzinaConfig";

/// String key/value medium the settings record is persisted in.
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// Typed load/save access to the settings record.
#[derive(Debug, Clone)]
pub struct ConfigStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> ConfigStore<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the persisted record, or defaults when none can be read.
    pub fn load(&self) -> Settings {
        let raw = match self.storage.get_item(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Settings::default(),
            Err(error) => {
                tracing::warn!("Failed to read stored settings: {}", error);
                return Settings::default();
            }
        };

        serde_json::from_str::<Settings>(&raw).map_or_else(
            |error| {
                tracing::warn!("Stored settings are not valid JSON, using defaults: {}", error);
                Settings::default()
            },
            Settings::with_normalized_base_url,
        )
    }

    /// Replaces the persisted record with `settings`. Only the base URL is
    /// normalized; every other field is written as given.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let record = settings.clone().with_normalized_base_url();
        let serialized = serde_json::to_string(&record)?;
        self.storage.set_item(SETTINGS_KEY, &serialized)?;
        tracing::info!(
            configured = record.is_configured(),
            from_link = record.origin_tag,
            "Saved panel settings"
        );
        Ok(())
    }
}

pub(crate) fn storage_error(context: &str, error: impl std::fmt::Display) -> Error {
    Error::Storage(format!("{context}: {error}"))
}
