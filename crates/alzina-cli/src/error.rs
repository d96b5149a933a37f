use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] alzina_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Panel action failed")]
    ActionFailed,
}

impl CliError {
    /// Whether the panel already showed this failure as a status message.
    pub const fn already_reported(&self) -> bool {
        matches!(self, Self::ActionFailed)
    }
}
