//! Error types for alzina-core

use thiserror::Error;

/// Result type alias using alzina-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in alzina-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Backend base URL has not been configured yet
    #[error("Home Assistant base URL is not configured")]
    NotConfigured,

    /// Required human input is missing
    #[error("Required field is empty: {field}")]
    Validation { field: &'static str },

    /// Bootstrap link carried only part of the required parameters
    #[error("Incomplete configuration link: missing {missing}")]
    IncompleteBootstrap { missing: &'static str },

    /// Launch or shared link is not a valid URL
    #[error("Invalid link '{link}': {reason}")]
    InvalidLink { link: String, reason: String },

    /// Backend answered with a non-success status
    #[error("Error HTTP: {status}")]
    Http { status: u16 },

    /// Request never completed
    #[error("{0}")]
    Transport(String),

    /// Service or entity identifier is empty or malformed
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// Settings storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Panel profile could not be read or parsed
    #[error("Profile error: {0}")]
    Profile(String),
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error_chain(&error))
    }
}

/// Joins an error and its `source()` chain into one line.
pub(crate) fn error_chain(error: &dyn std::error::Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.ends_with(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}
