//! Panel profile: which calling convention and bootstrap policy a panel uses.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::messages;

pub const PROFILE_FILE_NAME: &str = "panel-profile.json";

/// How the panel talks to Home Assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallingConvention {
    /// Bare `POST /api/webhook/{id}`
    #[default]
    Webhook,
    /// Authenticated `POST /api/services/{domain}/{service}`
    ServiceCall,
}

/// Which query parameters a bootstrap link must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapPolicy {
    /// `domain` alone is enough
    #[default]
    DomainOnly,
    /// `domain` and `token` must arrive together
    DomainAndToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelProfile {
    pub convention: CallingConvention,
    pub bootstrap: BootstrapPolicy,
    /// Refuse webhook calls until the visitor has typed a name
    pub require_visitor_name: bool,
    /// Add the client timestamp to webhook bodies
    pub include_timestamp: bool,
    /// Add the stored token to webhook bodies
    pub send_token_in_body: bool,
    pub notify_webhook_id: String,
    pub open_door_webhook_id: String,
    /// Message sent as service data by the notify service call
    pub notify_message: String,
}

impl Default for PanelProfile {
    fn default() -> Self {
        Self {
            convention: CallingConvention::Webhook,
            bootstrap: BootstrapPolicy::DomainOnly,
            require_visitor_name: false,
            include_timestamp: false,
            send_token_in_body: false,
            notify_webhook_id: "visitant_arribat".to_string(),
            open_door_webhook_id: "obrir_porta".to_string(),
            notify_message: messages::VISITOR_ARRIVED.to_string(),
        }
    }
}

impl PanelProfile {
    /// Reads a profile file; a missing file yields the default profile.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            Error::Profile(format!(
                "Failed to read profile at {}: {}",
                path.display(),
                error
            ))
        })?;
        Self::parse(&raw).map_err(|error| {
            Error::Profile(format!(
                "Failed to parse profile at {}: {}",
                path.display(),
                error
            ))
        })
    }

    pub fn parse(raw: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
