//! Persisted panel settings record

use serde::{Deserialize, Serialize};

use crate::util::{non_blank, normalize_base_url};

/// The single settings record backing every outbound call.
///
/// Older panels stored the base URL as `haDomain`; it is still accepted when
/// reading, and missing fields fall back to empty values.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Base URL of the Home Assistant instance, without trailing slash
    #[serde(default, alias = "haDomain", alias = "ha_domain")]
    pub backend_base_url: Option<String>,
    /// Long-lived access token sent as a bearer credential
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Notification service, e.g. `notify.mobile_app_phone`
    #[serde(default)]
    pub notify_service_id: Option<String>,
    /// Lock entity driven by the open-door action, e.g. `lock.front_door`
    #[serde(default)]
    pub lock_entity_id: Option<String>,
    /// Set when the record came from a bootstrap link instead of the form
    #[serde(default)]
    pub origin_tag: bool,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Settings")
            .field("backend_base_url", &self.backend_base_url)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("notify_service_id", &self.notify_service_id)
            .field("lock_entity_id", &self.lock_entity_id)
            .field("origin_tag", &self.origin_tag)
            .finish()
    }
}

impl Settings {
    /// Builds the record written by a complete bootstrap link.
    pub fn from_link(base_url: &str, token: &str) -> Self {
        Self {
            backend_base_url: normalize_base_url(base_url),
            auth_token: non_blank(token),
            notify_service_id: None,
            lock_entity_id: None,
            origin_tag: true,
        }
    }

    /// Returns the configured base URL, if any.
    pub fn base_url(&self) -> Option<&str> {
        self.backend_base_url.as_deref()
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn is_configured(&self) -> bool {
        self.base_url().is_some()
    }

    /// Trims the base URL and strips its trailing slashes. Other fields are
    /// kept as given.
    #[must_use]
    pub fn with_normalized_base_url(mut self) -> Self {
        self.backend_base_url = self.backend_base_url.as_deref().and_then(normalize_base_url);
        self
    }
}
