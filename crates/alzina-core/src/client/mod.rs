//! Home Assistant HTTP client.
//!
//! Two calling conventions are supported and kept apart on purpose: bare
//! webhook POSTs, and authenticated `domain/service` calls. Both read the
//! backend location from the [`Settings`] passed in, never from a constant.

#[cfg(test)]
pub(crate) mod test_server;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::models::Settings;
use crate::util::non_blank;

/// JSON body of a webhook call. Absent fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebhookBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// A `domain/service` invocation with optional target entity and data.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    pub entity_id: Option<String>,
    pub data: Map<String, Value>,
}

impl ServiceCall {
    pub fn new(domain: &str, service: &str) -> Result<Self> {
        let domain = non_blank(domain)
            .ok_or_else(|| Error::InvalidTarget("service domain must not be empty".to_string()))?;
        let service = non_blank(service)
            .ok_or_else(|| Error::InvalidTarget("service name must not be empty".to_string()))?;
        Ok(Self {
            domain,
            service,
            entity_id: None,
            data: Map::new(),
        })
    }

    /// Parses an identifier such as `notify.mobile_app_phone`.
    pub fn parse(service_id: &str) -> Result<Self> {
        let Some((domain, service)) = service_id.trim().split_once('.') else {
            return Err(Error::InvalidTarget(format!(
                "'{}' is not a domain.service identifier",
                service_id.trim()
            )));
        };
        Self::new(domain, service)
    }

    #[must_use]
    pub fn with_entity(mut self, entity_id: &str) -> Self {
        self.entity_id = non_blank(entity_id);
        self
    }

    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Request body: caller data plus `entity_id` when targeted.
    pub fn body(&self) -> Value {
        let mut body = self.data.clone();
        if let Some(entity_id) = &self.entity_id {
            body.insert("entity_id".to_string(), Value::String(entity_id.clone()));
        }
        Value::Object(body)
    }
}

/// Domain of a Home Assistant entity id, e.g. `lock` for `lock.front_door`.
pub fn entity_domain(entity_id: &str) -> Result<&str> {
    entity_id
        .trim()
        .split_once('.')
        .map(|(domain, _)| domain)
        .filter(|domain| !domain.is_empty())
        .ok_or_else(|| {
            Error::InvalidTarget(format!("'{}' is not a valid entity id", entity_id.trim()))
        })
}

pub fn webhook_url(base_url: &str, webhook_id: &str) -> String {
    format!("{base_url}/api/webhook/{webhook_id}")
}

pub fn service_url(base_url: &str, domain: &str, service: &str) -> String {
    format!("{base_url}/api/services/{domain}/{service}")
}

/// HTTP client for the Home Assistant instance named in [`Settings`].
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|error| Error::Transport(format!("Failed to construct HTTP client: {error}")))?;
        Ok(Self { client })
    }

    /// `POST {base}/api/webhook/{webhook_id}` with a JSON body and no auth header.
    pub async fn post_webhook(
        &self,
        settings: &Settings,
        webhook_id: &str,
        body: &WebhookBody,
    ) -> Result<()> {
        let base_url = settings.base_url().ok_or(Error::NotConfigured)?;
        let webhook_id = non_blank(webhook_id)
            .ok_or_else(|| Error::InvalidTarget("webhook id must not be empty".to_string()))?;
        let url = webhook_url(base_url, &webhook_id);

        tracing::debug!(%url, "Posting webhook");
        let request = self.client.post(&url).json(body);
        send(request, &url).await
    }

    /// `POST {base}/api/services/{domain}/{service}` with a bearer token.
    pub async fn call_service(&self, settings: &Settings, call: &ServiceCall) -> Result<()> {
        let base_url = settings.base_url().ok_or(Error::NotConfigured)?;
        let url = service_url(base_url, &call.domain, &call.service);

        tracing::debug!(%url, entity_id = ?call.entity_id, "Calling service");
        let mut request = self.client.post(&url).json(&call.body());
        if let Some(token) = settings.auth_token() {
            request = request.bearer_auth(token);
        }
        send(request, &url).await
    }
}

async fn send(request: reqwest::RequestBuilder, url: &str) -> Result<()> {
    let response = request.send().await.map_err(|error| {
        let error = Error::from(error);
        tracing::warn!(%url, "Backend request failed: {}", error);
        error
    })?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(%url, status = status.as_u16(), "Backend returned an error status");
        return Err(Error::Http {
            status: status.as_u16(),
        });
    }

    Ok(())
}
