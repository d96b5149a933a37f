//! Panel action handlers.
//!
//! Each handler reads the settings record once at the start, checks the
//! preconditions, makes one backend call and surfaces the outcome through the
//! [`StatusReporter`]. Handlers hold no lock across the call, so overlapping
//! clicks produce overlapping requests.

mod view;

pub use view::{PanelView, SettingsForm};

use std::sync::Arc;

use crate::bootstrap::{self, AddressBar, BootstrapOutcome};
use crate::client::{entity_domain, BackendClient, ServiceCall, WebhookBody};
use crate::error::{Error, Result};
use crate::messages;
use crate::models::{CallingConvention, PanelProfile, Settings};
use crate::status::{StatusDisplay, StatusReporter};
use crate::store::{ConfigStore, KeyValueStorage};
use crate::util::non_blank;

/// What the visitor asked the panel to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Notify,
    OpenDoor,
}

impl Intent {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Notify => "notify",
            Self::OpenDoor => "open_door",
        }
    }

    pub const fn success_message(self) -> &'static str {
        match self {
            Self::Notify => messages::NOTIFY_SENT,
            Self::OpenDoor => messages::DOOR_OPENED,
        }
    }
}

/// Outbound call prepared from settings, before anything hits the network.
enum PreparedCall {
    Webhook { id: String, body: WebhookBody },
    Service(ServiceCall),
}

pub struct Panel<S, V, D> {
    store: Arc<ConfigStore<S>>,
    client: BackendClient,
    status: StatusReporter<D>,
    view: Arc<V>,
    profile: Arc<PanelProfile>,
}

impl<S, V, D> Clone for Panel<S, V, D> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            client: self.client.clone(),
            status: self.status.clone(),
            view: Arc::clone(&self.view),
            profile: Arc::clone(&self.profile),
        }
    }
}

impl<S, V, D> Panel<S, V, D>
where
    S: KeyValueStorage,
    V: PanelView,
    D: StatusDisplay,
{
    pub fn new(
        store: ConfigStore<S>,
        client: BackendClient,
        status: StatusReporter<D>,
        view: Arc<V>,
        profile: PanelProfile,
    ) -> Self {
        Self {
            store: Arc::new(store),
            client,
            status,
            view,
            profile: Arc::new(profile),
        }
    }

    pub fn store(&self) -> &ConfigStore<S> {
        &self.store
    }

    /// Page-load sequence: bootstrap link first, then the settings form.
    pub fn initialize(&self, address: &dyn AddressBar) -> Result<BootstrapOutcome> {
        let outcome = bootstrap::ingest(&self.store, address, self.profile.bootstrap);
        match &outcome {
            Ok(BootstrapOutcome::Applied(_)) => self.status.success(messages::SETTINGS_FROM_LINK),
            Ok(BootstrapOutcome::Absent) => {}
            Err(error) => self.status.error(&messages::error_message(error)),
        }

        let settings = self.store.load();
        self.view.fill_settings_form(&settings);
        if settings.origin_tag {
            self.view.hide_manual_config();
        }
        outcome
    }

    pub async fn notify(&self) -> Result<()> {
        self.trigger(Intent::Notify).await
    }

    pub async fn open_door(&self) -> Result<()> {
        self.trigger(Intent::OpenDoor).await
    }

    /// Runs one action end to end. The returned error has already been
    /// shown to the visitor.
    pub async fn trigger(&self, intent: Intent) -> Result<()> {
        let settings = self.store.load();
        let prepared = match self.prepare(intent, &settings) {
            Ok(prepared) => prepared,
            Err(error) => {
                self.report_precondition(&error);
                return Err(error);
            }
        };

        tracing::info!(intent = intent.as_str(), "Sending panel action");
        self.status.loading(messages::SENDING);
        let result = match &prepared {
            PreparedCall::Webhook { id, body } => {
                self.client.post_webhook(&settings, id, body).await
            }
            PreparedCall::Service(call) => self.client.call_service(&settings, call).await,
        };

        match result {
            Ok(()) => {
                self.status.success(intent.success_message());
                Ok(())
            }
            Err(error) => {
                self.status.error(&messages::error_message(&error));
                Err(error)
            }
        }
    }

    pub fn toggle_settings(&self) {
        if self.view.is_settings_visible() {
            self.view.hide_settings();
        } else {
            self.view.show_settings();
            self.load_settings_form();
        }
    }

    pub fn cancel_settings(&self) {
        self.view.hide_settings();
    }

    pub fn load_settings_form(&self) {
        self.view.fill_settings_form(&self.store.load());
    }

    /// Replaces the stored record with the manually entered form values.
    pub fn save_settings(&self, form: SettingsForm) -> Result<Settings> {
        let settings = form.into_settings();
        if let Err(error) = self.store.save(&settings) {
            self.status.error(&messages::error_message(&error));
            return Err(error);
        }

        self.status.success(messages::SETTINGS_SAVED);
        self.view.hide_settings();
        Ok(settings)
    }

    fn prepare(&self, intent: Intent, settings: &Settings) -> Result<PreparedCall> {
        if !settings.is_configured() {
            return Err(Error::NotConfigured);
        }

        let visitor_name = non_blank(&self.view.visitor_name());
        if self.profile.require_visitor_name && visitor_name.is_none() {
            return Err(Error::Validation {
                field: "visitor_name",
            });
        }

        match self.profile.convention {
            CallingConvention::Webhook => {
                let id = match intent {
                    Intent::Notify => &self.profile.notify_webhook_id,
                    Intent::OpenDoor => &self.profile.open_door_webhook_id,
                };
                let id = non_blank(id).ok_or_else(|| {
                    Error::InvalidTarget(format!("{} webhook id is not configured", intent.as_str()))
                })?;
                let body = WebhookBody {
                    name: visitor_name,
                    action: Some(id.clone()),
                    timestamp: self
                        .profile
                        .include_timestamp
                        .then(|| chrono::Utc::now().to_rfc3339()),
                    token: if self.profile.send_token_in_body {
                        settings.auth_token.clone()
                    } else {
                        None
                    },
                };
                Ok(PreparedCall::Webhook { id, body })
            }
            CallingConvention::ServiceCall => match intent {
                Intent::Notify => {
                    let service_id = settings.notify_service_id.as_deref().ok_or_else(|| {
                        Error::InvalidTarget("notify service is not configured".to_string())
                    })?;
                    let message = messages::visitor_arrived(
                        &self.profile.notify_message,
                        visitor_name.as_deref(),
                    );
                    Ok(PreparedCall::Service(
                        ServiceCall::parse(service_id)?.with_data("message", message),
                    ))
                }
                Intent::OpenDoor => {
                    let entity_id = settings.lock_entity_id.as_deref().ok_or_else(|| {
                        Error::InvalidTarget("lock entity is not configured".to_string())
                    })?;
                    let domain = entity_domain(entity_id)?;
                    let service = open_service_for(domain)?;
                    Ok(PreparedCall::Service(
                        ServiceCall::new(domain, service)?.with_entity(entity_id),
                    ))
                }
            },
        }
    }

    fn report_precondition(&self, error: &Error) {
        tracing::warn!("Panel action rejected: {}", error);
        self.status.error(&messages::error_message(error));
        match error {
            Error::NotConfigured | Error::InvalidTarget(_) => self.view.show_settings(),
            Error::Validation { .. } => self.view.focus_visitor_name(),
            _ => {}
        }
    }
}

/// Service that opens an entity of the given domain.
fn open_service_for(domain: &str) -> Result<&'static str> {
    match domain {
        "lock" => Ok("unlock"),
        "cover" => Ok("open_cover"),
        "button" | "input_button" => Ok("press"),
        "switch" | "input_boolean" | "script" => Ok("turn_on"),
        other => Err(Error::InvalidTarget(format!(
            "don't know how to open a '{other}' entity"
        ))),
    }
}

#[cfg(test)]
mod tests;
