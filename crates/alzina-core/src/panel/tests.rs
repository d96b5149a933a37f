use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::bootstrap::InMemoryAddressBar;
use crate::client::test_server::{unreachable_base_url, TestServer};
use crate::models::BootstrapPolicy;
use crate::status::testing::RecordingDisplay;
use crate::status::Severity;
use crate::store::testing::UnavailableStorage;
use crate::store::{MemoryStorage, SETTINGS_KEY};

#[derive(Debug, Default)]
struct RecordingView {
    visitor_name: Mutex<String>,
    name_focused: Mutex<usize>,
    settings_visible: Mutex<bool>,
    form: Mutex<Option<SettingsForm>>,
    manual_config_hidden: Mutex<bool>,
}

impl RecordingView {
    fn with_name(name: &str) -> Self {
        let view = Self::default();
        *view.visitor_name.lock().unwrap() = name.to_string();
        view
    }

    fn focus_count(&self) -> usize {
        *self.name_focused.lock().unwrap()
    }

    fn form(&self) -> Option<SettingsForm> {
        self.form.lock().unwrap().clone()
    }
}

impl PanelView for RecordingView {
    fn visitor_name(&self) -> String {
        self.visitor_name.lock().unwrap().clone()
    }

    fn focus_visitor_name(&self) {
        *self.name_focused.lock().unwrap() += 1;
    }

    fn show_settings(&self) {
        *self.settings_visible.lock().unwrap() = true;
    }

    fn hide_settings(&self) {
        *self.settings_visible.lock().unwrap() = false;
    }

    fn is_settings_visible(&self) -> bool {
        *self.settings_visible.lock().unwrap()
    }

    fn fill_settings_form(&self, settings: &Settings) {
        *self.form.lock().unwrap() = Some(SettingsForm::from_settings(settings));
    }

    fn hide_manual_config(&self) {
        *self.manual_config_hidden.lock().unwrap() = true;
    }
}

struct Harness<S = MemoryStorage> {
    panel: Panel<S, RecordingView, RecordingDisplay>,
    view: Arc<RecordingView>,
    display: Arc<RecordingDisplay>,
}

fn harness(profile: PanelProfile, view: RecordingView, settings: Option<Settings>) -> Harness {
    let store = ConfigStore::new(MemoryStorage::default());
    if let Some(settings) = settings {
        store.save(&settings).unwrap();
    }
    harness_with(store, profile, view)
}

fn harness_with<S: KeyValueStorage>(
    store: ConfigStore<S>,
    profile: PanelProfile,
    view: RecordingView,
) -> Harness<S> {
    let view = Arc::new(view);
    let display = Arc::new(RecordingDisplay::default());
    let panel = Panel::new(
        store,
        BackendClient::new().unwrap(),
        StatusReporter::new(Arc::clone(&display)),
        Arc::clone(&view),
        profile,
    );
    Harness {
        panel,
        view,
        display,
    }
}

fn configured(base_url: &str) -> Option<Settings> {
    Some(Settings {
        backend_base_url: Some(base_url.to_string()),
        ..Default::default()
    })
}

fn open_door_profile() -> PanelProfile {
    PanelProfile {
        open_door_webhook_id: "open_door".to_string(),
        ..Default::default()
    }
}

fn last_status(display: &RecordingDisplay) -> (String, Severity) {
    display.current().expect("a status message should be displayed")
}

#[tokio::test]
async fn action_without_base_url_reveals_settings_and_sends_nothing() {
    let server = TestServer::spawn("200 OK").await;
    let h = harness(PanelProfile::default(), RecordingView::default(), None);

    let error = h.panel.open_door().await.unwrap_err();

    assert!(matches!(error, Error::NotConfigured));
    assert_eq!(
        last_status(&h.display),
        (messages::NOT_CONFIGURED.to_string(), Severity::Error)
    );
    assert!(h.view.is_settings_visible());
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn empty_visitor_name_focuses_field_and_sends_nothing() {
    let server = TestServer::spawn("200 OK").await;
    let profile = PanelProfile {
        require_visitor_name: true,
        ..Default::default()
    };
    let h = harness(profile, RecordingView::with_name("   "), configured(&server.base_url));

    let error = h.panel.notify().await.unwrap_err();

    assert!(matches!(error, Error::Validation { .. }));
    assert_eq!(
        last_status(&h.display),
        (messages::NAME_REQUIRED.to_string(), Severity::Error)
    );
    assert_eq!(h.view.focus_count(), 1);
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn open_door_posts_webhook_and_reports_success() {
    let server = TestServer::spawn("200 OK").await;
    let h = harness(open_door_profile(), RecordingView::default(), configured(&server.base_url));

    h.panel.open_door().await.unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/api/webhook/open_door");
    assert_eq!(requests[0].json()["action"], "open_door");
    assert_eq!(
        h.display.rendered(),
        vec![
            (messages::SENDING.to_string(), Severity::Loading),
            (messages::DOOR_OPENED.to_string(), Severity::Success),
        ]
    );
}

#[tokio::test]
async fn notify_uses_visitor_arrived_webhook() {
    let server = TestServer::spawn("200 OK").await;
    let h = harness(
        PanelProfile::default(),
        RecordingView::with_name("Marta"),
        configured(&server.base_url),
    );

    h.panel.notify().await.unwrap();

    let requests = server.requests();
    assert_eq!(requests[0].path, "/api/webhook/visitant_arribat");
    assert_eq!(
        requests[0].json(),
        json!({"name": "Marta", "action": "visitant_arribat"})
    );
    assert_eq!(
        last_status(&h.display),
        (messages::NOTIFY_SENT.to_string(), Severity::Success)
    );
}

#[tokio::test]
async fn webhook_body_carries_timestamp_and_token_when_enabled() {
    let server = TestServer::spawn("200 OK").await;
    let profile = PanelProfile {
        include_timestamp: true,
        send_token_in_body: true,
        ..Default::default()
    };
    let settings = Settings {
        backend_base_url: Some(server.base_url.clone()),
        auth_token: Some("panel-token".to_string()),
        ..Default::default()
    };
    let h = harness(profile, RecordingView::default(), Some(settings));

    h.panel.notify().await.unwrap();

    let body = server.requests()[0].json();
    assert_eq!(body["token"], "panel-token");
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    assert!(body.get("name").is_none());
}

#[tokio::test]
async fn error_status_is_reported_with_code() {
    let server = TestServer::spawn("503 Service Unavailable").await;
    let h = harness(open_door_profile(), RecordingView::default(), configured(&server.base_url));

    let error = h.panel.open_door().await.unwrap_err();

    assert!(matches!(error, Error::Http { status: 503 }));
    let (message, severity) = last_status(&h.display);
    assert_eq!(severity, Severity::Error);
    assert!(message.contains("503"));
    // Loading, then exactly one error. No success message on top.
    assert_eq!(h.display.rendered().len(), 2);
}

#[tokio::test]
async fn transport_failure_reports_root_cause() {
    let base_url = unreachable_base_url().await;
    let h = harness(open_door_profile(), RecordingView::default(), configured(&base_url));

    let error = h.panel.open_door().await.unwrap_err();

    assert!(matches!(error, Error::Transport(_)));
    let (message, severity) = last_status(&h.display);
    assert_eq!(severity, Severity::Error);
    assert!(message.starts_with("Error: error sending request"), "{message}");
    assert!(
        message.to_lowercase().contains("connection refused"),
        "root cause missing from {message}"
    );
    assert_eq!(h.display.rendered().len(), 2);
}

// Overlapping clicks are not de-duplicated: both requests reach the backend.
#[tokio::test]
async fn overlapping_actions_both_reach_backend() {
    let server = TestServer::spawn("200 OK").await;
    let h = harness(open_door_profile(), RecordingView::default(), configured(&server.base_url));

    let (first, second) = tokio::join!(h.panel.open_door(), h.panel.open_door());

    assert!(first.is_ok());
    assert!(second.is_ok());
    assert_eq!(server.requests().len(), 2);
}

#[tokio::test]
async fn service_call_notify_sends_message_with_bearer_token() {
    let server = TestServer::spawn("200 OK").await;
    let profile = PanelProfile {
        convention: CallingConvention::ServiceCall,
        ..Default::default()
    };
    let settings = Settings {
        backend_base_url: Some(server.base_url.clone()),
        auth_token: Some("long-lived".to_string()),
        notify_service_id: Some("notify.mobile_app_phone".to_string()),
        ..Default::default()
    };
    let h = harness(profile, RecordingView::with_name("Marta"), Some(settings));

    h.panel.notify().await.unwrap();

    let requests = server.requests();
    assert_eq!(requests[0].path, "/api/services/notify/mobile_app_phone");
    assert_eq!(
        requests[0].header("authorization").as_deref(),
        Some("Bearer long-lived")
    );
    assert_eq!(
        requests[0].json(),
        json!({"message": format!("{}: Marta", messages::VISITOR_ARRIVED)})
    );
}

#[tokio::test]
async fn service_call_open_door_unlocks_entity() {
    let server = TestServer::spawn("200 OK").await;
    let profile = PanelProfile {
        convention: CallingConvention::ServiceCall,
        ..Default::default()
    };
    let settings = Settings {
        backend_base_url: Some(server.base_url.clone()),
        auth_token: Some("long-lived".to_string()),
        lock_entity_id: Some("lock.front_door".to_string()),
        ..Default::default()
    };
    let h = harness(profile, RecordingView::default(), Some(settings));

    h.panel.open_door().await.unwrap();

    let requests = server.requests();
    assert_eq!(requests[0].path, "/api/services/lock/unlock");
    assert_eq!(requests[0].json(), json!({"entity_id": "lock.front_door"}));
    assert_eq!(
        last_status(&h.display),
        (messages::DOOR_OPENED.to_string(), Severity::Success)
    );
}

#[tokio::test]
async fn service_call_without_lock_entity_sends_nothing() {
    let server = TestServer::spawn("200 OK").await;
    let profile = PanelProfile {
        convention: CallingConvention::ServiceCall,
        ..Default::default()
    };
    let h = harness(profile, RecordingView::default(), configured(&server.base_url));

    let error = h.panel.open_door().await.unwrap_err();

    assert!(matches!(error, Error::InvalidTarget(_)));
    assert!(h.view.is_settings_visible());
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn initialize_applies_full_link_and_hides_manual_config() {
    let profile = PanelProfile {
        bootstrap: BootstrapPolicy::DomainAndToken,
        ..Default::default()
    };
    let h = harness(profile, RecordingView::default(), None);
    let address =
        InMemoryAddressBar::parse("https://panel.example.com/?domain=https://ha.example.com/&token=abc")
            .unwrap();

    let outcome = h.panel.initialize(&address).unwrap();

    assert!(matches!(outcome, BootstrapOutcome::Applied(_)));
    assert_eq!(
        last_status(&h.display),
        (messages::SETTINGS_FROM_LINK.to_string(), Severity::Success)
    );
    assert_eq!(address.location().query(), None);
    assert!(*h.view.manual_config_hidden.lock().unwrap());
    assert_eq!(
        h.view.form().map(|form| form.base_url),
        Some("https://ha.example.com".to_string())
    );
}

#[tokio::test]
async fn initialize_reports_incomplete_link_without_saving() {
    let profile = PanelProfile {
        bootstrap: BootstrapPolicy::DomainAndToken,
        ..Default::default()
    };
    let h = harness(profile, RecordingView::default(), None);
    let address =
        InMemoryAddressBar::parse("https://panel.example.com/?domain=https://ha.example.com").unwrap();

    let error = h.panel.initialize(&address).unwrap_err();

    assert!(matches!(error, Error::IncompleteBootstrap { .. }));
    let (message, severity) = last_status(&h.display);
    assert_eq!(severity, Severity::Error);
    assert!(message.starts_with(messages::INCOMPLETE_LINK));
    assert_eq!(h.panel.store().storage().get_item(SETTINGS_KEY).unwrap(), None);
    assert!(!*h.view.manual_config_hidden.lock().unwrap());
}

#[tokio::test]
async fn save_settings_normalizes_and_hides_panel() {
    let h = harness(PanelProfile::default(), RecordingView::default(), None);
    h.panel.toggle_settings();
    assert!(h.view.is_settings_visible());

    let saved = h
        .panel
        .save_settings(SettingsForm {
            base_url: "https://ha.example.com/".to_string(),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(saved.base_url(), Some("https://ha.example.com"));
    assert_eq!(h.panel.store().load(), saved);
    assert!(!h.view.is_settings_visible());
    assert_eq!(
        last_status(&h.display),
        (messages::SETTINGS_SAVED.to_string(), Severity::Success)
    );
}

#[tokio::test]
async fn failed_settings_save_reports_error_and_keeps_panel_open() {
    let h = harness_with(
        ConfigStore::new(UnavailableStorage),
        PanelProfile::default(),
        RecordingView::default(),
    );
    h.panel.toggle_settings();

    let error = h
        .panel
        .save_settings(SettingsForm {
            base_url: "https://ha.example.com".to_string(),
            ..Default::default()
        })
        .unwrap_err();

    assert!(matches!(error, Error::Storage(_)));
    let (message, severity) = last_status(&h.display);
    assert_eq!(severity, Severity::Error);
    assert!(message.contains("medium unavailable"), "{message}");
    assert!(h.view.is_settings_visible());
}

#[tokio::test]
async fn unreadable_store_treats_panel_as_unconfigured() {
    let server = TestServer::spawn("200 OK").await;
    let h = harness_with(
        ConfigStore::new(UnavailableStorage),
        open_door_profile(),
        RecordingView::default(),
    );

    let error = h.panel.open_door().await.unwrap_err();

    assert!(matches!(error, Error::NotConfigured));
    assert!(h.view.is_settings_visible());
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn blank_webhook_id_is_rejected_before_sending() {
    let server = TestServer::spawn("200 OK").await;
    let profile = PanelProfile {
        notify_webhook_id: "  ".to_string(),
        ..Default::default()
    };
    let h = harness(profile, RecordingView::default(), configured(&server.base_url));

    let error = h.panel.notify().await.unwrap_err();

    assert!(matches!(error, Error::InvalidTarget(_)));
    assert!(h.view.is_settings_visible());
    assert!(server.requests().is_empty());
    assert!(h
        .display
        .rendered()
        .iter()
        .all(|(_, severity)| *severity != Severity::Loading));
}

#[tokio::test]
async fn toggling_settings_open_refills_form() {
    let h = harness(
        PanelProfile::default(),
        RecordingView::default(),
        configured("https://ha.example.com"),
    );

    h.panel.toggle_settings();
    assert_eq!(
        h.view.form().map(|form| form.base_url),
        Some("https://ha.example.com".to_string())
    );

    h.panel.toggle_settings();
    assert!(!h.view.is_settings_visible());

    h.panel.toggle_settings();
    h.panel.cancel_settings();
    assert!(!h.view.is_settings_visible());
}
