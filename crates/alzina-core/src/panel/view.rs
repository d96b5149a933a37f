use crate::models::Settings;
use crate::util::{non_blank, normalize_base_url};

/// The host UI the panel drives: visitor input and the settings panel.
pub trait PanelView: Send + Sync + 'static {
    /// Current contents of the visitor name field.
    fn visitor_name(&self) -> String;
    fn focus_visitor_name(&self);
    fn show_settings(&self);
    fn hide_settings(&self);
    fn is_settings_visible(&self) -> bool;
    fn fill_settings_form(&self, settings: &Settings);
    /// Called after a link-based setup so manual configuration can be hidden.
    fn hide_manual_config(&self);
}

/// Raw values of the manual settings form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsForm {
    pub base_url: String,
    pub auth_token: String,
    pub notify_service_id: String,
    pub lock_entity_id: String,
}

impl SettingsForm {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            base_url: settings.backend_base_url.clone().unwrap_or_default(),
            auth_token: settings.auth_token.clone().unwrap_or_default(),
            notify_service_id: settings.notify_service_id.clone().unwrap_or_default(),
            lock_entity_id: settings.lock_entity_id.clone().unwrap_or_default(),
        }
    }

    /// Manually entered record; never tagged as coming from a link.
    pub fn into_settings(self) -> Settings {
        Settings {
            backend_base_url: normalize_base_url(&self.base_url),
            auth_token: non_blank(&self.auth_token),
            notify_service_id: non_blank(&self.notify_service_id),
            lock_entity_id: non_blank(&self.lock_entity_id),
            origin_tag: false,
        }
    }
}
