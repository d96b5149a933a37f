//! Terminal implementations of the panel view and status region.

use std::sync::Mutex;

use alzina_core::panel::{PanelView, SettingsForm};
use alzina_core::status::{Severity, StatusDisplay};
use alzina_core::Settings;

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[derive(Debug, Default)]
pub struct TerminalView {
    visitor_name: Mutex<String>,
    settings_visible: Mutex<bool>,
    manual_config_hidden: Mutex<bool>,
}

impl TerminalView {
    pub fn set_visitor_name(&self, name: &str) {
        *lock(&self.visitor_name) = name.to_string();
    }

    pub fn manual_config_hidden(&self) -> bool {
        *lock(&self.manual_config_hidden)
    }
}

impl PanelView for TerminalView {
    fn visitor_name(&self) -> String {
        lock(&self.visitor_name).clone()
    }

    fn focus_visitor_name(&self) {
        println!("→ name <el teu nom>");
    }

    fn show_settings(&self) {
        *lock(&self.settings_visible) = true;
        if !self.manual_config_hidden() {
            println!("Configuració: save url=<URL> [token=…] [notify=…] [lock=…] | cancel");
        }
    }

    fn hide_settings(&self) {
        *lock(&self.settings_visible) = false;
    }

    fn is_settings_visible(&self) -> bool {
        *lock(&self.settings_visible)
    }

    fn fill_settings_form(&self, settings: &Settings) {
        if !self.is_settings_visible() {
            return;
        }
        for line in render_form_lines(&SettingsForm::from_settings(settings)) {
            println!("  {line}");
        }
    }

    fn hide_manual_config(&self) {
        *lock(&self.manual_config_hidden) = true;
    }
}

/// Form fields as shown in the terminal, with the token masked.
pub fn render_form_lines(form: &SettingsForm) -> Vec<String> {
    let token = if form.auth_token.is_empty() {
        String::new()
    } else {
        "********".to_string()
    };
    vec![
        format!("url     = {}", form.base_url),
        format!("token   = {token}"),
        format!("notify  = {}", form.notify_service_id),
        format!("lock    = {}", form.lock_entity_id),
    ]
}

/// Prints status messages to the terminal.
#[derive(Debug, Default)]
pub struct TerminalStatus;

impl StatusDisplay for TerminalStatus {
    fn render(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => eprintln!("[{}] {message}", severity.as_str()),
            Severity::Success | Severity::Loading => {
                println!("[{}] {message}", severity.as_str());
            }
        }
    }

    fn clear(&self) {
        tracing::debug!("Status message dismissed");
    }
}
