use alzina_core::panel::SettingsForm;
use alzina_core::util::is_backend_url;
use alzina_core::Settings;
use serde::Serialize;

use crate::cli::ConfigCommands;
use crate::commands::common::{open_panel, open_store, PanelPaths};
use crate::error::CliError;
use crate::terminal::render_form_lines;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsItem {
    pub backend_base_url: Option<String>,
    pub auth_token: Option<&'static str>,
    pub notify_service_id: Option<String>,
    pub lock_entity_id: Option<String>,
    pub origin_tag: bool,
}

pub fn settings_to_item(settings: &Settings) -> SettingsItem {
    SettingsItem {
        backend_base_url: settings.backend_base_url.clone(),
        auth_token: settings.auth_token.as_ref().map(|_| "[REDACTED]"),
        notify_service_id: settings.notify_service_id.clone(),
        lock_entity_id: settings.lock_entity_id.clone(),
        origin_tag: settings.origin_tag,
    }
}

pub fn run_config(command: ConfigCommands, paths: &PanelPaths) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show { json } => run_config_show(json, paths),
        ConfigCommands::Set {
            base_url,
            token,
            notify_service,
            lock_entity,
        } => {
            let form = SettingsForm {
                base_url,
                auth_token: token.unwrap_or_default(),
                notify_service_id: notify_service.unwrap_or_default(),
                lock_entity_id: lock_entity.unwrap_or_default(),
            };
            run_config_set(form, paths).map(|_| ())
        }
    }
}

pub fn run_config_show(as_json: bool, paths: &PanelPaths) -> Result<(), CliError> {
    let settings = open_store(&paths.state_dir).load();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&settings_to_item(&settings))?);
        return Ok(());
    }

    if !settings.is_configured() {
        println!("Panel is not configured yet.");
    }
    for line in render_form_lines(&SettingsForm::from_settings(&settings)) {
        println!("{line}");
    }
    if settings.origin_tag {
        println!("(configured from a link)");
    }
    Ok(())
}

pub fn run_config_set(form: SettingsForm, paths: &PanelPaths) -> Result<Settings, CliError> {
    validate_form(&form)?;
    let session = open_panel(paths)?;
    let settings = session
        .panel
        .save_settings(form)
        .map_err(|_| CliError::ActionFailed)?;
    println!("Settings saved to {}", paths.state_dir.display());
    Ok(settings)
}

pub fn validate_form(form: &SettingsForm) -> Result<(), CliError> {
    let base_url = form.base_url.trim();
    if base_url.is_empty() {
        return Err(CliError::Config("base_url must not be empty".to_string()));
    }
    if !is_backend_url(base_url) {
        return Err(CliError::Config(
            "base_url must be an http:// or https:// URL with a host".to_string(),
        ));
    }
    Ok(())
}
