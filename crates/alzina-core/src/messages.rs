//! User-facing panel messages (Catalan).

use crate::error::Error;

pub const SENDING: &str = "Enviant...";
pub const NOTIFY_SENT: &str = "✅ Notificació enviada!";
pub const DOOR_OPENED: &str = "✅ Porta oberta!";
pub const SETTINGS_SAVED: &str = "✅ Configuració desada correctament!";
pub const SETTINGS_FROM_LINK: &str = "✅ Configuració carregada des de l'enllaç!";
pub const NOT_CONFIGURED: &str = "Si us plau, configura primer el domini de Home Assistant";
pub const NAME_REQUIRED: &str = "Si us plau, escriu el teu nom";
pub const INCOMPLETE_LINK: &str = "Enllaç incomplet: cal el domini i el token";
pub const VISITOR_ARRIVED: &str = "Hi ha algú a la porta";

/// Renders the status line for a failed action.
pub fn error_message(error: &Error) -> String {
    match error {
        Error::NotConfigured => NOT_CONFIGURED.to_string(),
        Error::Validation { .. } => NAME_REQUIRED.to_string(),
        Error::IncompleteBootstrap { missing } => format!("{INCOMPLETE_LINK} ({missing})"),
        other => format!("Error: {other}"),
    }
}

/// Notification text, personalised when the visitor gave a name.
pub fn visitor_arrived(base: &str, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{base}: {name}"),
        None => base.to_string(),
    }
}
