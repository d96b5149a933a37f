use alzina_core::panel::Intent;

use crate::commands::common::{open_panel, PanelPaths};
use crate::error::CliError;

pub async fn run_action(
    intent: Intent,
    name: Option<&str>,
    paths: &PanelPaths,
) -> Result<(), CliError> {
    let session = open_panel(paths)?;
    if let Some(name) = name {
        session.view.set_visitor_name(name);
    }

    // The panel has already printed the failure.
    session
        .panel
        .trigger(intent)
        .await
        .map_err(|_| CliError::ActionFailed)
}
