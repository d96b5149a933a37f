use alzina_core::bootstrap::{AddressBar, BootstrapOutcome, InMemoryAddressBar};

use crate::commands::common::{open_panel, PanelPaths};
use crate::error::CliError;

pub fn run_link(url: &str, paths: &PanelPaths) -> Result<(), CliError> {
    let address = InMemoryAddressBar::parse(url)?;
    let session = open_panel(paths)?;

    match session.panel.initialize(&address) {
        Ok(BootstrapOutcome::Applied(settings)) => {
            println!(
                "Home Assistant: {}",
                settings.base_url().unwrap_or_default()
            );
            println!("{}", address.location());
            Ok(())
        }
        Ok(BootstrapOutcome::Absent) => Err(CliError::Config(
            "link carries no domain/token parameters".to_string(),
        )),
        Err(_) => Err(CliError::ActionFailed),
    }
}
