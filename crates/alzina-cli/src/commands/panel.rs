//! Interactive panel: one line per visitor intent.
//!
//! Actions are spawned as independent tasks, so typing `open` twice issues
//! two overlapping requests, the same as two clicks on the page would.

use alzina_core::bootstrap::InMemoryAddressBar;
use alzina_core::panel::{Intent, SettingsForm};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

use crate::commands::common::{open_panel, PanelPaths};
use crate::error::CliError;

const DEFAULT_LOCATION: &str = "alzina://panel/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelInput {
    Action(Intent),
    Name(String),
    ToggleSettings,
    CancelSettings,
    Save(SettingsForm),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_panel_input(line: &str) -> PanelInput {
    let line = line.trim();
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(command, rest)| (command, rest.trim()));

    match command {
        "" => PanelInput::Empty,
        "n" | "notify" | "ring" => PanelInput::Action(Intent::Notify),
        "o" | "open" | "open-door" => PanelInput::Action(Intent::OpenDoor),
        "name" => PanelInput::Name(rest.to_string()),
        "s" | "settings" => PanelInput::ToggleSettings,
        "cancel" => PanelInput::CancelSettings,
        "save" => PanelInput::Save(parse_settings_form(rest)),
        "h" | "help" | "?" => PanelInput::Help,
        "q" | "quit" | "exit" => PanelInput::Quit,
        other => PanelInput::Unknown(other.to_string()),
    }
}

/// Parses `url=… token=… notify=… lock=…`; unknown keys are ignored.
pub fn parse_settings_form(raw: &str) -> SettingsForm {
    let mut form = SettingsForm::default();
    for pair in raw.split_whitespace() {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        match key {
            "url" => form.base_url = value.to_string(),
            "token" => form.auth_token = value.to_string(),
            "notify" => form.notify_service_id = value.to_string(),
            "lock" => form.lock_entity_id = value.to_string(),
            _ => {}
        }
    }
    form
}

const HELP: &str = "n|notify  o|open  name <text>  s|settings  save url=… [token=…] [notify=…] [lock=…]  cancel  q|quit";

pub async fn run_panel(link: Option<&str>, paths: &PanelPaths) -> Result<(), CliError> {
    let address = InMemoryAddressBar::parse(link.unwrap_or(DEFAULT_LOCATION))?;
    let session = open_panel(paths)?;
    // Failures were already shown on the status line.
    let _ = session.panel.initialize(&address);
    println!("{HELP}");

    let mut in_flight = JoinSet::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        while in_flight.try_join_next().is_some() {}

        match parse_panel_input(&line) {
            PanelInput::Action(intent) => {
                let panel = session.panel.clone();
                in_flight.spawn(async move {
                    let _ = panel.trigger(intent).await;
                });
            }
            PanelInput::Name(name) => session.view.set_visitor_name(&name),
            PanelInput::ToggleSettings => session.panel.toggle_settings(),
            PanelInput::CancelSettings => session.panel.cancel_settings(),
            PanelInput::Save(form) => {
                let _ = session.panel.save_settings(form);
            }
            PanelInput::Help => println!("{HELP}"),
            PanelInput::Quit => break,
            PanelInput::Empty => {}
            PanelInput::Unknown(command) => println!("Unknown command '{command}'. {HELP}"),
        }
    }

    // Issued requests run to completion.
    while in_flight.join_next().await.is_some() {}
    Ok(())
}
