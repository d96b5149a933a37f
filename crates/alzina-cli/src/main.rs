//! Cal Alzina CLI - terminal doorbell panel
//!
//! Notify the host or open the door through Home Assistant, and configure the
//! panel from a shared link.

mod cli;
mod commands;
mod error;
mod terminal;


use alzina_core::panel::Intent;
use clap::{CommandFactory, Parser};

use crate::cli::{Cli, Commands};
use crate::commands::action::run_action;
use crate::commands::common::PanelPaths;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::link::run_link;
use crate::commands::panel::run_panel;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        if !error.already_reported() {
            eprintln!("Error: {error}");
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("alzina=info,alzina_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = PanelPaths::resolve(cli.state_dir, cli.profile);

    match cli.command {
        Some(Commands::Notify { name }) => {
            run_action(Intent::Notify, name.as_deref(), &paths).await?;
        }
        Some(Commands::OpenDoor { name }) => {
            run_action(Intent::OpenDoor, name.as_deref(), &paths).await?;
        }
        Some(Commands::Link { url }) => run_link(&url, &paths)?,
        Some(Commands::Config { command }) => run_config(command, &paths)?,
        Some(Commands::Panel { link }) => run_panel(link.as_deref(), &paths).await?,
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        None => {
            Cli::command().print_help().map_err(CliError::Io)?;
            println!();
        }
    }

    Ok(())
}
