use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "alzina")]
#[command(about = "Doorbell panel: notify the host or open the door through Home Assistant")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the stored panel settings
    #[arg(long, global = true, value_name = "PATH", env = "ALZINA_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// Panel profile file (calling convention, bootstrap policy, webhook ids)
    #[arg(long, global = true, value_name = "PATH", env = "ALZINA_PROFILE")]
    pub profile: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Let the host know someone is at the door
    #[command(alias = "ring")]
    Notify {
        /// Visitor name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Open the door
    #[command(alias = "open")]
    OpenDoor {
        /// Visitor name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Configure the panel from a shared link (?domain=…&token=…)
    Link {
        /// Full link, including its query string
        url: String,
    },
    /// Show or change stored settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Interactive panel
    Panel {
        /// Launch link to ingest before the panel starts
        #[arg(long, value_name = "URL")]
        link: Option<String>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the stored settings (token redacted)
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace the stored settings
    Set {
        /// Home Assistant base URL
        #[arg(long, value_name = "URL")]
        base_url: String,
        /// Long-lived access token
        #[arg(long, value_name = "TOKEN")]
        token: Option<String>,
        /// Notification service, e.g. notify.mobile_app_phone
        #[arg(long, value_name = "SERVICE")]
        notify_service: Option<String>,
        /// Lock entity, e.g. lock.front_door
        #[arg(long, value_name = "ENTITY")]
        lock_entity: Option<String>,
    },
}
