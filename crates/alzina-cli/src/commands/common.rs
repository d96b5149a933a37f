use std::path::{Path, PathBuf};
use std::sync::Arc;

use alzina_core::client::BackendClient;
use alzina_core::models::PROFILE_FILE_NAME;
use alzina_core::panel::Panel;
use alzina_core::status::StatusReporter;
use alzina_core::store::{ConfigStore, FileStorage};
use alzina_core::PanelProfile;

use crate::error::CliError;
use crate::terminal::{TerminalStatus, TerminalView};

pub type TerminalPanel = Panel<FileStorage, TerminalView, TerminalStatus>;

/// Where settings and the panel profile are read from.
#[derive(Debug, Clone)]
pub struct PanelPaths {
    pub state_dir: PathBuf,
    pub profile_path: PathBuf,
}

impl PanelPaths {
    pub fn resolve(state_dir: Option<PathBuf>, profile_path: Option<PathBuf>) -> Self {
        let state_dir = state_dir.unwrap_or_else(default_state_dir);
        let profile_path = profile_path.unwrap_or_else(|| state_dir.join(PROFILE_FILE_NAME));
        Self {
            state_dir,
            profile_path,
        }
    }
}

pub fn default_state_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("alzina")
}

pub fn open_store(state_dir: &Path) -> ConfigStore<FileStorage> {
    ConfigStore::new(FileStorage::new(state_dir))
}

pub struct TerminalSession {
    pub panel: TerminalPanel,
    pub view: Arc<TerminalView>,
}

pub fn open_panel(paths: &PanelPaths) -> Result<TerminalSession, CliError> {
    let profile = PanelProfile::load_from_path(&paths.profile_path)?;
    tracing::debug!(
        profile = %paths.profile_path.display(),
        convention = ?profile.convention,
        "Loaded panel profile"
    );

    let view = Arc::new(TerminalView::default());
    let panel = Panel::new(
        open_store(&paths.state_dir),
        BackendClient::new()?,
        StatusReporter::new(Arc::new(TerminalStatus)),
        Arc::clone(&view),
        profile,
    );

    Ok(TerminalSession { panel, view })
}
