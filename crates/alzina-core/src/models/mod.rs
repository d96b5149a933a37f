//! Data models for Cal Alzina

mod profile;
mod settings;

pub use profile::{BootstrapPolicy, CallingConvention, PanelProfile, PROFILE_FILE_NAME};
pub use settings::Settings;
