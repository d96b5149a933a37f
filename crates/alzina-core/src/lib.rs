//! alzina-core - Core library for Cal Alzina
//!
//! This crate contains the settings model, the single-record config store,
//! bootstrap link ingestion, the Home Assistant client and the panel action
//! handlers shared by every Cal Alzina front-end.

pub mod bootstrap;
pub mod client;
pub mod error;
pub mod messages;
pub mod models;
pub mod panel;
pub mod status;
pub mod store;
pub mod util;

pub use error::{Error, Result};
pub use models::{PanelProfile, Settings};
