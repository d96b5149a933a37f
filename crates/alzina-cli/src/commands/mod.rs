pub mod action;
pub mod common;
pub mod completions;
pub mod config;
pub mod link;
pub mod panel;
