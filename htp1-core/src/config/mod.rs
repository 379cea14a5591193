//! Settings types
//!
//! Layout, connection and backlight settings shared with the settings
//! collaborator, plus the configuration page's form handling.

pub mod types;
pub mod update;

pub use types::*;
pub use update::{apply_json, InputEntry, SettingsChange, SettingsDocument, SettingsError};
