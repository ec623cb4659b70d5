//! Application configuration, persisted with `confy` in the platform config
//! directory under the `song-gallery` name.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "song-gallery";

/// Colour scheme of the terminal UI.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    /// Overrides `~/.song-gallery` for the database and log file.
    pub data_dir: Option<PathBuf>,
    /// `tracing` filter directive, e.g. `info` or `song_gallery=debug`.
    pub log_level: String,
    pub theme: ThemeMode,
    /// Seconds pre-filled in the create form.
    pub default_duration: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            data_dir: None,
            log_level: "info".to_string(),
            theme: ThemeMode::Dark,
            default_duration: 180,
        }
    }
}

/// Load the stored configuration. A missing file yields (and writes) the
/// defaults; an unreadable one is reported so the caller can fall back.
pub fn load_config() -> Result<AppConfig, confy::ConfyError> {
    confy::load(CONFIG_NAME, None)
}

pub fn save_config(cfg: &AppConfig) -> Result<(), confy::ConfyError> {
    confy::store(CONFIG_NAME, None, cfg)
}
