use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Log file written inside the data directory. The terminal belongs to the UI,
/// so nothing is ever logged to stdout or stderr.
pub const LOG_FILE_NAME: &str = "song-gallery.log";
/// Environment variable that overrides the configured filter.
pub const LOG_ENV: &str = "SONG_GALLERY_LOG";

/// Install the global `tracing` subscriber, appending to `<data_dir>/song-gallery.log`.
/// Returns the path of the log file.
pub fn init(data_dir: &Path, default_filter: &str) -> Result<PathBuf> {
    fs::create_dir_all(data_dir).context("failed to create data directory")?;
    let path = data_dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(std::env::var(LOG_ENV).ok().as_deref(), default_filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("{err}"))
        .context("failed to install log subscriber")?;

    Ok(path)
}

/// Prefer the environment override, then the configured directive, then `info`.
fn build_filter(from_env: Option<&str>, configured: &str) -> EnvFilter {
    from_env
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .or_else(|| EnvFilter::try_new(configured).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
