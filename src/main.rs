//! Binary entry point that glues the SQLite document store to the TUI: load the
//! configuration, start file logging, open the store, then drive the Ratatui
//! event loop until the user exits.
use anyhow::Context;
use song_gallery::config::{load_config, AppConfig};
use song_gallery::store::data_dir;
use song_gallery::{logging, run_app, App, SqliteDocumentStore};
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    let (config, config_error) = match load_config() {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };

    let data_dir = data_dir(config.data_dir.as_deref())?;
    let log_path = logging::init(&data_dir, &config.log_level)?;
    if let Some(err) = config_error {
        warn!(error = %err, "could not load configuration, using defaults");
    }
    info!(log = %log_path.display(), data_dir = %data_dir.display(), "starting song gallery");

    let store = SqliteDocumentStore::open_default(Some(data_dir.as_path())).with_context(|| {
        format!("failed to open song store in {}", data_dir.display())
    })?;

    let mut app = App::new(Box::new(store), config).persisting_config();
    let outcome = run_app(&mut app);
    info!("song gallery closed");
    outcome
}
