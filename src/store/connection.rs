use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use rusqlite::Connection;
use tracing::debug;

use crate::error::StoreError;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".song-gallery";
/// SQLite file name stored inside the application data directory.
pub const DB_FILE_NAME: &str = "songs.sqlite";

/// Resolve the application data directory: the configured override when
/// present, otherwise `~/.song-gallery`.
pub fn data_dir(configured: Option<&Path>) -> Result<PathBuf, StoreError> {
    if let Some(dir) = configured {
        return Ok(dir.to_path_buf());
    }
    let base_dirs = BaseDirs::new().ok_or(StoreError::MissingHome)?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

/// Open (creating if needed) the database file at `path` and make sure the
/// document table exists.
pub(crate) fn open_database(path: &Path) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    ensure_schema(&conn)?;
    debug!(path = %path.display(), "opened document store");
    Ok(conn)
}

/// Run lazy migrations. Every document lives in one table keyed by a random
/// id that SQLite generates, so ids are never chosen by the application.
pub fn ensure_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            id TEXT PRIMARY KEY NOT NULL DEFAULT (lower(hex(randomblob(10)))),
            collection TEXT NOT NULL,
            body TEXT NOT NULL CHECK (json_valid(body))
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS documents_by_collection ON documents (collection)",
        [],
    )?;

    Ok(())
}
