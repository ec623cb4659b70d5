use std::path::Path;

use rusqlite::{params, Connection};
use serde_json::Value;
use tracing::debug;

use super::connection::{data_dir, ensure_schema, open_database, DB_FILE_NAME};
use super::{Document, DocumentStore, Fields, SortDirection};
use crate::error::StoreError;

/// Document store backed by an embedded SQLite database. Each document is a
/// row holding its collection name and a JSON body.
pub struct SqliteDocumentStore {
    conn: Connection,
}

impl SqliteDocumentStore {
    /// Open the database file at `path`, creating it and its parent directory
    /// when missing.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            conn: open_database(path)?,
        })
    }

    /// Open `songs.sqlite` inside the data directory, honouring a configured
    /// override.
    pub fn open_default(configured_dir: Option<&Path>) -> Result<Self, StoreError> {
        Self::open(&data_dir(configured_dir)?.join(DB_FILE_NAME))
    }

    /// A throwaway store that lives for as long as the value does.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        ensure_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn add_document(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let body = serde_json::to_string(&Value::Object(fields))?;
        let id: String = self.conn.query_row(
            "INSERT INTO documents (collection, body) VALUES (?1, ?2) RETURNING id",
            params![collection, body],
            |row| row.get(0),
        )?;
        debug!(collection, id = %id, "inserted document");
        Ok(id)
    }

    fn query_ordered(
        &self,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Document>, StoreError> {
        // json_type is NULL only when the path is absent; JSON null stays in.
        let sql = match direction {
            SortDirection::Ascending => {
                "SELECT id, body FROM documents
                 WHERE collection = ?1 AND json_type(body, ?2) IS NOT NULL
                 ORDER BY json_extract(body, ?2) ASC, rowid ASC"
            }
            SortDirection::Descending => {
                "SELECT id, body FROM documents
                 WHERE collection = ?1 AND json_type(body, ?2) IS NOT NULL
                 ORDER BY json_extract(body, ?2) DESC, rowid DESC"
            }
        };
        let path = format!("$.{order_by}");

        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params![collection, path], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut documents = Vec::with_capacity(rows.len());
        for (id, body) in rows {
            let fields = match serde_json::from_str::<Value>(&body)? {
                Value::Object(fields) => fields,
                _ => Fields::new(),
            };
            documents.push(Document { id, fields });
        }

        debug!(collection, count = documents.len(), "queried documents");
        Ok(documents)
    }
}
