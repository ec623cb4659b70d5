//! Reading every song back, newest first.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::QueryError;
use crate::models::{parse_timestamp, SongId, SongRecord, SONGS_COLLECTION};
use crate::store::{Document, DocumentStore, SortDirection};

/// Sort key for listings.
const CREATED_AT: &str = "createdAt";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSong {
    title: String,
    artist: String,
    album_cover: String,
    lyrics: String,
    release_date: NaiveDate,
    duration: u32,
    genre: String,
    #[serde(default)]
    created_at: Option<Value>,
    #[serde(default)]
    updated_at: Option<Value>,
}

/// Fetch every stored song ordered by creation time, most recent first.
pub fn list_all<S>(store: &S) -> Result<Vec<SongRecord>, QueryError>
where
    S: DocumentStore + ?Sized,
{
    list_all_at(store, Utc::now())
}

/// Same as [`list_all`], substituting `now` for any unreadable `createdAt`.
/// The substitute is never written back.
pub fn list_all_at<S>(store: &S, now: DateTime<Utc>) -> Result<Vec<SongRecord>, QueryError>
where
    S: DocumentStore + ?Sized,
{
    let documents = store
        .query_ordered(SONGS_COLLECTION, CREATED_AT, SortDirection::Descending)
        .map_err(|err| {
            error!(error = %err, "failed to query songs");
            QueryError::StorageFailure(err)
        })?;

    let mut songs = documents
        .into_iter()
        .map(|document| map_document(document, now))
        .collect::<Result<Vec<_>, _>>()?;
    // Stores order by the stored text, which only matches time order for the
    // fixed-width form this crate writes. Stable, so ties keep store order.
    songs.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    debug!(count = songs.len(), "listed songs");
    Ok(songs)
}

fn map_document(document: Document, now: DateTime<Utc>) -> Result<SongRecord, QueryError> {
    let Document { id, fields } = document;
    let stored: StoredSong =
        serde_json::from_value(Value::Object(fields)).map_err(|source| {
            QueryError::MalformedDocument {
                id: id.clone(),
                source,
            }
        })?;

    let created_at = match stored.created_at.as_ref().and_then(parse_timestamp) {
        Some(created_at) => created_at,
        None => {
            warn!(id = %id, "song has no readable createdAt; using query time");
            now
        }
    };
    let updated_at = stored
        .updated_at
        .as_ref()
        .and_then(parse_timestamp)
        .unwrap_or(created_at);

    Ok(SongRecord {
        id: SongId::new(id),
        title: stored.title,
        artist: stored.artist,
        album_cover: stored.album_cover,
        lyrics: stored.lyrics,
        release_date: stored.release_date,
        duration: stored.duration,
        genre: stored.genre,
        created_at,
        updated_at,
    })
}
