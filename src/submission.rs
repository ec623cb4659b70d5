//! Turning a candidate into a stored song: validate, stamp, write once.

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::{StoreError, SubmissionError};
use crate::models::{format_timestamp, SongCandidate, SongId, SongRecord, SONGS_COLLECTION};
use crate::schema::validate;
use crate::store::{DocumentStore, Fields};

/// Shape written to the store. Everything except the id, which the store
/// assigns.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SongDocument<'a> {
    title: &'a str,
    artist: &'a str,
    album_cover: &'a str,
    lyrics: &'a str,
    release_date: NaiveDate,
    duration: u32,
    genre: &'a str,
    created_at: String,
    updated_at: String,
}

/// Validate `candidate` and, if it passes, store it as a new song stamped with
/// the current time.
pub fn submit<S>(store: &S, candidate: &SongCandidate) -> Result<SongRecord, SubmissionError>
where
    S: DocumentStore + ?Sized,
{
    submit_at(store, candidate, Utc::now())
}

/// Same as [`submit`] with an explicit submission time.
///
/// Exactly one `add_document` call is made for a valid candidate and none for
/// an invalid one. Nothing is retried; submitting the same candidate twice
/// stores two songs.
pub fn submit_at<S>(
    store: &S,
    candidate: &SongCandidate,
    now: DateTime<Utc>,
) -> Result<SongRecord, SubmissionError>
where
    S: DocumentStore + ?Sized,
{
    let song = validate(candidate).map_err(|errors| {
        warn!(problems = errors.len(), "rejected song submission");
        SubmissionError::Invalid(errors)
    })?;

    // Stored timestamps keep microseconds; truncate so the returned record
    // matches what a later listing reads back.
    let stamped_at = now.trunc_subsecs(6);
    let stamp = format_timestamp(&stamped_at);

    let document = SongDocument {
        title: &song.title,
        artist: &song.artist,
        album_cover: &song.album_cover,
        lyrics: &song.lyrics,
        release_date: song.release_date,
        duration: song.duration,
        genre: &song.genre,
        created_at: stamp.clone(),
        updated_at: stamp,
    };
    let fields = encode(&document).map_err(SubmissionError::StorageFailure)?;

    let id = store
        .add_document(SONGS_COLLECTION, fields)
        .map_err(|err| {
            error!(error = %err, "failed to add song to the document store");
            SubmissionError::StorageFailure(err)
        })?;

    info!(id = %id, title = %song.title, "song created");
    Ok(SongRecord::from_validated(SongId::new(id), song, stamped_at))
}

fn encode(document: &SongDocument<'_>) -> Result<Fields, StoreError> {
    match serde_json::to_value(document)? {
        Value::Object(fields) => Ok(fields),
        other => Err(StoreError::Unavailable(format!(
            "song encoded as {other} instead of an object"
        ))),
    }
}
