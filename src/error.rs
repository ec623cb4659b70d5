use thiserror::Error;

use crate::models::SongField;

/// A single violated field constraint. Recoverable by correcting the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: SongField,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: SongField, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Failures raised by a document store adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("document encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not locate home directory")]
    MissingHome,

    #[error("document store unavailable: {0}")]
    Unavailable(String),
}

/// Outcome of a rejected `submit` call.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("song failed validation ({} problem(s))", .0.len())]
    Invalid(Vec<ValidationError>),

    #[error("failed to store song: {0}")]
    StorageFailure(#[source] StoreError),
}

/// Outcome of a failed `list_all` call. Either way no records are returned.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("failed to query songs: {0}")]
    StorageFailure(#[source] StoreError),

    #[error("song document {id} is malformed: {source}")]
    MalformedDocument {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_name_the_stored_field() {
        let err = ValidationError::new(SongField::AlbumCover, "Must be a valid URL");
        assert_eq!(err.to_string(), "albumCover: Must be a valid URL");
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }
}
