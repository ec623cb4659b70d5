//! Core library surface for the Song Gallery TUI application.
//!
//! The binary only wires configuration, logging and the SQLite store together;
//! everything it needs is re-exported here so tests and other tooling can
//! drive submission and listing against any [`DocumentStore`].
pub mod config;
pub mod error;
pub mod listing;
pub mod logging;
pub mod models;
pub mod schema;
pub mod store;
pub mod submission;
pub mod ui;

/// Checking, writing and reading songs.
pub use listing::list_all;
pub use schema::validate;
pub use submission::submit;

pub use error::{QueryError, StoreError, SubmissionError, ValidationError};
pub use models::{SongCandidate, SongField, SongId, SongRecord, ValidatedSong};
pub use store::{DocumentStore, MemoryDocumentStore, SqliteDocumentStore};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
