//! Document store seam. The rest of the crate only talks to a
//! [`DocumentStore`]: add a document to a named collection, or read a
//! collection back ordered by one field.

mod connection;
mod memory;
mod sqlite;

use std::cmp::Ordering;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::StoreError;

pub use connection::{data_dir, ensure_schema, DB_FILE_NAME};
pub use memory::MemoryDocumentStore;
pub use sqlite::SqliteDocumentStore;

/// Fields of a stored document, keyed by field name.
pub type Fields = Map<String, Value>;

/// A document as handed back by a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

pub trait DocumentStore {
    /// Persist `fields` as a new document in `collection` and return the id the
    /// store assigned to it.
    fn add_document(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    /// Return every document of `collection` carrying `order_by`, sorted by that
    /// field. Documents without the field are left out. Among equal keys,
    /// later insertions come first when descending.
    fn query_ordered(
        &self,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Document>, StoreError>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn add_document(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        (**self).add_document(collection, fields)
    }

    fn query_ordered(
        &self,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Document>, StoreError> {
        (**self).query_ordered(collection, order_by, direction)
    }
}

impl<T: DocumentStore + ?Sized> DocumentStore for Box<T> {
    fn add_document(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        (**self).add_document(collection, fields)
    }

    fn query_ordered(
        &self,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Document>, StoreError> {
        (**self).query_ordered(collection, order_by, direction)
    }
}

impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    fn add_document(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        (**self).add_document(collection, fields)
    }

    fn query_ordered(
        &self,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Document>, StoreError> {
        (**self).query_ordered(collection, order_by, direction)
    }
}

/// Total order over JSON values mirroring how SQLite compares the output of
/// `json_extract`: null, then booleans and numbers by value, then text, then
/// anything structured.
pub(crate) fn compare_values(left: &Value, right: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) | Value::Number(_) => 1,
            Value::String(_) => 2,
            Value::Array(_) | Value::Object(_) => 3,
        }
    }

    fn numeric(value: &Value) -> f64 {
        match value {
            Value::Bool(flag) => f64::from(u8::from(*flag)),
            Value::Number(number) => number.as_f64().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    match rank(left).cmp(&rank(right)) {
        Ordering::Equal => match (left, right) {
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Array(_) | Value::Object(_), _) => left.to_string().cmp(&right.to_string()),
            _ => numeric(left).total_cmp(&numeric(right)),
        },
        other => other,
    }
}
