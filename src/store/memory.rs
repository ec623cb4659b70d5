use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{compare_values, Document, DocumentStore, Fields, SortDirection};
use crate::error::StoreError;

/// In-process document store. Counts writes and can be told to fail so
/// callers can be exercised against an unreachable backend.
#[derive(Default)]
pub struct MemoryDocumentStore {
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    next_id: u64,
    writes: usize,
    failure: Option<String>,
    collections: HashMap<String, Vec<Document>>,
}

impl MemoryState {
    fn insert(&mut self, collection: &str, fields: Fields) -> String {
        self.next_id += 1;
        let id = format!("mem-{:06}", self.next_id);
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.clone(),
                fields,
            });
        id
    }
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `reason` until [`recover`] runs.
    ///
    /// [`recover`]: MemoryDocumentStore::recover
    pub fn fail_with(&self, reason: impl Into<String>) {
        self.lock().failure = Some(reason.into());
    }

    pub fn recover(&self) {
        self.lock().failure = None;
    }

    /// Number of successful `add_document` calls so far.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Plant a raw document without going through `add_document`. Seeds are not
    /// counted as writes and ignore injected failures.
    pub fn seed(&self, collection: &str, fields: Fields) -> String {
        self.lock().insert(collection, fields)
    }

    /// Fields of the stored document `id`, if any.
    pub fn get(&self, collection: &str, id: &str) -> Option<Fields> {
        self.lock()
            .collections
            .get(collection)?
            .iter()
            .find(|doc| doc.id == id)
            .map(|doc| doc.fields.clone())
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A panic while holding the lock leaves plain data behind; keep going.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn add_document(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let mut state = self.lock();
        if let Some(reason) = &state.failure {
            return Err(StoreError::Unavailable(reason.clone()));
        }
        state.writes += 1;
        Ok(state.insert(collection, fields))
    }

    fn query_ordered(
        &self,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Document>, StoreError> {
        let state = self.lock();
        if let Some(reason) = &state.failure {
            return Err(StoreError::Unavailable(reason.clone()));
        }

        let mut documents: Vec<Document> = state
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| doc.fields.contains_key(order_by))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        // Stable sort keeps insertion order among equal keys; reversing the
        // whole list then puts later insertions first.
        documents.sort_by(|a, b| compare_values(&a.fields[order_by], &b.fields[order_by]));
        if direction == SortDirection::Descending {
            documents.reverse();
        }

        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn writes_are_counted_but_seeds_are_not() {
        let store = MemoryDocumentStore::new();
        store.seed("songs", fields(json!({"k": 1})));
        let id = store.add_document("songs", fields(json!({"k": 2}))).unwrap();
        assert_eq!(store.write_count(), 1);
        assert_eq!(id, "mem-000002");
        assert_eq!(store.get("songs", &id), Some(fields(json!({"k": 2}))));
    }

    #[test]
    fn injected_failures_reject_reads_and_writes() {
        let store = MemoryDocumentStore::new();
        store.fail_with("offline");
        assert!(matches!(
            store.add_document("songs", Fields::new()),
            Err(StoreError::Unavailable(reason)) if reason == "offline"
        ));
        assert!(store
            .query_ordered("songs", "k", SortDirection::Ascending)
            .is_err());
        assert_eq!(store.write_count(), 0);

        store.recover();
        assert!(store.add_document("songs", Fields::new()).is_ok());
    }

    #[test]
    fn ordering_matches_the_sqlite_store() {
        let store = MemoryDocumentStore::new();
        let a = store.seed("songs", fields(json!({"k": "2024-01-01"})));
        let b = store.seed("songs", fields(json!({"k": "2024-03-01"})));
        let c = store.seed("songs", fields(json!({"k": "2024-01-01"})));
        store.seed("songs", fields(json!({"other": true})));

        let ids: Vec<String> = store
            .query_ordered("songs", "k", SortDirection::Descending)
            .unwrap()
            .into_iter()
            .map(|doc| doc.id)
            .collect();
        assert_eq!(ids, vec![b, c, a]);
    }
}
