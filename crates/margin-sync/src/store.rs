//! Note records and the store capability trait.
//!
//! The notes backend is reached through `NoteStore`; the session only needs
//! `get`, `create`, and `put` keyed by note id. `MemoryStore` stands in for
//! the remote store in tests and for offline drafts.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use smol_str::{SmolStr, format_smolstr};
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors surfaced by a note store.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    /// No note with the requested id.
    #[error("note not found: {0}")]
    NotFound(SmolStr),

    /// Transport-level failure (connection, server error).
    #[error("transport error: {0}")]
    Transport(String),
}

/// A note as exchanged with the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: SmolStr,
    pub title: String,
    /// The serialized block document.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<SmolStr>,
}

/// Partial update for a note. Fields left as None are not touched, matching
/// the backend's update semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NotePatch {
    /// Overlay a later patch: its set fields win, unset fields survive.
    pub fn merge(&mut self, other: NotePatch) {
        if other.title.is_some() {
            self.title = other.title;
        }
        if other.description.is_some() {
            self.description = other.description;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// Async capability trait for note persistence.
#[trait_variant::make(Send)]
pub trait NoteStore {
    /// Fetch a note by id.
    async fn get(&self, id: &str) -> Result<NoteRecord, StoreError>;

    /// Create a new note and return the stored record.
    async fn create(&self, patch: NotePatch) -> Result<NoteRecord, StoreError>;

    /// Apply a partial update to an existing note.
    async fn put(&self, id: &str, patch: NotePatch) -> Result<(), StoreError>;
}

/// In-memory note store. Cheap to clone; clones share the same notes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    notes: Mutex<HashMap<SmolStr, NoteRecord>>,
    next_id: AtomicUsize,
    puts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record, replacing any existing one with the same id.
    pub async fn insert(&self, record: NoteRecord) {
        self.inner
            .notes
            .lock()
            .await
            .insert(record.id.clone(), record);
    }

    /// How many updates have been written. Used to observe debouncing.
    pub fn put_count(&self) -> usize {
        self.inner.puts.load(Ordering::Relaxed)
    }
}

impl NoteStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<NoteRecord, StoreError> {
        self.inner
            .notes
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.into()))
    }

    async fn create(&self, patch: NotePatch) -> Result<NoteRecord, StoreError> {
        let id = format_smolstr!("n-{}", self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let record = NoteRecord {
            id: id.clone(),
            title: patch.title.unwrap_or_default(),
            description: patch.description.unwrap_or_default(),
            is_favorite: false,
            parent_id: None,
        };
        self.inner
            .notes
            .lock()
            .await
            .insert(id, record.clone());
        Ok(record)
    }

    async fn put(&self, id: &str, patch: NotePatch) -> Result<(), StoreError> {
        let mut notes = self.inner.notes.lock().await;
        let note = notes
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.into()))?;
        if let Some(title) = patch.title {
            note.title = title;
        }
        if let Some(description) = patch.description {
            note.description = description;
        }
        self.inner.puts.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(id: &str, description: &str) -> NoteRecord {
        NoteRecord {
            id: id.into(),
            title: "Untitled".into(),
            description: description.into(),
            is_favorite: false,
            parent_id: None,
        }
    }

    #[tokio::test]
    async fn test_memory_store_get_put() {
        let store = MemoryStore::new();
        store.insert(make_record("n-1", "hello")).await;

        let record = store.get("n-1").await.unwrap();
        assert_eq!(record.description, "hello");

        store
            .put(
                "n-1",
                NotePatch {
                    description: Some("hello\nworld".into()),
                    ..NotePatch::default()
                },
            )
            .await
            .unwrap();

        let record = store.get("n-1").await.unwrap();
        assert_eq!(record.description, "hello\nworld");
        // The untouched field survives a partial update.
        assert_eq!(record.title, "Untitled");
        assert_eq!(store.put_count(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_missing_note() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get("n-404").await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.put("n-404", NotePatch::default()).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_assigns_fresh_ids() {
        let store = MemoryStore::new();
        let a = store.create(NotePatch::default()).await.unwrap();
        let b = store
            .create(NotePatch {
                title: Some("Groceries".into()),
                ..NotePatch::default()
            })
            .await
            .unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(b.title, "Groceries");
        assert_eq!(store.get(&b.id).await.unwrap().title, "Groceries");
    }

    #[test]
    fn test_patch_merge_keeps_unset_fields() {
        let mut patch = NotePatch {
            title: Some("Title".into()),
            description: None,
        };
        patch.merge(NotePatch {
            title: None,
            description: Some("body".into()),
        });

        assert_eq!(patch.title.as_deref(), Some("Title"));
        assert_eq!(patch.description.as_deref(), Some("body"));
    }

    #[test]
    fn test_patch_wire_shape() {
        // A description-only update must not serialize a title field.
        let patch = NotePatch {
            description: Some("# Title\nbody".into()),
            ..NotePatch::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "description": "# Title\nbody" })
        );
    }
}
