//! margin-sync: the persistence boundary for the block editor.
//!
//! This crate provides:
//! - `NoteRecord` / `NotePatch` - the payloads exchanged with a notes backend
//! - `NoteStore` - async capability trait over that backend, with an
//!   in-memory implementation for tests and offline drafts
//! - `Autosaver` - trailing-edge debounced writer
//! - `EditorSession` - wires one open note's document, toolbar, and writer
//!
//! The editor logic itself lives in `margin-editor-core` and stays free of
//! async and I/O.

pub mod autosave;
pub mod session;
pub mod store;

pub use autosave::{Autosaver, SyncConfig};
pub use session::EditorSession;
pub use store::{MemoryStore, NotePatch, NoteRecord, NoteStore, StoreError};
