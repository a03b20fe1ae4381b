//! margin-editor-core: pure block-editor logic without framework dependencies.
//!
//! This crate provides:
//! - `Block`, `BlockKind`, `StyleFlags` - the typed block model
//! - `BlockDocument` - the authoritative block sequence for one open note
//! - `EditAction` / `execute_action` - semantic edit operations
//! - `ToolbarController` - state machine for the floating formatting toolbar
//! - `FocusHost` - platform capability trait for focus and keyboard control
//!
//! Everything here is synchronous and deterministic. Persistence and the
//! debounced autosave writer live in `margin-sync`.

pub mod actions;
pub mod block;
pub mod document;
pub mod execute;
pub mod platform;
pub mod toolbar;

pub use actions::{EditAction, EditOutcome};
pub use block::{Block, BlockId, BlockKind, StyleFlags, StyleKey, classify_line, make_block_id};
pub use document::{BlockDocument, MergeOutcome};
pub use execute::execute_action;
pub use platform::{FocusHost, KeyboardEvent, NullFocusHost};
pub use smol_str::SmolStr;
pub use toolbar::{ToolbarController, ToolbarPanel};
