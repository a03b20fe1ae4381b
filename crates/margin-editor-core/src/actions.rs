//! Semantic edit operations, decoupled from how they are triggered.
//!
//! Character input flows through `SetContent`; Enter and Backspace are the
//! only structural keys and map to `InsertParagraph` and `DeleteBackward`.
//! The toolbar issues the remaining variants.

use crate::block::{BlockId, BlockKind, StyleKey};

/// All edit operations the editing screen can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    /// Replace a block's text content.
    SetContent { block: BlockId, text: String },

    /// Enter: insert a new block after this one, inheriting continuing
    /// kinds and style flags.
    InsertParagraph { block: BlockId },

    /// Backspace at the start of an empty block: remove it, or demote a
    /// non-paragraph first block.
    DeleteBackward { block: BlockId },

    /// Flip a todo between unchecked and checked.
    ToggleTodo { block: BlockId },

    /// Direct kind reassignment from the format picker.
    SetKind { block: BlockId, kind: BlockKind },

    /// Toggle one inline style flag.
    ToggleStyle { block: BlockId, style: StyleKey },
}

/// What happened when an action was executed.
///
/// Stale block ids leave the document untouched and come back with
/// `changed == false`; they are expected during focus races, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditOutcome {
    /// Whether the document was modified.
    pub changed: bool,
    /// Block that should receive focus, when focus should move.
    pub focus: Option<BlockId>,
    /// Block removed from the sequence; the host must drop its handle.
    pub removed: Option<BlockId>,
}

impl EditOutcome {
    /// Outcome for an edit that only touched the document in place.
    pub fn modified() -> Self {
        Self {
            changed: true,
            ..Self::default()
        }
    }
}
