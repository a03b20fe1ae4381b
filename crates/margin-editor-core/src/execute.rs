//! Action execution for block documents.
//!
//! `execute_action` is the central dispatch point for all edit operations.
//! Every action is total: a stale id produces an unchanged outcome rather
//! than an error.

use crate::actions::{EditAction, EditOutcome};
use crate::document::{BlockDocument, MergeOutcome};

/// Execute an edit action on a document.
///
/// The outcome reports whether the document changed, which block should
/// receive focus, and which block (if any) was removed so the host can
/// unregister its focus handle.
pub fn execute_action(doc: &mut BlockDocument, action: &EditAction) -> EditOutcome {
    match action {
        EditAction::SetContent { block, text } => {
            if doc.set_content(block, text) {
                EditOutcome::modified()
            } else {
                EditOutcome::default()
            }
        }
        EditAction::InsertParagraph { block } => match doc.split_after(block) {
            Some(new_id) => EditOutcome {
                changed: true,
                focus: Some(new_id),
                removed: None,
            },
            None => EditOutcome::default(),
        },
        EditAction::DeleteBackward { block } => match doc.merge_backward(block) {
            MergeOutcome::Removed { focus, removed } => EditOutcome {
                changed: true,
                focus: Some(focus),
                removed: Some(removed),
            },
            MergeOutcome::Demoted => EditOutcome::modified(),
            MergeOutcome::Noop => EditOutcome::default(),
        },
        EditAction::ToggleTodo { block } => {
            if doc.toggle_todo(block) {
                EditOutcome::modified()
            } else {
                EditOutcome::default()
            }
        }
        EditAction::SetKind { block, kind } => {
            if doc.set_kind(block, *kind) {
                EditOutcome::modified()
            } else {
                EditOutcome::default()
            }
        }
        EditAction::ToggleStyle { block, style } => {
            if doc.set_style(block, *style, None) {
                EditOutcome::modified()
            } else {
                EditOutcome::default()
            }
        }
    }
}
