//! One open note: document, toolbar, and autosave wiring.
//!
//! Data flow: `store.get` -> `BlockDocument::from_text` -> edit actions
//! mutate the block sequence -> `to_text` is handed to the debounced writer.
//! The session exclusively owns the in-memory state for its note; a failed
//! write never rolls it back. Dropping the session flushes the pending
//! draft through the writer's shutdown path.

use margin_editor_core::{
    BlockDocument, EditAction, EditOutcome, FocusHost, ToolbarController, execute_action,
};
use smol_str::SmolStr;

use crate::autosave::{Autosaver, SyncConfig};
use crate::store::{NotePatch, NoteStore, StoreError};

/// Editing state for a single open note.
pub struct EditorSession {
    note_id: SmolStr,
    title: String,
    document: BlockDocument,
    toolbar: ToolbarController,
    autosaver: Autosaver,
}

impl EditorSession {
    /// Load an existing note and start its autosave writer.
    pub async fn open<S>(
        store: S,
        note_id: impl Into<SmolStr>,
        config: SyncConfig,
    ) -> Result<Self, StoreError>
    where
        S: NoteStore + Send + Sync + 'static,
    {
        let note_id = note_id.into();
        let record = store.get(&note_id).await?;
        tracing::debug!(note = %note_id, blocks = record.description.lines().count(), "note loaded");

        let document = BlockDocument::from_text(&record.description);
        let autosaver = Autosaver::spawn(store, note_id.clone(), config);
        Ok(Self {
            note_id,
            title: record.title,
            document,
            toolbar: ToolbarController::new(),
            autosaver,
        })
    }

    /// Create a fresh note and open a session on it, the flow behind the
    /// "new note" screen: the first save creates the record, later edits
    /// update it.
    pub async fn create<S>(store: S, config: SyncConfig) -> Result<Self, StoreError>
    where
        S: NoteStore + Send + Sync + 'static,
    {
        let record = store.create(NotePatch::default()).await?;
        tracing::debug!(note = %record.id, "note created");

        let autosaver = Autosaver::spawn(store, record.id.clone(), config);
        Ok(Self {
            note_id: record.id,
            title: record.title,
            document: BlockDocument::new(),
            toolbar: ToolbarController::new(),
            autosaver,
        })
    }

    pub fn note_id(&self) -> &str {
        &self.note_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn document(&self) -> &BlockDocument {
        &self.document
    }

    pub fn toolbar(&self) -> &ToolbarController {
        &self.toolbar
    }

    pub fn toolbar_mut(&mut self) -> &mut ToolbarController {
        &mut self.toolbar
    }

    /// Current serialized form of the document.
    pub fn serialized(&self) -> String {
        self.document.to_text()
    }

    /// Apply an edit action; a change reschedules the debounced write with
    /// the freshly serialized document.
    pub fn apply(&mut self, action: &EditAction) -> EditOutcome {
        let outcome = execute_action(&mut self.document, action);
        if outcome.changed {
            self.autosaver.schedule(NotePatch {
                description: Some(self.document.to_text()),
                ..NotePatch::default()
            });
        }
        outcome
    }

    /// Apply an edit action and keep the toolbar's focus bookkeeping in
    /// step through the host (focus transfer, handle cleanup, styles).
    pub fn apply_with_host<H: FocusHost>(
        &mut self,
        action: &EditAction,
        host: &mut H,
    ) -> EditOutcome {
        let outcome = self.apply(action);
        self.toolbar.apply_outcome(&self.document, host, &outcome);
        outcome
    }

    /// Update the note title; it rides the same debounce channel as the
    /// description.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.autosaver.schedule(NotePatch {
            title: Some(self.title.clone()),
            ..NotePatch::default()
        });
    }

    /// Flush any pending draft and stop the writer.
    pub async fn close(self) {
        self.autosaver.shutdown().await;
    }
}
