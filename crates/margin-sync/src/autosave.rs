//! Trailing-edge debounced autosave.
//!
//! Edits are coalesced over a fixed quiet window: a new edit inside the
//! window replaces the pending state and restarts the timer, and only the
//! last state at the time the window elapses is written. Writes are
//! fire-and-forget from the editor's perspective; a failed write is logged
//! and the in-memory document stays authoritative.

use std::time::Duration;

use smol_str::SmolStr;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::store::{NotePatch, NoteStore};

/// Tuning for the autosave writer.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Quiet window that must elapse after the last edit before the
    /// pending draft is written.
    pub quiet_window: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            quiet_window: Duration::from_millis(500),
        }
    }
}

/// Handle to the debounced writer task for one note.
///
/// Dropping the handle closes the channel; the writer flushes any pending
/// draft before exiting, so edits are not lost on an abrupt unmount.
#[derive(Debug)]
pub struct Autosaver {
    tx: mpsc::UnboundedSender<NotePatch>,
    handle: JoinHandle<()>,
}

impl Autosaver {
    /// Spawn the writer task for `note_id` against `store`.
    pub fn spawn<S>(store: S, note_id: SmolStr, config: SyncConfig) -> Self
    where
        S: NoteStore + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_writer(store, note_id, config, rx));
        Self { tx, handle }
    }

    /// Queue the latest draft state, restarting the quiet window.
    ///
    /// Never blocks; the engine does not wait on persistence.
    pub fn schedule(&self, patch: NotePatch) {
        // Send only fails once the writer has shut down.
        let _ = self.tx.send(patch);
    }

    /// Close the channel and wait for the pending draft to flush.
    pub async fn shutdown(self) {
        let Self { tx, handle } = self;
        drop(tx);
        let _ = handle.await;
    }
}

async fn run_writer<S>(
    store: S,
    note_id: SmolStr,
    config: SyncConfig,
    mut rx: mpsc::UnboundedReceiver<NotePatch>,
) where
    S: NoteStore + Send + Sync + 'static,
{
    while let Some(first) = rx.recv().await {
        let mut pending = first;
        // Absorb further edits until the channel stays quiet for a full
        // window. Superseding edits replace the pending state field by
        // field, so a title edit does not discard a queued description.
        loop {
            match tokio::time::timeout(config.quiet_window, rx.recv()).await {
                Ok(Some(next)) => pending.merge(next),
                Ok(None) => {
                    // Channel closed: flush what we have and stop.
                    write(&store, &note_id, pending).await;
                    return;
                }
                Err(_elapsed) => break,
            }
        }
        write(&store, &note_id, pending).await;
    }
}

async fn write<S: NoteStore>(store: &S, note_id: &str, patch: NotePatch) {
    if patch.is_empty() {
        return;
    }
    tracing::debug!(note = %note_id, "autosave flush");
    if let Err(error) = store.put(note_id, patch).await {
        // No retry here; the in-memory session keeps the user's edits and
        // the backend's own policy owns transport recovery.
        tracing::warn!(note = %note_id, %error, "autosave write failed");
    }
}
