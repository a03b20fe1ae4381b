//! The authoritative block sequence for one open note.
//!
//! `BlockDocument` owns the ordered blocks and the id counter. All
//! operations are synchronous, run to completion on the calling thread, and
//! treat an unknown id as a no-op: focus-driven edits race against block
//! deletion and must never crash the editor.
//!
//! The sequence is never empty. An empty note is represented as exactly one
//! paragraph block with empty content.

use crate::block::{Block, BlockId, BlockKind, StyleKey, classify_line, make_block_id};

/// Outcome of [`BlockDocument::merge_backward`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The empty block was removed; focus should move to `focus`.
    Removed { focus: BlockId, removed: BlockId },
    /// The block kept its place but was demoted to a paragraph.
    Demoted,
    /// Nothing changed (non-empty content, first empty paragraph, or a
    /// stale id).
    Noop,
}

/// An ordered sequence of typed blocks plus the id counter that keeps block
/// ids unique for the document's lifetime.
#[derive(Debug, Clone)]
pub struct BlockDocument {
    blocks: Vec<Block>,
    next_id: usize,
}

impl BlockDocument {
    /// A document holding a single empty paragraph.
    pub fn new() -> Self {
        let mut doc = Self {
            blocks: Vec::new(),
            next_id: 0,
        };
        let id = doc.fresh_id();
        doc.blocks.push(Block::new(id, BlockKind::Paragraph, ""));
        doc
    }

    /// Parse a persisted description string.
    ///
    /// Splits on newlines and classifies each line by its longest matching
    /// prefix. Empty or whitespace-only input yields the single default
    /// paragraph; otherwise the block count equals the line count and order
    /// is preserved. Every block gets a fresh id.
    pub fn from_text(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::new();
        }

        let mut doc = Self {
            blocks: Vec::new(),
            next_id: 0,
        };
        for line in text.split('\n') {
            let (kind, content) = classify_line(line);
            let id = doc.fresh_id();
            doc.blocks.push(Block::new(id, kind, content));
        }
        doc
    }

    /// Serialize back to the persisted representation.
    ///
    /// Pure function of the block sequence; style flags are not encoded.
    pub fn to_text(&self) -> String {
        let lines: Vec<String> = self.blocks.iter().map(Block::to_line).collect();
        lines.join("\n")
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        // The sequence itself is never empty; "empty" means the default
        // single blank paragraph.
        self.blocks.len() == 1
            && self.blocks[0].kind == BlockKind::Paragraph
            && self.blocks[0].content.is_empty()
    }

    /// Look up a block by id.
    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    /// Id of the first block. The non-empty invariant makes this total.
    pub fn first_block_id(&self) -> BlockId {
        self.blocks[0].id.clone()
    }

    /// Replace a block's text content. Returns false on a stale id.
    pub fn set_content(&mut self, id: &BlockId, content: &str) -> bool {
        let Some(block) = self.block_mut(id) else {
            tracing::debug!(block = %id, "set_content on unknown block");
            return false;
        };
        block.content.clear();
        block.content.push_str(content);
        true
    }

    /// Flip a todo between unchecked and checked. No-op on other kinds.
    pub fn toggle_todo(&mut self, id: &BlockId) -> bool {
        let Some(block) = self.block_mut(id) else {
            tracing::debug!(block = %id, "toggle_todo on unknown block");
            return false;
        };
        match block.kind {
            BlockKind::Todo => {
                block.kind = BlockKind::TodoChecked;
                true
            }
            BlockKind::TodoChecked => {
                block.kind = BlockKind::Todo;
                true
            }
            _ => false,
        }
    }

    /// Enter semantics: insert a fresh empty block immediately after `id`.
    ///
    /// The new block inherits the split block's kind when that kind
    /// continues on split (lists, todos, toggles), otherwise it is a
    /// paragraph. Style flags carry over verbatim either way. Returns the
    /// new block's id so the caller can move focus there; focus transfer
    /// itself is a host concern.
    pub fn split_after(&mut self, id: &BlockId) -> Option<BlockId> {
        let index = self.index_of(id)?;
        let source = &self.blocks[index];
        let kind = if source.kind.continues_on_split() {
            source.kind
        } else {
            BlockKind::Paragraph
        };
        let styles = source.styles;

        let new_id = self.fresh_id();
        let mut block = Block::new(new_id.clone(), kind, "");
        block.styles = styles;
        self.blocks.insert(index + 1, block);
        Some(new_id)
    }

    /// Backspace-at-start semantics for an empty block.
    ///
    /// An empty block that is not first is removed, and focus belongs on
    /// the block before it. An empty non-paragraph block that cannot be
    /// removed is demoted to a paragraph in place. Everything else,
    /// including any block with content, is untouched.
    pub fn merge_backward(&mut self, id: &BlockId) -> MergeOutcome {
        let Some(index) = self.index_of(id) else {
            tracing::debug!(block = %id, "merge_backward on unknown block");
            return MergeOutcome::Noop;
        };
        if !self.blocks[index].content.is_empty() {
            return MergeOutcome::Noop;
        }

        if index > 0 {
            let removed = self.blocks.remove(index);
            let focus = self.blocks[index - 1].id.clone();
            MergeOutcome::Removed {
                focus,
                removed: removed.id,
            }
        } else if self.blocks[index].kind != BlockKind::Paragraph {
            self.blocks[index].kind = BlockKind::Paragraph;
            MergeOutcome::Demoted
        } else {
            MergeOutcome::Noop
        }
    }

    /// Direct kind reassignment, used by the format picker. Content and
    /// style flags are untouched.
    pub fn set_kind(&mut self, id: &BlockId, kind: BlockKind) -> bool {
        let Some(block) = self.block_mut(id) else {
            tracing::debug!(block = %id, "set_kind on unknown block");
            return false;
        };
        block.kind = kind;
        true
    }

    /// Toggle one style flag on the target block, or set it when `value`
    /// is given. Other blocks are unaffected.
    pub fn set_style(&mut self, id: &BlockId, key: StyleKey, value: Option<bool>) -> bool {
        let Some(block) = self.block_mut(id) else {
            tracing::debug!(block = %id, "set_style on unknown block");
            return false;
        };
        match value {
            Some(v) => block.styles.set(key, v),
            None => block.styles.toggle(key),
        }
        true
    }

    /// 1-based display number for the numbered-list block at `index`,
    /// counting its contiguous run of numbered-list blocks.
    ///
    /// Returns None when the index is out of bounds or the block is not a
    /// numbered list. Derived on demand; list membership can change on
    /// every keystroke, so this is never cached on the block.
    pub fn ordinal(&self, index: usize) -> Option<usize> {
        if self.blocks.get(index)?.kind != BlockKind::NumberedList {
            return None;
        }
        let run_start = self.blocks[..index]
            .iter()
            .rposition(|b| b.kind != BlockKind::NumberedList)
            .map(|i| i + 1)
            .unwrap_or(0);
        Some(index - run_start + 1)
    }

    /// Whitespace-separated word count across all blocks.
    pub fn word_count(&self) -> usize {
        self.blocks
            .iter()
            .map(|b| b.content.split_whitespace().count())
            .sum()
    }

    fn fresh_id(&mut self) -> BlockId {
        let id = make_block_id(self.next_id);
        self.next_id += 1;
        id
    }

    fn index_of(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| &b.id == id)
    }

    fn block_mut(&mut self, id: &BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| &b.id == id)
    }
}

impl Default for BlockDocument {
    fn default() -> Self {
        Self::new()
    }
}
