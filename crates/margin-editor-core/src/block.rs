//! Typed block model: kinds, inline style flags, and the prefix table.
//!
//! A note's description is persisted as a flat string, one block per line,
//! each line rendered as `prefix(kind) + content`. The table below is the
//! single source of truth for both parsing and serialization.

use smol_str::{SmolStr, format_smolstr};

/// Stable identifier for a block, unique within a document's lifetime.
///
/// Ids come from a monotonic per-document counter and are never reused.
/// They are never derived from content (content is not unique).
pub type BlockId = SmolStr;

/// Render a block id from the document's monotonic counter.
pub fn make_block_id(counter: usize) -> BlockId {
    format_smolstr!("b-{}", counter)
}

/// The closed set of block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    BulletedList,
    NumberedList,
    Todo,
    TodoChecked,
    Toggle,
}

impl BlockKind {
    /// Literal marker this kind carries in the persisted string.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Paragraph => "",
            Self::Heading1 => "# ",
            Self::Heading2 => "## ",
            Self::Heading3 => "### ",
            Self::BulletedList => "- ",
            Self::NumberedList => "1. ",
            Self::Todo => "[] ",
            Self::TodoChecked => "[x] ",
            Self::Toggle => "> ",
        }
    }

    /// Whether pressing Enter inside a block of this kind continues it
    /// (lists, todos, toggles) instead of starting a plain paragraph.
    pub fn continues_on_split(self) -> bool {
        matches!(
            self,
            Self::BulletedList | Self::NumberedList | Self::Todo | Self::Toggle
        )
    }
}

/// Prefix table in match priority order. Longer and more specific markers
/// come first so `"[x] "` is never tokenized as `"[] "` and `"### "` never
/// as `"# "`. Paragraph has the empty prefix and acts as the fallback, so
/// it is absent here.
const PREFIX_TABLE: &[(BlockKind, &str)] = &[
    (BlockKind::Heading3, "### "),
    (BlockKind::Heading2, "## "),
    (BlockKind::Heading1, "# "),
    (BlockKind::TodoChecked, "[x] "),
    (BlockKind::Todo, "[] "),
    (BlockKind::NumberedList, "1. "),
    (BlockKind::BulletedList, "- "),
    (BlockKind::Toggle, "> "),
];

/// Classify one line of the persisted string.
///
/// Returns the kind and the content with the matched marker stripped.
/// A line matching no marker is a paragraph with the line unchanged, so
/// every line gets exactly one kind.
pub fn classify_line(line: &str) -> (BlockKind, &str) {
    for (kind, prefix) in PREFIX_TABLE {
        if let Some(rest) = line.strip_prefix(prefix) {
            return (*kind, rest);
        }
    }
    (BlockKind::Paragraph, line)
}

/// One of the six toggleable inline styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKey {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
    Math,
}

/// Inline style flags tracked per block.
///
/// Styling lives only in the in-memory sequence for the active editing
/// session; `BlockDocument::to_text` does not encode it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleFlags {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub math: bool,
}

impl StyleFlags {
    /// Read one flag.
    pub fn get(&self, key: StyleKey) -> bool {
        match key {
            StyleKey::Bold => self.bold,
            StyleKey::Italic => self.italic,
            StyleKey::Underline => self.underline,
            StyleKey::Strikethrough => self.strikethrough,
            StyleKey::Code => self.code,
            StyleKey::Math => self.math,
        }
    }

    /// Set one flag to an explicit value.
    pub fn set(&mut self, key: StyleKey, value: bool) {
        match key {
            StyleKey::Bold => self.bold = value,
            StyleKey::Italic => self.italic = value,
            StyleKey::Underline => self.underline = value,
            StyleKey::Strikethrough => self.strikethrough = value,
            StyleKey::Code => self.code = value,
            StyleKey::Math => self.math = value,
        }
    }

    /// Flip one flag.
    pub fn toggle(&mut self, key: StyleKey) {
        let value = self.get(key);
        self.set(key, !value);
    }
}

/// The atomic editable unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    /// Plain text payload, excluding the kind's prefix marker.
    pub content: String,
    pub styles: StyleFlags,
}

impl Block {
    pub fn new(id: BlockId, kind: BlockKind, content: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            content: content.into(),
            styles: StyleFlags::default(),
        }
    }

    /// Render this block as it appears in the persisted string.
    pub fn to_line(&self) -> String {
        format!("{}{}", self.kind.prefix(), self.content)
    }
}
