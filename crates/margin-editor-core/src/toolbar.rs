//! Floating-toolbar state machine.
//!
//! Bridges keyboard visibility, panel selection, and the block document.
//! The controller tracks which block is focused and mirrors that block's
//! style flags for the UI to highlight; all document mutation goes through
//! `BlockDocument`, and all host effects go through the `FocusHost`
//! capability trait.

use crate::block::{BlockId, BlockKind, StyleFlags, StyleKey};
use crate::actions::EditOutcome;
use crate::document::BlockDocument;
use crate::platform::{FocusHost, KeyboardEvent};

/// Which panel the toolbar currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolbarPanel {
    /// Not visible at all.
    #[default]
    Hidden,
    /// The default horizontal action bar shown above the keyboard.
    QuickActions,
    /// The expanded block-type chooser. Opening it dismisses the keyboard
    /// but keeps the toolbar visible, anchored at the safe-area bottom.
    FormatPicker,
    /// The inline style chooser (bold, italic, ...).
    TextStylePicker,
}

/// Ephemeral UI state for the floating formatting toolbar. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct ToolbarController {
    panel: ToolbarPanel,
    /// Lookup key into the document, never an owning reference. A miss
    /// means "no focused block".
    focused: Option<BlockId>,
    active_styles: StyleFlags,
    keyboard_visible: bool,
    keyboard_height: Option<f32>,
}

impl ToolbarController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self) -> ToolbarPanel {
        self.panel
    }

    pub fn is_visible(&self) -> bool {
        self.panel != ToolbarPanel::Hidden
    }

    pub fn focused_block(&self) -> Option<&BlockId> {
        self.focused.as_ref()
    }

    /// Style flags of the focused block, for highlighting active toggles.
    pub fn active_styles(&self) -> StyleFlags {
        self.active_styles
    }

    pub fn keyboard_visible(&self) -> bool {
        self.keyboard_visible
    }

    /// Last reported keyboard height, while the keyboard is visible. The
    /// toolbar anchors here, or at the safe-area bottom when the format
    /// picker outlives a keyboard dismiss.
    pub fn keyboard_height(&self) -> Option<f32> {
        self.keyboard_height
    }

    /// Feed a keyboard visibility event from the host platform.
    pub fn handle_keyboard(&mut self, event: KeyboardEvent) {
        match event {
            KeyboardEvent::Shown { height } => {
                self.keyboard_visible = true;
                self.keyboard_height = height;
                // Refocusing always collapses any expanded picker.
                self.panel = ToolbarPanel::QuickActions;
            }
            KeyboardEvent::Hidden => {
                self.keyboard_visible = false;
                self.keyboard_height = None;
                if self.panel != ToolbarPanel::FormatPicker {
                    self.panel = ToolbarPanel::Hidden;
                }
            }
        }
    }

    /// Record which block the host considers focused and mirror its style
    /// flags. A stale id resolves to "no focused block".
    pub fn set_focused_block(&mut self, doc: &BlockDocument, block: Option<BlockId>) {
        self.focused = block.filter(|id| doc.block(id).is_some());
        self.refresh_active_styles(doc);
    }

    /// Re-read the focused block's style flags from the document.
    pub fn refresh_active_styles(&mut self, doc: &BlockDocument) {
        self.active_styles = self
            .focused
            .as_ref()
            .and_then(|id| doc.block(id))
            .map(|b| b.styles)
            .unwrap_or_default();
    }

    /// The "plus" action: toggle the format picker.
    ///
    /// Opening it dismisses the keyboard while keeping the toolbar up;
    /// closing it returns to the quick bar and restores focus, which brings
    /// the keyboard back.
    pub fn toggle_format_picker<H: FocusHost>(&mut self, doc: &BlockDocument, host: &mut H) {
        if self.panel == ToolbarPanel::FormatPicker {
            self.panel = ToolbarPanel::QuickActions;
            self.restore_focus(doc, host);
        } else {
            self.panel = ToolbarPanel::FormatPicker;
            host.dismiss_keyboard();
        }
    }

    /// The "text format" action: open the inline style chooser.
    pub fn open_text_styles(&mut self) {
        if self.panel == ToolbarPanel::QuickActions {
            self.panel = ToolbarPanel::TextStylePicker;
        }
    }

    /// The "back" action from the style chooser.
    pub fn close_text_styles(&mut self) {
        if self.panel == ToolbarPanel::TextStylePicker {
            self.panel = ToolbarPanel::QuickActions;
        }
    }

    /// A format option was chosen in the picker: retype the focused block,
    /// collapse back to the quick bar, and restore focus.
    pub fn select_format<H: FocusHost>(
        &mut self,
        doc: &mut BlockDocument,
        host: &mut H,
        kind: BlockKind,
    ) {
        if self.panel != ToolbarPanel::FormatPicker {
            return;
        }
        if let Some(id) = self.focused.clone() {
            doc.set_kind(&id, kind);
        }
        self.panel = ToolbarPanel::QuickActions;
        self.restore_focus(doc, host);
        self.refresh_active_styles(doc);
    }

    /// A style action was chosen: toggle the flag on the focused block and
    /// stay on the current panel.
    pub fn select_style(&mut self, doc: &mut BlockDocument, style: StyleKey) {
        if let Some(id) = self.focused.clone() {
            doc.set_style(&id, style, None);
        }
        self.refresh_active_styles(doc);
    }

    /// The quick bar's todo action: flip the focused block's checkbox.
    pub fn toggle_todo(&mut self, doc: &mut BlockDocument) {
        if let Some(id) = self.focused.clone() {
            doc.toggle_todo(&id);
        }
    }

    /// A tap outside the expanded panel collapses it, same as toggling the
    /// picker off.
    pub fn tap_outside<H: FocusHost>(&mut self, doc: &BlockDocument, host: &mut H) {
        if matches!(
            self.panel,
            ToolbarPanel::FormatPicker | ToolbarPanel::TextStylePicker
        ) {
            self.panel = ToolbarPanel::QuickActions;
            self.restore_focus(doc, host);
        }
    }

    /// Forward an edit outcome so focus and handles stay consistent with
    /// the document: unregister removed blocks, follow the focus target,
    /// and republish active styles.
    pub fn apply_outcome<H: FocusHost>(
        &mut self,
        doc: &BlockDocument,
        host: &mut H,
        outcome: &EditOutcome,
    ) {
        if let Some(removed) = &outcome.removed {
            host.unregister(removed);
            if self.focused.as_ref() == Some(removed) {
                self.focused = None;
            }
        }
        if let Some(target) = &outcome.focus {
            host.focus(target);
            self.focused = Some(target.clone());
        }
        self.refresh_active_styles(doc);
    }

    /// Focus the remembered block, or the document's first block when the
    /// remembered one is gone.
    fn restore_focus<H: FocusHost>(&mut self, doc: &BlockDocument, host: &mut H) {
        let target = self
            .focused
            .clone()
            .filter(|id| doc.block(id).is_some())
            .unwrap_or_else(|| doc.first_block_id());
        host.focus(&target);
        self.focused = Some(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records host calls so transitions can be asserted.
    #[derive(Debug, Default)]
    struct RecordingHost {
        focused: Vec<BlockId>,
        unregistered: Vec<BlockId>,
        keyboard_dismissals: usize,
    }

    impl FocusHost for RecordingHost {
        fn focus(&mut self, block: &BlockId) -> bool {
            self.focused.push(block.clone());
            true
        }

        fn dismiss_keyboard(&mut self) {
            self.keyboard_dismissals += 1;
        }

        fn unregister(&mut self, block: &BlockId) {
            self.unregistered.push(block.clone());
        }
    }

    fn make_toolbar(text: &str) -> (BlockDocument, ToolbarController, RecordingHost) {
        let doc = BlockDocument::from_text(text);
        (doc, ToolbarController::new(), RecordingHost::default())
    }

    #[test]
    fn test_plus_roundtrip_restores_focus() {
        let (doc, mut toolbar, mut host) = make_toolbar("# Title\nbody");
        let body = doc.blocks()[1].id.clone();

        toolbar.handle_keyboard(KeyboardEvent::Shown { height: Some(300.0) });
        assert_eq!(toolbar.panel(), ToolbarPanel::QuickActions);
        toolbar.set_focused_block(&doc, Some(body.clone()));

        // Opening the picker dismisses the keyboard but stays visible.
        toolbar.toggle_format_picker(&doc, &mut host);
        assert_eq!(toolbar.panel(), ToolbarPanel::FormatPicker);
        assert_eq!(host.keyboard_dismissals, 1);
        toolbar.handle_keyboard(KeyboardEvent::Hidden);
        assert_eq!(toolbar.panel(), ToolbarPanel::FormatPicker);
        assert!(!toolbar.keyboard_visible());

        // Toggling it off returns to the quick bar and refocuses the block
        // that was focused before the picker opened.
        toolbar.toggle_format_picker(&doc, &mut host);
        assert_eq!(toolbar.panel(), ToolbarPanel::QuickActions);
        assert_eq!(host.focused.last(), Some(&body));
        assert_eq!(toolbar.focused_block(), Some(&body));
    }

    #[test]
    fn test_keyboard_hidden_without_picker_hides_toolbar() {
        let (_doc, mut toolbar, _host) = make_toolbar("text");

        toolbar.handle_keyboard(KeyboardEvent::Shown { height: None });
        assert_eq!(toolbar.panel(), ToolbarPanel::QuickActions);

        toolbar.handle_keyboard(KeyboardEvent::Hidden);
        assert_eq!(toolbar.panel(), ToolbarPanel::Hidden);
        assert!(!toolbar.is_visible());
    }

    #[test]
    fn test_keyboard_shown_collapses_pickers() {
        let (doc, mut toolbar, mut host) = make_toolbar("text");

        toolbar.handle_keyboard(KeyboardEvent::Shown { height: None });
        toolbar.toggle_format_picker(&doc, &mut host);
        assert_eq!(toolbar.panel(), ToolbarPanel::FormatPicker);

        toolbar.handle_keyboard(KeyboardEvent::Shown { height: Some(280.0) });
        assert_eq!(toolbar.panel(), ToolbarPanel::QuickActions);
    }

    #[test]
    fn test_select_format_retypes_focused_block() {
        let (mut doc, mut toolbar, mut host) = make_toolbar("grocery run");
        let id = doc.first_block_id();

        toolbar.handle_keyboard(KeyboardEvent::Shown { height: None });
        toolbar.set_focused_block(&doc, Some(id.clone()));
        toolbar.toggle_format_picker(&doc, &mut host);

        toolbar.select_format(&mut doc, &mut host, BlockKind::Todo);
        assert_eq!(doc.block(&id).unwrap().kind, BlockKind::Todo);
        assert_eq!(toolbar.panel(), ToolbarPanel::QuickActions);
        assert_eq!(host.focused.last(), Some(&id));
    }

    #[test]
    fn test_text_style_picker_mirrors_flags() {
        let (mut doc, mut toolbar, _host) = make_toolbar("styled");
        let id = doc.first_block_id();

        toolbar.handle_keyboard(KeyboardEvent::Shown { height: None });
        toolbar.set_focused_block(&doc, Some(id.clone()));
        toolbar.open_text_styles();
        assert_eq!(toolbar.panel(), ToolbarPanel::TextStylePicker);

        toolbar.select_style(&mut doc, StyleKey::Bold);
        toolbar.select_style(&mut doc, StyleKey::Italic);
        // Applying a style stays on the current panel.
        assert_eq!(toolbar.panel(), ToolbarPanel::TextStylePicker);
        assert!(toolbar.active_styles().bold);
        assert!(toolbar.active_styles().italic);

        toolbar.select_style(&mut doc, StyleKey::Bold);
        assert!(!toolbar.active_styles().bold);

        toolbar.close_text_styles();
        assert_eq!(toolbar.panel(), ToolbarPanel::QuickActions);
    }

    #[test]
    fn test_focus_change_republishes_styles() {
        let (mut doc, mut toolbar, _host) = make_toolbar("a\nb");
        let first = doc.blocks()[0].id.clone();
        let second = doc.blocks()[1].id.clone();
        doc.set_style(&first, StyleKey::Code, Some(true));

        toolbar.set_focused_block(&doc, Some(first));
        assert!(toolbar.active_styles().code);

        toolbar.set_focused_block(&doc, Some(second));
        assert!(!toolbar.active_styles().code);
    }

    #[test]
    fn test_stale_focus_resolves_to_none() {
        let (doc, mut toolbar, _host) = make_toolbar("text");

        toolbar.set_focused_block(&doc, Some(crate::block::make_block_id(99)));
        assert_eq!(toolbar.focused_block(), None);
        assert_eq!(toolbar.active_styles(), StyleFlags::default());
    }

    #[test]
    fn test_outcome_unregisters_removed_and_follows_focus() {
        let (mut doc, mut toolbar, mut host) = make_toolbar("first");
        let first = doc.first_block_id();
        let second = doc.split_after(&first).unwrap();
        toolbar.set_focused_block(&doc, Some(second.clone()));

        let outcome = crate::execute::execute_action(
            &mut doc,
            &crate::actions::EditAction::DeleteBackward {
                block: second.clone(),
            },
        );
        toolbar.apply_outcome(&doc, &mut host, &outcome);

        assert_eq!(host.unregistered, vec![second]);
        assert_eq!(toolbar.focused_block(), Some(&first));
    }

    #[test]
    fn test_tap_outside_collapses_and_restores() {
        let (doc, mut toolbar, mut host) = make_toolbar("text");
        let id = doc.first_block_id();

        toolbar.handle_keyboard(KeyboardEvent::Shown { height: None });
        toolbar.set_focused_block(&doc, Some(id.clone()));
        toolbar.toggle_format_picker(&doc, &mut host);

        toolbar.tap_outside(&doc, &mut host);
        assert_eq!(toolbar.panel(), ToolbarPanel::QuickActions);
        assert_eq!(host.focused.last(), Some(&id));
    }
}
