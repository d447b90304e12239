//! The editor session: one document, its selection, its undo history and the
//! listeners interested in changes.
//!
//! All mutations go through the session so that every accepted change is
//! checkpointed and announced exactly once. Applying a history entry is itself
//! a mutation (listeners hear about it) but is bracketed by the history's
//! apply guard, so it is never recorded as a new checkpoint.

use inkpad_config::EditorConfig;

use crate::codec::{self, ContentSnapshot};
use crate::editing::commands::{self, Dispatcher, FormattingCommand};
use crate::editing::counter::{self, WordCount};
use crate::editing::document::points::{self, DocPoint};
use crate::editing::document::{DocumentTree, edit};
use crate::editing::history::{History, HistoryEntry};
use crate::editing::keymap::{self, KeyAction, KeyPress};
use crate::editing::selection::{self, Selection, SelectionLocator};
use crate::error::Result;

/// Initial content handed over by the host.
///
/// `text` is the persisted flat text. `rich` is a snapshot from an earlier
/// mount of the same document, when the host kept one; it wins over `text`
/// because it still carries formatting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hydration {
    pub text: String,
    pub rich: Option<ContentSnapshot>,
}

impl Hydration {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rich: None,
        }
    }

    pub fn rich(text: impl Into<String>, snapshot: ContentSnapshot) -> Self {
        Self {
            text: text.into(),
            rich: Some(snapshot),
        }
    }
}

/// Sent to listeners after every accepted mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub version: u64,
    pub counts: WordCount,
}

type ChangeListener = Box<dyn FnMut(&ChangeEvent)>;

pub struct EditorSession {
    tree: DocumentTree,
    selection: Option<Selection>,
    history: History,
    dispatcher: Dispatcher,
    version: u64,
    listeners: Vec<ChangeListener>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::hydrate(Hydration::default(), &EditorConfig::default())
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("tree", &self.tree)
            .field("selection", &self.selection)
            .field("history", &self.history)
            .field("version", &self.version)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    pub fn hydrate(hydration: Hydration, config: &EditorConfig) -> Self {
        let tree = match hydration.rich.as_ref().map(DocumentTree::from_snapshot) {
            Some(Ok(tree)) => tree,
            Some(Err(err)) => {
                log::warn!("Falling back to plain text, rich snapshot unusable: {err}");
                codec::from_plain_text(&hydration.text)
            }
            None => codec::from_plain_text(&hydration.text),
        };

        let mut session = Self {
            selection: commands::caret_at(&tree, DocPoint::start()),
            tree,
            history: History::new(config.history_limit),
            dispatcher: Dispatcher::default(),
            version: 0,
            listeners: Vec::new(),
        };
        if config.seed_history {
            session.record();
        }
        log::debug!(
            "Hydrated session with {} top-level blocks",
            session.tree.blocks().len()
        );
        session
    }

    /// Replaces the formatting dispatcher, e.g. to route commands through a
    /// host-provided primitive.
    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Rebuilds the document from a rich snapshot after the editing surface
    /// was remounted, and puts the selection back where `locator` says.
    ///
    /// Not recorded in history. The caret goes to the document start when the
    /// locator is missing or no longer fits the rebuilt tree.
    pub fn rehydrate(&mut self, snapshot: &ContentSnapshot, locator: Option<&SelectionLocator>) -> Result<()> {
        let tree = DocumentTree::from_snapshot(snapshot)?;

        self.history.begin_apply();
        self.tree = tree;
        self.selection = self.restore_or_start(locator);
        self.commit();
        self.history.finish_apply();
        Ok(())
    }

    /// Types `text` over the selection.
    pub fn insert_text(&mut self, text: &str) -> bool {
        let Some((start, end)) = self.ordered_points() else {
            return false;
        };
        if text.is_empty() && start == end {
            return false;
        }

        edit::delete_range(&mut self.tree, start, end);
        let Some(caret) = edit::insert_text(&mut self.tree, start, text) else {
            return false;
        };
        self.selection = commands::caret_at(&self.tree, caret);
        self.commit();
        true
    }

    /// Soft line break inside the current block.
    pub fn insert_line_break(&mut self) -> bool {
        self.insert_text("\n")
    }

    /// Backspace: deletes the selection, or the character before the caret.
    /// At the start of a block it lifts a list item out of its list, or joins
    /// the block onto the previous one.
    pub fn delete_backward(&mut self) -> bool {
        let Some((start, end)) = self.ordered_points() else {
            return false;
        };

        let (from, to) = if start != end {
            (start, end)
        } else if start.offset > 0 {
            (DocPoint::new(start.block, start.offset - 1), start)
        } else if self.caret_in_list_item() {
            return self.execute(FormattingCommand::Outdent);
        } else if start.block > 0 {
            let Some(previous_end) = edit::end_of_block(&self.tree, start.block - 1) else {
                return false;
            };
            (previous_end, start)
        } else {
            return false;
        };

        if !edit::delete_range(&mut self.tree, from, to) {
            return false;
        }
        self.selection = commands::caret_at(&self.tree, from);
        self.commit();
        true
    }

    pub fn execute(&mut self, command: FormattingCommand) -> bool {
        let changed = self
            .dispatcher
            .execute(command, &mut self.tree, &mut self.selection);
        if changed {
            self.commit();
        }
        changed
    }

    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.undo().cloned() else {
            return false;
        };
        self.apply_entry(entry);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.redo().cloned() else {
            return false;
        };
        self.apply_entry(entry);
        true
    }

    /// Runs the action bound to `key`. Returns whether the key was handled
    /// and changed something.
    pub fn handle_key(&mut self, key: KeyPress) -> bool {
        let Some(action) = keymap::resolve(&key, self.caret_in_list_item()) else {
            return false;
        };
        match action {
            KeyAction::Command(command) => self.execute(command),
            KeyAction::Undo => self.undo(),
            KeyAction::Redo => self.redo(),
            KeyAction::InsertText(text) => self.insert_text(&text),
            KeyAction::LineBreak => self.insert_line_break(),
            KeyAction::DeleteBackward => self.delete_backward(),
        }
    }

    pub fn select(&mut self, anchor: DocPoint, focus: DocPoint) -> bool {
        match points::selection_from_points(&self.tree, anchor, focus) {
            Some(selection) => {
                self.selection = Some(selection);
                true
            }
            None => false,
        }
    }

    pub fn place_caret(&mut self, point: DocPoint) -> bool {
        self.select(point, point)
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// The selection as document points, if it resolves.
    pub fn selection_points(&self) -> Option<(DocPoint, DocPoint)> {
        points::selection_points(&self.tree, self.selection.as_ref()?)
    }

    pub fn capture_selection(&self) -> Option<SelectionLocator> {
        selection::capture(&self.tree, self.selection.as_ref())
    }

    /// The flat text the host persists.
    pub fn plain_text(&self) -> String {
        codec::to_plain_text(&self.tree)
    }

    pub fn html(&self) -> String {
        codec::to_html(&self.tree)
    }

    pub fn snapshot(&self) -> Result<ContentSnapshot> {
        self.tree.snapshot()
    }

    pub fn counts(&self) -> WordCount {
        counter::count(&self.tree)
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn on_change(&mut self, listener: impl FnMut(&ChangeEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn apply_entry(&mut self, entry: HistoryEntry) {
        self.history.begin_apply();
        match DocumentTree::from_snapshot(&entry.content) {
            Ok(tree) => self.tree = tree,
            Err(err) => log::warn!("Keeping current document, history entry unusable: {err}"),
        }
        self.selection = self.restore_or_start(entry.selection.as_ref());
        self.commit();
        self.history.finish_apply();
    }

    fn restore_or_start(&self, locator: Option<&SelectionLocator>) -> Option<Selection> {
        locator
            .and_then(|locator| selection::restore(&self.tree, locator))
            .or_else(|| commands::caret_at(&self.tree, DocPoint::start()))
    }

    fn ordered_points(&self) -> Option<(DocPoint, DocPoint)> {
        points::ordered_points(&self.tree, self.selection.as_ref()?)
    }

    fn caret_in_list_item(&self) -> bool {
        self.selection
            .as_ref()
            .and_then(|selection| commands::enclosing_list_item(&self.tree, &selection.focus))
            .is_some()
    }

    fn commit(&mut self) {
        self.version += 1;
        self.record();

        let event = ChangeEvent {
            version: self.version,
            counts: self.counts(),
        };
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    fn record(&mut self) {
        let locator = self.capture_selection();
        match self.tree.snapshot() {
            Ok(content) => {
                self.history.push(content, locator);
            }
            Err(err) => log::error!("Skipping history checkpoint: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::document::{InlineMark, ListKind, Node};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session(text: &str) -> EditorSession {
        EditorSession::hydrate(Hydration::plain(text), &EditorConfig::default())
    }

    #[test]
    fn test_hydrate_places_caret_at_start() {
        let session = session("Hello\n\nworld");

        assert_eq!(
            session.selection_points(),
            Some((DocPoint::start(), DocPoint::start()))
        );
        assert_eq!(session.history().len(), 1);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_hydrate_without_seed() {
        let config = EditorConfig {
            seed_history: false,
            ..EditorConfig::default()
        };
        let session = EditorSession::hydrate(Hydration::plain("text"), &config);

        assert!(session.history().is_empty());
    }

    #[test]
    fn test_hydrate_prefers_rich_snapshot() {
        let rich = DocumentTree::from_blocks(vec![Node::paragraph(vec![Node::mark(
            InlineMark::Italic,
            vec![Node::text("styled")],
        )])]);
        let hydration = Hydration::rich("styled", rich.snapshot().unwrap());

        let session = EditorSession::hydrate(hydration, &EditorConfig::default());

        assert_eq!(session.tree(), &rich);
    }

    #[test]
    fn test_hydrate_ignores_broken_snapshot() {
        let hydration = Hydration::rich("plain", ContentSnapshot::from("{oops".to_string()));

        let session = EditorSession::hydrate(hydration, &EditorConfig::default());

        assert_eq!(session.tree(), &codec::from_plain_text("plain"));
    }

    #[test]
    fn test_hydrate_with_itemless_list_keeps_a_caret_target() {
        let itemless = r#"[{"kind":{"list":{"kind":"bulleted"}}}]"#.to_string();
        let hydration = Hydration::rich("", ContentSnapshot::from(itemless));

        let mut session = EditorSession::hydrate(hydration, &EditorConfig::default());

        assert_eq!(session.tree(), &DocumentTree::empty());
        assert!(session.selection().is_some());
        assert!(session.insert_text("typed"));
        assert_eq!(session.plain_text(), "typed");
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut session = session("Hello world");
        session.select(DocPoint::new(0, 6), DocPoint::new(0, 11));

        assert!(session.insert_text("there"));

        assert_eq!(session.plain_text(), "Hello there");
        assert_eq!(
            session.selection_points(),
            Some((DocPoint::new(0, 11), DocPoint::new(0, 11)))
        );
    }

    #[test]
    fn test_line_break_stays_in_block() {
        let mut session = session("ab");
        session.place_caret(DocPoint::new(0, 1));

        assert!(session.insert_line_break());

        assert_eq!(session.tree().blocks().len(), 1);
        assert_eq!(session.plain_text(), "a\nb");
    }

    #[test]
    fn test_backspace_joins_blocks() {
        let mut session = session("one\n\ntwo");
        session.place_caret(DocPoint::new(1, 0));

        assert!(session.delete_backward());

        assert_eq!(session.plain_text(), "onetwo");
        assert_eq!(
            session.selection_points(),
            Some((DocPoint::new(0, 3), DocPoint::new(0, 3)))
        );
    }

    #[test]
    fn test_backspace_at_document_start_is_noop() {
        let mut session = session("text");
        let version = session.version();

        assert!(!session.delete_backward());
        assert_eq!(session.version(), version);
    }

    #[test]
    fn test_backspace_at_list_item_start_leaves_list() {
        let mut session = session("item");
        session.execute(FormattingCommand::ToggleBulletList);
        session.place_caret(DocPoint::new(0, 0));

        assert!(session.delete_backward());

        assert_eq!(session.tree(), &codec::from_plain_text("item"));
    }

    #[test]
    fn test_undo_restores_selection() {
        let mut session = session("");
        session.insert_text("a");
        session.insert_text("b");

        assert!(session.undo());

        assert_eq!(session.plain_text(), "a");
        assert_eq!(
            session.selection_points(),
            Some((DocPoint::new(0, 1), DocPoint::new(0, 1)))
        );
    }

    #[test]
    fn test_listeners_hear_undo() {
        let mut session = session("");
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        session.on_change(move |event| sink.borrow_mut().push(*event));

        session.insert_text("hi");
        session.undo();

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].counts, WordCount { words: 1, characters: 2 });
        assert_eq!(events[1].counts, WordCount::default());
        assert!(events[1].version > events[0].version);
    }

    #[test]
    fn test_rehydrate_does_not_record() {
        let mut session = session("Hello");
        session.select(DocPoint::new(0, 1), DocPoint::new(0, 3));
        let snapshot = session.snapshot().unwrap();
        let locator = session.capture_selection();
        let history_len = session.history().len();

        session.rehydrate(&snapshot, locator.as_ref()).unwrap();

        assert_eq!(session.history().len(), history_len);
        assert_eq!(
            session.selection_points(),
            Some((DocPoint::new(0, 1), DocPoint::new(0, 3)))
        );
    }

    #[test]
    fn test_rehydrate_with_stale_locator_falls_back_to_start() {
        let mut session = session("Hello");
        let snapshot = session.snapshot().unwrap();
        let locator = SelectionLocator {
            anchor_path: vec![3, 0],
            anchor_offset: 1,
            focus_path: vec![3, 0],
            focus_offset: 1,
        };

        session.rehydrate(&snapshot, Some(&locator)).unwrap();

        assert_eq!(
            session.selection_points(),
            Some((DocPoint::start(), DocPoint::start()))
        );
    }

    #[test]
    fn test_rehydrate_rejects_malformed_snapshot() {
        let mut session = session("Hello");

        let top_level_text = r#"[{"kind":{"text":{"text":"loose"}}}]"#;

        assert!(session
            .rehydrate(&ContentSnapshot::from(top_level_text.to_string()), None)
            .is_err());
        assert_eq!(session.plain_text(), "Hello");
    }

    #[test]
    fn test_tab_indents_only_in_lists() {
        let mut session = session("one\n\ntwo");
        session.place_caret(DocPoint::new(1, 0));
        assert!(!session.handle_key(KeyPress::new(keymap::KeyCode::Tab)));

        session.select(DocPoint::new(0, 0), DocPoint::new(1, 0));
        session.execute(FormattingCommand::ToggleBulletList);
        session.place_caret(DocPoint::new(1, 0));

        assert!(session.handle_key(KeyPress::new(keymap::KeyCode::Tab)));
        let list = &session.tree().blocks()[0];
        assert_eq!(list.list_kind(), Some(ListKind::Bulleted));
        assert_eq!(list.children.len(), 1);
    }
}
