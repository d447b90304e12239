//! Bounded undo/redo history of content checkpoints.
//!
//! Entries are whole-content snapshots paired with the selection at the time
//! they were recorded. The cursor points at the entry matching the current
//! document; undo and redo move the cursor and hand the entry back to the
//! caller, which applies it.
//!
//! Applying an entry changes the document, and every document change normally
//! records a checkpoint. The caller brackets the application with
//! [`History::begin_apply`] / [`History::finish_apply`]; pushes in between are
//! ignored so that undo never records itself.

use std::collections::VecDeque;

use inkpad_config::DEFAULT_HISTORY_LIMIT;

use crate::codec::ContentSnapshot;
use crate::editing::selection::SelectionLocator;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub content: ContentSnapshot,
    pub selection: Option<SelectionLocator>,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    cursor: usize,
    limit: usize,
    applying: bool,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            limit: limit.max(1),
            applying: false,
        }
    }

    /// Records a checkpoint. Returns whether an entry was added.
    ///
    /// Ignored while an entry is being applied. Otherwise any redo tail is
    /// discarded first, and the entry is appended unless `content` equals the
    /// newest remaining entry.
    pub fn push(&mut self, content: ContentSnapshot, selection: Option<SelectionLocator>) -> bool {
        if self.applying {
            log::trace!("Ignoring history push while applying a checkpoint");
            return false;
        }

        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        if self
            .entries
            .back()
            .is_some_and(|entry| entry.content == content)
        {
            log::trace!("Ignoring history push with unchanged content");
            return false;
        }

        self.entries.push_back(HistoryEntry { content, selection });

        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;

        log::debug!(
            "Recorded history entry {} of {}",
            self.cursor + 1,
            self.entries.len()
        );
        true
    }

    /// Steps back one entry and returns it, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        log::debug!("Undo to history entry {}", self.cursor + 1);
        self.entries.get(self.cursor)
    }

    /// Steps forward one entry and returns it, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        log::debug!("Redo to history entry {}", self.cursor + 1);
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn begin_apply(&mut self) {
        self.applying = true;
    }

    pub fn finish_apply(&mut self) {
        self.applying = false;
    }

    pub fn is_applying(&self) -> bool {
        self.applying
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snap(content: &str) -> ContentSnapshot {
        ContentSnapshot::from(content.to_string())
    }

    fn locator(offset: usize) -> Option<SelectionLocator> {
        Some(SelectionLocator {
            anchor_path: vec![0, 0],
            anchor_offset: offset,
            focus_path: vec![0, 0],
            focus_offset: offset,
        })
    }

    fn assert_cursor_invariants(history: &History) {
        if history.is_empty() {
            assert_eq!(history.cursor(), 0);
        } else {
            assert!(history.cursor() < history.len());
        }
        assert_eq!(history.can_undo(), history.cursor() > 0);
        assert_eq!(history.can_redo(), history.cursor() + 1 < history.len());
    }

    #[test]
    fn test_empty_history() {
        let mut history = History::default();

        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert_cursor_invariants(&history);
    }

    #[test]
    fn test_push_moves_cursor_to_newest() {
        let mut history = History::default();

        assert!(history.push(snap("a"), None));
        assert!(history.push(snap("ab"), None));

        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), 1);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_identical_push_is_deduplicated() {
        let mut history = History::default();

        history.push(snap("a"), locator(0));
        assert!(!history.push(snap("a"), locator(1)));

        assert_eq!(history.len(), 1);
        assert_eq!(history.current().unwrap().selection, locator(0));
    }

    #[test]
    fn test_undo_then_redo_returns_same_entry() {
        let mut history = History::default();
        history.push(snap("a"), locator(1));
        history.push(snap("ab"), locator(2));

        let undone = history.undo().cloned().unwrap();
        let redone = history.redo().cloned().unwrap();

        assert_eq!(undone.content, snap("a"));
        assert_eq!(
            redone,
            HistoryEntry {
                content: snap("ab"),
                selection: locator(2)
            }
        );
    }

    #[test]
    fn test_push_after_undo_truncates_redo_tail() {
        let mut history = History::default();
        history.push(snap("a"), None);
        history.push(snap("ab"), None);
        history.push(snap("abc"), None);
        history.undo();
        history.undo();

        history.push(snap("ax"), None);

        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        let contents: Vec<_> = history.entries().map(|entry| entry.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "ax"]);
    }

    #[test]
    fn test_duplicate_push_after_undo_drops_redo_tail() {
        let mut history = History::default();
        history.push(snap("a"), None);
        history.push(snap("ab"), None);
        history.undo();

        assert!(!history.push(snap("a"), None));

        assert!(!history.can_redo());
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), 0);
        assert_cursor_invariants(&history);
    }

    #[test]
    fn test_limit_drops_oldest_entry() {
        let mut history = History::new(50);
        for n in 0..51 {
            history.push(snap(&n.to_string()), None);
            assert_cursor_invariants(&history);
        }

        assert_eq!(history.len(), 50);
        assert_eq!(history.cursor(), 49);
        assert_eq!(history.entries().next().unwrap().content, snap("1"));
        assert_eq!(history.current().unwrap().content, snap("50"));
    }

    #[test]
    fn test_limit_with_undo_in_the_middle() {
        let mut history = History::new(3);
        history.push(snap("a"), None);
        history.push(snap("b"), None);
        history.push(snap("c"), None);
        history.undo();

        history.push(snap("d"), None);
        history.push(snap("e"), None);

        let contents: Vec<_> = history.entries().map(|entry| entry.content.as_str()).collect();
        assert_eq!(contents, vec!["b", "d", "e"]);
        assert_eq!(history.cursor(), 2);
        assert_cursor_invariants(&history);
    }

    #[test]
    fn test_push_ignored_while_applying() {
        let mut history = History::default();
        history.push(snap("a"), None);
        history.push(snap("ab"), None);
        history.undo();

        history.begin_apply();
        assert!(history.is_applying());
        assert!(!history.push(snap("a-applied"), None));
        history.finish_apply();

        assert!(!history.is_applying());
        assert_eq!(history.len(), 2);
        assert!(history.can_redo());
    }

    #[test]
    fn test_cursor_invariants_over_mixed_operations() {
        let mut history = History::new(4);
        let script = ["p", "p", "u", "p", "u", "u", "u", "r", "p", "p", "p", "p", "r", "u"];

        for (step, op) in script.iter().enumerate() {
            match *op {
                "p" => {
                    history.push(snap(&format!("state {step}")), None);
                }
                "u" => {
                    history.undo();
                }
                _ => {
                    history.redo();
                }
            }
            assert_cursor_invariants(&history);
            assert!(history.len() <= 4);
        }
    }

    #[test]
    fn test_zero_limit_keeps_one_entry() {
        let mut history = History::new(0);
        history.push(snap("a"), None);
        history.push(snap("b"), None);

        assert_eq!(history.len(), 1);
        assert_eq!(history.current().unwrap().content, snap("b"));
    }
}
