//! Formatting commands and their dispatcher.
//!
//! Every formatting change requested by the UI (toolbar buttons, keyboard
//! shortcuts) goes through [`Dispatcher::execute`]. Inline marks and headings
//! are handed straight to the host's [`FormattingPrimitive`]. List toggles are
//! attempted with the primitive too, but the result is verified afterwards and
//! repaired by [`list_fallback::wrap_in_list`] when no list item was produced.

pub mod list_fallback;
pub mod primitive;

pub use primitive::{BuiltinPrimitive, FormattingPrimitive};

use crate::editing::document::points::{self, DocPoint};
use crate::editing::document::{DocumentTree, HeadingLevel, InlineMark, ListKind, NodeKind, NodePath, edit};
use crate::editing::selection::{Position, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormattingCommand {
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    SetHeading(HeadingLevel),
    ToggleBulletList,
    ToggleNumberedList,
    Indent,
    Outdent,
    InsertParagraphBreak,
}

/// Path of the list item containing `position`, if any.
///
/// A position on a list element itself (between items) counts as inside the
/// item at that index.
pub(crate) fn enclosing_list_item(tree: &DocumentTree, position: &Position) -> Option<NodePath> {
    let path = tree.path_of(position.node)?;
    let node = tree.node(&path)?;
    if node.is_list() {
        let last = node.children.len().checked_sub(1)?;
        let mut item = path;
        item.push(position.offset.min(last));
        return Some(item);
    }
    tree.enclosing(&path, |node| node.is_list_item())
}

pub(crate) fn caret_at(tree: &DocumentTree, point: DocPoint) -> Option<Selection> {
    points::position_at(tree, point).map(Selection::caret)
}

pub struct Dispatcher {
    primitive: Box<dyn FormattingPrimitive>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(BuiltinPrimitive)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(primitive: impl FormattingPrimitive + 'static) -> Self {
        Self {
            primitive: Box::new(primitive),
        }
    }

    /// Runs `command` against the tree and selection. Returns whether the
    /// tree changed.
    pub fn execute(
        &mut self,
        command: FormattingCommand,
        tree: &mut DocumentTree,
        selection: &mut Option<Selection>,
    ) -> bool {
        log::debug!("Executing {command:?}");
        match command {
            FormattingCommand::ToggleBold => self.toggle_mark(InlineMark::Bold, tree, selection),
            FormattingCommand::ToggleItalic => {
                self.toggle_mark(InlineMark::Italic, tree, selection)
            }
            FormattingCommand::ToggleUnderline => {
                self.toggle_mark(InlineMark::Underline, tree, selection)
            }
            FormattingCommand::SetHeading(level) => match selection.as_mut() {
                Some(selection) => self.primitive.format_block(tree, selection, level),
                None => false,
            },
            FormattingCommand::ToggleBulletList => {
                self.toggle_list(ListKind::Bulleted, tree, selection)
            }
            FormattingCommand::ToggleNumberedList => {
                self.toggle_list(ListKind::Numbered, tree, selection)
            }
            FormattingCommand::Indent => match selection.as_mut() {
                Some(selection) if enclosing_list_item(tree, &selection.focus).is_some() => {
                    self.primitive.indent(tree, selection)
                }
                _ => false,
            },
            FormattingCommand::Outdent => match selection.as_mut() {
                Some(selection) if enclosing_list_item(tree, &selection.focus).is_some() => {
                    self.primitive.outdent(tree, selection)
                }
                _ => false,
            },
            FormattingCommand::InsertParagraphBreak => self.paragraph_break(tree, selection),
        }
    }

    fn toggle_mark(
        &mut self,
        mark: InlineMark,
        tree: &mut DocumentTree,
        selection: &mut Option<Selection>,
    ) -> bool {
        match selection.as_mut() {
            Some(selection) if !selection.is_collapsed() => {
                self.primitive.toggle_mark(tree, selection, mark)
            }
            _ => false,
        }
    }

    fn toggle_list(
        &mut self,
        kind: ListKind,
        tree: &mut DocumentTree,
        selection: &mut Option<Selection>,
    ) -> bool {
        if let Some(item) = selection
            .as_ref()
            .and_then(|selection| enclosing_list_item(tree, &selection.focus))
        {
            return retag_list(tree, &item, kind);
        }

        let mut changed = match selection.as_mut() {
            Some(selection) => self.primitive.insert_list(tree, selection, kind),
            None => false,
        };

        // Drop a selection the primitive left pointing at removed nodes
        if selection
            .as_ref()
            .is_some_and(|selection| points::selection_points(tree, selection).is_none())
        {
            *selection = None;
        }

        let in_item = selection
            .as_ref()
            .and_then(|selection| enclosing_list_item(tree, &selection.focus))
            .is_some();
        if !in_item {
            log::debug!("List primitive produced no list item; wrapping manually");
            changed |= list_fallback::wrap_in_list(tree, selection, kind);
        }
        changed
    }

    fn paragraph_break(&mut self, tree: &mut DocumentTree, selection: &mut Option<Selection>) -> bool {
        let Some(current) = selection.as_ref() else {
            return false;
        };
        let Some((start, end)) = points::ordered_points(tree, current) else {
            return false;
        };

        let mut changed = edit::delete_range(tree, start, end);
        let Some(caret) = caret_at(tree, start) else {
            return changed;
        };
        *selection = Some(caret);

        if enclosing_list_item(tree, &caret.focus).is_some() {
            if let Some(selection) = selection.as_mut() {
                changed |= self.primitive.continue_list(tree, selection);
            }
            return changed;
        }

        match edit::split_block(tree, start) {
            Some(next) => {
                *selection = caret_at(tree, next);
                true
            }
            None => changed,
        }
    }
}

/// Switches the list containing `item` to `kind`. Already of that kind: no-op.
fn retag_list(tree: &mut DocumentTree, item: &[usize], kind: ListKind) -> bool {
    let Some((_, list_path)) = item.split_last() else {
        return false;
    };
    match tree.node_mut(list_path) {
        Some(list) if list.list_kind().is_some_and(|current| current != kind) => {
            list.kind = NodeKind::List { kind };
            true
        }
        _ => false,
    }
}
