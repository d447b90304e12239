use serde::{Deserialize, Serialize};

use crate::editing::document::{DocumentTree, NodeId, NodePath};

/// A caret endpoint in the live tree.
///
/// For a text run `offset` counts characters; for any other node it is a
/// child index, so `offset == children.len()` means "after the last child".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub node: NodeId,
    pub offset: usize,
}

/// Live selection. `anchor` is where it started, `focus` where the caret is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub focus: Position,
}

impl Selection {
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    pub fn caret(position: Position) -> Self {
        Self {
            anchor: position,
            focus: position,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// Structural description of a selection.
///
/// Live positions point at node identities, which do not survive the tree
/// being rebuilt (undo, rehydration). A locator records where each endpoint
/// *is* instead: the child-index path from the root and the offset there.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionLocator {
    pub anchor_path: NodePath,
    pub anchor_offset: usize,
    pub focus_path: NodePath,
    pub focus_offset: usize,
}

impl SelectionLocator {
    /// Returns `None` when there is no selection or it is not inside `tree`.
    pub fn capture(tree: &DocumentTree, selection: Option<&Selection>) -> Option<Self> {
        let selection = selection?;
        Some(Self {
            anchor_path: tree.path_of(selection.anchor.node)?,
            anchor_offset: selection.anchor.offset,
            focus_path: tree.path_of(selection.focus.node)?,
            focus_offset: selection.focus.offset,
        })
    }

    /// Resolves the locator against the current tree.
    ///
    /// Both paths must resolve or nothing is returned; a half-applied
    /// selection is never produced. Offsets past the end of the resolved node
    /// are clamped.
    pub fn restore(&self, tree: &DocumentTree) -> Option<Selection> {
        let anchor = resolve(tree, &self.anchor_path, self.anchor_offset)?;
        let focus = resolve(tree, &self.focus_path, self.focus_offset)?;
        Some(Selection { anchor, focus })
    }
}

fn resolve(tree: &DocumentTree, path: &[usize], offset: usize) -> Option<Position> {
    let node = tree.node(path)?;
    Some(Position {
        node: node.id(),
        offset: offset.min(node.extent()),
    })
}

pub fn capture(tree: &DocumentTree, selection: Option<&Selection>) -> Option<SelectionLocator> {
    SelectionLocator::capture(tree, selection)
}

pub fn restore(tree: &DocumentTree, locator: &SelectionLocator) -> Option<Selection> {
    let restored = locator.restore(tree);
    if restored.is_none() {
        log::warn!("Discarding selection locator that no longer resolves: {locator:?}");
    }
    restored
}
