//! The host's native formatting operations.
//!
//! An editing surface usually ships its own "apply formatting to the current
//! range" command. [`FormattingPrimitive`] is that seam: the dispatcher calls
//! it for marks, headings, indentation and list continuation, and trusts the
//! result for everything except list creation. [`BuiltinPrimitive`] is the
//! implementation used when the host does not provide one.

use crate::editing::document::points;
use crate::editing::document::runs;
use crate::editing::document::{DocumentTree, HeadingLevel, InlineMark, ListKind, Node, NodeKind, edit};
use crate::editing::selection::Selection;

use super::{caret_at, enclosing_list_item};

pub trait FormattingPrimitive {
    /// Adds `mark` to the selected text, or removes it when all of it already
    /// has the mark.
    fn toggle_mark(&mut self, tree: &mut DocumentTree, selection: &mut Selection, mark: InlineMark) -> bool;

    /// Turns the selected paragraphs into headings of `level`.
    fn format_block(&mut self, tree: &mut DocumentTree, selection: &mut Selection, level: HeadingLevel) -> bool;

    /// Attempts to turn the selected blocks into a list. May decline.
    fn insert_list(&mut self, tree: &mut DocumentTree, selection: &mut Selection, kind: ListKind) -> bool;

    fn indent(&mut self, tree: &mut DocumentTree, selection: &mut Selection) -> bool;

    fn outdent(&mut self, tree: &mut DocumentTree, selection: &mut Selection) -> bool;

    /// Enter inside a list item.
    fn continue_list(&mut self, tree: &mut DocumentTree, selection: &mut Selection) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinPrimitive;

impl FormattingPrimitive for BuiltinPrimitive {
    fn toggle_mark(&mut self, tree: &mut DocumentTree, selection: &mut Selection, mark: InlineMark) -> bool {
        let Some((anchor, focus)) = points::selection_points(tree, selection) else {
            return false;
        };
        let (start, end) = (anchor.min(focus), anchor.max(focus));
        let blocks = tree.text_blocks();

        // Slice every touched block into before / selected / after
        let mut segments = Vec::new();
        for index in start.block..=end.block {
            let Some(path) = blocks.get(index) else {
                break;
            };
            let content = tree.block_runs(path);
            let from = if index == start.block { start.offset } else { 0 };
            let to = if index == end.block {
                end.offset
            } else {
                runs::len(&content)
            };
            segments.push((path, runs::split_range(content, from, to)));
        }

        if !segments
            .iter()
            .any(|(_, (_, selected, _))| runs::has_text(selected))
        {
            return false;
        }
        let remove = segments
            .iter()
            .all(|(_, (_, selected, _))| runs::all_marked(selected, mark));

        for (path, (mut head, mut selected, tail)) in segments {
            runs::set_mark(&mut selected, mark, !remove);
            head.append(&mut selected);
            head.extend(tail);
            tree.set_block_runs(path, head);
        }

        // Text nodes were rebuilt; the character offsets did not move
        if let Some(restored) = points::selection_from_points(tree, anchor, focus) {
            *selection = restored;
        }
        true
    }

    fn format_block(&mut self, tree: &mut DocumentTree, selection: &mut Selection, level: HeadingLevel) -> bool {
        let Some((start, end)) = points::ordered_points(tree, selection) else {
            return false;
        };
        let blocks = tree.text_blocks();
        let targets: Vec<_> = blocks[start.block..=end.block]
            .iter()
            .filter(|path| {
                tree.node(path).is_some_and(|node| {
                    matches!(node.kind, NodeKind::Paragraph | NodeKind::Heading { .. })
                })
            })
            .cloned()
            .collect();
        if targets.is_empty() {
            return false;
        }

        let heading = NodeKind::Heading { level };
        let already = targets
            .iter()
            .all(|path| tree.node(path).is_some_and(|node| node.kind == heading));
        let kind = if already { NodeKind::Paragraph } else { heading };

        for path in &targets {
            if let Some(node) = tree.node_mut(path) {
                node.kind = kind.clone();
            }
        }
        true
    }

    fn insert_list(&mut self, tree: &mut DocumentTree, selection: &mut Selection, kind: ListKind) -> bool {
        let Some((start, end)) = points::ordered_points(tree, selection) else {
            return false;
        };
        let blocks = tree.text_blocks();
        let paths = &blocks[start.block..=end.block];

        // Only runs of top-level paragraphs are handled natively
        let all_paragraphs = paths.iter().all(|path| {
            path.len() == 1
                && tree
                    .node(path)
                    .is_some_and(|node| node.kind == NodeKind::Paragraph)
        });
        if !all_paragraphs {
            return false;
        }
        let (Some(first), Some(last)) = (paths.first().map(|p| p[0]), paths.last().map(|p| p[0]))
        else {
            return false;
        };

        // Paragraphs become items in place, keeping their identity so the
        // live selection stays valid
        let items: Vec<Node> = tree
            .blocks
            .drain(first..=last)
            .map(|mut paragraph| {
                paragraph.kind = NodeKind::ListItem;
                paragraph
            })
            .collect();
        tree.blocks.insert(first, Node::list(kind, items));
        true
    }

    fn indent(&mut self, tree: &mut DocumentTree, selection: &mut Selection) -> bool {
        let Some(item_path) = enclosing_list_item(tree, &selection.focus) else {
            return false;
        };
        let Some((&index, list_path)) = item_path.split_last() else {
            return false;
        };
        if index == 0 {
            return false;
        }
        let Some(kind) = tree.node(list_path).and_then(Node::list_kind) else {
            return false;
        };

        let Some(item) = tree.remove(&item_path) else {
            return false;
        };
        let mut previous_path = list_path.to_vec();
        previous_path.push(index - 1);
        let Some(previous) = tree.node_mut(&previous_path) else {
            return false;
        };

        // Join a trailing nested list of the same kind instead of opening a new one
        match previous.children.last_mut() {
            Some(nested) if nested.list_kind() == Some(kind) => {
                nested.children.push(item);
            }
            _ => {
                previous.children.push(Node::list(kind, vec![item]));
            }
        }
        true
    }

    fn outdent(&mut self, tree: &mut DocumentTree, selection: &mut Selection) -> bool {
        let Some(item_path) = enclosing_list_item(tree, &selection.focus) else {
            return false;
        };
        let Some((&index, list_path)) = item_path.split_last() else {
            return false;
        };
        let Some(kind) = tree.node(list_path).and_then(Node::list_kind) else {
            return false;
        };

        // Keep the caret by text position; the item may stop being one
        let restore_to = points::selection_points(tree, selection);

        let changed = if list_path.len() == 1 {
            lift_out_of_list(tree, list_path[0], index, kind)
        } else {
            lift_to_parent_list(tree, list_path, index, kind)
        };

        if changed
            && let Some((anchor, focus)) = restore_to
            && let Some(restored) = points::selection_from_points(tree, anchor, focus)
        {
            *selection = restored;
        }
        changed
    }

    fn continue_list(&mut self, tree: &mut DocumentTree, selection: &mut Selection) -> bool {
        let Some(focus) = points::point_of(tree, &selection.focus) else {
            return false;
        };
        let Some(item_path) = enclosing_list_item(tree, &selection.focus) else {
            return false;
        };
        let Some(item) = tree.node(&item_path) else {
            return false;
        };

        // Enter on an empty item leaves the list
        if item.children.is_empty() {
            return self.outdent(tree, selection);
        }

        match edit::split_list_item(tree, focus) {
            Some(next) => {
                if let Some(caret) = caret_at(tree, next) {
                    *selection = caret;
                }
                true
            }
            None => false,
        }
    }
}

/// Moves a top-level list item out of its list as a paragraph, splitting the
/// list around it. Its nested lists follow it as top-level lists.
fn lift_out_of_list(tree: &mut DocumentTree, list_index: usize, index: usize, kind: ListKind) -> bool {
    let Some(mut list) = tree.remove(&[list_index]) else {
        return false;
    };
    let after = list.children.split_off(index + 1);
    let Some(mut item) = list.children.pop() else {
        return false;
    };
    let before = list.children;

    let nested = item.children.split_off(item.inline_len());
    item.kind = NodeKind::Paragraph;

    let mut replacement = Vec::new();
    if !before.is_empty() {
        replacement.push(Node::list(kind, before));
    }
    replacement.push(item);
    replacement.extend(nested);
    if !after.is_empty() {
        replacement.push(Node::list(kind, after));
    }

    let rest = tree.blocks.split_off(list_index);
    tree.blocks.extend(replacement);
    tree.blocks.extend(rest);
    true
}

/// Moves a nested list item up one level, right after its parent item. Items
/// that followed it become its own nested list.
fn lift_to_parent_list(tree: &mut DocumentTree, list_path: &[usize], index: usize, kind: ListKind) -> bool {
    let Some((_, parent_item_path)) = list_path.split_last() else {
        return false;
    };
    let Some((&parent_index, outer_list_path)) = parent_item_path.split_last() else {
        return false;
    };
    if !tree.node(parent_item_path).is_some_and(Node::is_list_item) {
        return false;
    }

    let Some(list) = tree.node_mut(list_path) else {
        return false;
    };
    let trailing = list.children.split_off(index + 1);
    let Some(mut item) = list.children.pop() else {
        return false;
    };
    if !trailing.is_empty() {
        match item.children.last_mut() {
            Some(nested) if nested.list_kind() == Some(kind) => nested.children.extend(trailing),
            _ => item.children.push(Node::list(kind, trailing)),
        }
    }

    let mut target = outer_list_path.to_vec();
    target.push(parent_index + 1);
    let inserted = tree.insert(&target, item);
    tree.prune_empty_lists();
    inserted
}
