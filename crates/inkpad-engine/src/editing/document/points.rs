//! Mapping between live [`Position`]s and [`DocPoint`]s.
//!
//! A `DocPoint` addresses a caret by (text block index in document order,
//! character offset within that block's inline content). Structural commands
//! such as list wrapping or indenting move blocks around but keep the order of
//! text blocks and their text, so a selection converted to points before the
//! edit can be placed back afterwards even when the nodes it referenced are gone.

use super::{DocumentTree, Node, NodeKind};
use crate::editing::selection::{Position, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DocPoint {
    pub block: usize,
    pub offset: usize,
}

impl DocPoint {
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }

    pub fn start() -> Self {
        Self::default()
    }
}

/// Offset extent of inline content (line breaks count as one).
pub(crate) fn inline_extent(nodes: &[Node]) -> usize {
    nodes
        .iter()
        .map(|node| match &node.kind {
            NodeKind::Text { text } => text.chars().count(),
            NodeKind::LineBreak => 1,
            NodeKind::Mark { .. } => inline_extent(&node.children),
            _ => 0,
        })
        .sum()
}

pub(crate) fn block_len(tree: &DocumentTree, block: usize) -> Option<usize> {
    let path = tree.text_blocks().get(block)?.clone();
    tree.node(&path)
        .map(|node| inline_extent(node.inline_children()))
}

pub fn point_of(tree: &DocumentTree, position: &Position) -> Option<DocPoint> {
    let path = tree.path_of(position.node)?;
    let node = tree.node(&path)?;

    let (block_path, offset) = if node.is_list() {
        // A caret between list items lands at the start of the next item
        let item = position.offset.min(node.children.len().checked_sub(1)?);
        let mut item_path = path.clone();
        item_path.push(item);
        let item_node = tree.node(&item_path)?;
        let offset = if position.offset >= node.children.len() {
            inline_extent(item_node.inline_children())
        } else {
            0
        };
        (item_path, offset)
    } else if node.is_text_block() {
        let upto = position.offset.min(node.inline_len());
        (path, inline_extent(&node.children[..upto]))
    } else {
        let block_path = tree.enclosing(&path, Node::is_text_block)?;
        let block = tree.node(&block_path)?;
        let offset = offset_within(&block.children, &path[block_path.len()..], position.offset);
        (block_path, offset)
    };

    let block = tree.text_blocks().iter().position(|p| *p == block_path)?;
    Some(DocPoint { block, offset })
}

fn offset_within(nodes: &[Node], relative: &[usize], offset: usize) -> usize {
    let Some((first, rest)) = relative.split_first() else {
        return 0;
    };
    let before = inline_extent(&nodes[..(*first).min(nodes.len())]);
    let Some(target) = nodes.get(*first) else {
        return before;
    };

    if !rest.is_empty() {
        return before + offset_within(&target.children, rest, offset);
    }

    match &target.kind {
        NodeKind::Text { text } => before + offset.min(text.chars().count()),
        NodeKind::Mark { .. } => {
            before + inline_extent(&target.children[..offset.min(target.children.len())])
        }
        _ => before,
    }
}

pub fn position_at(tree: &DocumentTree, point: DocPoint) -> Option<Position> {
    let path = tree.text_blocks().get(point.block)?.clone();
    let block = tree.node(&path)?;
    let offset = point.offset.min(inline_extent(block.inline_children()));

    match locate(block, block.inline_children(), offset) {
        Ok(position) => Some(position),
        Err(_) => Some(Position {
            node: block.id(),
            offset: block.inline_len(),
        }),
    }
}

/// Finds the node holding flat `offset`, or returns how much is left over.
fn locate(parent: &Node, children: &[Node], offset: usize) -> Result<Position, usize> {
    let mut remaining = offset;
    for (index, child) in children.iter().enumerate() {
        match &child.kind {
            NodeKind::Text { text } => {
                let len = text.chars().count();
                if remaining <= len {
                    return Ok(Position {
                        node: child.id(),
                        offset: remaining,
                    });
                }
                remaining -= len;
            }
            NodeKind::LineBreak => {
                if remaining == 0 {
                    return Ok(Position {
                        node: parent.id(),
                        offset: index,
                    });
                }
                remaining -= 1;
            }
            NodeKind::Mark { .. } => match locate(child, &child.children, remaining) {
                Ok(position) => return Ok(position),
                Err(left) => remaining = left,
            },
            _ => {}
        }
    }
    Err(remaining)
}

pub fn selection_points(tree: &DocumentTree, selection: &Selection) -> Option<(DocPoint, DocPoint)> {
    Some((
        point_of(tree, &selection.anchor)?,
        point_of(tree, &selection.focus)?,
    ))
}

/// Selection points in document order.
pub(crate) fn ordered_points(
    tree: &DocumentTree,
    selection: &Selection,
) -> Option<(DocPoint, DocPoint)> {
    let (anchor, focus) = selection_points(tree, selection)?;
    Some((anchor.min(focus), anchor.max(focus)))
}

pub fn selection_from_points(
    tree: &DocumentTree,
    anchor: DocPoint,
    focus: DocPoint,
) -> Option<Selection> {
    Some(Selection {
        anchor: position_at(tree, anchor)?,
        focus: position_at(tree, focus)?,
    })
}
