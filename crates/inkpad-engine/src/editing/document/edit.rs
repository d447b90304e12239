//! Text-level mutations shared by the session and the formatting primitive.

use super::points::{DocPoint, inline_extent};
use super::runs::{self, Run};
use super::{DocumentTree, Node, NodeKind, NodePath};

impl DocumentTree {
    pub(crate) fn block_runs(&self, path: &[usize]) -> Vec<Run> {
        self.node(path)
            .map(|block| runs::flatten(block.inline_children()))
            .unwrap_or_default()
    }

    /// Replaces a text block's inline content, keeping any nested lists.
    pub(crate) fn set_block_runs(&mut self, path: &[usize], content: Vec<Run>) {
        if let Some(block) = self.node_mut(path) {
            let nested = block.children.split_off(block.inline_len());
            block.children = runs::rebuild(content);
            block.children.extend(nested);
        }
    }

    pub(crate) fn text_block_path(&self, block: usize) -> Option<NodePath> {
        self.text_blocks().get(block).cloned()
    }
}

/// Deletes everything between two points. Blocks after the first one that end
/// up empty are removed and their tail text is joined onto the first block.
pub(crate) fn delete_range(tree: &mut DocumentTree, from: DocPoint, to: DocPoint) -> bool {
    let (start, end) = (from.min(to), from.max(to));
    if start == end {
        return false;
    }

    let blocks = tree.text_blocks();
    let (Some(start_path), Some(end_path)) = (blocks.get(start.block), blocks.get(end.block))
    else {
        return false;
    };

    if start.block == end.block {
        let content = tree.block_runs(start_path);
        let end_offset = end.offset.min(runs::len(&content));
        let start_offset = start.offset.min(end_offset);
        if start_offset == end_offset {
            return false;
        }
        let (mut head, _, tail) = runs::split_range(content, start_offset, end_offset);
        head.extend(tail);
        tree.set_block_runs(start_path, head);
        return true;
    }

    let (_, tail) = runs::split_at(tree.block_runs(end_path), end.offset);

    // Last first, so the paths of earlier blocks stay valid
    for path in blocks[start.block + 1..=end.block].iter().rev() {
        tree.set_block_runs(path, Vec::new());
        if tree.node(path).is_some_and(|node| node.children.is_empty()) {
            tree.remove(path);
        }
    }

    let (mut head, _) = runs::split_at(tree.block_runs(start_path), start.offset);
    head.extend(tail);
    tree.set_block_runs(start_path, head);
    tree.prune_empty_lists();
    true
}

/// Inserts text at a point, inheriting the marks of the text before it.
/// Returns the caret position after the inserted text.
pub(crate) fn insert_text(tree: &mut DocumentTree, at: DocPoint, text: &str) -> Option<DocPoint> {
    let path = tree.text_block_path(at.block)?;
    let content = tree.block_runs(&path);
    let offset = at.offset.min(runs::len(&content));

    let inserted = runs::from_text(text, &runs::marks_at(&content, offset));
    let added = runs::len(&inserted);

    let (mut head, tail) = runs::split_at(content, offset);
    head.extend(inserted);
    head.extend(tail);
    tree.set_block_runs(&path, head);

    Some(DocPoint::new(at.block, offset + added))
}

/// Splits a paragraph or heading in two at `at`. The second half keeps a
/// heading's level unless it is empty. Returns the start of the new block.
pub(crate) fn split_block(tree: &mut DocumentTree, at: DocPoint) -> Option<DocPoint> {
    let path = tree.text_block_path(at.block)?;
    let kind = tree.node(&path)?.kind.clone();
    if !matches!(kind, NodeKind::Paragraph | NodeKind::Heading { .. }) {
        return None;
    }

    let (head, tail) = runs::split_at(tree.block_runs(&path), at.offset);
    let tail_kind = if runs::len(&tail) == 0 {
        NodeKind::Paragraph
    } else {
        kind
    };

    tree.set_block_runs(&path, head);
    let new_block = Node::new(tail_kind, runs::rebuild(tail));
    let new_id = new_block.id();

    let mut new_path = path;
    if let Some(last) = new_path.last_mut() {
        *last += 1;
    }
    tree.insert(&new_path, new_block);

    Some(DocPoint::new(tree.text_block_index(new_id)?, 0))
}

/// Splits a list item in two at `at`; the new item follows it in the same list
/// and any nested lists stay with the original. Returns the new item's start.
pub(crate) fn split_list_item(tree: &mut DocumentTree, at: DocPoint) -> Option<DocPoint> {
    let path = tree.text_block_path(at.block)?;
    if !tree.node(&path)?.is_list_item() {
        return None;
    }

    let (head, tail) = runs::split_at(tree.block_runs(&path), at.offset);
    tree.set_block_runs(&path, head);

    let new_item = Node::list_item(runs::rebuild(tail));
    let new_id = new_item.id();
    let mut new_path = path;
    if let Some(last) = new_path.last_mut() {
        *last += 1;
    }
    tree.insert(&new_path, new_item);

    Some(DocPoint::new(tree.text_block_index(new_id)?, 0))
}

/// End of a text block's inline content.
pub(crate) fn end_of_block(tree: &DocumentTree, block: usize) -> Option<DocPoint> {
    let path = tree.text_block_path(block)?;
    let node = tree.node(&path)?;
    Some(DocPoint::new(block, inline_extent(node.inline_children())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::plain::from_plain_text;
    use crate::editing::document::{HeadingLevel, InlineMark, ListKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_delete_within_block() {
        let mut tree = from_plain_text("Hello world");

        assert!(delete_range(&mut tree, DocPoint::new(0, 5), DocPoint::new(0, 11)));

        assert_eq!(tree.rendered_text(), "Hello");
    }

    #[test]
    fn test_delete_empty_range_is_noop() {
        let mut tree = from_plain_text("Hello");

        assert!(!delete_range(&mut tree, DocPoint::new(0, 2), DocPoint::new(0, 2)));
        assert!(!delete_range(&mut tree, DocPoint::new(0, 9), DocPoint::new(0, 12)));
    }

    #[test]
    fn test_delete_across_blocks_joins_tail() {
        let mut tree = from_plain_text("first\n\nsecond\n\nthird");

        assert!(delete_range(&mut tree, DocPoint::new(2, 2), DocPoint::new(0, 3)));

        assert_eq!(tree.blocks().len(), 1);
        assert_eq!(tree.rendered_text(), "firird");
    }

    #[test]
    fn test_delete_across_list_prunes_empty_list() {
        let mut tree = DocumentTree::from_blocks(vec![
            Node::paragraph(vec![Node::text("intro")]),
            Node::list(
                ListKind::Bulleted,
                vec![Node::list_item(vec![Node::text("item")])],
            ),
        ]);

        assert!(delete_range(&mut tree, DocPoint::new(0, 5), DocPoint::new(1, 0)));

        assert_eq!(
            tree,
            DocumentTree::from_blocks(vec![Node::paragraph(vec![Node::text("introitem")])])
        );
    }

    #[test]
    fn test_insert_inherits_marks() {
        let mut tree = DocumentTree::from_blocks(vec![Node::paragraph(vec![
            Node::mark(InlineMark::Bold, vec![Node::text("Hi")]),
            Node::text(" there"),
        ])]);

        let caret = insert_text(&mut tree, DocPoint::new(0, 2), "!!").unwrap();

        assert_eq!(caret, DocPoint::new(0, 4));
        assert_eq!(
            tree.blocks()[0].children[0],
            Node::mark(InlineMark::Bold, vec![Node::text("Hi!!")])
        );
    }

    #[test]
    fn test_insert_into_empty_paragraph() {
        let mut tree = DocumentTree::empty();

        let caret = insert_text(&mut tree, DocPoint::start(), "a\nb").unwrap();

        assert_eq!(caret, DocPoint::new(0, 3));
        assert_eq!(
            tree.blocks()[0].children,
            vec![Node::text("a"), Node::line_break(), Node::text("b")]
        );
    }

    #[test]
    fn test_split_heading_keeps_level_for_nonempty_tail() {
        let mut tree =
            DocumentTree::from_blocks(vec![Node::heading(HeadingLevel::H2, vec![Node::text("Title")])]);

        let caret = split_block(&mut tree, DocPoint::new(0, 2)).unwrap();

        assert_eq!(caret, DocPoint::new(1, 0));
        assert_eq!(
            tree,
            DocumentTree::from_blocks(vec![
                Node::heading(HeadingLevel::H2, vec![Node::text("Ti")]),
                Node::heading(HeadingLevel::H2, vec![Node::text("tle")]),
            ])
        );
    }

    #[test]
    fn test_split_heading_at_end_starts_paragraph() {
        let mut tree =
            DocumentTree::from_blocks(vec![Node::heading(HeadingLevel::H1, vec![Node::text("Title")])]);

        split_block(&mut tree, DocPoint::new(0, 5)).unwrap();

        assert_eq!(tree.blocks()[1], Node::paragraph(Vec::new()));
    }

    #[test]
    fn test_split_list_item() {
        let mut tree = DocumentTree::from_blocks(vec![Node::list(
            ListKind::Numbered,
            vec![Node::list_item(vec![Node::text("onetwo")])],
        )]);

        let caret = split_list_item(&mut tree, DocPoint::new(0, 3)).unwrap();

        assert_eq!(caret, DocPoint::new(1, 0));
        assert_eq!(
            tree.blocks()[0].children,
            vec![
                Node::list_item(vec![Node::text("one")]),
                Node::list_item(vec![Node::text("two")]),
            ]
        );
    }
}
