//! Manual list creation for when the formatting primitive declines.

use crate::editing::document::points::{DocPoint, inline_extent};
use crate::editing::document::{DocumentTree, ListKind, Node, NodeKind};
use crate::editing::selection::Selection;

use super::{caret_at, enclosing_list_item};

/// Wraps the block holding the caret in a new single-item list of `kind`.
///
/// The block's inline content moves into the item and the caret is placed at
/// its end. Without a usable caret an empty list is appended to the document.
/// Does nothing when the caret is already inside a list item.
pub fn wrap_in_list(tree: &mut DocumentTree, selection: &mut Option<Selection>, kind: ListKind) -> bool {
    if selection
        .as_ref()
        .and_then(|selection| enclosing_list_item(tree, &selection.focus))
        .is_some()
    {
        return false;
    }

    let block_path = selection
        .as_ref()
        .and_then(|selection| tree.path_of(selection.focus.node))
        .and_then(|path| {
            tree.enclosing(&path, |node| {
                matches!(node.kind, NodeKind::Paragraph | NodeKind::Heading { .. })
            })
        });

    let mut list = Node::list(kind, vec![Node::list_item(Vec::new())]);
    let item_id = list.children[0].id();

    match block_path {
        Some(path) => {
            let Some(block) = tree.node_mut(&path) else {
                return false;
            };
            list.children[0].children = std::mem::take(&mut block.children);
            *block = list;
            log::debug!("Wrapped block at {path:?} in a {kind:?} list");
        }
        None => {
            tree.blocks.push(list);
            log::debug!("Appended an empty {kind:?} list");
        }
    }

    let caret = tree.text_block_index(item_id).and_then(|block| {
        let item = tree.node(&tree.text_block_path(block)?)?;
        caret_at(tree, DocPoint::new(block, inline_extent(item.inline_children())))
    });
    if caret.is_some() {
        *selection = caret;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::plain::from_plain_text;
    use crate::editing::document::points;
    use crate::editing::document::{HeadingLevel, InlineMark};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wraps_heading_content() {
        let mut tree = DocumentTree::from_blocks(vec![Node::heading(
            HeadingLevel::H2,
            vec![
                Node::mark(InlineMark::Bold, vec![Node::text("Big")]),
                Node::text(" news"),
            ],
        )]);
        let mut selection = points::selection_from_points(&tree, DocPoint::new(0, 1), DocPoint::new(0, 1));

        assert!(wrap_in_list(&mut tree, &mut selection, ListKind::Numbered));

        insta::assert_snapshot!(tree.outline(), @r#"
        numbered list
          item
            bold
              text "Big"
            text " news"
        "#);
        let focus = points::selection_points(&tree, &selection.unwrap()).unwrap().1;
        assert_eq!(focus, DocPoint::new(0, 8));
    }

    #[test]
    fn test_wraps_empty_paragraph() {
        let mut tree = DocumentTree::empty();
        let mut selection = points::selection_from_points(&tree, DocPoint::start(), DocPoint::start());

        assert!(wrap_in_list(&mut tree, &mut selection, ListKind::Bulleted));

        assert_eq!(
            tree,
            DocumentTree::from_blocks(vec![Node::list(
                ListKind::Bulleted,
                vec![Node::list_item(Vec::new())]
            )])
        );
        assert!(selection.is_some());
    }

    #[test]
    fn test_inside_list_item_is_noop() {
        let mut tree = DocumentTree::from_blocks(vec![Node::list(
            ListKind::Bulleted,
            vec![Node::list_item(vec![Node::text("item")])],
        )]);
        let before = tree.clone();
        let mut selection = points::selection_from_points(&tree, DocPoint::new(0, 2), DocPoint::new(0, 2));

        assert!(!wrap_in_list(&mut tree, &mut selection, ListKind::Numbered));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_stale_selection_appends_list() {
        let mut tree = from_plain_text("text");
        let other = from_plain_text("elsewhere");
        let mut selection = points::selection_from_points(&other, DocPoint::start(), DocPoint::start());

        assert!(wrap_in_list(&mut tree, &mut selection, ListKind::Bulleted));

        assert_eq!(tree.blocks().len(), 2);
        assert!(tree.blocks()[1].is_list());
        let focus = points::selection_points(&tree, &selection.unwrap()).unwrap().1;
        assert_eq!(focus, DocPoint::new(1, 0));
    }
}
