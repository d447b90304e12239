//! Flat persisted text <-> document tree.
//!
//! The flat format is what the persistence collaborator stores. It is lossy:
//! marks and heading levels do not survive a trip through it, and lists come
//! back as paragraphs of bullet lines.

use regex::Regex;
use std::sync::OnceLock;

use crate::editing::document::{DocumentTree, Node, NodeKind};

/// Prefix written in front of every list item.
pub const BULLET_MARKER: &str = "• ";

fn excess_newlines() -> &'static Regex {
    static EXCESS_NEWLINES: OnceLock<Regex> = OnceLock::new();
    EXCESS_NEWLINES.get_or_init(|| Regex::new(r"\n{3,}").expect("Invalid newline regex"))
}

fn blank_lines() -> &'static Regex {
    static BLANK_LINES: OnceLock<Regex> = OnceLock::new();
    BLANK_LINES.get_or_init(|| Regex::new(r"\n(?:[ \t]*\n)+").expect("Invalid blank line regex"))
}

pub fn to_plain_text(tree: &DocumentTree) -> String {
    let joined = tree
        .blocks()
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n\n");

    excess_newlines().replace_all(&joined, "\n\n").into_owned()
}

fn render_block(block: &Node) -> String {
    let mut out = String::new();
    match block.kind {
        NodeKind::List { .. } => render_items(block, &mut out),
        _ => block.push_inline_text(&mut out),
    }
    out
}

fn render_items(list: &Node, out: &mut String) {
    for item in &list.children {
        out.push_str(BULLET_MARKER);
        item.push_inline_text(out);
        out.push('\n');
        for nested in item.children.iter().filter(|child| child.is_list()) {
            render_items(nested, out);
        }
    }
}

/// Parses flat text into paragraphs. Blank input yields the single empty
/// paragraph tree so there is always somewhere to put the caret.
pub fn from_plain_text(text: &str) -> DocumentTree {
    let normalized = text.replace("\r\n", "\n");
    let blocks = blank_lines()
        .split(&normalized)
        .filter(|chunk| !chunk.trim().is_empty())
        .map(paragraph_from_chunk)
        .collect();

    DocumentTree::from_blocks(blocks)
}

fn paragraph_from_chunk(chunk: &str) -> Node {
    let mut children = Vec::new();
    for (index, line) in chunk.split('\n').enumerate() {
        if index > 0 {
            children.push(Node::line_break());
        }
        if !line.is_empty() {
            children.push(Node::text(line));
        }
    }
    Node::paragraph(children)
}
