//! Structured document tree edited by the session.
//!
//! The tree is an ordered list of top-level blocks. Blocks are paragraphs,
//! headings, lists and list items; inline content is text runs, mark wrappers
//! (bold/italic/underline) and explicit line breaks. Every node carries a
//! [`NodeId`] that identifies it for the lifetime of *this* tree only: the id
//! is not serialized, so a tree rebuilt from a snapshot gets fresh ids. Code
//! that must survive reconstruction addresses nodes by path instead (see
//! [`crate::editing::selection::SelectionLocator`]).

pub(crate) mod edit;
pub mod points;
pub(crate) mod runs;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EditorError;

/// Child-index path from the root of the tree to a node.
pub type NodePath = Vec<usize>;

/// Identity of a node within one live tree.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn number(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = EditorError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(HeadingLevel::H1),
            2 => Ok(HeadingLevel::H2),
            3 => Ok(HeadingLevel::H3),
            other => Err(EditorError::InvalidHeadingLevel(other)),
        }
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.number()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Bulleted,
    Numbered,
}

/// Inline formatting wrapper. The declaration order is the canonical nesting
/// order used when inline content is rebuilt (bold outermost).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InlineMark {
    Bold,
    Italic,
    Underline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Paragraph,
    Heading { level: HeadingLevel },
    List { kind: ListKind },
    ListItem,
    Text { text: String },
    Mark { mark: InlineMark },
    LineBreak,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    #[serde(skip, default)]
    id: NodeId,
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        // Identity is excluded so a tree rebuilt from a snapshot equals the original
        self.kind == other.kind && self.children == other.children
    }
}

impl Node {
    pub fn new(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            id: NodeId::new(),
            kind,
            children,
        }
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Paragraph, children)
    }

    pub fn heading(level: HeadingLevel, children: Vec<Node>) -> Self {
        Self::new(NodeKind::Heading { level }, children)
    }

    pub fn list(kind: ListKind, items: Vec<Node>) -> Self {
        Self::new(NodeKind::List { kind }, items)
    }

    pub fn list_item(children: Vec<Node>) -> Self {
        Self::new(NodeKind::ListItem, children)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Text { text: text.into() }, Vec::new())
    }

    pub fn mark(mark: InlineMark, children: Vec<Node>) -> Self {
        Self::new(NodeKind::Mark { mark }, children)
    }

    pub fn line_break() -> Self {
        Self::new(NodeKind::LineBreak, Vec::new())
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn is_block(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Paragraph | NodeKind::Heading { .. } | NodeKind::List { .. } | NodeKind::ListItem
        )
    }

    pub fn is_inline(&self) -> bool {
        !self.is_block()
    }

    /// Paragraphs, headings and list items: the blocks that hold inline content.
    pub fn is_text_block(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Paragraph | NodeKind::Heading { .. } | NodeKind::ListItem
        )
    }

    pub fn is_list(&self) -> bool {
        matches!(self.kind, NodeKind::List { .. })
    }

    pub fn is_list_item(&self) -> bool {
        matches!(self.kind, NodeKind::ListItem)
    }

    pub fn list_kind(&self) -> Option<ListKind> {
        match self.kind {
            NodeKind::List { kind } => Some(kind),
            _ => None,
        }
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Largest valid selection offset: characters for a text run, children
    /// for everything else.
    pub fn extent(&self) -> usize {
        match &self.kind {
            NodeKind::Text { text } => text.chars().count(),
            _ => self.children.len(),
        }
    }

    /// Number of leading inline children. A list item may be followed by
    /// nested lists, which are not part of its inline content.
    pub fn inline_len(&self) -> usize {
        self.children
            .iter()
            .position(|child| child.is_block())
            .unwrap_or(self.children.len())
    }

    pub fn inline_children(&self) -> &[Node] {
        &self.children[..self.inline_len()]
    }

    /// Appends the visible text of inline content, line breaks as `\n`.
    pub(crate) fn push_inline_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text { text } => out.push_str(text),
            NodeKind::LineBreak => out.push('\n'),
            _ => {
                for child in self.inline_children() {
                    child.push_inline_text(out);
                }
            }
        }
    }

    fn find_path(&self, id: NodeId, path: &mut NodePath) -> bool {
        for (index, child) in self.children.iter().enumerate() {
            path.push(index);
            if child.id == id || child.find_path(id, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    fn write_outline(&self, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        let label = match &self.kind {
            NodeKind::Paragraph => "paragraph".to_string(),
            NodeKind::Heading { level } => format!("heading {}", level.number()),
            NodeKind::List { kind: ListKind::Bulleted } => "bulleted list".to_string(),
            NodeKind::List { kind: ListKind::Numbered } => "numbered list".to_string(),
            NodeKind::ListItem => "item".to_string(),
            NodeKind::Text { text } => format!("text {text:?}"),
            NodeKind::Mark { mark } => format!("{mark:?}").to_lowercase(),
            NodeKind::LineBreak => "break".to_string(),
        };
        out.push_str(&indent);
        out.push_str(&label);
        out.push('\n');
        for child in &self.children {
            child.write_outline(depth + 1, out);
        }
    }
}

/// The editable document: an ordered list of top-level blocks, never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTree {
    pub(crate) blocks: Vec<Node>,
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::empty()
    }
}

impl DocumentTree {
    /// A tree holding exactly one empty paragraph, the minimal caret target.
    pub fn empty() -> Self {
        Self {
            blocks: vec![Node::paragraph(Vec::new())],
        }
    }

    pub fn from_blocks(blocks: Vec<Node>) -> Self {
        let mut tree = Self { blocks };
        tree.ensure_caret_target();
        tree
    }

    pub fn blocks(&self) -> &[Node] {
        &self.blocks
    }

    /// Appends an empty paragraph when no block can hold the caret.
    pub(crate) fn ensure_caret_target(&mut self) {
        if self.text_blocks().is_empty() {
            self.blocks.push(Node::paragraph(Vec::new()));
        }
    }

    pub fn node(&self, path: &[usize]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.blocks.get(*first)?;
        for index in rest {
            node = node.children.get(*index)?;
        }
        Some(node)
    }

    pub fn node_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.blocks.get_mut(*first)?;
        for index in rest {
            node = node.children.get_mut(*index)?;
        }
        Some(node)
    }

    /// Children of the node at `parent`, or the top-level blocks for an empty path.
    pub(crate) fn children_mut(&mut self, parent: &[usize]) -> Option<&mut Vec<Node>> {
        if parent.is_empty() {
            Some(&mut self.blocks)
        } else {
            self.node_mut(parent).map(|node| &mut node.children)
        }
    }

    pub fn path_of(&self, id: NodeId) -> Option<NodePath> {
        let mut path = Vec::new();
        for (index, block) in self.blocks.iter().enumerate() {
            path.push(index);
            if block.id == id || block.find_path(id, &mut path) {
                return Some(path);
            }
            path.pop();
        }
        None
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.path_of(id).is_some()
    }

    /// Paths of every text block in document order.
    pub fn text_blocks(&self) -> Vec<NodePath> {
        fn walk(nodes: &[Node], prefix: &mut NodePath, out: &mut Vec<NodePath>) {
            for (index, node) in nodes.iter().enumerate() {
                if !node.is_block() {
                    continue;
                }
                prefix.push(index);
                if node.is_text_block() {
                    out.push(prefix.clone());
                }
                walk(&node.children, prefix, out);
                prefix.pop();
            }
        }

        let mut out = Vec::new();
        walk(&self.blocks, &mut Vec::new(), &mut out);
        out
    }

    /// Index (in [`DocumentTree::text_blocks`] order) of the text block with `id`.
    pub fn text_block_index(&self, id: NodeId) -> Option<usize> {
        let path = self.path_of(id)?;
        self.text_blocks().iter().position(|candidate| *candidate == path)
    }

    /// Nearest ancestor-or-self of `path` matching `predicate`.
    pub(crate) fn enclosing(
        &self,
        path: &[usize],
        predicate: impl Fn(&Node) -> bool,
    ) -> Option<NodePath> {
        (1..=path.len())
            .rev()
            .map(|len| &path[..len])
            .find(|candidate| self.node(candidate).is_some_and(&predicate))
            .map(<[usize]>::to_vec)
    }

    pub(crate) fn remove(&mut self, path: &[usize]) -> Option<Node> {
        let (last, parent) = path.split_last()?;
        let siblings = self.children_mut(parent)?;
        (*last < siblings.len()).then(|| siblings.remove(*last))
    }

    pub(crate) fn insert(&mut self, path: &[usize], node: Node) -> bool {
        let Some((last, parent)) = path.split_last() else {
            return false;
        };
        match self.children_mut(parent) {
            Some(siblings) if *last <= siblings.len() => {
                siblings.insert(*last, node);
                true
            }
            _ => false,
        }
    }

    /// Removes lists left without items, innermost first.
    pub(crate) fn prune_empty_lists(&mut self) {
        fn prune(nodes: &mut Vec<Node>) {
            for node in nodes.iter_mut() {
                prune(&mut node.children);
            }
            nodes.retain(|node| !(node.is_list() && node.children.is_empty()));
        }

        prune(&mut self.blocks);
        self.ensure_caret_target();
    }

    /// Text as it is rendered on screen: inline text with line breaks, one
    /// line per text block.
    pub fn rendered_text(&self) -> String {
        let mut out = String::new();
        for (index, path) in self.text_blocks().iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            if let Some(block) = self.node(path) {
                block.push_inline_text(&mut out);
            }
        }
        out
    }

    /// Indented one-node-per-line rendering of the tree, used in tests and logs.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            block.write_outline(0, &mut out);
        }
        out
    }
}
