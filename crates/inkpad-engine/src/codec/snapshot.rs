//! Rich content snapshots.
//!
//! A snapshot is the JSON encoding of the tree's blocks without node
//! identities. History checkpoints compare snapshots as strings, and hosts
//! keep the latest one to rehydrate the editor after a remount.

use serde::{Deserialize, Serialize};

use crate::editing::document::{DocumentTree, Node, NodeKind};
use crate::error::{EditorError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentSnapshot(String);

impl ContentSnapshot {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for ContentSnapshot {
    fn from(encoded: String) -> Self {
        Self(encoded)
    }
}

impl DocumentTree {
    pub fn snapshot(&self) -> Result<ContentSnapshot> {
        serde_json::to_string(&self.blocks)
            .map(ContentSnapshot)
            .map_err(EditorError::SnapshotEncode)
    }

    /// Rebuilds a tree from a snapshot. Nodes get fresh identities.
    pub fn from_snapshot(snapshot: &ContentSnapshot) -> Result<Self> {
        let blocks: Vec<Node> =
            serde_json::from_str(snapshot.as_str()).map_err(EditorError::SnapshotDecode)?;
        check_blocks(&blocks)?;
        Ok(Self::from_blocks(blocks))
    }
}

fn check_blocks(blocks: &[Node]) -> Result<()> {
    for block in blocks {
        match block.kind {
            NodeKind::Paragraph | NodeKind::Heading { .. } | NodeKind::List { .. } => {
                check_node(block)?
            }
            _ => return Err(malformed(block, "top level")),
        }
    }
    Ok(())
}

fn check_node(node: &Node) -> Result<()> {
    match node.kind {
        NodeKind::Text { .. } | NodeKind::LineBreak => {
            if !node.children.is_empty() {
                return Err(malformed(&node.children[0], "a leaf"));
            }
        }
        NodeKind::Paragraph | NodeKind::Heading { .. } | NodeKind::Mark { .. } => {
            if let Some(child) = node.children.iter().find(|child| child.is_block()) {
                return Err(malformed(child, "inline content"));
            }
        }
        NodeKind::List { .. } => {
            if node.children.is_empty() {
                return Err(EditorError::MalformedSnapshot(format!(
                    "{:?} has no items",
                    node.kind
                )));
            }
            if let Some(child) = node.children.iter().find(|child| !child.is_list_item()) {
                return Err(malformed(child, "a list"));
            }
        }
        NodeKind::ListItem => {
            // Inline content first, then nested lists only
            let inline = node.inline_len();
            if let Some(child) = node.children[inline..].iter().find(|child| !child.is_list()) {
                return Err(malformed(child, "a list item"));
            }
        }
    }
    node.children.iter().try_for_each(check_node)
}

fn malformed(node: &Node, context: &str) -> EditorError {
    EditorError::MalformedSnapshot(format!("{:?} is not allowed in {context}", node.kind))
}
