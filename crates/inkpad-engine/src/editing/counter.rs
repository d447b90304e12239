use serde::Serialize;

use crate::editing::document::DocumentTree;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct WordCount {
    pub words: usize,
    pub characters: usize,
}

/// Counts words and characters of the text as rendered: one line per text
/// block, line breaks included. Characters are Unicode scalar values.
pub fn count(tree: &DocumentTree) -> WordCount {
    count_text(&tree.rendered_text())
}

pub fn count_text(text: &str) -> WordCount {
    WordCount {
        words: text.split_whitespace().count(),
        characters: text.chars().count(),
    }
}
