//! Flat view of a block's inline content.
//!
//! Nested mark wrappers are awkward to edit in place, so inline edits flatten
//! the block into a list of runs (a piece of text or a line break plus the set
//! of marks applied to it), edit the runs by character offset, and rebuild
//! canonical wrappers afterwards. A line break occupies one offset.

use std::collections::BTreeSet;

use super::{InlineMark, Node, NodeKind};

pub(crate) type MarkSet = BTreeSet<InlineMark>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Piece {
    Text(String),
    Break,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Run {
    pub piece: Piece,
    pub marks: MarkSet,
}

impl Run {
    fn len(&self) -> usize {
        match &self.piece {
            Piece::Text(text) => text.chars().count(),
            Piece::Break => 1,
        }
    }
}

pub(crate) fn flatten(inlines: &[Node]) -> Vec<Run> {
    fn walk(nodes: &[Node], marks: &MarkSet, out: &mut Vec<Run>) {
        for node in nodes {
            match &node.kind {
                NodeKind::Text { text } => out.push(Run {
                    piece: Piece::Text(text.clone()),
                    marks: marks.clone(),
                }),
                NodeKind::LineBreak => out.push(Run {
                    piece: Piece::Break,
                    marks: marks.clone(),
                }),
                NodeKind::Mark { mark } => {
                    let mut inner = marks.clone();
                    inner.insert(*mark);
                    walk(&node.children, &inner, out);
                }
                // Blocks never appear inside inline content
                _ => {}
            }
        }
    }

    let mut out = Vec::new();
    walk(inlines, &MarkSet::new(), &mut out);
    out
}

pub(crate) fn len(runs: &[Run]) -> usize {
    runs.iter().map(Run::len).sum()
}

/// Builds runs for inserted text, turning `\n` into line breaks.
pub(crate) fn from_text(text: &str, marks: &MarkSet) -> Vec<Run> {
    let mut out = Vec::new();
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            out.push(Run {
                piece: Piece::Break,
                marks: marks.clone(),
            });
        }
        if !line.is_empty() {
            out.push(Run {
                piece: Piece::Text(line.to_string()),
                marks: marks.clone(),
            });
        }
    }
    out
}

pub(crate) fn split_at(runs: Vec<Run>, offset: usize) -> (Vec<Run>, Vec<Run>) {
    let mut head = Vec::new();
    let mut tail = Vec::new();
    let mut remaining = offset;

    for run in runs {
        let run_len = run.len();
        if remaining >= run_len {
            remaining -= run_len;
            head.push(run);
        } else if remaining == 0 {
            tail.push(run);
        } else {
            // Only text runs can straddle the split point
            let Piece::Text(text) = &run.piece else {
                tail.push(run);
                continue;
            };
            let byte = text
                .char_indices()
                .nth(remaining)
                .map_or(text.len(), |(byte, _)| byte);
            head.push(Run {
                piece: Piece::Text(text[..byte].to_string()),
                marks: run.marks.clone(),
            });
            tail.push(Run {
                piece: Piece::Text(text[byte..].to_string()),
                marks: run.marks,
            });
            remaining = 0;
        }
    }

    (head, tail)
}

/// Splits runs into the parts before, inside and after `start..end`.
pub(crate) fn split_range(
    runs: Vec<Run>,
    start: usize,
    end: usize,
) -> (Vec<Run>, Vec<Run>, Vec<Run>) {
    let (head, rest) = split_at(runs, start);
    let (middle, tail) = split_at(rest, end.saturating_sub(start));
    (head, middle, tail)
}

/// Marks a character inserted at `offset` inherits: those of the text just
/// before the caret, or of the first run when the caret is at the start.
pub(crate) fn marks_at(runs: &[Run], offset: usize) -> MarkSet {
    let mut position = 0;
    let mut previous: Option<&Run> = None;
    for run in runs {
        if position >= offset {
            break;
        }
        position += run.len();
        previous = Some(run);
    }
    previous
        .or_else(|| runs.first())
        .map(|run| run.marks.clone())
        .unwrap_or_default()
}

/// Whether any text (not just line breaks) is present.
pub(crate) fn has_text(runs: &[Run]) -> bool {
    runs.iter()
        .any(|run| matches!(&run.piece, Piece::Text(text) if !text.is_empty()))
}

/// Whether every text run carries `mark`. Vacuously true without text.
pub(crate) fn all_marked(runs: &[Run], mark: InlineMark) -> bool {
    runs.iter()
        .filter(|run| matches!(run.piece, Piece::Text(_)))
        .all(|run| run.marks.contains(&mark))
}

pub(crate) fn set_mark(runs: &mut [Run], mark: InlineMark, on: bool) {
    for run in runs {
        if on {
            run.marks.insert(mark);
        } else {
            run.marks.remove(&mark);
        }
    }
}

/// Rebuilds inline nodes with canonically nested mark wrappers.
pub(crate) fn rebuild(runs: Vec<Run>) -> Vec<Node> {
    // Merge neighbours with identical marks and drop empty text first
    let mut merged: Vec<Run> = Vec::with_capacity(runs.len());
    for run in runs {
        if matches!(&run.piece, Piece::Text(text) if text.is_empty()) {
            continue;
        }
        if let Some(last) = merged.last_mut()
            && last.marks == run.marks
            && let (Piece::Text(existing), Piece::Text(text)) = (&mut last.piece, &run.piece)
        {
            existing.push_str(text);
            continue;
        }
        merged.push(run);
    }

    build(&merged, &MarkSet::new())
}

fn build(runs: &[Run], open: &MarkSet) -> Vec<Node> {
    let mut out = Vec::new();
    let mut index = 0;

    while index < runs.len() {
        let run = &runs[index];
        let Some(outer) = run.marks.difference(open).next().copied() else {
            out.push(match &run.piece {
                Piece::Text(text) => Node::text(text.clone()),
                Piece::Break => Node::line_break(),
            });
            index += 1;
            continue;
        };

        let group_end = runs[index..]
            .iter()
            .position(|candidate| !candidate.marks.contains(&outer))
            .map_or(runs.len(), |offset| index + offset);

        let mut inner_open = open.clone();
        inner_open.insert(outer);
        out.push(Node::mark(outer, build(&runs[index..group_end], &inner_open)));
        index = group_end;
    }

    out
}
