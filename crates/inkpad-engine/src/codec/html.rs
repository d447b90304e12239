use crate::editing::document::{DocumentTree, InlineMark, ListKind, Node, NodeKind};

/// Renders the tree as HTML for previews and rich exports.
pub fn to_html(tree: &DocumentTree) -> String {
    let mut out = String::new();
    for block in tree.blocks() {
        write_node(block, &mut out);
    }
    out
}

fn write_node(node: &Node, out: &mut String) {
    match &node.kind {
        NodeKind::Text { text } => out.push_str(&html_escape::encode_text(text)),
        NodeKind::LineBreak => out.push_str("<br>"),
        NodeKind::Paragraph => write_block("p", node, out),
        NodeKind::Heading { level } => write_block(&format!("h{}", level.number()), node, out),
        NodeKind::ListItem => write_element("li", node, out),
        NodeKind::List { kind } => {
            let tag = match kind {
                ListKind::Bulleted => "ul",
                ListKind::Numbered => "ol",
            };
            write_element(tag, node, out);
        }
        NodeKind::Mark { mark } => {
            let tag = match mark {
                InlineMark::Bold => "strong",
                InlineMark::Italic => "em",
                InlineMark::Underline => "u",
            };
            write_element(tag, node, out);
        }
    }
}

fn write_element(tag: &str, node: &Node, out: &mut String) {
    out.push_str(&format!("<{tag}>"));
    for child in &node.children {
        write_node(child, out);
    }
    out.push_str(&format!("</{tag}>"));
}

/// Empty text blocks get a `<br>` so they keep their height when rendered.
fn write_block(tag: &str, node: &Node, out: &mut String) {
    if node.children.is_empty() {
        out.push_str(&format!("<{tag}><br></{tag}>"));
    } else {
        write_element(tag, node, out);
    }
}
