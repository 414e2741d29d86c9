//! Flattening an inline scope into segments and writing results back.
//!
//! [`collect`] and [`replace`] visit leaves in the same depth-first order and
//! every leaf yields exactly one segment, so the n-th replacement belongs to
//! the n-th leaf.

use crate::ast::Node;

pub(super) struct Segment {
    pub(super) text: String,
    pub(super) mutable: bool,
}

impl Segment {
    pub(super) fn mutable(text: &str) -> Self {
        Self {
            text: text.to_string(),
            mutable: true,
        }
    }

    pub(super) fn immutable(text: String) -> Self {
        Self {
            text,
            mutable: false,
        }
    }
}

/// Append one segment per leaf under `nodes`. Link destinations and emphasis
/// delimiters are not leaves and contribute nothing.
pub(super) fn collect(nodes: &[Node], out: &mut Vec<Segment>) {
    for node in nodes {
        if let Some(children) = node.children() {
            collect(children, out);
            continue;
        }
        out.push(match node {
            Node::RawText(text) => Segment::mutable(text),
            Node::CodeSpan { ticks, code } => {
                let fence = "`".repeat(*ticks);
                Segment::immutable(format!("{fence}{code}{fence}"))
            }
            Node::Escaped(ch) => Segment::immutable(format!("\\{ch}")),
            Node::HtmlInline(text)
            | Node::TemplateTag(text)
            | Node::FootnoteReference(text)
            | Node::Autolink(text) => Segment::immutable(text.clone()),
            Node::LineBreak { .. } => Segment::immutable("\n".to_string()),
            _ => Segment::immutable(String::new()),
        });
    }
}

/// Replace raw text leaves under `nodes` with the matching rewritten
/// segments. `None` leaves a leaf unchanged.
pub(super) fn replace(nodes: &mut [Node], rewritten: &mut impl Iterator<Item = Option<String>>) {
    for node in nodes {
        if let Some(children) = node.children_mut() {
            replace(children, rewritten);
            continue;
        }
        if let Some(text) = rewritten.next().flatten()
            && let Node::RawText(raw) = node
        {
            *raw = text;
        }
    }
}
