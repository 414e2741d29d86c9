//! Markdown parsing into [`Node`] trees.
//!
//! The block parser works line by line, recursing into blockquotes, list
//! items and footnote definitions with their prefixes stripped. Paragraph and
//! heading text is handed to the inline parser, which keeps source text
//! verbatim so that rendering never has to re-escape it. Nothing here fails:
//! constructs that do not close are ordinary text.

mod block;
mod inline;

pub use inline::parse_inlines;
use tracing::debug;

use crate::ast::Node;

/// Parse a Markdown document.
///
/// ```
/// use mdreflow::{ast::Node, parse::parse_document};
///
/// let Node::Document(blocks) = parse_document("# Title\n\nBody text.\n") else {
///     unreachable!();
/// };
/// assert_eq!(blocks.len(), 2);
/// ```
#[must_use]
pub fn parse_document(text: &str) -> Node {
    let lines: Vec<String> = text.lines().map(expand_leading_tabs).collect();
    let (blocks, _) = block::parse_blocks(&lines);
    debug!(lines = lines.len(), blocks = blocks.len(), "parsed document");
    Node::Document(blocks)
}

/// Replace tabs in a line's leading whitespace with spaces up to the next
/// multiple of four columns.
fn expand_leading_tabs(line: &str) -> String {
    let body = line.trim_start_matches([' ', '\t']);
    let lead = &line[..line.len() - body.len()];
    if !lead.contains('\t') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + 8);
    let mut column = 0;
    for ch in lead.chars() {
        if ch == '\t' {
            let next = (column / 4 + 1) * 4;
            out.extend(std::iter::repeat_n(' ', next - column));
            column = next;
        } else {
            out.push(' ');
            column += 1;
        }
    }
    out.push_str(body);
    out
}

/// Number of leading spaces.
fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
