//! Serialising the document tree back to Markdown.
//!
//! Every block is rendered with two prefixes: one for its first line and one
//! for the lines after it. Containers extend both prefixes for their
//! children, so a paragraph inside a list item inside a blockquote wraps with
//! `"> - "` on its first line and `">   "` on the rest.

use tracing::trace;
use unicode_width::UnicodeWidthStr;

use crate::{
    ast::{Alignment, CodeBlock, List, ListKind, Node, Table},
    config::FormatOptions,
    wrap::{WrapSettings, wrap_segments},
};

/// Render `root` to Markdown text ending in a single newline, or to an empty
/// string when there is nothing to render.
///
/// ```
/// use mdreflow::{FormatOptions, parse::parse_document, render::render_document};
///
/// let doc = parse_document("Title\n=====\n\n* one\n* two\n");
/// let out = render_document(&doc, &FormatOptions::default());
/// assert_eq!(out, "# Title\n\n- one\n- two\n");
/// ```
#[must_use]
pub fn render_document(root: &Node, options: &FormatOptions) -> String {
    let renderer = Renderer { options };
    let blocks = match root {
        Node::Document(blocks) => blocks.as_slice(),
        other => std::slice::from_ref(other),
    };
    let lines = renderer.blocks(blocks, "", "", false);
    trace!(blocks = blocks.len(), lines = lines.len(), "rendered document");
    if lines.is_empty() {
        return String::new();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

struct Renderer<'a> {
    options: &'a FormatOptions,
}

/// What a block needs to know about its preceding siblings.
#[derive(Clone, Copy)]
struct Context {
    /// The block directly follows a paragraph with no blank line between.
    follows_paragraph: bool,
    /// Marker for a bullet list in this position.
    bullet: char,
}

impl Renderer<'_> {
    /// Render sibling blocks. Loose siblings are separated by a blank line;
    /// tight ones follow each other directly.
    fn blocks(&self, blocks: &[Node], first: &str, rest: &str, tight: bool) -> Vec<String> {
        let mut lines = Vec::new();
        let mut previous: Option<&Node> = None;
        // Consecutive bullet lists alternate markers so they stay separate
        // lists on re-parse.
        let mut bullet_lists = 0usize;
        for block in blocks {
            let prefix = if previous.is_none() { first } else { rest };
            if previous.is_some() && !tight {
                lines.push(rest.trim_end().to_string());
            }
            let context = Context {
                follows_paragraph: tight && matches!(previous, Some(Node::Paragraph(_))),
                bullet: if bullet_lists % 2 == 0 { '-' } else { '*' },
            };
            lines.extend(self.block(block, context, prefix, rest));
            bullet_lists = match block {
                Node::List(List {
                    kind: ListKind::Bullet(_),
                    ..
                }) => bullet_lists + 1,
                _ => 0,
            };
            previous = Some(block);
        }
        lines
    }

    fn block(&self, node: &Node, context: Context, first: &str, rest: &str) -> Vec<String> {
        match node {
            Node::Paragraph(children) => self.paragraph(children, first, rest),
            Node::Heading { level, children } => {
                let hashes = "#".repeat(usize::from(*level));
                let text = inline_line(children);
                vec![trimmed(format!("{first}{hashes} {text}"))]
            }
            Node::ThematicBreak => {
                // `- ---` re-parses as a thematic break and `---` directly under
                // a paragraph as a setext underline.
                let rule = if first.ends_with("- ") || context.follows_paragraph {
                    "***"
                } else {
                    "---"
                };
                vec![format!("{first}{rule}")]
            }
            Node::Blockquote(children) => {
                let quoted_first = format!("{first}> ");
                let lines = self.blocks(children, &quoted_first, &format!("{rest}> "), false);
                if lines.is_empty() {
                    vec![format!("{first}>")]
                } else {
                    lines
                }
            }
            Node::List(list) => self.list(list, context.bullet, first, rest),
            Node::ListItem(item) => self.blocks(&item.children, first, rest, true),
            Node::FootnoteDefinition { label, children } => {
                let head = format!("{first}[^{label}]: ");
                let lines = self.blocks(children, &head, &format!("{rest}    "), false);
                if lines.is_empty() {
                    vec![head.trim_end().to_string()]
                } else {
                    lines
                }
            }
            Node::FencedCode(code) => code_block(code, first, rest),
            Node::HtmlBlock(lines) => lines
                .iter()
                .enumerate()
                .map(|(idx, line)| {
                    let prefix = if idx == 0 { first } else { rest };
                    trimmed(format!("{prefix}{line}"))
                })
                .collect(),
            Node::LinkReference(text) => vec![format!("{first}{text}")],
            Node::Table(table) => table_lines(table, first, rest),
            Node::Document(children) => self.blocks(children, first, rest, false),
            inline => {
                let text = inline_line(std::slice::from_ref(inline));
                vec![trimmed(format!("{first}{text}"))]
            }
        }
    }

    fn paragraph(&self, children: &[Node], first: &str, rest: &str) -> Vec<String> {
        let segments = inline_segments(children);
        let settings = WrapSettings {
            width: self.options.width,
            initial_indent: first,
            subsequent_indent: rest,
            break_mode: self.options.break_mode,
            min_line_len: self.options.min_line_len,
        };
        wrap_segments(&segments, &settings)
    }

    fn list(&self, list: &List, bullet: char, first: &str, rest: &str) -> Vec<String> {
        let mut lines = Vec::new();
        for (idx, node) in list.items.iter().enumerate() {
            let Node::ListItem(item) = node else {
                continue;
            };
            let marker = match list.kind {
                ListKind::Bullet(_) => bullet.to_string(),
                ListKind::Ordered { start, delimiter } => {
                    format!("{}{delimiter}", start.saturating_add(idx as u64))
                }
            };
            let lead = if idx == 0 { first } else { rest };
            if idx > 0 && !list.tight {
                lines.push(rest.trim_end().to_string());
            }
            let task = item.task.map(|state| format!("[{state}] ")).unwrap_or_default();
            let item_first = format!("{lead}{marker} {task}");
            let item_rest = format!("{rest}{}", " ".repeat(marker.len() + 1));
            let body = self.blocks(&item.children, &item_first, &item_rest, list.tight);
            if body.is_empty() {
                lines.push(item_first.trim_end().to_string());
            } else {
                lines.extend(body);
            }
        }
        lines
    }
}

fn trimmed(mut line: String) -> String {
    line.truncate(line.trim_end().len());
    line
}

fn code_block(code: &CodeBlock, first: &str, rest: &str) -> Vec<String> {
    let mut lines = Vec::with_capacity(code.lines.len() + 2);
    lines.push(trimmed(format!("{first}{}{}", code.fence, code.info)));
    for line in &code.lines {
        if line.is_empty() {
            lines.push(rest.trim_end().to_string());
        } else {
            lines.push(format!("{rest}{line}"));
        }
    }
    lines.push(format!("{rest}{}", code.fence));
    lines
}

fn separator_cell(alignment: Alignment, width: usize) -> String {
    let mut dashes = "-".repeat(width);
    if matches!(alignment, Alignment::Left | Alignment::Center) {
        dashes.replace_range(..1, ":");
    }
    if matches!(alignment, Alignment::Right | Alignment::Center) {
        dashes.pop();
        dashes.push(':');
    }
    dashes
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(cell));
    format!("{cell}{}", " ".repeat(fill))
}

fn table_lines(table: &Table, first: &str, rest: &str) -> Vec<String> {
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            row.children()
                .unwrap_or_default()
                .iter()
                .map(|cell| inline_line(cell.children().unwrap_or_default()))
                .collect()
        })
        .collect();
    let mut widths = vec![3; table.alignments.len()];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(UnicodeWidthStr::width(cell.as_str()));
        }
    }
    let format_row =
        |prefix: &str, cells: Vec<String>| trimmed(format!("{prefix}| {} |", cells.join(" | ")));
    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (idx, row) in rows.iter().enumerate() {
        let prefix = if idx == 0 { first } else { rest };
        let cells = widths
            .iter()
            .enumerate()
            .map(|(col, &width)| pad(row.get(col).map_or("", String::as_str), width))
            .collect();
        lines.push(format_row(prefix, cells));
        if idx == 0 {
            let delimiter = table
                .alignments
                .iter()
                .zip(&widths)
                .map(|(&alignment, &width)| separator_cell(alignment, width))
                .collect();
            lines.push(format_row(rest, delimiter));
        }
    }
    lines
}

/// Where line breaks go when inline content is rendered.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Breaks {
    /// Soft breaks stay newlines; hard breaks split segments.
    Paragraph,
    /// Every break becomes a space.
    SingleLine,
}

/// Render paragraph inlines as text split at hard line breaks.
fn inline_segments(nodes: &[Node]) -> Vec<String> {
    let mut segments = vec![String::new()];
    render_inlines(nodes, Breaks::Paragraph, &mut segments);
    segments
}

/// Render inlines on one line, as for headings and table cells.
fn inline_line(nodes: &[Node]) -> String {
    let mut segments = vec![String::new()];
    render_inlines(nodes, Breaks::SingleLine, &mut segments);
    segments.concat()
}

fn render_inlines(nodes: &[Node], breaks: Breaks, segments: &mut Vec<String>) {
    for node in nodes {
        render_inline(node, breaks, segments);
    }
}

fn push(segments: &mut Vec<String>, text: &str) {
    if let Some(current) = segments.last_mut() {
        current.push_str(text);
    }
}

fn render_inline(node: &Node, breaks: Breaks, segments: &mut Vec<String>) {
    match node {
        Node::RawText(text)
        | Node::HtmlInline(text)
        | Node::TemplateTag(text)
        | Node::FootnoteReference(text)
        | Node::Autolink(text) => push(segments, text),
        Node::Escaped(ch) => push(segments, &format!("\\{ch}")),
        Node::CodeSpan { ticks, code } => {
            let fence = "`".repeat(*ticks);
            push(segments, &format!("{fence}{code}{fence}"));
        }
        Node::LineBreak { hard } => match (breaks, hard) {
            (Breaks::SingleLine, _) => push(segments, " "),
            (Breaks::Paragraph, false) => push(segments, "\n"),
            (Breaks::Paragraph, true) => segments.push(String::new()),
        },
        Node::Link { children, dest } | Node::Image { children, dest } => {
            push(segments, if matches!(node, Node::Image { .. }) { "![" } else { "[" });
            render_inlines(children, breaks, segments);
            push(segments, "]");
            push(segments, dest);
        }
        Node::Emphasis { delim, children } => {
            let marker = delim.to_string();
            push(segments, &marker);
            render_inlines(children, breaks, segments);
            push(segments, &marker);
        }
        Node::StrongEmphasis { delim, children } => {
            let marker = delim.to_string().repeat(2);
            push(segments, &marker);
            render_inlines(children, breaks, segments);
            push(segments, &marker);
        }
        Node::Strikethrough(children) => {
            push(segments, "~~");
            render_inlines(children, breaks, segments);
            push(segments, "~~");
        }
        other => {
            if let Some(children) = other.children() {
                render_inlines(children, breaks, segments);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::parse::parse_document;

    fn render(text: &str) -> String {
        render_document(&parse_document(text), &FormatOptions::default())
    }

    #[rstest]
    #[case::empty("", "")]
    #[case::blank("\n\n", "")]
    #[case::setext("Title\n---\n", "## Title\n")]
    #[case::atx_closing("## Title ##\n", "## Title\n")]
    #[case::bullets("* a\n+ b\n- c\n", "- a\n\n* b\n\n- c\n")]
    #[case::ordered("3) x\n4) y\n", "3) x\n4) y\n")]
    #[case::ordered_renumber("1. x\n1. y\n1. z\n", "1. x\n2. y\n3. z\n")]
    #[case::loose("- a\n\n- b\n", "- a\n\n- b\n")]
    #[case::task("- [ ] todo\n- [x] done\n", "- [ ] todo\n- [x] done\n")]
    #[case::nested("- a\n  - b\n- c\n", "- a\n  - b\n- c\n")]
    #[case::blockquote("> a\n>\n> b\n", "> a\n>\n> b\n")]
    #[case::quote_list("> - a\n>   b\n", "> - a b\n")]
    #[case::hard_break("a  \nb\n", "a\\\nb\n")]
    #[case::thematic("***\n", "---\n")]
    #[case::thematic_in_item("- ***\n", "- ***\n")]
    #[case::strike("~a~ and ~~b~~\n", "~~a~~ and ~~b~~\n")]
    #[case::indented_code("    x\n", "```\nx\n```\n")]
    #[case::link_ref("[a]: http://x\n", "[a]: http://x\n")]
    #[case::footnote("[^1]: note\n    more\n", "[^1]: note more\n")]
    #[case::html("<div>\n  <p>x</p>\n</div>\n", "<div>\n  <p>x</p>\n</div>\n")]
    fn renders(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(render(input), expected);
    }

    #[test]
    fn fenced_code_in_list_keeps_content() {
        let input = "- item\n\n  ```sh\n  echo  \"a\"\n\n  ```\n";
        assert_eq!(render(input), input);
    }

    #[test]
    fn tables_are_padded() {
        let input = "|a|b|\n|:-:|--:|\n|long cell|x|\n";
        let expected = concat!(
            "| a         | b   |\n",
            "| :-------: | --: |\n",
            "| long cell | x   |\n",
        );
        assert_eq!(render(input), expected);
    }

    #[test]
    fn paragraphs_wrap_under_prefixes() {
        let options = FormatOptions {
            width: 12,
            ..FormatOptions::default()
        };
        let doc = parse_document("> one two three four\n");
        assert_eq!(
            render_document(&doc, &options),
            "> one two\n> three four\n"
        );
    }

    #[test]
    fn template_tag_lines_are_kept() {
        let input = "{% if x %}\nshown text\n{% endif %}\n";
        assert_eq!(render(input), input);
    }
}
