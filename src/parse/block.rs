//! Line-based block parsing.

use std::sync::LazyLock;

use regex::Regex;

use super::{indent_width, inline::parse_inlines, is_blank};
use crate::ast::{Alignment, CodeBlock, List, ListItem, ListKind, Node, Table};

static ATX_RE: LazyLock<Regex> = lazy_regex!(
    r"^ {0,3}(#{1,6})(?:[ \t]+(.*?))?[ \t]*$",
    "ATX heading regex should compile",
);

static FENCE_RE: LazyLock<Regex> = lazy_regex!(
    r"^( {0,3})(`{3,}|~{3,})(.*)$",
    "fence regex should compile",
);

static THEMATIC_BREAK_RE: LazyLock<Regex> = lazy_regex!(
    r"^ {0,3}((?:[ \t]*\*){3,}|(?:[ \t]*-){3,}|(?:[ \t]*_){3,})[ \t]*$",
    "thematic break regex should compile",
);

static SETEXT_RE: LazyLock<Regex> = lazy_regex!(
    r"^ {0,3}(=+|-+)[ \t]*$",
    "setext underline regex should compile",
);

static LIST_ITEM_RE: LazyLock<Regex> = lazy_regex!(
    r"^( {0,3})([-+*]|(\d{1,9})([.)]))([ \t]*)(.*)$",
    "list item regex should compile",
);

static TASK_RE: LazyLock<Regex> =
    lazy_regex!(r"^\[([ xX])\](?:[ \t]+|$)", "task marker regex should compile");

static FOOTNOTE_DEF_RE: LazyLock<Regex> = lazy_regex!(
    r"^ {0,3}\[\^([^\]\s]+)\]:[ \t]*(.*)$",
    "footnote definition regex should compile",
);

static LINK_REF_RE: LazyLock<Regex> = lazy_regex!(
    r"^ {0,3}\[[^\]^][^\]]*\]:[ \t]*\S",
    "link reference definition regex should compile",
);

static TABLE_DELIM_RE: LazyLock<Regex> = lazy_regex!(
    r"^ {0,3}\|?[ \t]*:?-+:?[ \t]*(?:\|[ \t]*:?-+:?[ \t]*)*\|?[ \t]*$",
    "table delimiter regex should compile",
);

static HTML_RAW_RE: LazyLock<Regex> = lazy_regex!(
    r"(?i)^ {0,3}<(script|pre|style|textarea)(?:\s|>|$)",
    "raw HTML block regex should compile",
);

static HTML_BLOCK_TAG_RE: LazyLock<Regex> = lazy_regex!(
    r"(?i)^ {0,3}</?(?:address|article|aside|blockquote|body|center|details|dialog|dd|div|dl|dt|fieldset|figcaption|figure|footer|form|h[1-6]|head|header|hr|html|iframe|legend|li|main|menu|nav|ol|p|section|summary|table|tbody|td|tfoot|th|thead|title|tr|ul)(?:\s|/?>|$)",
    "HTML block tag regex should compile",
);

static HTML_LONE_TAG_RE: LazyLock<Regex> = lazy_regex!(
    r#"^ {0,3}(?:<[A-Za-z][A-Za-z0-9-]*(?:\s+[A-Za-z_:][\w.:-]*(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?)*\s*/?>|</[A-Za-z][A-Za-z0-9-]*\s*>)[ \t]*$"#,
    "lone HTML tag regex should compile",
);

/// Parse `lines` into blocks.
///
/// The flag reports whether a blank line separated two of the returned
/// blocks, which makes an enclosing list item loose.
pub(super) fn parse_blocks(lines: &[String]) -> (Vec<Node>, bool) {
    let mut blocks = Vec::new();
    let mut spaced = false;
    let mut blank_seen = false;
    let mut i = 0;
    while i < lines.len() {
        if is_blank(&lines[i]) {
            blank_seen = true;
            i += 1;
            continue;
        }
        if blank_seen && !blocks.is_empty() {
            spaced = true;
        }
        blank_seen = false;
        let (node, next) = parse_block(lines, i);
        blocks.push(node);
        i = next.max(i + 1);
    }
    (blocks, spaced)
}

fn parse_block(lines: &[String], i: usize) -> (Node, usize) {
    let line = lines[i].as_str();
    if indent_width(line) >= 4 {
        return parse_indented_code(lines, i);
    }
    if let Some(fence) = Fence::open(line) {
        return parse_fenced_code(lines, i, &fence);
    }
    if let Some(heading) = atx_heading(line) {
        return (heading, i + 1);
    }
    if THEMATIC_BREAK_RE.is_match(line) {
        return (Node::ThematicBreak, i + 1);
    }
    if strip_quote_marker(line).is_some() {
        return parse_blockquote(lines, i);
    }
    if let Some(marker) = ListMarker::parse(line) {
        return parse_list(lines, i, marker.kind);
    }
    if FOOTNOTE_DEF_RE.is_match(line) {
        return parse_footnote(lines, i);
    }
    if LINK_REF_RE.is_match(line) {
        return (Node::LinkReference(line.trim().to_string()), i + 1);
    }
    if let Some(end) = html_block_end(lines, i) {
        return (Node::HtmlBlock(lines[i..end].to_vec()), end);
    }
    if let Some(table) = parse_table(lines, i) {
        return table;
    }
    parse_paragraph(lines, i)
}

/// Whether `line` ends an open paragraph.
fn interrupts_paragraph(line: &str) -> bool {
    if indent_width(line) >= 4 {
        return false;
    }
    if ATX_RE.is_match(line)
        || Fence::open(line).is_some()
        || THEMATIC_BREAK_RE.is_match(line)
        || strip_quote_marker(line).is_some()
    {
        return true;
    }
    ListMarker::parse(line).is_some_and(|marker| {
        !marker.empty
            && match marker.kind {
                ListKind::Bullet(_) => true,
                ListKind::Ordered { start, .. } => start == 1,
            }
    })
}

/// Whether `line` starts a block and so cannot be a lazy continuation of a
/// paragraph inside a container.
fn breaks_laziness(line: &str) -> bool {
    indent_width(line) < 4
        && (ATX_RE.is_match(line)
            || Fence::open(line).is_some()
            || THEMATIC_BREAK_RE.is_match(line)
            || strip_quote_marker(line).is_some()
            || ListMarker::parse(line).is_some())
}

fn can_continue_lazily(inner: &[String], line: &str) -> bool {
    inner.last().is_some_and(|last| !is_blank(last)) && !breaks_laziness(line)
}

fn atx_heading(line: &str) -> Option<Node> {
    let caps = ATX_RE.captures(line)?;
    let level = u8::try_from(caps[1].len()).ok()?;
    let mut text = caps.get(2).map_or("", |m| m.as_str());
    let without_hashes = text.trim_end_matches('#');
    if without_hashes.is_empty() || without_hashes.ends_with([' ', '\t']) {
        text = without_hashes.trim_end();
    }
    Some(Node::Heading {
        level,
        children: parse_inlines(text),
    })
}

struct Fence {
    indent: usize,
    marker: char,
    len: usize,
    info: String,
}

impl Fence {
    fn open(line: &str) -> Option<Self> {
        let caps = FENCE_RE.captures(line)?;
        let run = &caps[2];
        let info = caps[3].trim();
        let marker = run.chars().next()?;
        if marker == '`' && info.contains('`') {
            return None;
        }
        Some(Self {
            indent: caps[1].len(),
            marker,
            len: run.len(),
            info: info.to_string(),
        })
    }

    fn closes(&self, line: &str) -> bool {
        if indent_width(line) > 3 {
            return false;
        }
        let trimmed = line.trim_start();
        let run = trimmed.len() - trimmed.trim_start_matches(self.marker).len();
        run >= self.len && trimmed[run..].trim().is_empty()
    }
}

fn parse_fenced_code(lines: &[String], i: usize, fence: &Fence) -> (Node, usize) {
    let mut body = Vec::new();
    let mut j = i + 1;
    while j < lines.len() && !fence.closes(&lines[j]) {
        let line = &lines[j];
        let strip = indent_width(line).min(fence.indent);
        body.push(line[strip..].to_string());
        j += 1;
    }
    let end = if j < lines.len() { j + 1 } else { j };
    let code = CodeBlock {
        fence: fence.marker.to_string().repeat(fence.len),
        info: fence.info.clone(),
        lines: body,
    };
    (Node::FencedCode(code), end)
}

fn parse_indented_code(lines: &[String], i: usize) -> (Node, usize) {
    let mut end = i;
    let mut last_text = i;
    while end < lines.len() && (is_blank(&lines[end]) || indent_width(&lines[end]) >= 4) {
        if !is_blank(&lines[end]) {
            last_text = end;
        }
        end += 1;
    }
    let body: Vec<String> = lines[i..=last_text]
        .iter()
        .map(|line| line.get(4..).unwrap_or("").to_string())
        .collect();
    let longest_run = body
        .iter()
        .map(|line| line.len() - line.trim_start_matches('`').len())
        .max()
        .unwrap_or(0);
    let code = CodeBlock {
        fence: "`".repeat(longest_run.max(2) + 1),
        info: String::new(),
        lines: body,
    };
    (Node::FencedCode(code), last_text + 1)
}

/// Content of a blockquote line after its `>` marker and one optional space.
fn strip_quote_marker(line: &str) -> Option<&str> {
    if indent_width(line) > 3 {
        return None;
    }
    let rest = line.trim_start().strip_prefix('>')?;
    Some(
        rest.strip_prefix(' ')
            .or_else(|| rest.strip_prefix('\t'))
            .unwrap_or(rest),
    )
}

fn parse_blockquote(lines: &[String], i: usize) -> (Node, usize) {
    let mut inner: Vec<String> = Vec::new();
    let mut j = i;
    while j < lines.len() {
        let line = lines[j].as_str();
        if let Some(rest) = strip_quote_marker(line) {
            inner.push(rest.to_string());
        } else if !is_blank(line) && can_continue_lazily(&inner, line) {
            inner.push(line.trim_start().to_string());
        } else {
            break;
        }
        j += 1;
    }
    (Node::Blockquote(parse_blocks(&inner).0), j)
}

struct ListMarker {
    kind: ListKind,
    /// Byte offset of the item's content within the line.
    content_offset: usize,
    /// Column continuation lines must reach to belong to the item.
    content_indent: usize,
    empty: bool,
}

impl ListMarker {
    fn parse(line: &str) -> Option<Self> {
        if THEMATIC_BREAK_RE.is_match(line) {
            return None;
        }
        let caps = LIST_ITEM_RE.captures(line)?;
        let spacing = caps.get(5).map_or("", |m| m.as_str());
        let rest = caps.get(6).map_or("", |m| m.as_str());
        if spacing.is_empty() && !rest.is_empty() {
            return None;
        }
        let kind = match (caps.get(3), caps.get(4)) {
            (Some(number), Some(delim)) => ListKind::Ordered {
                start: number.as_str().parse().ok()?,
                delimiter: delim.as_str().chars().next()?,
            },
            _ => ListKind::Bullet(caps[2].chars().next()?),
        };
        let marker_end = caps[1].len() + caps[2].len();
        let empty = rest.trim().is_empty();
        let (content_offset, content_indent) = if empty {
            (line.len(), marker_end + 1)
        } else if spacing.len() > 4 {
            (marker_end + 1, marker_end + 1)
        } else {
            (marker_end + spacing.len(), marker_end + spacing.len())
        };
        Some(Self {
            kind,
            content_offset,
            content_indent,
            empty,
        })
    }
}

fn parse_list(lines: &[String], start: usize, kind: ListKind) -> (Node, usize) {
    let mut items = Vec::new();
    let mut tight = true;
    let mut i = start;
    loop {
        let Some(marker) = ListMarker::parse(&lines[i]).filter(|m| kind.continues_with(m.kind))
        else {
            break;
        };
        let (item, end, spaced) = parse_item(lines, i, &marker);
        items.push(item);
        tight &= !spaced;
        let mut next = end;
        while next < lines.len() && is_blank(&lines[next]) {
            next += 1;
        }
        let continues = next < lines.len()
            && ListMarker::parse(&lines[next]).is_some_and(|m| kind.continues_with(m.kind));
        if !continues {
            i = end;
            break;
        }
        if next > end {
            tight = false;
        }
        i = next;
    }
    let list = List { kind, tight, items };
    (Node::List(list), i)
}

fn parse_item(lines: &[String], i: usize, marker: &ListMarker) -> (Node, usize, bool) {
    let first = &lines[i][marker.content_offset..];
    let mut inner = vec![first.to_string()];
    let mut j = i + 1;
    let starts_blank = marker.empty && lines.get(j).is_some_and(|l| is_blank(l));
    while j < lines.len() && !starts_blank {
        let line = lines[j].as_str();
        if is_blank(line) {
            let mut k = j;
            while k < lines.len() && is_blank(&lines[k]) {
                k += 1;
            }
            if k < lines.len() && indent_width(&lines[k]) >= marker.content_indent {
                inner.extend(std::iter::repeat_n(String::new(), k - j));
                j = k;
                continue;
            }
            break;
        }
        if indent_width(line) >= marker.content_indent {
            inner.push(line[marker.content_indent..].to_string());
        } else if can_continue_lazily(&inner, line) {
            inner.push(line.trim_start().to_string());
        } else {
            break;
        }
        j += 1;
    }

    let mut task = None;
    if let Some(caps) = TASK_RE.captures(&inner[0]) {
        task = caps[1].chars().next();
        let skip = caps[0].len();
        inner[0].replace_range(..skip, "");
    }
    let (children, spaced) = parse_blocks(&inner);
    (Node::ListItem(ListItem { task, children }), j, spaced)
}

fn parse_footnote(lines: &[String], i: usize) -> (Node, usize) {
    let Some(caps) = FOOTNOTE_DEF_RE.captures(&lines[i]) else {
        return parse_paragraph(lines, i);
    };
    let label = caps[1].to_string();
    let mut inner = vec![caps[2].to_string()];
    let mut j = i + 1;
    while j < lines.len() {
        let line = lines[j].as_str();
        if is_blank(line) {
            let mut k = j;
            while k < lines.len() && is_blank(&lines[k]) {
                k += 1;
            }
            if k < lines.len() && indent_width(&lines[k]) >= 4 {
                inner.extend(std::iter::repeat_n(String::new(), k - j));
                j = k;
                continue;
            }
            break;
        }
        if indent_width(line) >= 4 {
            inner.push(line[4..].to_string());
        } else if can_continue_lazily(&inner, line) && !FOOTNOTE_DEF_RE.is_match(line) {
            inner.push(line.trim_start().to_string());
        } else {
            break;
        }
        j += 1;
    }
    let children = parse_blocks(&inner).0;
    (Node::FootnoteDefinition { label, children }, j)
}

/// End (exclusive) of the HTML block starting at line `i`, if one starts.
fn html_block_end(lines: &[String], i: usize) -> Option<usize> {
    let line = lines[i].as_str();
    let trimmed = line.trim_start();
    let terminator = if let Some(caps) = HTML_RAW_RE.captures(line) {
        Some(format!("</{}>", caps[1].to_ascii_lowercase()))
    } else if trimmed.starts_with("<!--") {
        Some("-->".to_string())
    } else if trimmed.starts_with("<?") {
        Some("?>".to_string())
    } else if trimmed.starts_with("<![CDATA[") {
        Some("]]>".to_string())
    } else if trimmed.starts_with("<!") && trimmed[2..].starts_with(|c: char| c.is_ascii_alphabetic())
    {
        Some(">".to_string())
    } else {
        None
    };
    if let Some(terminator) = terminator {
        let first_search = if trimmed.starts_with("<!--") {
            line.find("<!--").map_or(0, |pos| pos + 4)
        } else {
            0
        };
        if line[first_search..].to_ascii_lowercase().contains(&terminator) {
            return Some(i + 1);
        }
        let end = lines[i + 1..]
            .iter()
            .position(|l| l.to_ascii_lowercase().contains(&terminator))
            .map_or(lines.len(), |offset| i + 1 + offset + 1);
        return Some(end);
    }
    if HTML_BLOCK_TAG_RE.is_match(line) || HTML_LONE_TAG_RE.is_match(line) {
        let end = lines[i..]
            .iter()
            .position(|l| is_blank(l))
            .map_or(lines.len(), |offset| i + offset);
        return Some(end);
    }
    None
}

/// Split a table row into raw cell strings on unescaped pipes outside code
/// spans.
fn split_row(line: &str) -> Vec<&str> {
    let mut row = line.trim();
    row = row.strip_prefix('|').unwrap_or(row);
    if row.ends_with('|') && !row.ends_with("\\|") {
        row = &row[..row.len() - 1];
    }
    let mut cells = Vec::new();
    let mut start = 0;
    let mut pos = 0;
    let bytes = row.as_bytes();
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'`' => {
                let run_end = crate::wrap::atomic::parsing::backtick_run_end(row, pos);
                pos = crate::wrap::atomic::parsing::code_span_end(row, pos).unwrap_or(run_end);
            }
            b'|' => {
                cells.push(row[start..pos].trim());
                pos += 1;
                start = pos;
            }
            _ => pos += 1,
        }
    }
    cells.push(row[start.min(row.len())..].trim());
    cells
}

fn alignment(cell: &str) -> Alignment {
    match (cell.starts_with(':'), cell.ends_with(':')) {
        (true, true) => Alignment::Center,
        (true, false) => Alignment::Left,
        (false, true) => Alignment::Right,
        (false, false) => Alignment::None,
    }
}

fn table_row(line: &str, columns: usize) -> Node {
    let mut cells: Vec<Node> = split_row(line)
        .into_iter()
        .map(|cell| Node::TableCell(parse_inlines(cell)))
        .collect();
    cells.resize(columns, Node::TableCell(Vec::new()));
    Node::TableRow(cells)
}

fn parse_table(lines: &[String], i: usize) -> Option<(Node, usize)> {
    let header = lines[i].as_str();
    let delimiter = lines.get(i + 1)?.as_str();
    if !header.contains('|') || !delimiter.contains('|') || !TABLE_DELIM_RE.is_match(delimiter) {
        return None;
    }
    let alignments: Vec<Alignment> = split_row(delimiter).into_iter().map(alignment).collect();
    if split_row(header).len() != alignments.len() {
        return None;
    }
    let mut rows = vec![table_row(header, alignments.len())];
    let mut j = i + 2;
    while j < lines.len() && !is_blank(&lines[j]) && !interrupts_paragraph(&lines[j]) {
        rows.push(table_row(&lines[j], alignments.len()));
        j += 1;
    }
    Some((Node::Table(Table { alignments, rows }), j))
}

fn setext_level(line: &str) -> Option<u8> {
    let caps = SETEXT_RE.captures(line)?;
    Some(if caps[1].starts_with('=') { 1 } else { 2 })
}

fn parse_paragraph(lines: &[String], i: usize) -> (Node, usize) {
    let mut text_lines = vec![lines[i].trim_start()];
    let mut j = i + 1;
    while j < lines.len() {
        let line = lines[j].as_str();
        if is_blank(line) {
            break;
        }
        if let Some(level) = setext_level(line) {
            let text = text_lines.join("\n");
            let heading = Node::Heading {
                level,
                children: parse_inlines(text.trim()),
            };
            return (heading, j + 1);
        }
        if interrupts_paragraph(line) {
            break;
        }
        text_lines.push(line.trim_start());
        j += 1;
    }
    let text = text_lines.join("\n");
    (Node::Paragraph(parse_inlines(text.trim_end())), j)
}
