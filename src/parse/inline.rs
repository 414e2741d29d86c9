//! Inline parsing.
//!
//! The scanner walks the text once, collecting plain characters into a
//! pending buffer and emitting a node whenever a construct closes. Emphasis
//! is matched by searching ahead for a closing run of the same length; the
//! enclosed text is parsed recursively.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    ast::Node,
    wrap::{
        atomic::parsing::{
            backtick_run_end, code_span_end, html_end, matching_bracket, matching_paren,
            template_tag_end,
        },
        classify,
    },
};

static URI_AUTOLINK_RE: LazyLock<Regex> = lazy_regex!(
    r"^<[A-Za-z][A-Za-z0-9+.-]{1,31}:[^\s<>]*>",
    "URI autolink regex should compile",
);

static EMAIL_AUTOLINK_RE: LazyLock<Regex> = lazy_regex!(
    r"^<[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*>",
    "email autolink regex should compile",
);

/// Parse inline content.
///
/// Soft line breaks in `text` become [`Node::LineBreak`] with `hard` unset;
/// a trailing backslash or two trailing spaces make the break hard.
///
/// ```
/// use mdreflow::{ast::Node, parse::parse_inlines};
///
/// assert_eq!(
///     parse_inlines("a `b` c"),
///     [
///         Node::RawText("a ".into()),
///         Node::CodeSpan { ticks: 1, code: "b".into() },
///         Node::RawText(" c".into()),
///     ]
/// );
/// ```
#[must_use]
pub fn parse_inlines(text: &str) -> Vec<Node> {
    let mut scanner = Scanner {
        text,
        pos: 0,
        pending: String::new(),
        nodes: Vec::new(),
    };
    scanner.run();
    scanner.finish()
}

struct Scanner<'a> {
    text: &'a str,
    pos: usize,
    pending: String,
    nodes: Vec<Node>,
}

impl Scanner<'_> {
    fn run(&mut self) {
        while let Some(ch) = self.peek() {
            let handled = match ch {
                '\\' => self.backslash(),
                '\n' => self.newline(),
                '`' => self.code_span(),
                '<' => self.angle(),
                '{' => self.template_tag(),
                '!' if self.rest().starts_with("![") => self.link(true),
                '[' => self.footnote_reference() || self.link(false),
                '*' | '_' | '~' => self.emphasis(ch),
                _ => false,
            };
            if !handled {
                self.literal(ch.len_utf8());
            }
        }
    }

    fn finish(mut self) -> Vec<Node> {
        self.flush();
        self.nodes
    }

    fn rest(&self) -> &str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn literal(&mut self, len: usize) {
        self.pending.push_str(&self.text[self.pos..self.pos + len]);
        self.pos += len;
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            self.nodes.push(Node::RawText(std::mem::take(&mut self.pending)));
        }
    }

    fn emit(&mut self, node: Node, end: usize) {
        self.flush();
        self.nodes.push(node);
        self.pos = end;
    }

    fn skip_indent(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start_matches([' ', '\t']).len();
    }

    fn backslash(&mut self) -> bool {
        match self.text[self.pos + 1..].chars().next() {
            Some('\n') => {
                self.emit(Node::LineBreak { hard: true }, self.pos + 2);
                self.skip_indent();
                true
            }
            Some(next) if next.is_ascii_punctuation() => {
                self.emit(Node::Escaped(next), self.pos + 2);
                true
            }
            _ => false,
        }
    }

    fn newline(&mut self) -> bool {
        let hard = self.pending.ends_with("  ");
        self.pending
            .truncate(self.pending.trim_end_matches([' ', '\t']).len());
        self.emit(Node::LineBreak { hard }, self.pos + 1);
        self.skip_indent();
        true
    }

    fn code_span(&mut self) -> bool {
        let run_end = backtick_run_end(self.text, self.pos);
        let Some(end) = code_span_end(self.text, self.pos) else {
            self.literal(run_end - self.pos);
            return true;
        };
        let ticks = run_end - self.pos;
        let code = self.text[run_end..end - ticks].replace('\n', " ");
        self.emit(Node::CodeSpan { ticks, code }, end);
        true
    }

    fn angle(&mut self) -> bool {
        let rest = self.rest();
        if let Some(found) = URI_AUTOLINK_RE
            .find(rest)
            .or_else(|| EMAIL_AUTOLINK_RE.find(rest))
        {
            let end = self.pos + found.end();
            self.emit(Node::Autolink(found.as_str().to_string()), end);
            return true;
        }
        let Some(end) = html_end(self.text, self.pos) else {
            return false;
        };
        let html = self.text[self.pos..end].replace('\n', " ");
        self.emit(Node::HtmlInline(html), end);
        true
    }

    fn template_tag(&mut self) -> bool {
        let Some(end) = template_tag_end(self.text, self.pos) else {
            return false;
        };
        let tag = self.text[self.pos..end].replace('\n', " ");
        self.emit(Node::TemplateTag(tag), end);
        true
    }

    fn footnote_reference(&mut self) -> bool {
        let rest = self.rest();
        let Some(label) = rest.strip_prefix("[^") else {
            return false;
        };
        let Some(close) = label.find(']') else {
            return false;
        };
        if close == 0 || label[..close].contains(char::is_whitespace) {
            return false;
        }
        let end = self.pos + 2 + close + 1;
        let reference = self.text[self.pos..end].to_string();
        self.emit(Node::FootnoteReference(reference), end);
        true
    }

    fn link(&mut self, image: bool) -> bool {
        let open = if image { self.pos + 1 } else { self.pos };
        let Some(close) = matching_bracket(self.text, open) else {
            return false;
        };
        let after = close + 1;
        let tail = &self.text[after..];
        let end = if tail.starts_with('(') {
            matching_paren(self.text, after)
        } else if tail.starts_with('[') {
            tail.find(']').map(|offset| after + offset + 1)
        } else {
            None
        };
        let Some(end) = end else {
            return false;
        };
        let children = parse_inlines(&self.text[open + 1..close]);
        let dest = self.text[after..end].replace('\n', " ");
        let node = if image {
            Node::Image { children, dest }
        } else {
            Node::Link { children, dest }
        };
        self.emit(node, end);
        true
    }

    fn emphasis(&mut self, delim: char) -> bool {
        let run = run_len(self.text, self.pos, delim);
        let max = if delim == '~' { 2 } else { 3 };
        if run > max {
            self.literal(run);
            return true;
        }
        if !opens(self.text, self.pos, run, delim) {
            self.literal(run);
            return true;
        }
        let Some(closer) = find_closer(self.text, self.pos + run, run, delim) else {
            self.literal(run);
            return true;
        };
        let children = parse_inlines(&self.text[self.pos + run..closer]);
        let node = match (delim, run) {
            ('~', _) => Node::Strikethrough(children),
            (_, 1) => Node::Emphasis { delim, children },
            (_, 2) => Node::StrongEmphasis { delim, children },
            _ => Node::StrongEmphasis {
                delim,
                children: vec![Node::Emphasis { delim, children }],
            },
        };
        self.emit(node, closer + run);
        true
    }
}

fn run_len(text: &str, pos: usize, delim: char) -> usize {
    text[pos..].len() - text[pos..].trim_start_matches(delim).len()
}

fn is_punctuation(ch: char) -> bool {
    ch.is_ascii_punctuation() || (!ch.is_alphanumeric() && !ch.is_whitespace())
}

/// Whether the run at `pos` is left-flanking and may open emphasis.
fn opens(text: &str, pos: usize, run: usize, delim: char) -> bool {
    let before = text[..pos].chars().next_back();
    let Some(after) = text[pos + run..].chars().next() else {
        return false;
    };
    if after.is_whitespace() {
        return false;
    }
    let left_flanking = !is_punctuation(after)
        || before.is_none_or(|c| c.is_whitespace() || is_punctuation(c));
    left_flanking && !(delim == '_' && before.is_some_and(char::is_alphanumeric))
}

/// Whether the run at `pos` is right-flanking and may close emphasis.
fn closes(text: &str, pos: usize, run: usize, delim: char) -> bool {
    let after = text[pos + run..].chars().next();
    let Some(before) = text[..pos].chars().next_back() else {
        return false;
    };
    if before.is_whitespace() {
        return false;
    }
    let right_flanking = !is_punctuation(before)
        || after.is_none_or(|c| c.is_whitespace() || is_punctuation(c));
    right_flanking && !(delim == '_' && after.is_some_and(char::is_alphanumeric))
}

/// Start of the first run of exactly `run` delimiters after `from` that can
/// close emphasis. Code spans, links, tags and escapes are skipped whole.
fn find_closer(text: &str, from: usize, run: usize, delim: char) -> Option<usize> {
    let mut pos = from;
    while pos < text.len() {
        if text[pos..].starts_with(delim) {
            let len = run_len(text, pos, delim);
            if len == run && pos > from && closes(text, pos, len, delim) {
                return Some(pos);
            }
            pos += len;
            continue;
        }
        pos = classify(text, pos).0;
    }
    None
}
