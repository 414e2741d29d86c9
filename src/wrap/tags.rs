//! Line boundaries that survive reflow.
//!
//! Template tags and HTML comments often structure a document line by line,
//! and table-row or list-looking lines lose their meaning when merged into the
//! previous line. Source newlines at those points are kept; the text between
//! them is wrapped as independent chunks.

use std::sync::LazyLock;

use regex::Regex;

static BLOCK_LIKE_RE: LazyLock<Regex> = lazy_regex!(
    r"^(?:\||(?:[-*+]|\d{1,9}[.)])\s+\S)",
    "block-like line regex should compile",
);

static BARE_ORDERED_RE: LazyLock<Regex> =
    lazy_regex!(r"^(\d{1,9})[.)]$", "bare ordered marker regex should compile");

const TAG_CLOSERS: [&str; 4] = ["%}", "#}", "}}", "-->"];
const TAG_OPENERS: [&str; 4] = ["{%", "{#", "{{", "<!--"];

fn ends_with_tag(line: &str) -> bool {
    let line = line.trim_end();
    TAG_CLOSERS.iter().any(|closer| line.ends_with(closer))
}

fn starts_with_tag(line: &str) -> bool {
    let line = line.trim_start();
    TAG_OPENERS.iter().any(|opener| line.starts_with(opener))
}

/// A bare `1.` merges and is escaped where needed. Other bare ordered
/// markers cannot interrupt a paragraph and keep their line unescaped.
fn is_block_like(line: &str) -> bool {
    BLOCK_LIKE_RE.is_match(line)
        || BARE_ORDERED_RE
            .captures(line)
            .is_some_and(|caps| caps[1].parse::<u64>() != Ok(1))
}

fn keeps_break(previous: &str, next: &str) -> bool {
    ends_with_tag(previous) || starts_with_tag(next) || is_block_like(next.trim_start())
}

/// Split paragraph text on the source newlines that must be preserved.
///
/// Lines within a chunk are joined with single spaces.
pub(crate) fn split_chunks(text: &str) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut previous: Option<&str> = None;
    for line in text.split('\n') {
        let trimmed = line.trim();
        if let Some(prev) = previous
            && keeps_break(prev, trimmed)
            && !current.is_empty()
        {
            chunks.push(std::mem::take(&mut current));
        }
        if !trimmed.is_empty() {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(trimmed);
        }
        previous = Some(trimmed);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_merge() {
        assert_eq!(split_chunks("one\ntwo\nthree"), ["one two three"]);
    }

    #[test]
    fn template_tag_lines_stay_separate() {
        assert_eq!(
            split_chunks("{% field %}\nSome text here\nmore text\n{% endfield %}"),
            ["{% field %}", "Some text here more text", "{% endfield %}"]
        );
    }

    #[test]
    fn comment_boundaries() {
        assert_eq!(
            split_chunks("before <!-- note -->\nafter\nagain"),
            ["before <!-- note -->", "after again"]
        );
    }

    #[test]
    fn table_and_list_like_lines() {
        assert_eq!(
            split_chunks("intro\n| a | b |\n2. second\ntail"),
            ["intro", "| a | b |", "2. second tail"]
        );
    }

    #[test]
    fn bare_markers_merge() {
        assert_eq!(split_chunks("a\n+\nb"), ["a + b"]);
        assert_eq!(split_chunks("a\n1.\nb"), ["a 1. b"]);
        assert_eq!(split_chunks("a\n-\nb"), ["a - b"]);
    }

    #[test]
    fn bare_ordered_markers_past_one_keep_their_line() {
        assert_eq!(split_chunks("a\n2.\nb"), ["a", "2. b"]);
        assert_eq!(split_chunks("a\n01)\nb"), ["a 01) b"]);
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(split_chunks("").is_empty());
    }
}
