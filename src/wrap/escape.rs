//! Escaping of words that would change block structure at the start of a line.

use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;

use super::atomic::parsing::code_span_end;

static MARKER_RE: LazyLock<Regex> = lazy_regex!(
    r"^(?:[-*+]|>.*|#+|-+|=+|\*+|_{3,})$",
    "line-start marker regex should compile",
);

static FENCE_START_RE: LazyLock<Regex> =
    lazy_regex!(r"^(?:`{3,}|~{3,})", "fence start regex should compile");

static ORDERED_MARKER_RE: LazyLock<Regex> =
    lazy_regex!(r"^(\d{1,9})([.)])$", "ordered marker regex should compile");

/// Escape `word` if, placed first on a wrapped line, it would be read as a
/// list marker, heading, blockquote, setext underline, thematic break or
/// code fence.
///
/// ```rust,ignore
/// assert_eq!(escape_line_start("-"), r"\-");
/// assert_eq!(escape_line_start("12."), r"12\.");
/// assert_eq!(escape_line_start("word"), "word");
/// ```
pub(crate) fn escape_line_start(word: &str) -> Cow<'_, str> {
    escape(word, true)
}

/// Escape `word` if it would interrupt the paragraph at a preserved source
/// line break. Ordered markers other than `1` cannot interrupt and are kept,
/// so that the line is still recognised as list-like on the next pass.
pub(crate) fn escape_block_start(word: &str) -> Cow<'_, str> {
    escape(word, false)
}

fn opens_fence(word: &str) -> bool {
    FENCE_START_RE.is_match(word) && !(word.starts_with('`') && code_span_end(word, 0).is_some())
}

fn escape(word: &str, any_ordered: bool) -> Cow<'_, str> {
    if MARKER_RE.is_match(word) || opens_fence(word) {
        return Cow::Owned(format!("\\{word}"));
    }
    if let Some(caps) = ORDERED_MARKER_RE.captures(word)
        && (any_ordered || caps[1].parse::<u64>() == Ok(1))
    {
        return Cow::Owned(format!("{}\\{}", &caps[1], &caps[2]));
    }
    Cow::Borrowed(word)
}
