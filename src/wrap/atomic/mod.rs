//! Atomic-token classification.
//!
//! Some inline constructs must never be split across lines: code spans,
//! links and images, template tags, HTML tags and comments, and backslash
//! escapes. [`classify`] recognises them at a byte offset and [`split_words`]
//! uses it to break text into wrap units in which those spans are opaque.
//! A tag or comment directly followed by its `/` closing partner, such as
//! `{% field %} {% /field %}`, is one span. Recognition fails open: an
//! unclosed construct is ordinary text.

pub(crate) mod parsing;
mod scanning;

use std::ops::Range;

use parsing::{
    backtick_run_end, code_span_end, escape_end, html_end, link_end, paired_tag_end,
    template_tag_end,
};
use scanning::next_char_end;

/// Classify the text starting at byte `pos`.
///
/// Returns the end of the recognised span and whether it is atomic. For
/// ordinary text the span is a single character, except that an unmatched
/// backtick run is returned whole so that its tail is not mistaken for a
/// code span opener.
///
/// ```
/// use mdreflow::wrap::classify;
///
/// assert_eq!(classify("`a b` c", 0), (5, true));
/// assert_eq!(classify("plain", 0), (1, false));
/// assert_eq!(classify("`open", 0), (1, false));
/// ```
#[must_use]
pub fn classify(text: &str, pos: usize) -> (usize, bool) {
    let Some(ch) = text[pos..].chars().next() else {
        return (pos, false);
    };
    let end = match ch {
        '\\' => escape_end(text, pos),
        '`' => {
            return code_span_end(text, pos)
                .map_or_else(|| (backtick_run_end(text, pos), false), |end| (end, true));
        }
        '!' if text[pos + 1..].starts_with('[') => link_end(text, pos),
        '[' => link_end(text, pos),
        '{' => template_tag_end(text, pos).map(|end| with_partner(text, pos, end)),
        '<' => html_end(text, pos).map(|end| with_partner(text, pos, end)),
        _ => None,
    };
    end.map_or_else(|| (next_char_end(text, pos), false), |end| (end, true))
}

fn with_partner(text: &str, pos: usize, end: usize) -> usize {
    paired_tag_end(text, pos, end).unwrap_or(end)
}

/// Split `text` into words: maximal runs of non-whitespace in which atomic
/// spans are opaque. Adjacent atomic spans with no whitespace between them
/// end up in the same word, as does punctuation glued to a span.
///
/// ```
/// use mdreflow::wrap::split_words;
///
/// assert_eq!(
///     split_words("see [the docs](u) and `a b`."),
///     ["see", "[the docs](u)", "and", "`a b`."]
/// );
/// ```
#[must_use]
pub fn split_words(text: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let Some(ch) = text[pos..].chars().next() else {
            break;
        };
        if ch.is_whitespace() {
            pos += ch.len_utf8();
            continue;
        }
        let start = pos;
        while pos < text.len() {
            let Some(current) = text[pos..].chars().next() else {
                break;
            };
            if current.is_whitespace() {
                break;
            }
            pos = classify(text, pos).0;
        }
        words.push(&text[start..pos]);
    }
    words
}

/// Byte ranges of every atomic span in `text`, in order.
#[must_use]
pub fn atomic_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let (end, atomic) = classify(text, pos);
        if atomic {
            spans.push(pos..end);
        }
        pos = end.max(next_char_end(text, pos));
    }
    spans
}
