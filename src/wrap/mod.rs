//! Paragraph wrapping.
//!
//! Text is split into words with [`split_words`], treating links, code spans,
//! tags and escapes as unbreakable, and packed greedily into lines. In
//! semantic mode each sentence found by [`split_sentences`] starts a new line
//! and long sentences are packed the same way.

pub(crate) mod atomic;
mod escape;
mod fill;
mod line_buffer;
mod sentences;
mod tags;

use unicode_width::UnicodeWidthStr;

pub use atomic::{atomic_spans, classify, split_words};
use fill::{Layout, LineStart, fill_words};
pub use sentences::{Sentences, split_sentences};

use crate::config::BreakMode;

/// How a paragraph is laid out.
#[derive(Debug, Clone, Copy)]
pub struct WrapSettings<'a> {
    /// Maximum line width in columns, prefixes included; `0` disables
    /// wrapping.
    pub width: usize,
    /// Prefix of the first line, e.g. `"- "` for a list item.
    pub initial_indent: &'a str,
    /// Prefix of every later line.
    pub subsequent_indent: &'a str,
    pub break_mode: BreakMode,
    /// In semantic mode, a line shorter than this absorbs the start of the
    /// next sentence when it fits.
    pub min_line_len: usize,
}

impl Default for WrapSettings<'_> {
    fn default() -> Self {
        Self {
            width: 88,
            initial_indent: "",
            subsequent_indent: "",
            break_mode: BreakMode::Fixed,
            min_line_len: 0,
        }
    }
}

/// Wrap one paragraph of text, returning lines with their prefixes.
///
/// Newlines in `text` are soft breaks; they are kept only next to template
/// tags, HTML comments and lines that look like table rows or list items.
///
/// ```
/// use mdreflow::wrap::{WrapSettings, wrap_paragraph};
///
/// let settings = WrapSettings {
///     width: 12,
///     initial_indent: "- ",
///     subsequent_indent: "  ",
///     ..WrapSettings::default()
/// };
/// assert_eq!(
///     wrap_paragraph("one two three four", &settings),
///     ["- one two", "  three four"]
/// );
/// ```
#[must_use]
pub fn wrap_paragraph(text: &str, settings: &WrapSettings<'_>) -> Vec<String> {
    wrap_segments(&[text], settings)
}

/// Wrap text made of segments separated by hard line breaks.
///
/// Each segment is wrapped independently and every segment but the last ends
/// with a backslash hard break.
#[must_use]
pub fn wrap_segments<S: AsRef<str>>(segments: &[S], settings: &WrapSettings<'_>) -> Vec<String> {
    let first_column = UnicodeWidthStr::width(settings.initial_indent);
    let next_column = UnicodeWidthStr::width(settings.subsequent_indent);
    let mut body: Vec<String> = Vec::new();
    for (idx, segment) in segments.iter().enumerate() {
        let before = body.len();
        for chunk in tags::split_chunks(segment.as_ref()) {
            let (column, first_line) = if body.is_empty() {
                (first_column, LineStart::Verbatim)
            } else {
                (next_column, LineStart::SourceBreak)
            };
            body.extend(fill_chunk(&chunk, settings, column, next_column, first_line));
        }
        if idx + 1 < segments.len() {
            if body.len() == before {
                body.push(String::new());
            }
            if let Some(last) = body.last_mut() {
                last.push('\\');
            }
        }
    }
    body.into_iter()
        .enumerate()
        .map(|(idx, line)| {
            let prefix = if idx == 0 {
                settings.initial_indent
            } else {
                settings.subsequent_indent
            };
            let mut out = String::with_capacity(prefix.len() + line.len());
            out.push_str(prefix);
            out.push_str(&line);
            out.truncate(out.trim_end().len());
            out
        })
        .collect()
}

fn fill_chunk(
    text: &str,
    settings: &WrapSettings<'_>,
    first_column: usize,
    next_column: usize,
    first_line: LineStart,
) -> Vec<String> {
    let layout = Layout {
        width: settings.width,
        first_column,
        next_column,
        first_line,
    };
    match settings.break_mode {
        BreakMode::Semantic if settings.width > 0 => fill_by_sentence(text, settings, layout),
        _ => fill_words(&split_words(text), layout),
    }
}

fn fill_by_sentence(text: &str, settings: &WrapSettings<'_>, layout: Layout) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for sentence in split_sentences(text) {
        let words = split_words(sentence);
        if words.is_empty() {
            continue;
        }
        if let Some(joined) = join_short_line(&lines, &words, settings, layout) {
            lines.pop();
            lines.extend(joined);
            continue;
        }
        let column = if lines.is_empty() {
            layout.first_column
        } else {
            layout.next_column
        };
        lines.extend(fill_words(
            &words,
            Layout {
                first_column: column,
                first_line: if lines.is_empty() {
                    layout.first_line
                } else {
                    LineStart::Wrapped
                },
                ..layout
            },
        ));
    }
    lines
}

/// Append the start of a sentence to the previous line when that line is
/// shorter than `min_line_len` and the sentence's first line still fits.
fn join_short_line(
    lines: &[String],
    words: &[&str],
    settings: &WrapSettings<'_>,
    layout: Layout,
) -> Option<Vec<String>> {
    let last = lines.last()?;
    let last_width = UnicodeWidthStr::width(last.as_str());
    if last_width >= settings.min_line_len {
        return None;
    }
    let start = if lines.len() == 1 {
        layout.first_column
    } else {
        layout.next_column
    };
    let column = start + last_width + 1;
    let mut filled = fill_words(
        words,
        Layout {
            first_column: column,
            first_line: LineStart::Verbatim,
            ..layout
        },
    );
    let head_width = UnicodeWidthStr::width(filled.first()?.as_str());
    if column + head_width > layout.width {
        return None;
    }
    let head = format!("{last} {}", filled[0]);
    filled[0] = head;
    Some(filled)
}

#[cfg(test)]
mod tests;
