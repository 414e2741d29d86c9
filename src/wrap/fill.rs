//! Greedy line filling.

use std::borrow::Cow;

use super::{
    escape::{escape_block_start, escape_line_start},
    line_buffer::LineBuffer,
};

/// How the first word of the first line is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineStart {
    /// The paragraph's own first line, already parsed as paragraph text.
    Verbatim,
    /// A preserved source line break; escaped if it would interrupt a
    /// paragraph.
    SourceBreak,
    /// A break chosen by the filler; escaped like every later line.
    Wrapped,
}

/// Where lines start and how wide they may grow.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Layout {
    /// Maximum line width in columns; `0` disables breaking.
    pub(crate) width: usize,
    /// Column at which the first line starts.
    pub(crate) first_column: usize,
    /// Column at which every later line starts.
    pub(crate) next_column: usize,
    /// Treatment of the first word of the first line.
    pub(crate) first_line: LineStart,
}

/// Greedily pack `words` into lines separated by single spaces.
///
/// A word that does not fit after the current content starts a new line; a
/// word wider than the whole line sits on a line of its own. The first word
/// of every line after the first is escaped when it would otherwise read as
/// block syntax, and the escaped width is what counts for fitting.
pub(crate) fn fill_words(words: &[&str], layout: Layout) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = LineBuffer::new(layout.first_column);
    for &word in words {
        if line.is_empty() {
            let start = if lines.is_empty() {
                layout.first_line
            } else {
                LineStart::Wrapped
            };
            let word = match start {
                LineStart::Verbatim => Cow::Borrowed(word),
                LineStart::SourceBreak => escape_block_start(word),
                LineStart::Wrapped => escape_line_start(word),
            };
            line.push_word(&word);
        } else if layout.width == 0 || line.fits(word, layout.width) {
            line.push_word(word);
        } else {
            line.flush_into(&mut lines, layout.next_column);
            line.push_word(&escape_line_start(word));
        }
    }
    line.flush_into(&mut lines, layout.next_column);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(width: usize) -> Layout {
        Layout {
            width,
            first_column: 0,
            next_column: 0,
            first_line: LineStart::Verbatim,
        }
    }

    #[test]
    fn fills_greedily() {
        let words = ["The", "quick", "brown", "fox", "jumps"];
        assert_eq!(fill_words(&words, layout(15)), ["The quick brown", "fox jumps"]);
    }

    #[test]
    fn overlong_word_gets_its_own_line() {
        let words = ["a", "https://example.com/a/very/long/path", "b"];
        assert_eq!(
            fill_words(&words, layout(10)),
            ["a", "https://example.com/a/very/long/path", "b"]
        );
    }

    #[test]
    fn zero_width_never_breaks() {
        let words = ["one", "two", "three"];
        assert_eq!(fill_words(&words, layout(0)), ["one two three"]);
    }

    #[test]
    fn columns_reduce_available_width() {
        let words = ["aaaa", "bbbb", "cccc"];
        let lines = fill_words(
            &words,
            Layout {
                width: 12,
                first_column: 4,
                next_column: 2,
                first_line: LineStart::Verbatim,
            },
        );
        assert_eq!(lines, ["aaaa", "bbbb cccc"]);
    }

    #[test]
    fn continuation_lines_escape_markers() {
        let words = ["count", "-", "one", "2.", "x"];
        assert_eq!(fill_words(&words, layout(6)), ["count", r"\- one", r"2\. x"]);
    }

    #[test]
    fn first_word_is_left_alone() {
        assert_eq!(fill_words(&["-"], layout(10)), ["-"]);
        let escaped = fill_words(
            &["-"],
            Layout {
                first_line: LineStart::Wrapped,
                ..layout(10)
            },
        );
        assert_eq!(escaped, [r"\-"]);
    }

    #[test]
    fn source_breaks_escape_only_interrupting_markers() {
        let at_break = |words: &[&str]| {
            fill_words(
                words,
                Layout {
                    first_line: LineStart::SourceBreak,
                    ..layout(10)
                },
            )
        };
        assert_eq!(at_break(&["+", "b"]), [r"\+ b"]);
        assert_eq!(at_break(&["1.", "b"]), [r"1\. b"]);
        assert_eq!(at_break(&["2.", "b"]), ["2. b"]);
        assert_eq!(at_break(&["b", "+"]), ["b +"]);
    }
}
