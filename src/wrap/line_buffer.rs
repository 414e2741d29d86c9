//! Accumulates words into a single output line while tracking its width.

use unicode_width::UnicodeWidthStr;

/// A line under construction. `width` counts display columns from the left
/// margin, so it starts at the width of the line's prefix.
#[derive(Debug)]
pub(crate) struct LineBuffer {
    text: String,
    width: usize,
}

impl LineBuffer {
    pub(crate) fn new(column: usize) -> Self {
        Self {
            text: String::new(),
            width: column,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether `word`, preceded by a space, still ends within `limit`.
    pub(crate) fn fits(&self, word: &str, limit: usize) -> bool {
        self.width + 1 + UnicodeWidthStr::width(word) <= limit
    }

    pub(crate) fn push_word(&mut self, word: &str) {
        if !self.text.is_empty() {
            self.text.push(' ');
            self.width += 1;
        }
        self.text.push_str(word);
        self.width += UnicodeWidthStr::width(word);
    }

    /// Move the finished line into `lines` and restart at `column`.
    pub(crate) fn flush_into(&mut self, lines: &mut Vec<String>, column: usize) {
        if !self.text.is_empty() {
            lines.push(std::mem::take(&mut self.text));
        }
        self.width = column;
    }
}
