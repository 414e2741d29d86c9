//! Utility helpers shared across integration tests.

use mdreflow::{FormatOptions, format_markdown};
use unicode_width::UnicodeWidthStr;

/// Build a `Vec<String>` from a list of string slices.
macro_rules! lines_vec {
    ($($line:expr),* $(,)?) => {
        vec![$($line.to_string()),*]
    };
}

/// Format `input`, failing the test on error.
pub fn format(input: &str, options: &FormatOptions) -> String {
    format_markdown(input, options).expect("formatting should succeed")
}

/// Assert that formatting the output of `format` again changes nothing.
pub fn assert_idempotent(input: &str, options: &FormatOptions) {
    let once = format(input, options);
    let twice = format(&once, options);
    assert_eq!(once, twice, "second pass changed the output of {input:?}");
}

/// Assert that every line of `text` fits in `width` columns unless it is a
/// single unbreakable word.
pub fn assert_max_width(text: &str, width: usize) {
    for line in text.lines() {
        let fits = UnicodeWidthStr::width(line) <= width;
        let single_word = !line.trim().contains(' ');
        assert!(fits || single_word, "line exceeds {width} columns: {line:?}");
    }
}
