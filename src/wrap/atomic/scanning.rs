//! Byte-level scanning helpers used by the classifier.

/// Advance from `start` while the predicate evaluates to `true`.
///
/// Returns the byte index of the first character for which `cond` fails.
///
/// # Examples
///
/// ```rust,ignore
/// let text = "abc123";
/// let end = scan_while(text, 0, char::is_alphabetic);
/// assert_eq!(end, 3);
/// ```
pub(super) fn scan_while<F>(text: &str, start: usize, mut cond: F) -> usize
where
    F: FnMut(char) -> bool,
{
    let mut idx = start;
    for ch in text[start..].chars() {
        if !cond(ch) {
            break;
        }
        idx += ch.len_utf8();
    }
    idx
}

/// Byte index just past the character starting at `idx`.
pub(super) fn next_char_end(text: &str, idx: usize) -> usize {
    text[idx..]
        .chars()
        .next()
        .map_or(text.len(), |ch| idx + ch.len_utf8())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::alpha_prefix("abc123", 0, 3)]
    #[case::multibyte("åßç123", 0, "åßç".len())]
    #[case::empty_match("123", 0, 0)]
    fn scan_alphabetic(#[case] text: &str, #[case] start: usize, #[case] expected: usize) {
        assert_eq!(scan_while(text, start, char::is_alphabetic), expected);
    }

    #[test]
    fn next_char_end_handles_multibyte() {
        assert_eq!(next_char_end("λx", 0), "λ".len());
        assert_eq!(next_char_end("x", 1), 1);
    }
}
