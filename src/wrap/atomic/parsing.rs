//! Recognisers for the constructs the classifier keeps whole.
//!
//! Each function receives the full text and the byte index of the construct's
//! first character and returns the index just past its end, or `None` when the
//! construct is not closed.

use super::scanning::{next_char_end, scan_while};

/// Backslash followed by ASCII punctuation.
pub(crate) fn escape_end(text: &str, idx: usize) -> Option<usize> {
    let next = text[idx + 1..].chars().next()?;
    next.is_ascii_punctuation().then(|| idx + 1 + next.len_utf8())
}

/// End of the backtick run starting at `idx`.
pub(crate) fn backtick_run_end(text: &str, idx: usize) -> usize {
    scan_while(text, idx, |ch| ch == '`')
}

/// Code span opened by the backtick run at `idx` and closed by a run of the
/// same length.
///
/// ```rust,ignore
/// assert_eq!(code_span_end("``a ` b`` c", 0), Some(9));
/// assert_eq!(code_span_end("`open", 0), None);
/// ```
pub(crate) fn code_span_end(text: &str, idx: usize) -> Option<usize> {
    let fence_end = backtick_run_end(text, idx);
    let fence_len = fence_end - idx;
    let mut pos = fence_end;
    while let Some(offset) = text[pos..].find('`') {
        let run_start = pos + offset;
        let run_end = backtick_run_end(text, run_start);
        if run_end - run_start == fence_len {
            return Some(run_end);
        }
        pos = run_end;
    }
    None
}

/// Link or image starting at `idx` (`[` or `![`).
///
/// Recognises `[text](dest)` with nested parentheses in the destination,
/// `[text][ref]` and bare `[text]`. Brackets nest inside the text and
/// backslash escapes and code spans are skipped.
pub(crate) fn link_end(text: &str, idx: usize) -> Option<usize> {
    let open = if text[idx..].starts_with("![") {
        idx + 1
    } else {
        idx
    };
    let close = matching_bracket(text, open)?;
    let after = close + 1;
    let rest = &text[after..];
    if rest.starts_with('(') {
        return Some(matching_paren(text, after).unwrap_or(after));
    }
    if rest.starts_with('[')
        && let Some(end) = text[after..].find(']')
    {
        return Some(after + end + 1);
    }
    Some(after)
}

/// Index of the `]` closing the `[` at `open`.
pub(crate) fn matching_bracket(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut pos = open;
    while pos < text.len() {
        let ch = text[pos..].chars().next()?;
        match ch {
            '\\' => {
                pos = next_char_end(text, pos + 1).max(pos + 1);
                continue;
            }
            '`' => {
                pos = code_span_end(text, pos).unwrap_or_else(|| backtick_run_end(text, pos));
                continue;
            }
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(pos);
                }
            }
            _ => {}
        }
        pos += ch.len_utf8();
    }
    None
}

/// Index just past the `)` closing the `(` at `open`, tracking nesting.
pub(crate) fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut pos = open;
    while pos < text.len() {
        let ch = text[pos..].chars().next()?;
        match ch {
            '\\' => {
                pos = next_char_end(text, pos + 1).max(pos + 1);
                continue;
            }
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(pos + 1);
                }
            }
            _ => {}
        }
        pos += ch.len_utf8();
    }
    None
}

/// Template tag: `{% … %}`, `{{ … }}` or `{# … #}`.
pub(crate) fn template_tag_end(text: &str, idx: usize) -> Option<usize> {
    let close = match text[idx..].get(..2)? {
        "{%" => "%}",
        "{{" => "}}",
        "{#" => "#}",
        _ => return None,
    };
    text[idx + 2..]
        .find(close)
        .map(|offset| idx + 2 + offset + close.len())
}

/// HTML comment or opening/closing HTML tag (autolinks included).
pub(crate) fn html_end(text: &str, idx: usize) -> Option<usize> {
    let rest = &text[idx..];
    if rest.starts_with("<!--") {
        return rest[4..].find("-->").map(|offset| idx + 4 + offset + 3);
    }
    let after = rest.strip_prefix("</").unwrap_or(&rest[1..]);
    if !after.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let close = rest.find('>')?;
    if rest[1..close].contains('<') {
        return None;
    }
    Some(idx + close + 1)
}

const TAG_DELIMITERS: [(&str, &str); 4] =
    [("{%", "%}"), ("{{", "}}"), ("{#", "#}"), ("<!--", "-->")];

fn tag_opener(text: &str, idx: usize) -> Option<&'static str> {
    TAG_DELIMITERS
        .iter()
        .map(|&(open, _)| open)
        .find(|open| text[idx..].starts_with(open))
}

fn is_closing_tag(text: &str, idx: usize, open: &str) -> bool {
    text[idx + open.len()..].trim_start().starts_with('/')
}

/// Extend a template tag or comment ending at `end` over a directly
/// following closing partner of the same family, as in
/// `{% field %} {% /field %}`.
pub(crate) fn paired_tag_end(text: &str, idx: usize, end: usize) -> Option<usize> {
    let open = tag_opener(text, idx)?;
    if is_closing_tag(text, idx, open) {
        return None;
    }
    let partner = scan_while(text, end, char::is_whitespace);
    if !text[partner..].starts_with(open) || !is_closing_tag(text, partner, open) {
        return None;
    }
    if open == "<!--" {
        html_end(text, partner)
    } else {
        template_tag_end(text, partner)
    }
}
