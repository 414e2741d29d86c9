//! Quote pairing and apostrophes.
//!
//! Quotes are paired with a stack so that nested quotes of the same style
//! resolve innermost first. A quote that finds no partner stays straight
//! unless it is an apostrophe in a contraction or plural possessive.

use super::{Composite, Edit};

const OPEN_BRACKETS: [char; 3] = ['(', '[', '{'];
const DASHES: [char; 3] = ['-', '–', '—'];
const CLOSING_PUNCTUATION: [char; 9] = ['.', ',', ';', ':', '!', '?', ')', ']', '}'];
const CONTRACTION_SUFFIXES: [&str; 7] = ["m", "s", "t", "d", "ll", "re", "ve"];

fn other_style(quote: char) -> [char; 3] {
    if quote == '"' {
        ['\'', '‘', '’']
    } else {
        ['"', '“', '”']
    }
}

fn curly(quote: char, opening: bool) -> char {
    match (quote, opening) {
        ('"', true) => '“',
        ('"', false) => '”',
        (_, true) => '‘',
        (_, false) => '’',
    }
}

fn matching_bracket(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

fn before(chars: &[char], idx: usize) -> Option<char> {
    idx.checked_sub(1).map(|prev| chars[prev])
}

fn can_open(chars: &[char], idx: usize) -> bool {
    let quote = chars[idx];
    let Some(next) = chars.get(idx + 1).copied() else {
        return false;
    };
    if next.is_whitespace() || next == quote {
        return false;
    }
    before(chars, idx).is_none_or(|prev| {
        prev.is_whitespace()
            || OPEN_BRACKETS.contains(&prev)
            || DASHES.contains(&prev)
            || other_style(quote).contains(&prev)
    })
}

fn can_close(chars: &[char], idx: usize) -> bool {
    let quote = chars[idx];
    let Some(prev) = before(chars, idx) else {
        return false;
    };
    if prev.is_whitespace() || prev == quote || prev == '\\' || prev == '=' {
        return false;
    }
    chars.get(idx + 1).is_none_or(|&next| {
        next.is_whitespace()
            || CLOSING_PUNCTUATION.contains(&next)
            || DASHES.contains(&next)
            || other_style(quote).contains(&next)
    })
}

/// Whether `idx` starts a blank line: a newline, optional blanks, then
/// another newline.
fn is_paragraph_break(chars: &[char], idx: usize) -> bool {
    chars[idx] == '\n'
        && chars[idx + 1..]
            .iter()
            .find(|&&ch| ch != ' ' && ch != '\t')
            .is_some_and(|&ch| ch == '\n')
}

/// Quote pairs are code-like when the opener directly follows a bracket and
/// the closer directly precedes its partner, as in `f("x")`.
fn is_code_like(chars: &[char], open: usize, close: usize) -> bool {
    before(chars, open)
        .and_then(matching_bracket)
        .is_some_and(|bracket| chars.get(close + 1) == Some(&bracket))
}

fn is_contraction(chars: &[char], idx: usize) -> bool {
    if !before(chars, idx).is_some_and(char::is_alphabetic) {
        return false;
    }
    let suffix: String = chars[idx + 1..]
        .iter()
        .take_while(|ch| ch.is_alphabetic())
        .collect::<String>()
        .to_lowercase();
    CONTRACTION_SUFFIXES.contains(&suffix.as_str())
}

fn is_plural_possessive(chars: &[char], idx: usize) -> bool {
    if before(chars, idx) != Some('s') {
        return false;
    }
    if chars.get(idx + 1).is_some_and(|ch| ch.is_alphanumeric()) {
        return false;
    }
    let word_start = chars[..idx]
        .iter()
        .rposition(|ch| !ch.is_alphabetic())
        .map_or(0, |pos| pos + 1);
    before(chars, word_start).is_none_or(|ch| {
        ch.is_whitespace()
            || OPEN_BRACKETS.contains(&ch)
            || DASHES.contains(&ch)
            || matches!(ch, '"' | '“' | '‘')
    })
}

/// Plan curly-quote edits over the mutable characters of `composite`.
pub(super) fn quote_edits(composite: &Composite) -> Vec<Edit> {
    let chars = composite.chars.as_slice();
    let mut edits = Vec::new();
    let mut paired = vec![false; chars.len()];
    let mut stack: Vec<(char, usize)> = Vec::new();
    for idx in 0..chars.len() {
        let ch = chars[idx];
        if ch == '\n' && is_paragraph_break(chars, idx) {
            stack.clear();
            continue;
        }
        if !matches!(ch, '"' | '\'') || !composite.mutable[idx] {
            continue;
        }
        let partner = stack.iter().rposition(|&(quote, _)| quote == ch);
        if let Some(depth) = partner.filter(|_| can_close(chars, idx)) {
            let open = stack[depth].1;
            stack.truncate(depth);
            if is_code_like(chars, open, idx) {
                continue;
            }
            paired[open] = true;
            paired[idx] = true;
            edits.push(Edit {
                start: open,
                len: 1,
                replacement: curly(ch, true),
            });
            edits.push(Edit {
                start: idx,
                len: 1,
                replacement: curly(ch, false),
            });
        } else if can_open(chars, idx) {
            stack.push((ch, idx));
        }
    }
    for idx in 0..chars.len() {
        if chars[idx] == '\''
            && composite.mutable[idx]
            && !paired[idx]
            && (is_contraction(chars, idx) || is_plural_possessive(chars, idx))
        {
            edits.push(Edit {
                start: idx,
                len: 1,
                replacement: '’',
            });
        }
    }
    edits
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::typography::smart_quotes;

    #[rstest]
    #[case::scenario(r#"He said "hello" to them."#, "He said “hello” to them.")]
    #[case::single("it was 'fine', really", "it was ‘fine’, really")]
    #[case::nested(r#""she said 'no'""#, "“she said ‘no’”")]
    #[case::nested_same_style(r#""a "b" c""#, "“a “b” c”")]
    #[case::dash(r#"yes—"maybe"—no"#, "yes—“maybe”—no")]
    #[case::bracketed(r#"("quoted")"#, r#"("quoted")"#)]
    #[case::assignment(r#"x="foo""#, r#"x="foo""#)]
    #[case::call(r#"print("hi")"#, r#"print("hi")"#)]
    #[case::unterminated(r#"a "dangling quote"#, r#"a "dangling quote"#)]
    #[case::doubled(r#"""#, r#"""#)]
    #[case::across_blank_line("\"a\n\nb\"", "\"a\n\nb\"")]
    fn pairs(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(smart_quotes(input), expected);
    }

    #[rstest]
    #[case("I'm here", "I’m here")]
    #[case("don't", "don’t")]
    #[case("it'll", "it’ll")]
    #[case("we've", "we’ve")]
    #[case("they're", "they’re")]
    #[case("she'd", "she’d")]
    #[case("Jill's book", "Jill’s book")]
    #[case("James' car", "James’ car")]
    #[case("the students' rooms", "the students’ rooms")]
    #[case("the '60s", "the '60s")]
    #[case("Blah'blah'blah", "Blah'blah'blah")]
    #[case("$James' fee", "$James' fee")]
    fn apostrophes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(smart_quotes(input), expected);
    }
}
