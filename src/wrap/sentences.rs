//! Heuristic sentence segmentation for semantic line breaks.
//!
//! A sentence ends at `.`, `!` or `?` (optionally followed by closing quotes
//! or brackets) when whitespace and then an upper-case letter or the end of
//! the text follow. Common abbreviations, initials and dotted forms such as
//! `e.g.` or `p.m.` do not end a sentence, and neither does punctuation inside
//! an atomic span or an open parenthesis. The abbreviation list is a
//! heuristic; it is tuned for English prose.

use std::{ops::Range, sync::LazyLock};

use regex::{Match, Regex};

use super::atomic::atomic_spans;

static BOUNDARY_RE: LazyLock<Regex> = lazy_regex!(
    r#"[.!?]+["'”’)\]]*\s+"#,
    "sentence boundary regex should compile",
);

static DOTTED_RE: LazyLock<Regex> = lazy_regex!(
    r"^(?:[A-Za-z]\.)+[A-Za-z]$",
    "dotted abbreviation regex should compile",
);

const ABBREVIATIONS: &[&str] = &[
    "Mr", "Mrs", "Ms", "Dr", "Prof", "Sr", "Jr", "St", "vs", "cf", "al", "approx", "Fig", "fig",
    "No", "Inc", "Ltd", "Co", "Mt", "Gen", "Col", "Capt", "Lt", "Sgt", "Rev", "Hon", "Vol", "pp",
];

const OPENING_CHARS: &[char] = &['"', '\'', '“', '‘', '(', '[', '*', '_'];

/// Lazily yields the sentences of a text.
///
/// The iterator is [`Clone`], so a partially consumed sequence can be
/// restarted from its current position. Joining the yielded slices with the
/// whitespace between them reconstructs the input.
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    text: &'a str,
    spans: Vec<Range<usize>>,
    pos: usize,
}

/// Split `text` into sentences.
///
/// ```
/// use mdreflow::wrap::split_sentences;
///
/// let sentences: Vec<_> = split_sentences("Dr. Smith left. He was late.").collect();
/// assert_eq!(sentences, ["Dr. Smith left.", "He was late."]);
/// ```
#[must_use]
pub fn split_sentences(text: &str) -> Sentences<'_> {
    Sentences {
        text,
        spans: atomic_spans(text),
        pos: 0,
    }
}

impl Sentences<'_> {
    fn in_atomic(&self, idx: usize) -> bool {
        let i = self.spans.partition_point(|span| span.end <= idx);
        self.spans.get(i).is_some_and(|span| span.start <= idx)
    }

    /// Net count of unclosed parentheses between the sentence start and
    /// `end`, ignoring atomic spans.
    fn open_parens(&self, end: usize) -> usize {
        let mut depth = 0usize;
        for (offset, ch) in self.text[self.pos..end].char_indices() {
            if self.in_atomic(self.pos + offset) {
                continue;
            }
            match ch {
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        depth
    }

    /// Where the sentence ends if `candidate` is a real boundary.
    fn boundary_end(&self, candidate: Match<'_>) -> Option<usize> {
        let start = candidate.start();
        let matched = candidate.as_str();
        let end = start + matched.find(char::is_whitespace).unwrap_or(matched.len());
        if self.in_atomic(start) || self.in_atomic(end - 1) {
            return None;
        }
        let next = self.text[candidate.end()..].trim_start_matches(OPENING_CHARS);
        let at_end = candidate.end() == self.text.len();
        if !at_end && !next.starts_with(char::is_uppercase) {
            return None;
        }
        if self.open_parens(end) > 0 {
            return None;
        }
        let punct = &self.text[start..end];
        if punct.starts_with('.') && !punct.starts_with("..") && self.abbreviation_before(start) {
            return None;
        }
        Some(end)
    }

    fn abbreviation_before(&self, dot: usize) -> bool {
        let head = &self.text[self.pos..dot];
        let word = head
            .rsplit(char::is_whitespace)
            .next()
            .unwrap_or(head)
            .trim_start_matches(OPENING_CHARS);
        let single_capital = {
            let mut chars = word.chars();
            matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
        };
        single_capital || ABBREVIATIONS.contains(&word) || DOTTED_RE.is_match(word)
    }
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let text = self.text;
        if self.pos >= text.len() {
            return None;
        }
        let mut search = self.pos;
        while let Some(candidate) = BOUNDARY_RE.find_at(text, search) {
            search = candidate.end();
            if let Some(end) = self.boundary_end(candidate) {
                let sentence = &text[self.pos..end];
                self.pos = candidate.end();
                return Some(sentence);
            }
        }
        let rest = &text[self.pos..];
        self.pos = text.len();
        Some(rest)
    }
}
