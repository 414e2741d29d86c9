//! Smart quotes and ellipses across inline element boundaries.
//!
//! Each inline scope (a paragraph, heading or table cell) is flattened into
//! [`Segment`]s. Raw text is mutable; code spans, tags, escapes and line breaks
//! are immutable but stay in the composite text so that quote pairing sees
//! them as context. Edits are planned against the composite and mapped back to
//! the raw text leaves by character offset. Quote edits replace one character
//! with one; ellipsis edits replace a three-period unit with one glyph and
//! never span two segments.

mod ellipsis;
mod quotes;
mod segments;

use segments::Segment;
use tracing::{trace, warn};

use crate::{
    ast::Node,
    config::FormatOptions,
    error::FormatError,
    walk::{InlineScope, try_walk_mut},
};

/// A planned replacement of `len` composite characters starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edit {
    start: usize,
    len: usize,
    replacement: char,
}

/// Concatenated text of one scope with per-character provenance.
struct Composite {
    chars: Vec<char>,
    /// Index of the segment each character came from.
    owner: Vec<usize>,
    mutable: Vec<bool>,
    /// Character offset at which each segment starts.
    starts: Vec<usize>,
}

impl Composite {
    fn new(segments: &[Segment]) -> Self {
        let mut composite = Self {
            chars: Vec::new(),
            owner: Vec::new(),
            mutable: Vec::new(),
            starts: Vec::with_capacity(segments.len()),
        };
        for (idx, segment) in segments.iter().enumerate() {
            composite.starts.push(composite.chars.len());
            for ch in segment.text.chars() {
                composite.chars.push(ch);
                composite.owner.push(idx);
                composite.mutable.push(segment.mutable);
            }
        }
        composite
    }

    fn plan(&self, segments: &[Segment], smart_quotes: bool, ellipses: bool) -> Vec<Edit> {
        let mut edits = Vec::new();
        if smart_quotes {
            edits.extend(quotes::quote_edits(self));
        }
        if ellipses {
            edits.extend(ellipsis::ellipsis_edits(self, segments));
        }
        edits.sort_by_key(|edit| edit.start);
        edits
    }

    /// Rebuild every mutable segment with `edits` applied.
    ///
    /// Immutable segments map to `None`. An edit reaching into immutable text
    /// or across two segments is rejected.
    fn apply(
        &self,
        segments: &[Segment],
        edits: &[Edit],
    ) -> Result<Vec<Option<String>>, FormatError> {
        let mut out: Vec<Option<String>> = segments
            .iter()
            .map(|segment| segment.mutable.then(String::new))
            .collect();
        let mut pending = edits.iter().peekable();
        let mut pos = 0;
        while pos < self.chars.len() {
            let owner = self.owner[pos];
            if let Some(edit) = pending.next_if(|edit| edit.start == pos) {
                self.check(edit)?;
                if let Some(text) = out[owner].as_mut() {
                    text.push(edit.replacement);
                }
                pos += edit.len;
                continue;
            }
            if let Some(text) = out[owner].as_mut() {
                text.push(self.chars[pos]);
            }
            pos += 1;
        }
        Ok(out)
    }

    fn check(&self, edit: &Edit) -> Result<(), FormatError> {
        let range = edit.start..edit.start + edit.len;
        let owner = self.owner.get(edit.start).copied();
        let valid = range.end <= self.chars.len()
            && range
                .clone()
                .all(|pos| self.mutable[pos] && Some(self.owner[pos]) == owner);
        if valid {
            return Ok(());
        }
        let text: String = self
            .chars
            .get(range.start..range.end.min(self.chars.len()))
            .unwrap_or_default()
            .iter()
            .collect();
        warn!(offset = edit.start, text = %text, "rejected typography edit in immutable text");
        debug_assert!(valid, "typography edit touched immutable text at {}", edit.start);
        Err(FormatError::ImmutableSegmentEdit {
            offset: edit.start,
            text,
        })
    }
}

/// Apply `edits` to plain text with no immutable regions.
fn splice(chars: &[char], edits: &[Edit]) -> String {
    let mut out = String::with_capacity(chars.len());
    let mut pending = edits.iter().peekable();
    let mut pos = 0;
    while pos < chars.len() {
        if let Some(edit) = pending.next_if(|edit| edit.start == pos) {
            out.push(edit.replacement);
            pos += edit.len;
        } else {
            out.push(chars[pos]);
            pos += 1;
        }
    }
    out
}

fn rewrite_text(text: &str, smart_quotes: bool, ellipses: bool) -> String {
    let segments = [Segment::mutable(text)];
    let composite = Composite::new(&segments);
    let edits = composite.plan(&segments, smart_quotes, ellipses);
    splice(&composite.chars, &edits)
}

/// Convert straight quotes and apostrophes in `text` to curly ones.
///
/// ```
/// use mdreflow::typography::smart_quotes;
///
/// assert_eq!(smart_quotes(r#"He said "don't.""#), "He said “don’t.”");
/// assert_eq!(smart_quotes(r#"x="foo""#), r#"x="foo""#);
/// ```
#[must_use]
pub fn smart_quotes(text: &str) -> String {
    rewrite_text(text, true, false)
}

/// Replace each run of three periods in `text` with `…`.
///
/// ```
/// use mdreflow::typography::replace_ellipses;
///
/// assert_eq!(replace_ellipses("wait.... what"), "wait…. what");
/// ```
#[must_use]
pub fn replace_ellipses(text: &str) -> String {
    rewrite_text(text, false, true)
}

/// Rewrite quotes and ellipses in every inline scope of `root`.
///
/// # Errors
///
/// Returns [`FormatError::ImmutableSegmentEdit`] if an edit would change
/// code, markup or template text. That indicates a defect in the rewriter,
/// not a problem with the input.
pub fn rewrite_typography(root: &mut Node, options: &FormatOptions) -> Result<(), FormatError> {
    if !options.typography() {
        return Ok(());
    }
    try_walk_mut(root, &mut |node: &mut Node| {
        if InlineScope::of(node.kind()).is_none() {
            return Ok(());
        }
        let Some(children) = node.children_mut() else {
            return Ok(());
        };
        rewrite_scope(children, options)
    })
}

fn rewrite_scope(children: &mut [Node], options: &FormatOptions) -> Result<(), FormatError> {
    let mut segments = Vec::new();
    segments::collect(children, &mut segments);
    let composite = Composite::new(&segments);
    let edits = composite.plan(&segments, options.smart_quotes, options.ellipses);
    if edits.is_empty() {
        return Ok(());
    }
    trace!(edits = edits.len(), segments = segments.len(), "typography edits");
    let rewritten = composite.apply(&segments, &edits)?;
    segments::replace(children, &mut rewritten.into_iter());
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::parse::parse_inlines;

    fn options() -> FormatOptions {
        FormatOptions {
            smart_quotes: true,
            ellipses: true,
            ..FormatOptions::default()
        }
    }

    fn rewrite(text: &str) -> Vec<Node> {
        let mut paragraph = Node::Paragraph(parse_inlines(text));
        rewrite_typography(&mut paragraph, &options()).expect("rewrite succeeds");
        match paragraph {
            Node::Paragraph(children) => children,
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn quotes_pair_around_code_span() {
        assert_eq!(
            rewrite("He said \"hi `code` bye\"."),
            [
                Node::RawText("He said “hi ".into()),
                Node::CodeSpan {
                    ticks: 1,
                    code: "code".into(),
                },
                Node::RawText(" bye”.".into()),
            ]
        );
    }

    #[test]
    fn quotes_pair_across_emphasis() {
        assert_eq!(
            rewrite("\"*so* it's\""),
            [
                Node::RawText("“".into()),
                Node::Emphasis {
                    delim: '*',
                    children: vec![Node::RawText("so".into())],
                },
                Node::RawText(" it’s”".into()),
            ]
        );
    }

    #[test]
    fn code_and_tags_are_untouched() {
        let text = "`\"a\"...` {{ \"b\" }} <a title=\"c\">";
        assert_eq!(rewrite(text), parse_inlines(text));
    }

    #[test]
    fn ellipsis_does_not_join_segments() {
        assert_eq!(
            rewrite("a..*.b*"),
            [
                Node::RawText("a..".into()),
                Node::Emphasis {
                    delim: '*',
                    children: vec![Node::RawText(".b".into())],
                },
            ]
        );
    }

    #[rstest]
    #[case("...", "…")]
    #[case("......", "……")]
    #[case("a..b", "a..b")]
    fn ellipses(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(replace_ellipses(input), expected);
    }

    #[test]
    fn mutable_text_keeps_character_count() {
        let text = "\"a\" 'b' c's d...";
        let out = smart_quotes(text);
        assert_eq!(out.chars().count(), text.chars().count());
    }

    #[test]
    fn scopes_do_not_share_quotes() {
        let mut doc = crate::parse::parse_document("\"open\n\nclose\"\n");
        rewrite_typography(&mut doc, &options()).expect("rewrite succeeds");
        let mut texts = Vec::new();
        crate::walk::walk_mut(&mut doc, &mut |node| {
            if let Node::RawText(text) = node {
                texts.push(text.clone());
            }
        });
        assert_eq!(texts, ["\"open", "close\""]);
    }

    #[test]
    fn disabled_options_leave_tree_alone() {
        let mut paragraph = Node::Paragraph(parse_inlines("\"a\"..."));
        let before = paragraph.clone();
        rewrite_typography(&mut paragraph, &FormatOptions::default()).expect("no-op succeeds");
        assert_eq!(paragraph, before);
    }

    fn immutable_edit() -> (Vec<Segment>, Edit) {
        let segments = vec![Segment::mutable("a"), Segment::immutable("\"b\"".into())];
        let edit = Edit {
            start: 1,
            len: 1,
            replacement: '“',
        };
        (segments, edit)
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "immutable text")]
    fn edits_in_immutable_text_are_rejected() {
        let (segments, edit) = immutable_edit();
        let composite = Composite::new(&segments);
        let _ = composite.apply(&segments, &[edit]);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn edits_in_immutable_text_are_rejected() {
        let (segments, edit) = immutable_edit();
        let composite = Composite::new(&segments);
        assert_eq!(
            composite.apply(&segments, &[edit]),
            Err(FormatError::ImmutableSegmentEdit {
                offset: 1,
                text: "\"".to_string(),
            })
        );
    }
}
