//! Unit tests for paragraph wrapping.

use rstest::rstest;

use super::{WrapSettings, wrap_paragraph, wrap_segments};
use crate::config::BreakMode;

fn fixed(width: usize) -> WrapSettings<'static> {
    WrapSettings {
        width,
        ..WrapSettings::default()
    }
}

fn semantic(width: usize) -> WrapSettings<'static> {
    WrapSettings {
        width,
        break_mode: BreakMode::Semantic,
        ..WrapSettings::default()
    }
}

#[test]
fn wraps_at_width_without_splitting_words() {
    let lines = wrap_paragraph("The quick brown fox jumps over the lazy dog.", &fixed(30));
    assert_eq!(lines, ["The quick brown fox jumps over", "the lazy dog."]);
    assert!(lines.iter().all(|line| line.len() <= 30));
}

#[rstest]
#[case("a [link with words](https://example.com/x) b", "[link with words](https://example.com/x)")]
#[case("x `code span here` y", "`code span here`")]
#[case("x {% if user %}{% endif %} y", "{% if user %}{% endif %}")]
#[case("x <!-- a comment --> y", "<!-- a comment -->")]
fn atomic_tokens_survive_tiny_widths(#[case] text: &str, #[case] token: &str) {
    for width in 1..=4 {
        let lines = wrap_paragraph(text, &fixed(width));
        assert!(
            lines.iter().any(|line| line.contains(token)),
            "{token:?} split at width {width}: {lines:?}"
        );
    }
}

#[test]
fn zero_width_joins_source_lines() {
    assert_eq!(
        wrap_paragraph("one\ntwo three\nfour", &fixed(0)),
        ["one two three four"]
    );
}

#[test]
fn prefixes_apply_to_first_and_later_lines() {
    let settings = WrapSettings {
        width: 12,
        initial_indent: "> ",
        subsequent_indent: "> ",
        ..WrapSettings::default()
    };
    assert_eq!(
        wrap_paragraph("aaa bbb ccc ddd", &settings),
        ["> aaa bbb", "> ccc ddd"]
    );
}

#[test]
fn continuation_line_markers_are_escaped() {
    assert_eq!(wrap_paragraph("a list - item", &fixed(7)), ["a list", r"\- item"]);
}

#[test]
fn code_spans_with_backtick_runs_are_not_escaped() {
    assert_eq!(
        wrap_paragraph("word ```a b``` end", &fixed(6)),
        ["word", "```a b```", "end"]
    );
}

#[test]
fn lines_after_kept_breaks_escape_interrupting_markers() {
    assert_eq!(
        wrap_paragraph("{% x %}\n+\nb", &fixed(20)),
        ["{% x %}", r"\+ b"]
    );
    assert_eq!(
        wrap_paragraph("{% x %}\n1.\nb", &fixed(20)),
        ["{% x %}", r"1\. b"]
    );
    assert_eq!(wrap_paragraph("a\n2. b", &fixed(20)), ["a", "2. b"]);
}

#[test]
fn paired_template_tags_stay_together() {
    assert_eq!(
        wrap_paragraph("x {% field %} {% /field %} y", &fixed(12)),
        ["x", "{% field %} {% /field %}", "y"]
    );
}

#[test]
fn hard_breaks_end_lines_with_backslash() {
    assert_eq!(
        wrap_segments(&["one two", "three"], &fixed(88)),
        [r"one two\", "three"]
    );
    assert_eq!(wrap_segments(&["a", "", "b"], &fixed(88)), [r"a\", r"\", "b"]);
}

#[test]
fn template_tag_lines_are_kept() {
    assert_eq!(
        wrap_paragraph("{% if x %}\nsome words\nhere\n{% endif %}", &fixed(88)),
        ["{% if x %}", "some words here", "{% endif %}"]
    );
}

#[test]
fn semantic_mode_puts_sentences_on_lines() {
    assert_eq!(
        wrap_paragraph("First sentence. Second sentence that is long.", &semantic(88)),
        ["First sentence.", "Second sentence that is long."]
    );
}

#[test]
fn semantic_mode_wraps_long_sentences() {
    assert_eq!(
        wrap_paragraph(
            "Short one. This sentence is definitely too long.",
            &semantic(20)
        ),
        ["Short one.", "This sentence is", "definitely too long."]
    );
}

#[test]
fn semantic_mode_joins_short_lines() {
    let settings = WrapSettings {
        min_line_len: 15,
        ..semantic(40)
    };
    assert_eq!(
        wrap_paragraph("Hi. This is a sentence. And another.", &settings),
        ["Hi. This is a sentence.", "And another."]
    );
}

#[test]
fn semantic_mode_is_disabled_by_zero_width() {
    assert_eq!(wrap_paragraph("One. Two.", &semantic(0)), ["One. Two."]);
}

#[test]
fn wide_characters_use_display_width() {
    assert_eq!(wrap_paragraph("漢字 漢字 漢字", &fixed(9)), ["漢字 漢字", "漢字"]);
}

#[test]
fn empty_text_has_no_lines() {
    assert!(wrap_paragraph("", &fixed(10)).is_empty());
}
