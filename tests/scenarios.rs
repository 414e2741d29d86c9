//! End-to-end formatting scenarios.

#[macro_use]
mod prelude;
use prelude::*;

fn typography() -> FormatOptions {
    FormatOptions {
        smart_quotes: true,
        ellipses: true,
        ..FormatOptions::default()
    }
}

#[test]
fn smart_quotes_in_plain_paragraph() {
    assert_eq!(
        format("He said \"hello\" to them.\n", &typography()),
        "He said “hello” to them.\n"
    );
}

#[test]
fn smart_quotes_around_code_span() {
    assert_eq!(
        format("He said \"hi `code` bye\".\n", &typography()),
        "He said “hi `code` bye”.\n"
    );
}

#[test]
fn fixed_width_wrap() {
    let options = FormatOptions {
        width: 30,
        ..FormatOptions::default()
    };
    let out = format("The quick brown fox jumps over the lazy dog.\n", &options);
    assert_eq!(out, "The quick brown fox jumps over\nthe lazy dog.\n");
    assert_max_width(&out, 30);
}

#[test]
fn semantic_breaks_put_sentences_on_lines() {
    let options = FormatOptions {
        break_mode: BreakMode::Semantic,
        ..FormatOptions::default()
    };
    assert_eq!(
        format("First sentence. Second sentence that is long.\n", &options),
        "First sentence.\nSecond sentence that is long.\n"
    );
}

#[rstest]
#[case::tight_stays_tight("- a\n- b\n", ListSpacing::Tight, "- a\n- b\n")]
#[case::loose_adds_blank("- a\n- b\n", ListSpacing::Loose, "- a\n\n- b\n")]
#[case::nested_stays_loose(
    "- a\n\n  - x\n- b\n",
    ListSpacing::Tight,
    "- a\n\n  - x\n\n- b\n"
)]
fn list_spacing(#[case] input: &str, #[case] spacing: ListSpacing, #[case] expected: &str) {
    let options = FormatOptions {
        list_spacing: spacing,
        ..FormatOptions::default()
    };
    assert_eq!(format(input, &options), expected);
}

#[test]
fn zero_width_only_joins_source_lines() {
    let options = FormatOptions {
        width: 0,
        ..FormatOptions::default()
    };
    let long = "word ".repeat(60);
    let input = format!("{}\n\nshort\nlines here\n", long.trim_end());
    let out = format(&input, &options);
    assert_eq!(out, format!("{}\n\nshort lines here\n", long.trim_end()));
}
