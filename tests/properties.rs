//! Properties that must hold for any input: idempotence, atomic tokens,
//! code isolation, metadata passthrough and length preservation.

#[macro_use]
mod prelude;
use mdreflow::{
    typography::{replace_ellipses, smart_quotes},
    wrap::{WrapSettings, wrap_paragraph},
};
use prelude::*;

const CORPUS: &str = r#"---
title: "Sample"
tags: [a, b]
---
Setext heading
==============

Intro paragraph with a [link to the documentation](https://example.com/docs?q=1 "Docs")
and some `inline code with "quotes"` plus *emphasis* and **strong** text... It has
several sentences. Dr. Smith wrote e.g. this one! Does it work? Yes.

> Quoted text that is long enough to need wrapping when the width is small, with a
> second line.
>
> - nested list in quote
> - second item

1. First item with a fairly long description that wraps
2. Second item
   - nested bullet with `code`
   - another nested bullet

   Trailing paragraph in item two.

- [ ] unchecked task
- [x] checked task

| Column | Other |
|:-------|------:|
| "a"    | b \| c |

```python
def f(x="default"):
    return x...
```

    indented code "stays"

<div class="note">
  Raw "HTML" block...
</div>

Text with <span title="x">inline html</span> and {% tag "arg" %} and a footnote.[^1]
Hard break here\
next line.

***

[^1]: The footnote text, which is also long enough to wrap around at narrow widths.

[ref]: https://example.com "Title"
"#;

fn option_grid() -> Vec<FormatOptions> {
    let mut grid = Vec::new();
    for width in [0, 20, 40, 88] {
        for break_mode in [BreakMode::Fixed, BreakMode::Semantic] {
            for list_spacing in [ListSpacing::Preserve, ListSpacing::Loose, ListSpacing::Tight] {
                grid.push(FormatOptions {
                    width,
                    break_mode,
                    list_spacing,
                    smart_quotes: true,
                    ellipses: true,
                    ..FormatOptions::default()
                });
            }
        }
    }
    grid
}

#[test]
fn formatting_is_idempotent() {
    for options in option_grid() {
        assert_idempotent(CORPUS, &options);
    }
}

#[rstest]
#[case("a\n\n\n\nb\n")]
#[case("- a\n-\n- c\n")]
#[case("* a\n- b\n+ c\n")]
#[case("> quote\nlazy continuation\n")]
#[case("para\n- - -\n")]
#[case("text ending with a number\n2. not a list\n")]
#[case("Line with trailing backslash\\\nnext\n")]
#[case("- item\n\n  ```\n  code\n  ```\n")]
#[case("{% if a %}\ntext\n{% endif %}\n")]
#[case("<!-- comment -->\nafter\n")]
#[case("a\n+\nb\n")]
#[case("- a\n  +\n  b\n")]
#[case("a\n1.\nb\n")]
#[case("{% x %}\n+\nb\n")]
#[case("{% x %}\n1.\nb\n")]
#[case("a\\\n+\nb\n")]
#[case("text\n2.\nlongword\n")]
#[case("aaaaaa >bcd\n")]
#[case("word ```a b``` end\n")]
#[case("x {% field %} {% /field %} y\n")]
fn edge_cases_are_idempotent(#[case] input: &str) {
    for width in [0, 8, 30] {
        for break_mode in [BreakMode::Fixed, BreakMode::Semantic] {
            let options = FormatOptions {
                width,
                break_mode,
                ..FormatOptions::default()
            };
            assert_idempotent(input, &options);
        }
    }
}

#[test]
fn words_that_look_like_markers_survive_narrow_wrapping() {
    let input = "one - two + three * four > five # six 7. seven 8) eight --- nine === ten \
                 >b eleven >= twelve ```a b``` thirteen\n";
    for width in 1..=12 {
        let options = FormatOptions {
            width,
            ..FormatOptions::default()
        };
        assert_idempotent(input, &options);
    }
}

#[test]
fn atomic_tokens_are_never_split() {
    let text = "see [a long link text](http://x.io/a_(b)) then `code with spaces` and \
                {{ template tag }} plus <!-- a comment --> end";
    let atoms = [
        "[a long link text](http://x.io/a_(b))",
        "`code with spaces`",
        "{{ template tag }}",
        "<!-- a comment -->",
    ];
    for width in 1..=40 {
        let settings = WrapSettings {
            width,
            ..WrapSettings::default()
        };
        let lines = wrap_paragraph(text, &settings);
        for atom in atoms {
            assert!(
                lines.iter().any(|line| line.contains(atom)),
                "{atom:?} split at width {width}: {lines:?}"
            );
        }
    }
}

#[test]
fn code_is_byte_identical() {
    let options = FormatOptions {
        width: 10,
        smart_quotes: true,
        ellipses: true,
        ..FormatOptions::default()
    };
    let out = format(CORPUS, &options);
    for fragment in [
        "`inline code with \"quotes\"`",
        "def f(x=\"default\"):\n    return x...",
        "indented code \"stays\"",
        "  Raw \"HTML\" block...",
        "{% tag \"arg\" %}",
        "<span title=\"x\">",
    ] {
        assert!(out.contains(fragment), "{fragment:?} changed in:\n{out}");
    }
}

#[test]
fn metadata_block_is_byte_identical() {
    let meta: String = CORPUS.split_inclusive('\n').take(4).collect();
    let out = format(CORPUS, &FormatOptions::default());
    assert!(out.starts_with(&meta));
}

#[rstest]
#[case("\"quoted\" and 'single' and it's")]
#[case("wait... what.... ok")]
#[case("\"nested 'inner' outer\" -- students' rooms")]
fn substitutions_preserve_character_units(#[case] text: &str) {
    let quoted = smart_quotes(text);
    assert_eq!(quoted.chars().count(), text.chars().count());
    let dots = text.matches("...").count();
    let ellipsed = replace_ellipses(text);
    assert_eq!(ellipsed.chars().count(), text.chars().count() - 2 * dots);
}
