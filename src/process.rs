//! The formatting pipeline.

use tracing::debug;

use crate::{
    config::FormatOptions,
    error::FormatError,
    frontmatter::{reattach, split_frontmatter},
    lists::normalize_list_spacing,
    parse::parse_document,
    render::render_document,
    typography::{replace_ellipses, rewrite_typography, smart_quotes},
    wrap::{WrapSettings, wrap_paragraph},
};

/// Format a Markdown document.
///
/// A leading metadata block is split off first and reattached unchanged. The
/// rest is parsed, typography and list spacing are applied as configured and
/// the tree is rendered with paragraphs rewrapped. With
/// [`FormatOptions::plaintext`] set the input is handed to [`fill_text`]
/// instead.
///
/// # Errors
///
/// Returns [`FormatError::ImmutableSegmentEdit`] if the typography rewriter
/// tries to change code, markup or template text. Malformed Markdown is not
/// an error.
pub fn format_markdown(text: &str, options: &FormatOptions) -> Result<String, FormatError> {
    if options.plaintext {
        return Ok(fill_text(text, options));
    }
    let (meta, body) = split_frontmatter(text);
    let mut doc = parse_document(body);
    rewrite_typography(&mut doc, options)?;
    normalize_list_spacing(&mut doc, options.list_spacing);
    let rendered = render_document(&doc, options);
    debug!(
        input = text.len(),
        output = rendered.len(),
        metadata = meta.is_some(),
        "formatted document"
    );
    Ok(reattach(meta, &rendered))
}

/// Wrap plain text paragraphs separated by blank lines.
///
/// ```
/// use mdreflow::{FormatOptions, fill_text};
///
/// let options = FormatOptions { width: 10, ..FormatOptions::default() };
/// assert_eq!(fill_text("a b c d e f g\n\nh\n", &options), "a b c d e\nf g\n\nh\n");
/// ```
#[must_use]
pub fn fill_text(text: &str, options: &FormatOptions) -> String {
    let settings = WrapSettings {
        width: options.width,
        break_mode: options.break_mode,
        min_line_len: options.min_line_len,
        ..WrapSettings::default()
    };
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines().chain(std::iter::once("")) {
        if !line.trim().is_empty() {
            current.push(line.trim());
            continue;
        }
        if current.is_empty() {
            continue;
        }
        let mut paragraph = current.join(" ");
        current.clear();
        if options.smart_quotes {
            paragraph = smart_quotes(&paragraph);
        }
        if options.ellipses {
            paragraph = replace_ellipses(&paragraph);
        }
        paragraphs.push(wrap_paragraph(&paragraph, &settings).join("\n"));
    }
    debug!(paragraphs = paragraphs.len(), "filled plain text");
    if paragraphs.is_empty() {
        return String::new();
    }
    let mut out = paragraphs.join("\n\n");
    out.push('\n');
    out
}
