//! Leading metadata block detection.
//!
//! A document may open with a block delimited by `---` lines (YAML front
//! matter). The block is split off before parsing and written back unchanged.

use tracing::debug;

/// Split a leading metadata block from `text`.
///
/// Returns the block, delimiters and trailing newline included, and the
/// remaining body. The first line must be exactly `---` and the block ends at
/// the next line consisting of `---` with optional trailing spaces or tabs.
/// Without a closing delimiter there is no block and the whole input is the
/// body.
///
/// ```
/// use mdreflow::frontmatter::split_frontmatter;
///
/// let (meta, body) = split_frontmatter("---\ntitle: x\n---\n# Doc\n");
/// assert_eq!(meta, Some("---\ntitle: x\n---\n"));
/// assert_eq!(body, "# Doc\n");
/// ```
#[must_use]
pub fn split_frontmatter(text: &str) -> (Option<&str>, &str) {
    let Some(rest) = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    else {
        return (None, text);
    };
    let mut offset = text.len() - rest.len();
    for line in rest.split_inclusive('\n') {
        let end = offset + line.len();
        if line.trim_end_matches(['\n', '\r']).trim_end_matches([' ', '\t']) == "---" {
            debug!(bytes = end, "found metadata block");
            return (Some(&text[..end]), &text[end..]);
        }
        offset = end;
    }
    (None, text)
}

/// Join a metadata block and a formatted body.
#[must_use]
pub fn reattach(meta: Option<&str>, body: &str) -> String {
    match meta {
        None => body.to_string(),
        Some(meta) if body.is_empty() => meta.to_string(),
        Some(meta) => {
            let mut out = String::with_capacity(meta.len() + body.len() + 2);
            out.push_str(meta);
            if !meta.ends_with('\n') {
                out.push('\n');
            }
            out.push('\n');
            out.push_str(body);
            out
        }
    }
}
