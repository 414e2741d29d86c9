//! Three periods to one ellipsis glyph.

use std::sync::LazyLock;

use regex::Regex;

use super::{Composite, Edit, segments::Segment};

static DOT_RE: LazyLock<Regex> = lazy_regex!(r"\.{3,}", "ellipsis regex should compile");

/// Plan one edit per three-period unit in each mutable segment. Leftover
/// periods of a longer run stay as they are.
pub(super) fn ellipsis_edits(composite: &Composite, segments: &[Segment]) -> Vec<Edit> {
    let mut edits = Vec::new();
    for (segment, &start) in segments.iter().zip(&composite.starts) {
        if !segment.mutable {
            continue;
        }
        for run in DOT_RE.find_iter(&segment.text) {
            let offset = start + segment.text[..run.start()].chars().count();
            let units = run.len() / 3;
            edits.extend((0..units).map(|unit| Edit {
                start: offset + unit * 3,
                len: 3,
                replacement: '…',
            }));
        }
    }
    edits
}
