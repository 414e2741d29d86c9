//! List spacing normalisation.
//!
//! Each list decides on its own whether it renders tight or loose, so nested
//! lists are normalised independently of their parents.

use crate::{
    ast::{List, Node},
    config::ListSpacing,
    walk::walk_mut,
};

/// Apply `policy` to every list under `root`.
///
/// ```
/// use mdreflow::{ListSpacing, ast::Node, lists::normalize_list_spacing, parse::parse_document};
///
/// let mut doc = parse_document("- a\n- b\n");
/// normalize_list_spacing(&mut doc, ListSpacing::Loose);
/// let Node::Document(blocks) = doc else { unreachable!() };
/// assert!(matches!(&blocks[0], Node::List(list) if !list.tight));
/// ```
pub fn normalize_list_spacing(root: &mut Node, policy: ListSpacing) {
    if policy == ListSpacing::Preserve {
        return;
    }
    walk_mut(root, &mut |node| {
        if let Node::List(list) = node {
            list.tight = tightness(list, policy);
        }
    });
}

fn tightness(list: &List, policy: ListSpacing) -> bool {
    match policy {
        ListSpacing::Preserve => list.tight,
        ListSpacing::Loose => false,
        ListSpacing::Tight => list.items.iter().all(|item| item.block_child_count() <= 1),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::parse::parse_document;

    fn tightness_of(text: &str, policy: ListSpacing) -> Vec<bool> {
        let mut doc = parse_document(text);
        normalize_list_spacing(&mut doc, policy);
        let mut found = Vec::new();
        walk_mut(&mut doc, &mut |node| {
            if let Node::List(list) = node {
                found.push(list.tight);
            }
        });
        found
    }

    #[rstest]
    #[case::tight_stays_tight("- a\n- b\n", ListSpacing::Tight, vec![true])]
    #[case::loose_gains_blank("- a\n- b\n", ListSpacing::Loose, vec![false])]
    #[case::loose_becomes_tight("- a\n\n- b\n", ListSpacing::Tight, vec![true])]
    #[case::preserve_keeps_loose("- a\n\n- b\n", ListSpacing::Preserve, vec![false])]
    #[case::nested_list_forces_loose("- a\n  - b\n- c\n", ListSpacing::Tight, vec![false, true])]
    #[case::two_paragraphs_force_loose("1. a\n\n   more\n2. b\n", ListSpacing::Tight, vec![false])]
    fn policies(#[case] text: &str, #[case] policy: ListSpacing, #[case] expected: Vec<bool>) {
        assert_eq!(tightness_of(text, policy), expected);
    }
}
