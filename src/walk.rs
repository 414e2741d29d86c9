//! Depth-first traversal of the document tree.
//!
//! Which node kinds own children that transforms must visit is decided by a
//! single exhaustive match in [`ContainerKind::of`]. Adding a variant to
//! [`NodeKind`] without classifying it here is a compile error, so the walker
//! cannot silently skip a new container.

use std::convert::Infallible;

use crate::ast::{Node, NodeKind};

/// Node kinds whose children the walker descends into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Document,
    Heading,
    Paragraph,
    List,
    ListItem,
    Table,
    TableRow,
    TableCell,
    Blockquote,
    FootnoteDefinition,
    Link,
    Image,
    Emphasis,
    StrongEmphasis,
    Strikethrough,
}

impl ContainerKind {
    /// Classify `kind`, returning `None` for leaves.
    #[must_use]
    pub fn of(kind: NodeKind) -> Option<Self> {
        match kind {
            NodeKind::Document => Some(Self::Document),
            NodeKind::Heading => Some(Self::Heading),
            NodeKind::Paragraph => Some(Self::Paragraph),
            NodeKind::List => Some(Self::List),
            NodeKind::ListItem => Some(Self::ListItem),
            NodeKind::Table => Some(Self::Table),
            NodeKind::TableRow => Some(Self::TableRow),
            NodeKind::TableCell => Some(Self::TableCell),
            NodeKind::Blockquote => Some(Self::Blockquote),
            NodeKind::FootnoteDefinition => Some(Self::FootnoteDefinition),
            NodeKind::Link => Some(Self::Link),
            NodeKind::Image => Some(Self::Image),
            NodeKind::Emphasis => Some(Self::Emphasis),
            NodeKind::StrongEmphasis => Some(Self::StrongEmphasis),
            NodeKind::Strikethrough => Some(Self::Strikethrough),
            NodeKind::FencedCode
            | NodeKind::HtmlBlock
            | NodeKind::LinkReference
            | NodeKind::ThematicBreak
            | NodeKind::CodeSpan
            | NodeKind::RawText
            | NodeKind::LineBreak
            | NodeKind::HtmlInline
            | NodeKind::TemplateTag
            | NodeKind::Escaped
            | NodeKind::FootnoteReference
            | NodeKind::Autolink => None,
        }
    }
}

/// Containers whose inline children form one typography scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineScope {
    Paragraph,
    Heading,
    TableCell,
}

impl InlineScope {
    #[must_use]
    pub fn of(kind: NodeKind) -> Option<Self> {
        match ContainerKind::of(kind)? {
            ContainerKind::Paragraph => Some(Self::Paragraph),
            ContainerKind::Heading => Some(Self::Heading),
            ContainerKind::TableCell => Some(Self::TableCell),
            ContainerKind::Document
            | ContainerKind::List
            | ContainerKind::ListItem
            | ContainerKind::Table
            | ContainerKind::TableRow
            | ContainerKind::Blockquote
            | ContainerKind::FootnoteDefinition
            | ContainerKind::Link
            | ContainerKind::Image
            | ContainerKind::Emphasis
            | ContainerKind::StrongEmphasis
            | ContainerKind::Strikethrough => None,
        }
    }
}

/// Visit `node` and then its descendants in document order.
pub fn walk_mut(node: &mut Node, visit: &mut impl FnMut(&mut Node)) {
    let result = try_walk_mut(node, &mut |n: &mut Node| -> Result<(), Infallible> {
        visit(n);
        Ok(())
    });
    match result {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

/// Fallible form of [`walk_mut`]; traversal stops at the first error.
///
/// # Errors
///
/// Returns the first error produced by `visit`.
pub fn try_walk_mut<E>(
    node: &mut Node,
    visit: &mut impl FnMut(&mut Node) -> Result<(), E>,
) -> Result<(), E> {
    visit(node)?;
    if ContainerKind::of(node.kind()).is_none() {
        return Ok(());
    }
    if let Some(children) = node.children_mut() {
        for child in children {
            try_walk_mut(child, visit)?;
        }
    }
    Ok(())
}
