//! Document tree produced by [`crate::parse`] and consumed by the transforms.
//!
//! [`Node`] is a closed sum type: every construct the formatter understands has
//! its own variant, and [`NodeKind`] mirrors the variants without payloads so
//! that dispatch tables such as [`crate::walk::ContainerKind`] can be written
//! as exhaustive matches. The document owns its subtree outright; nodes hold
//! no references to their parents.

/// Column alignment of a GFM table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    None,
    Left,
    Center,
    Right,
}

/// Marker style shared by every item of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Bullet list; the character is the source marker (`-`, `*` or `+`).
    Bullet(char),
    /// Ordered list starting at `start`, delimited by `.` or `)`.
    Ordered { start: u64, delimiter: char },
}

impl ListKind {
    /// Whether `other` continues a list of this kind.
    #[must_use]
    pub fn continues_with(self, other: ListKind) -> bool {
        match (self, other) {
            (ListKind::Bullet(a), ListKind::Bullet(b)) => a == b,
            (
                ListKind::Ordered { delimiter: a, .. },
                ListKind::Ordered { delimiter: b, .. },
            ) => a == b,
            _ => false,
        }
    }
}

/// A list and its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub kind: ListKind,
    /// `true` when items render without blank lines between them.
    pub tight: bool,
    /// [`Node::ListItem`] children.
    pub items: Vec<Node>,
}

/// A list item and the blocks it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// Task list state: `Some(' ')` for `[ ]`, `Some('x')` for `[x]`.
    pub task: Option<char>,
    pub children: Vec<Node>,
}

/// A fenced or indented code block. Indented blocks are given a fence when
/// parsed so that they render in fenced form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Opening fence, e.g. "```" or "~~~~".
    pub fence: String,
    pub info: String,
    pub lines: Vec<String>,
}

/// A GFM table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub alignments: Vec<Alignment>,
    /// [`Node::TableRow`] children; the first row is the header.
    pub rows: Vec<Node>,
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Document(Vec<Node>),
    Heading { level: u8, children: Vec<Node> },
    Paragraph(Vec<Node>),
    List(List),
    ListItem(ListItem),
    Table(Table),
    TableRow(Vec<Node>),
    TableCell(Vec<Node>),
    Blockquote(Vec<Node>),
    FootnoteDefinition { label: String, children: Vec<Node> },
    FencedCode(CodeBlock),
    HtmlBlock(Vec<String>),
    /// Link reference definition, kept verbatim.
    LinkReference(String),
    ThematicBreak,
    CodeSpan { ticks: usize, code: String },
    /// `dest` is the raw tail after the closing bracket, e.g. `(url "title")`
    /// or `[ref]`.
    Link { children: Vec<Node>, dest: String },
    Image { children: Vec<Node>, dest: String },
    Emphasis { delim: char, children: Vec<Node> },
    StrongEmphasis { delim: char, children: Vec<Node> },
    Strikethrough(Vec<Node>),
    /// Source text, escapes and entities included, exactly as written.
    RawText(String),
    LineBreak { hard: bool },
    HtmlInline(String),
    TemplateTag(String),
    /// Backslash escape; holds the escaped character.
    Escaped(char),
    FootnoteReference(String),
    Autolink(String),
}

/// Payload-free discriminant of [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
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
    FencedCode,
    HtmlBlock,
    LinkReference,
    ThematicBreak,
    CodeSpan,
    Link,
    Image,
    Emphasis,
    StrongEmphasis,
    Strikethrough,
    RawText,
    LineBreak,
    HtmlInline,
    TemplateTag,
    Escaped,
    FootnoteReference,
    Autolink,
}

impl Node {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Document(_) => NodeKind::Document,
            Node::Heading { .. } => NodeKind::Heading,
            Node::Paragraph(_) => NodeKind::Paragraph,
            Node::List(_) => NodeKind::List,
            Node::ListItem(_) => NodeKind::ListItem,
            Node::Table(_) => NodeKind::Table,
            Node::TableRow(_) => NodeKind::TableRow,
            Node::TableCell(_) => NodeKind::TableCell,
            Node::Blockquote(_) => NodeKind::Blockquote,
            Node::FootnoteDefinition { .. } => NodeKind::FootnoteDefinition,
            Node::FencedCode(_) => NodeKind::FencedCode,
            Node::HtmlBlock(_) => NodeKind::HtmlBlock,
            Node::LinkReference(_) => NodeKind::LinkReference,
            Node::ThematicBreak => NodeKind::ThematicBreak,
            Node::CodeSpan { .. } => NodeKind::CodeSpan,
            Node::Link { .. } => NodeKind::Link,
            Node::Image { .. } => NodeKind::Image,
            Node::Emphasis { .. } => NodeKind::Emphasis,
            Node::StrongEmphasis { .. } => NodeKind::StrongEmphasis,
            Node::Strikethrough(_) => NodeKind::Strikethrough,
            Node::RawText(_) => NodeKind::RawText,
            Node::LineBreak { .. } => NodeKind::LineBreak,
            Node::HtmlInline(_) => NodeKind::HtmlInline,
            Node::TemplateTag(_) => NodeKind::TemplateTag,
            Node::Escaped(_) => NodeKind::Escaped,
            Node::FootnoteReference(_) => NodeKind::FootnoteReference,
            Node::Autolink(_) => NodeKind::Autolink,
        }
    }

    /// Child nodes, or `None` for leaves.
    #[must_use]
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Document(children)
            | Node::Heading { children, .. }
            | Node::Paragraph(children)
            | Node::ListItem(ListItem { children, .. })
            | Node::TableRow(children)
            | Node::TableCell(children)
            | Node::Blockquote(children)
            | Node::FootnoteDefinition { children, .. }
            | Node::Link { children, .. }
            | Node::Image { children, .. }
            | Node::Emphasis { children, .. }
            | Node::StrongEmphasis { children, .. }
            | Node::Strikethrough(children) => Some(children),
            Node::List(list) => Some(&list.items),
            Node::Table(table) => Some(&table.rows),
            Node::FencedCode(_)
            | Node::HtmlBlock(_)
            | Node::LinkReference(_)
            | Node::ThematicBreak
            | Node::CodeSpan { .. }
            | Node::RawText(_)
            | Node::LineBreak { .. }
            | Node::HtmlInline(_)
            | Node::TemplateTag(_)
            | Node::Escaped(_)
            | Node::FootnoteReference(_)
            | Node::Autolink(_) => None,
        }
    }

    /// Mutable access to child nodes, or `None` for leaves.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Document(children)
            | Node::Heading { children, .. }
            | Node::Paragraph(children)
            | Node::ListItem(ListItem { children, .. })
            | Node::TableRow(children)
            | Node::TableCell(children)
            | Node::Blockquote(children)
            | Node::FootnoteDefinition { children, .. }
            | Node::Link { children, .. }
            | Node::Image { children, .. }
            | Node::Emphasis { children, .. }
            | Node::StrongEmphasis { children, .. }
            | Node::Strikethrough(children) => Some(children),
            Node::List(list) => Some(&mut list.items),
            Node::Table(table) => Some(&mut table.rows),
            Node::FencedCode(_)
            | Node::HtmlBlock(_)
            | Node::LinkReference(_)
            | Node::ThematicBreak
            | Node::CodeSpan { .. }
            | Node::RawText(_)
            | Node::LineBreak { .. }
            | Node::HtmlInline(_)
            | Node::TemplateTag(_)
            | Node::Escaped(_)
            | Node::FootnoteReference(_)
            | Node::Autolink(_) => None,
        }
    }

    /// Number of block-level children of a list item, used to decide whether
    /// a list can render tight.
    #[must_use]
    pub fn block_child_count(&self) -> usize {
        match self {
            Node::ListItem(item) => item.children.len(),
            _ => 0,
        }
    }
}
