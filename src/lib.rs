//! Markdown reflow and typography normalisation.
//!
//! `mdreflow` parses a Markdown document into a tree of [`ast::Node`]s,
//! converts straight quotes and ellipses to their typographic forms across
//! inline element boundaries, normalises list spacing and renders the tree
//! back to Markdown with paragraphs rewrapped to a fixed width or to
//! sentence-based semantic line breaks. Code spans, fenced code, raw HTML and
//! template tags are never modified, and a leading metadata block is passed
//! through byte for byte.
//!
//! ```
//! use mdreflow::{FormatOptions, format_markdown};
//!
//! let options = FormatOptions { width: 30, ..FormatOptions::default() };
//! let out = format_markdown("The quick brown fox jumps over the lazy dog.\n", &options)
//!     .expect("formatting plain prose cannot fail");
//! assert_eq!(out, "The quick brown fox jumps over\nthe lazy dog.\n");
//! ```

#[macro_use]
mod macros;

pub mod ast;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod io;
pub mod lists;
pub mod parse;
pub mod process;
pub mod render;
pub mod typography;
pub mod walk;
pub mod wrap;

pub use config::{BreakMode, FormatOptions, ListSpacing};
pub use error::{ConfigError, FormatError, RewriteError};
pub use io::rewrite;
pub use process::{fill_text, format_markdown};
