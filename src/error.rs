//! Error types returned by the library.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure of the formatting pipeline.
///
/// Malformed Markdown is never an error; these variants indicate a defect in
/// a transform rather than a problem with the input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// A typography edit landed inside text that must not change, such as a
    /// code span or template tag.
    #[error("typography rewrite touched immutable text at offset {offset}: {text:?}")]
    ImmutableSegmentEdit { offset: usize, text: String },
}

/// Failure to load a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Failure to rewrite a file on disk.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Format(#[from] FormatError),
}
