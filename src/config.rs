//! Formatting options and the optional TOML configuration file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

/// Names searched for when walking up from the working directory, in order.
pub const CONFIG_FILENAMES: [&str; 2] = [".mdreflow.toml", "mdreflow.toml"];

/// How paragraph lines are broken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BreakMode {
    /// Greedy fill to the target width.
    #[default]
    Fixed,
    /// One sentence per line, long sentences filled to the width.
    Semantic,
}

/// Blank-line policy between list items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ListSpacing {
    /// Keep the tightness each list had in the source.
    #[default]
    Preserve,
    /// Blank line between every item.
    Loose,
    /// No blank lines unless an item holds more than one block.
    Tight,
}

/// Options controlling [`crate::format_markdown`] and [`crate::fill_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "each flag toggles an independent transform"
)]
pub struct FormatOptions {
    /// Target line width in columns; `0` disables wrapping.
    pub width: usize,
    pub break_mode: BreakMode,
    pub list_spacing: ListSpacing,
    pub smart_quotes: bool,
    pub ellipses: bool,
    /// In semantic mode, lines shorter than this are joined with the next
    /// sentence when it fits.
    pub min_line_len: usize,
    /// Treat input as plain text rather than Markdown.
    pub plaintext: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            width: 88,
            break_mode: BreakMode::Fixed,
            list_spacing: ListSpacing::Preserve,
            smart_quotes: false,
            ellipses: false,
            min_line_len: 0,
            plaintext: false,
        }
    }
}

impl FormatOptions {
    /// Whether any typography rewrite is enabled.
    #[must_use]
    pub fn typography(&self) -> bool {
        self.smart_quotes || self.ellipses
    }
}

/// Settings read from a configuration file. Every key is optional; absent
/// keys leave the current option untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FileConfig {
    pub width: Option<usize>,
    pub semantic: Option<bool>,
    pub smartquotes: Option<bool>,
    pub ellipses: Option<bool>,
    pub list_spacing: Option<ListSpacing>,
    pub min_line_len: Option<usize>,
}

impl FileConfig {
    /// Parse a configuration document. Keys inside tables such as
    /// `[formatting]` are lifted to the top level; top-level keys win on
    /// conflict and unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns the TOML error when `content` is not valid TOML or a known key
    /// has the wrong type.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let table: toml::Table = toml::from_str(content)?;
        let mut flat = toml::Table::new();
        let mut nested = Vec::new();
        for (key, value) in table {
            match value {
                toml::Value::Table(inner) => nested.push(inner),
                other => {
                    flat.insert(key, other);
                }
            }
        }
        for inner in nested {
            for (key, value) in inner {
                flat.entry(key).or_insert(value);
            }
        }
        toml::Value::Table(flat).try_into()
    }

    /// Overlay the keys present in this file onto `options`.
    pub fn apply(&self, options: &mut FormatOptions) {
        if let Some(width) = self.width {
            options.width = width;
        }
        if let Some(semantic) = self.semantic {
            options.break_mode = if semantic {
                BreakMode::Semantic
            } else {
                BreakMode::Fixed
            };
        }
        if let Some(smart) = self.smartquotes {
            options.smart_quotes = smart;
        }
        if let Some(ellipses) = self.ellipses {
            options.ellipses = ellipses;
        }
        if let Some(spacing) = self.list_spacing {
            options.list_spacing = spacing;
        }
        if let Some(min) = self.min_line_len {
            options.min_line_len = min;
        }
    }
}

/// Find the nearest configuration file starting from `start_dir`, walking
/// upward.
#[must_use]
pub fn find_config_path(start_dir: &Path) -> Option<PathBuf> {
    let mut dir = start_dir.to_path_buf();
    loop {
        for name in CONFIG_FILENAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Read and parse the configuration file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = FileConfig::from_toml(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Locate and load the nearest configuration file, if any.
///
/// # Errors
///
/// Returns [`ConfigError`] if a file exists but cannot be read or parsed.
pub fn discover(start_dir: &Path) -> Result<Option<FileConfig>, ConfigError> {
    find_config_path(start_dir)
        .map(|path| load_config(&path))
        .transpose()
}
