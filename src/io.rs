//! Rewriting Markdown files in place.

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{config::FormatOptions, error::RewriteError, process::format_markdown};

/// Sibling of `path` with `suffix` appended to its file name.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(OsString::new, ToOwned::to_owned);
    name.push(suffix);
    path.with_file_name(name)
}

/// Backup path used by [`rewrite`]: `notes.md` becomes `notes.md.orig`.
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    with_suffix(path, ".orig")
}

/// Format the file at `path` and replace it with the result.
///
/// The new content is written to a temporary sibling and renamed over the
/// original. With `backup` set the original is first copied to
/// [`backup_path`]. A file whose content would not change is left alone.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written, or if formatting
/// fails.
pub fn rewrite(path: &Path, options: &FormatOptions, backup: bool) -> Result<(), RewriteError> {
    let text = fs::read_to_string(path)?;
    let formatted = format_markdown(&text, options)?;
    if formatted == text {
        debug!(path = %path.display(), "already formatted");
        return Ok(());
    }
    let temp = with_suffix(path, ".mdreflow.tmp");
    fs::write(&temp, &formatted)?;
    if backup {
        let orig = backup_path(path);
        if let Err(err) = fs::copy(path, &orig) {
            let _ = fs::remove_file(&temp);
            return Err(err.into());
        }
    }
    if let Err(err) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(err.into());
    }
    debug!(path = %path.display(), backup, "rewrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn options() -> FormatOptions {
        FormatOptions {
            width: 20,
            ..FormatOptions::default()
        }
    }

    #[test]
    fn rewrites_with_backup() {
        let dir = tempdir().expect("create temp dir");
        let file = dir.path().join("sample.md");
        let original = "one two three four five six\n";
        fs::write(&file, original).expect("write sample");
        rewrite(&file, &options(), true).expect("rewrite");
        assert_eq!(
            fs::read_to_string(&file).expect("read output"),
            "one two three four\nfive six\n"
        );
        assert_eq!(
            fs::read_to_string(backup_path(&file)).expect("read backup"),
            original
        );
        assert!(!with_suffix(&file, ".mdreflow.tmp").exists());
    }

    #[test]
    fn rewrites_without_backup() {
        let dir = tempdir().expect("create temp dir");
        let file = dir.path().join("sample.md");
        fs::write(&file, "* a\n").expect("write sample");
        rewrite(&file, &options(), false).expect("rewrite");
        assert_eq!(fs::read_to_string(&file).expect("read output"), "- a\n");
        assert!(!backup_path(&file).exists());
    }

    #[test]
    fn formatted_files_are_untouched() {
        let dir = tempdir().expect("create temp dir");
        let file = dir.path().join("clean.md");
        fs::write(&file, "# Done\n").expect("write sample");
        rewrite(&file, &options(), true).expect("rewrite");
        assert!(!backup_path(&file).exists());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().expect("create temp dir");
        let err = rewrite(&dir.path().join("absent.md"), &options(), true)
            .expect_err("missing file fails");
        assert!(matches!(err, RewriteError::Io(_)));
    }
}
