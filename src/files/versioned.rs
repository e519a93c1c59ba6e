use std::fs;
use std::path::{Path, PathBuf};

use regex::{Captures, Regex};

use crate::config::VersionedFile;
use crate::domain::Version;
use crate::error::{ReleaseError, Result};

/// One line whose version token changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChange {
    /// 1-based line number
    pub number: usize,
    pub before: String,
    pub after: String,
}

/// What synchronizing a single file did (or, in a dry run, would do)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Number of version tokens matched
    pub replacements: usize,
    pub lines: Vec<LineChange>,
    /// True when the file was rewritten on disk
    pub written: bool,
}

impl FileChange {
    /// The tokens already held the new version
    pub fn is_noop(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Per-file outcome of a synchronization pass
#[derive(Debug)]
pub struct SyncOutcome {
    /// Path as configured (relative to the project root unless absolute)
    pub path: PathBuf,
    pub result: Result<FileChange>,
}

/// Rewrite the version token in every configured file.
///
/// Files are processed in order and each failure stays with its file: a
/// missing file, a pattern with no match or an I/O error is reported in that
/// file's outcome and the remaining files are still processed. Nothing is
/// written when `dry_run` is set; the outcome is then a preview.
pub fn sync_versioned_files(
    root: &Path,
    new_version: &Version,
    files: &[VersionedFile],
    dry_run: bool,
) -> Vec<SyncOutcome> {
    files
        .iter()
        .map(|file| SyncOutcome {
            path: file.path.clone(),
            result: sync_file(&root.join(&file.path), file, new_version, dry_run),
        })
        .collect()
}

fn sync_file(
    full_path: &Path,
    file: &VersionedFile,
    new_version: &Version,
    dry_run: bool,
) -> Result<FileChange> {
    let pattern = file.compile()?;

    if !full_path.is_file() {
        return Err(ReleaseError::MissingFile(file.path.clone()));
    }
    let content = fs::read_to_string(full_path).map_err(|e| ReleaseError::file(full_path, e))?;

    let (updated, replacements) = replace_version(&pattern, &content, &new_version.to_string());
    if replacements == 0 {
        return Err(ReleaseError::PatternNotFound(file.path.clone()));
    }

    let lines = changed_lines(&content, &updated);
    let written = !dry_run && !lines.is_empty();
    if written {
        tracing::debug!(path = %full_path.display(), replacements, "updating versioned file");
        fs::write(full_path, &updated).map_err(|e| ReleaseError::file(full_path, e))?;
    }

    Ok(FileChange {
        replacements,
        lines,
        written,
    })
}

/// Replace the version group of every match, leaving all other bytes alone.
///
/// Returns the new content and the number of matches.
pub fn replace_version(pattern: &Regex, content: &str, new_version: &str) -> (String, usize) {
    let mut count = 0;
    let updated = pattern.replace_all(content, |caps: &Captures| {
        count += 1;
        let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        let Some(token) = caps.name("version").or_else(|| caps.get(1)) else {
            return whole.to_string();
        };
        let start = token.start() - caps.get(0).map(|m| m.start()).unwrap_or_default();
        let end = start + token.as_str().len();
        format!("{}{}{}", &whole[..start], new_version, &whole[end..])
    });
    (updated.into_owned(), count)
}

/// Line-by-line comparison of content that only had tokens substituted.
fn changed_lines(before: &str, after: &str) -> Vec<LineChange> {
    before
        .lines()
        .zip(after.lines())
        .enumerate()
        .filter(|(_, (old, new))| old != new)
        .map(|(idx, (old, new))| LineChange {
            number: idx + 1,
            before: old.to_string(),
            after: new.to_string(),
        })
        .collect()
}
