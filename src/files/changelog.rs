use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::domain::changelog::insert_entry;
use crate::domain::ChangelogEntry;
use crate::error::{ReleaseError, Result};

/// What prepending an entry did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogWrite {
    /// The rendered block
    pub block: String,
    /// The changelog did not exist (or was empty) before this entry
    pub created: bool,
    pub written: bool,
}

/// Prepend `entry` to the changelog at `path`.
///
/// The whole file is read, the block inserted at the top and the result
/// written back in one pass. A missing file is created holding only the new
/// block. In a dry run the block is rendered and nothing is written.
pub fn prepend_entry(path: &Path, entry: &ChangelogEntry, dry_run: bool) -> Result<ChangelogWrite> {
    let block = entry.render();

    let existing = match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => return Err(ReleaseError::file(path, e)),
    };
    let created = existing
        .as_deref()
        .map(|content| content.trim().is_empty())
        .unwrap_or(true);

    if dry_run {
        return Ok(ChangelogWrite {
            block,
            created,
            written: false,
        });
    }

    let updated = insert_entry(existing.as_deref().unwrap_or_default(), &block);
    tracing::debug!(path = %path.display(), version = %entry.version, "writing changelog");
    fs::write(path, updated).map_err(|e| ReleaseError::file(path, e))?;

    Ok(ChangelogWrite {
        block,
        created,
        written: true,
    })
}
