use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::domain::Version;
use crate::error::{ReleaseError, Result};

/// Where the current version came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSource {
    /// Parsed from the version file
    File,
    /// The version file does not exist
    Missing,
    /// The file exists but does not hold `MAJOR.MINOR.PATCH`; carries the raw content
    Malformed(String),
}

/// Result of reading the canonical version file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRead {
    pub version: Version,
    pub source: VersionSource,
}

impl VersionRead {
    /// Whether the version was defaulted rather than read
    pub fn recovered(&self) -> bool {
        self.source != VersionSource::File
    }
}

/// Read the current version.
///
/// A missing or malformed file recovers to `0.0.0`; the returned
/// [`VersionSource`] says which case applied so the caller can warn.
/// Other I/O failures (permissions, a directory in the way) are errors.
pub fn read_version(path: &Path) -> Result<VersionRead> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "version file missing");
            return Ok(VersionRead {
                version: Version::default(),
                source: VersionSource::Missing,
            });
        }
        Err(e) => return Err(ReleaseError::file(path, e)),
    };

    match Version::parse(&content) {
        Ok(version) => Ok(VersionRead {
            version,
            source: VersionSource::File,
        }),
        Err(_) => {
            tracing::debug!(path = %path.display(), content = %content.trim(), "malformed version file");
            Ok(VersionRead {
                version: Version::default(),
                source: VersionSource::Malformed(content.trim().to_string()),
            })
        }
    }
}

/// Overwrite the version file with the new version.
pub fn write_version(path: &Path, version: &Version) -> Result<()> {
    tracing::debug!(path = %path.display(), %version, "writing version file");
    fs::write(path, format!("{}\n", version)).map_err(|e| ReleaseError::file(path, e))
}
