//! Reading and rewriting the files a release touches.
//!
//! - `version_file` - the canonical `MAJOR.MINOR.PATCH` file
//! - `versioned` - other files embedding the version string
//! - `changelog` - the newest-first changelog

pub mod changelog;
pub mod version_file;
pub mod versioned;

pub use changelog::{prepend_entry, ChangelogWrite};
pub use version_file::{read_version, write_version, VersionRead, VersionSource};
pub use versioned::{sync_versioned_files, FileChange, LineChange, SyncOutcome};
