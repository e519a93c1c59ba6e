//! Domain logic - pure release rules independent of git and the filesystem

pub mod changelog;
pub mod tag;
pub mod version;

pub use changelog::{CategoryMap, ChangelogEntry};
pub use tag::TagPattern;
pub use version::{Version, VersionBump};
