//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations a
//! release needs, allowing for a real repository and a mock used by tests.
//!
//! # Overview
//!
//! - [Repository]: the operations (status, stage, commit, tag, push)
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: an in-memory implementation for testing
//! - [driver]: the sequential stage -> commit -> tag -> push steps
//!
//! Most code should depend on the [Repository] trait rather than concrete
//! implementations.

pub mod driver;
pub mod mock;
pub mod repository;

pub use driver::{Committed, Pushed, Staged, Tagged};
pub use mock::MockRepository;
pub use repository::Git2Repository;

use std::path::PathBuf;

use crate::error::Result;

/// Git operations used by a release.
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// failures to the variant of the step that failed: [crate::ReleaseError::Commit]
/// for commits, [crate::ReleaseError::TagConflict] for existing tags and
/// [crate::ReleaseError::Push] for anything that goes wrong while pushing.
pub trait Repository {
    /// Paths with uncommitted changes: staged, unstaged or untracked.
    /// Ignored files are not reported.
    fn dirty_paths(&self) -> Result<Vec<String>>;

    /// Add files to the index
    ///
    /// # Arguments
    /// * `paths` - Files to stage, absolute or relative to the working directory
    fn stage(&self, paths: &[PathBuf]) -> Result<()>;

    /// Commit the index on top of HEAD and return the new commit id
    ///
    /// Fails with [crate::ReleaseError::Commit] when the index matches
    /// HEAD's tree, i.e. nothing is staged.
    fn commit(&self, message: &str) -> Result<String>;

    /// Whether a tag with this name exists
    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Tag HEAD. An annotation makes it an annotated tag, otherwise it is
    /// lightweight. Never overwrites an existing tag.
    fn create_tag(&self, name: &str, annotation: Option<&str>) -> Result<()>;

    /// Name of the branch HEAD points to
    fn current_branch(&self) -> Result<String>;

    /// Push a branch and a tag to a remote
    fn push(&self, remote: &str, branch: &str, tag: &str) -> Result<()>;
}
