use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for git-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Malformed version '{0}': expected MAJOR.MINOR.PATCH")]
    MalformedVersion(String),

    #[error("Working tree is not clean ({} uncommitted change(s)): {}", .0.len(), .0.join(", "))]
    DirtyWorkingTree(Vec<String>),

    #[error("No version token found in {}", .0.display())]
    PatternNotFound(PathBuf),

    #[error("Versioned file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Cannot access {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Commit failed: {0}")]
    Commit(String),

    #[error("Tag '{0}' already exists")]
    TagConflict(String),

    #[error("Push failed: {0}")]
    Push(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create an input validation error
    pub fn input(msg: impl Into<String>) -> Self {
        ReleaseError::Input(msg.into())
    }

    /// Create a commit error with context
    pub fn commit(msg: impl Into<String>) -> Self {
        ReleaseError::Commit(msg.into())
    }

    /// Create a push error with context
    pub fn push(msg: impl Into<String>) -> Self {
        ReleaseError::Push(msg.into())
    }

    /// Attach a path to an I/O failure
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReleaseError::File {
            path: path.into(),
            source,
        }
    }

    /// Whether the pipeline may continue past this error.
    ///
    /// Per-file synchronization problems and an unreadable version are
    /// recovered from; everything else ends the run.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            ReleaseError::MalformedVersion(_)
                | ReleaseError::PatternNotFound(_)
                | ReleaseError::MissingFile(_)
                | ReleaseError::File { .. }
        )
    }
}
