//! The release's version-control sequence.
//!
//! Steps run strictly in order and each one consumes the receipt of the
//! previous step, so a tag can only be created from a [Committed] and a push
//! only from a [Tagged]. The first error ends the sequence. Nothing is rolled
//! back: a failed push leaves the local commit and tag in place.

use std::path::PathBuf;

use crate::error::{ReleaseError, Result};
use crate::git::Repository;

/// Files added to the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staged {
    pub paths: Vec<PathBuf>,
}

/// The release commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed {
    pub id: String,
    pub message: String,
}

/// The release tag, pointing at the release commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tagged {
    pub commit: Committed,
    pub name: String,
}

/// Branch and tag published to the remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pushed {
    pub tag: Tagged,
    pub remote: String,
    pub branch: String,
}

/// Refuse to run on a working tree with uncommitted changes.
pub fn clean_check<R: Repository>(repo: &R) -> Result<()> {
    let dirty = repo.dirty_paths()?;
    if dirty.is_empty() {
        Ok(())
    } else {
        Err(ReleaseError::DirtyWorkingTree(dirty))
    }
}

/// Add the release files to the index.
pub fn stage<R: Repository>(repo: &R, paths: Vec<PathBuf>) -> Result<Staged> {
    if paths.is_empty() {
        return Err(ReleaseError::commit("No files to stage"));
    }
    repo.stage(&paths)?;
    Ok(Staged { paths })
}

/// Commit what was staged.
pub fn commit<R: Repository>(repo: &R, _staged: Staged, message: &str) -> Result<Committed> {
    let id = repo.commit(message)?;
    Ok(Committed {
        id,
        message: message.to_string(),
    })
}

/// Tag the release commit. An existing tag is a conflict, never overwritten.
pub fn tag<R: Repository>(
    repo: &R,
    commit: Committed,
    name: &str,
    annotated: bool,
) -> Result<Tagged> {
    if repo.tag_exists(name)? {
        return Err(ReleaseError::TagConflict(name.to_string()));
    }
    let annotation = annotated.then_some(commit.message.as_str());
    repo.create_tag(name, annotation)?;
    Ok(Tagged {
        commit,
        name: name.to_string(),
    })
}

/// Push the current branch and the tag.
pub fn push<R: Repository>(repo: &R, tagged: Tagged, remote: &str) -> Result<Pushed> {
    let branch = repo.current_branch()?;
    repo.push(remote, &branch, &tagged.name)?;
    Ok(Pushed {
        tag: tagged,
        remote: remote.to_string(),
        branch,
    })
}
