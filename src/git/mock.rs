use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use std::path::PathBuf;
use std::sync::Mutex;

/// State recorded by [MockRepository]
#[derive(Debug, Default, Clone)]
pub struct MockState {
    pub dirty: Vec<String>,
    pub staged: Vec<PathBuf>,
    pub commits: Vec<String>,
    pub tags: Vec<String>,
    pub pushed: Vec<(String, String, String)>,
}

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    state: Mutex<MockState>,
    branch: String,
    fail_push: Option<String>,
}

impl MockRepository {
    /// Create a new clean mock repository on `main`
    pub fn new() -> Self {
        MockRepository {
            state: Mutex::new(MockState::default()),
            branch: "main".to_string(),
            fail_push: None,
        }
    }

    /// Report these paths as uncommitted changes
    pub fn with_dirty(self, paths: &[&str]) -> Self {
        self.lock().dirty = paths.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Pretend a tag already exists
    pub fn with_tag(self, name: &str) -> Self {
        self.lock().tags.push(name.to_string());
        self
    }

    /// Make every push fail with this message
    pub fn with_push_failure(mut self, message: &str) -> Self {
        self.fail_push = Some(message.to_string());
        self
    }

    /// Snapshot of everything recorded so far
    pub fn state(&self) -> MockState {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn dirty_paths(&self) -> Result<Vec<String>> {
        Ok(self.lock().dirty.clone())
    }

    fn stage(&self, paths: &[PathBuf]) -> Result<()> {
        self.lock().staged.extend(paths.iter().cloned());
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        let mut state = self.lock();
        if state.staged.is_empty() {
            return Err(ReleaseError::commit("Nothing staged to commit"));
        }
        state.staged.clear();
        state.commits.push(message.to_string());
        Ok(format!("{:040x}", state.commits.len()))
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.lock().tags.iter().any(|t| t == name))
    }

    fn create_tag(&self, name: &str, _annotation: Option<&str>) -> Result<()> {
        if self.tag_exists(name)? {
            return Err(ReleaseError::TagConflict(name.to_string()));
        }
        self.lock().tags.push(name.to_string());
        Ok(())
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn push(&self, remote: &str, branch: &str, tag: &str) -> Result<()> {
        if let Some(message) = &self.fail_push {
            return Err(ReleaseError::push(message.clone()));
        }
        self.lock()
            .pushed
            .push((remote.to_string(), branch.to_string(), tag.to_string()));
        Ok(())
    }
}
