use crate::error::{ReleaseError, Result};
use git2::{ErrorClass, ErrorCode, Repository as Git2Repo, Status, StatusOptions};
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Path relative to the working directory, as the index expects it
    fn index_path(&self, path: &Path) -> Result<PathBuf> {
        if path.is_relative() {
            return Ok(path.to_path_buf());
        }

        let workdir = self
            .repo
            .workdir()
            .ok_or_else(|| ReleaseError::commit("Repository has no working directory"))?;
        let workdir = workdir.canonicalize().map_err(|e| ReleaseError::file(workdir, e))?;
        let full = path.canonicalize().map_err(|e| ReleaseError::file(path, e))?;

        full.strip_prefix(&workdir)
            .map(Path::to_path_buf)
            .map_err(|_| {
                ReleaseError::commit(format!(
                    "{} is outside the repository at {}",
                    path.display(),
                    workdir.display()
                ))
            })
    }

    fn head_commit(&self) -> Result<Option<git2::Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Credential lookup shared by push: SSH keys from ~/.ssh, then the agent,
    /// then libgit2's defaults (credential helpers).
    fn remote_callbacks<'a>() -> git2::RemoteCallbacks<'a> {
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");

            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }

                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }
            }

            git2::Cred::default()
        });

        // A rejected reference (e.g. non-fast-forward) arrives here, not as an Err from push()
        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "remote rejected {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        callbacks
    }
}

impl super::Repository for Git2Repository {
    fn dirty_paths(&self) -> Result<Vec<String>> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;

        Ok(statuses
            .iter()
            .filter(|entry| {
                let status = entry.status();
                status != Status::CURRENT && !status.contains(Status::IGNORED)
            })
            .filter_map(|entry| entry.path().map(str::to_string))
            .collect())
    }

    fn stage(&self, paths: &[PathBuf]) -> Result<()> {
        let mut index = self.repo.index()?;

        for path in paths {
            let relative = self.index_path(path)?;
            tracing::debug!(path = %relative.display(), "staging");
            index.add_path(&relative).map_err(|e| {
                ReleaseError::commit(format!("Cannot stage {}: {}", relative.display(), e))
            })?;
        }

        index.write()?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        let mut index = self.repo.index()?;
        let tree_id = index
            .write_tree()
            .map_err(|e| ReleaseError::commit(format!("Cannot write tree: {}", e)))?;
        let tree = self.repo.find_tree(tree_id)?;

        let parent = self.head_commit()?;
        if let Some(parent) = &parent {
            if parent.tree_id() == tree_id {
                return Err(ReleaseError::commit("Nothing staged to commit"));
            }
        }

        let signature = self
            .repo
            .signature()
            .map_err(|e| ReleaseError::commit(format!("No git identity configured: {}", e)))?;
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                message,
                &tree,
                &parents,
            )
            .map_err(|e| ReleaseError::commit(e.to_string()))?;

        tracing::debug!(%oid, "created commit");
        Ok(oid.to_string())
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        match self.repo.find_reference(&format!("refs/tags/{}", name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn create_tag(&self, name: &str, annotation: Option<&str>) -> Result<()> {
        if self.tag_exists(name)? {
            return Err(ReleaseError::TagConflict(name.to_string()));
        }

        let head = self
            .head_commit()?
            .ok_or_else(|| ReleaseError::commit("HEAD has no commit to tag"))?;

        let created = match annotation {
            Some(message) => {
                let signature = self.repo.signature()?;
                self.repo
                    .tag(name, head.as_object(), &signature, message, false)
                    .map(|_| ())
            }
            None => self
                .repo
                .tag_lightweight(name, head.as_object(), false)
                .map(|_| ()),
        };

        match created {
            Ok(()) => {
                tracing::debug!(tag = name, "created tag");
                Ok(())
            }
            Err(e) if e.code() == ErrorCode::Exists => {
                Err(ReleaseError::TagConflict(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn current_branch(&self) -> Result<String> {
        let head = self
            .repo
            .head()
            .map_err(|e| ReleaseError::push(format!("Cannot resolve HEAD: {}", e)))?;

        if !head.is_branch() {
            return Err(ReleaseError::push("HEAD is detached; check out a branch"));
        }

        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| ReleaseError::push("Branch name is not valid UTF-8"))
    }

    fn push(&self, remote_name: &str, branch: &str, tag: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|_| ReleaseError::push(format!("No remote named '{}' found", remote_name)))?;

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(Self::remote_callbacks());

        let refspecs = [
            format!("refs/heads/{0}:refs/heads/{0}", branch),
            format!("refs/tags/{0}:refs/tags/{0}", tag),
        ];
        tracing::debug!(remote = remote_name, ?refspecs, "pushing");

        remote
            .push(&refspecs, Some(&mut push_options))
            .map_err(|e| match e.class() {
                ErrorClass::Net => ReleaseError::push(format!("Network error: {}", e)),
                ErrorClass::Reference => ReleaseError::push(format!("Reference error: {}", e)),
                _ => ReleaseError::push(e.message().to_string()),
            })
    }
}
