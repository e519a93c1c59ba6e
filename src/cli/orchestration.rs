//! Main release workflow.
//!
//! Runs the whole release as one linear pipeline: precondition check,
//! version bump, file synchronization, changelog, then the git sequence.
//! Every step reports through a [Reporter]; in a dry run the same steps
//! describe what they would do and nothing is written.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::config::Config;
use crate::domain::{ChangelogEntry, Version, VersionBump};
use crate::error::{ReleaseError, Result};
use crate::files::{self, VersionSource};
use crate::git::{driver, Pushed, Repository};
use crate::report::Reporter;
use crate::ui::formatter::indent_block;

/// Arguments for the release workflow
///
/// Mirrors the CLI arguments without depending on clap, so the workflow can
/// be driven programmatically.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseArgs {
    /// Release message; each non-blank line becomes a changelog bullet
    pub message: String,

    /// Segment to increment
    pub bump: VersionBump,

    /// Changelog category label; the configured default when `None`
    pub category: Option<String>,

    /// Preview mode - report what would happen, write nothing
    pub dry_run: bool,
}

/// Result of a completed release (or dry run)
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    pub previous: Version,
    pub version: Version,
    pub tag: String,
    /// Versioned files that synchronized (or would synchronize) successfully
    pub synced_files: Vec<PathBuf>,
    /// Versioned files skipped with a warning
    pub skipped_files: Vec<PathBuf>,
    /// Commit id, branch and remote once pushed; `None` in a dry run
    pub published: Option<Pushed>,
    pub dry_run: bool,
}

/// Main release workflow
///
/// 1. Validate the configuration and message, resolve the category header
/// 2. Check the working tree is clean (skipped in a dry run)
/// 3. Read and bump the version
/// 4. Write the version file and synchronize versioned files
/// 5. Prepend the changelog entry
/// 6. Stage, commit, tag and push
///
/// Per-file synchronization problems are reported as warnings and the file
/// is left out of the commit. Any other failure stops the run; files already
/// written, and a commit or tag already created, stay as they are.
///
/// # Arguments
///
/// * `args` - Release arguments
/// * `config` - Configuration; checked with [Config::validate] before any step
/// * `root` - Directory configured paths are relative to
/// * `repo` - Repository to commit, tag and push in
/// * `today` - Date stamped on the changelog entry
/// * `reporter` - Receives one line per step outcome
pub fn run_release<R, P>(
    args: &ReleaseArgs,
    config: &Config,
    root: &Path,
    repo: &R,
    today: NaiveDate,
    reporter: &mut P,
) -> Result<ReleaseOutcome>
where
    R: Repository,
    P: Reporter + ?Sized,
{
    config.validate()?;

    let dry_run = args.dry_run;
    let message = args.message.trim();
    if message.is_empty() {
        return Err(ReleaseError::input("Release message cannot be empty"));
    }

    let categories = config.changelog.category_map();
    let category = args
        .category
        .as_deref()
        .unwrap_or(&config.changelog.default_category);
    let header = categories.header_for(category);
    if !categories.is_known(category) {
        reporter.info(&format!(
            "Category '{}' has no configured header, using '{}'",
            category, header
        ));
    }
    let tag_pattern = config.vcs.tag_pattern()?;

    // Precondition
    if dry_run {
        reporter.preview("Would check that the working tree is clean");
    } else {
        driver::clean_check(repo)?;
        reporter.success("Working tree is clean");
    }

    // Version
    let version_file = &config.files.version_file;
    let version_path = root.join(version_file);
    let current = files::read_version(&version_path)?;
    match &current.source {
        VersionSource::File => {}
        VersionSource::Missing => reporter.warning(&format!(
            "{} not found, starting from {}",
            version_file.display(),
            current.version
        )),
        VersionSource::Malformed(raw) => reporter.warning(&format!(
            "{} in {}, starting from {}",
            ReleaseError::MalformedVersion(raw.clone()),
            version_file.display(),
            current.version
        )),
    }

    let version = current.version.bump(args.bump)?;
    let tag = tag_pattern.format(&version);
    reporter.info(&format!(
        "Bumping version {} → {} ({})",
        current.version, version, args.bump
    ));

    let entry = ChangelogEntry::new(version, today, header, message);
    if entry.items.is_empty() {
        return Err(ReleaseError::input("Release message has no content"));
    }

    if dry_run {
        reporter.preview(&format!(
            "{} would become {}",
            version_file.display(),
            version
        ));
    } else {
        files::write_version(&version_path, &version)?;
        reporter.success(&format!("Updated {} to {}", version_file.display(), version));
    }

    // Versioned files
    let mut synced_files = Vec::new();
    let mut skipped_files = Vec::new();
    for outcome in files::sync_versioned_files(root, &version, &config.versioned_files, dry_run) {
        match outcome.result {
            Ok(change) if change.is_noop() => {
                reporter.info(&format!(
                    "{} already at {}",
                    outcome.path.display(),
                    version
                ));
                synced_files.push(outcome.path);
            }
            Ok(change) => {
                if dry_run {
                    for line in &change.lines {
                        reporter.preview(&format!(
                            "Would update {}:{}: `{}` → `{}`",
                            outcome.path.display(),
                            line.number,
                            line.before.trim(),
                            line.after.trim()
                        ));
                    }
                } else {
                    reporter.success(&format!("Updated version in {}", outcome.path.display()));
                }
                synced_files.push(outcome.path);
            }
            Err(e) if e.is_soft() => {
                reporter.warning(&format!("{}; skipping", e));
                skipped_files.push(outcome.path);
            }
            Err(e) => return Err(e),
        }
    }

    // Changelog
    let changelog_file = &config.files.changelog;
    let write = files::prepend_entry(&root.join(changelog_file), &entry, dry_run)?;
    if dry_run {
        reporter.preview(&format!(
            "{} entry would be:\n{}",
            changelog_file.display(),
            indent_block(&write.block)
        ));
    } else {
        if write.created {
            reporter.info(&format!("Created {}", changelog_file.display()));
        }
        reporter.success(&format!(
            "Added {} entry to {}",
            version,
            changelog_file.display()
        ));
    }

    // Version control
    let commit_message = config
        .vcs
        .render_commit_message(message, &version.to_string(), &tag);
    let remote = config.vcs.remote.as_str();

    if dry_run {
        let mut paths = vec![
            version_file.display().to_string(),
            changelog_file.display().to_string(),
        ];
        paths.extend(synced_files.iter().map(|p| p.display().to_string()));
        reporter.preview(&format!("Would stage {}", paths.join(", ")));
        reporter.preview(&format!("Would commit \"{}\"", commit_message));
        reporter.preview(&format!("Would create tag {}", tag));
        reporter.preview(&format!(
            "Would push the current branch and {} to {}",
            tag, remote
        ));
        reporter.success(&format!(
            "Dry run complete, nothing was written. Would release {}",
            tag
        ));

        return Ok(ReleaseOutcome {
            previous: current.version,
            version,
            tag,
            synced_files,
            skipped_files,
            published: None,
            dry_run,
        });
    }

    let mut paths = vec![version_path, root.join(changelog_file)];
    paths.extend(synced_files.iter().map(|p| root.join(p)));

    let published = publish(
        repo,
        paths,
        &commit_message,
        &tag,
        config.vcs.annotated_tag,
        remote,
        reporter,
    )?;

    reporter.success(&format!("Released version {}", tag));

    Ok(ReleaseOutcome {
        previous: current.version,
        version,
        tag,
        synced_files,
        skipped_files,
        published: Some(published),
        dry_run,
    })
}

/// Stage, commit, tag and push, stopping at the first failure.
fn publish<R, P>(
    repo: &R,
    paths: Vec<PathBuf>,
    commit_message: &str,
    tag: &str,
    annotated: bool,
    remote: &str,
    reporter: &mut P,
) -> Result<Pushed>
where
    R: Repository,
    P: Reporter + ?Sized,
{
    let staged = driver::stage(repo, paths).map_err(|e| left_in_place(e, reporter))?;
    reporter.success(&format!("Staged {} file(s)", staged.paths.len()));

    let committed =
        driver::commit(repo, staged, commit_message).map_err(|e| left_in_place(e, reporter))?;
    reporter.success(&format!("Created commit {}", short_id(&committed.id)));

    let tagged = driver::tag(repo, committed, tag, annotated).map_err(|e| {
        reporter.warning("The release commit was created and has not been reverted");
        e
    })?;
    reporter.success(&format!("Created tag {}", tagged.name));

    let pushed = driver::push(repo, tagged, remote).map_err(|e| {
        let branch = repo
            .current_branch()
            .unwrap_or_else(|_| "<branch>".to_string());
        reporter.warning(&format!(
            "Commit and tag {} exist locally and were not rolled back; publish them with `git push {} {} {}`",
            tag, remote, branch, tag
        ));
        e
    })?;
    reporter.success(&format!(
        "Pushed {} and {} to {}",
        pushed.branch, pushed.tag.name, pushed.remote
    ));

    Ok(pushed)
}

fn left_in_place<P: Reporter + ?Sized>(err: ReleaseError, reporter: &mut P) -> ReleaseError {
    reporter.warning("Updated files were left in place; nothing was committed");
    err
}

fn short_id(id: &str) -> &str {
    id.get(..7).unwrap_or(id)
}
