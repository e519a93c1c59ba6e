use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use git_release::cli::{run_release, ReleaseArgs};
use git_release::config::{Config, VersionedFile};
use git_release::domain::{Version, VersionBump};
use git_release::git::MockRepository;
use git_release::report::{Level, RecordingReporter};
use git_release::ReleaseError;
use tempfile::TempDir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
}

fn args(message: &str, bump: VersionBump, dry_run: bool) -> ReleaseArgs {
    ReleaseArgs {
        message: message.to_string(),
        bump,
        category: None,
        dry_run,
    }
}

/// A project with VERSION, CHANGELOG.md and one python file at 1.2.3
fn project() -> (TempDir, Config) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("VERSION"), "1.2.3\n").unwrap();
    fs::write(dir.path().join("CHANGELOG.md"), "# Changelog\n\n## [1.2.3] - 2024-01-01\n### 🐞 Fixed\n- Old fix\n").unwrap();
    fs::write(
        dir.path().join("setup.py"),
        "from setuptools import setup\n\nsetup(\n    name='demo',\n    version='1.2.3',\n)\n",
    )
    .unwrap();

    let mut config = Config::default();
    config.versioned_files = vec![VersionedFile::new("setup.py")];
    (dir, config)
}

fn read(root: &Path, name: &str) -> String {
    fs::read_to_string(root.join(name)).unwrap()
}

fn snapshot(root: &Path) -> Vec<(PathBuf, String)> {
    let mut files: Vec<_> = fs::read_dir(root)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.is_file())
        .map(|p| {
            let content = fs::read_to_string(&p).unwrap();
            (p, content)
        })
        .collect();
    files.sort();
    files
}

#[test]
fn test_full_release_with_mock_repository() {
    let (dir, config) = project();
    let repo = MockRepository::new();
    let mut reporter = RecordingReporter::new();

    let outcome = run_release(
        &args("Add export command", VersionBump::Minor, false),
        &config,
        dir.path(),
        &repo,
        today(),
        &mut reporter,
    )
    .unwrap();

    assert_eq!(outcome.previous, Version::new(1, 2, 3));
    assert_eq!(outcome.version, Version::new(1, 3, 0));
    assert_eq!(outcome.tag, "v1.3.0");
    assert_eq!(outcome.synced_files, vec![PathBuf::from("setup.py")]);
    assert!(outcome.skipped_files.is_empty());

    assert_eq!(read(dir.path(), "VERSION"), "1.3.0\n");
    assert!(read(dir.path(), "setup.py").contains("version='1.3.0'"));
    assert!(read(dir.path(), "CHANGELOG.md").starts_with(
        "# Changelog\n\n## [1.3.0] - 2024-03-09\n### ✨ Added\n- Add export command\n\n## [1.2.3]"
    ));

    let state = repo.state();
    assert_eq!(state.commits, vec!["Release: Add export command (v1.3.0)".to_string()]);
    assert_eq!(state.tags, vec!["v1.3.0".to_string()]);
    assert_eq!(
        state.pushed,
        vec![("origin".to_string(), "main".to_string(), "v1.3.0".to_string())]
    );

    let published = outcome.published.unwrap();
    assert_eq!(published.branch, "main");
    assert_eq!(published.tag.name, "v1.3.0");
    assert!(reporter.contains(Level::Success, "Released version v1.3.0"));
}

#[test]
fn test_dry_run_writes_nothing_and_is_repeatable() {
    let (dir, config) = project();
    let before = snapshot(dir.path());

    let run = || {
        let repo = MockRepository::new();
        let mut reporter = RecordingReporter::new();
        let outcome = run_release(
            &args("Fix parser", VersionBump::Patch, true),
            &config,
            dir.path(),
            &repo,
            today(),
            &mut reporter,
        )
        .unwrap();
        let state = repo.state();
        assert!(state.staged.is_empty());
        assert!(state.commits.is_empty());
        assert!(state.tags.is_empty());
        assert!(state.pushed.is_empty());
        (outcome, reporter)
    };

    let (first, first_report) = run();
    let (second, second_report) = run();

    assert_eq!(snapshot(dir.path()), before);
    assert_eq!(first, second);
    assert_eq!(first_report, second_report);

    assert!(first.dry_run);
    assert!(first.published.is_none());
    assert_eq!(first.version, Version::new(1, 2, 4));
    assert!(first_report.contains(Level::Preview, "VERSION would become 1.2.4"));
    assert!(first_report.contains(Level::Preview, "Would update setup.py:5: `version='1.2.3',` → `version='1.2.4',`"));
    assert!(first_report.contains(Level::Preview, "## [1.2.4] - 2024-03-09"));
    assert!(first_report.contains(Level::Preview, "Would create tag v1.2.4"));
    assert!(first_report.contains(Level::Success, "Would release v1.2.4"));
}

#[test]
fn test_dry_run_ignores_dirty_tree() {
    let (dir, config) = project();
    let repo = MockRepository::new().with_dirty(&["notes.txt"]);
    let mut reporter = RecordingReporter::new();

    let result = run_release(
        &args("Preview only", VersionBump::Patch, true),
        &config,
        dir.path(),
        &repo,
        today(),
        &mut reporter,
    );
    assert!(result.is_ok());
}

#[test]
fn test_dirty_tree_aborts_before_any_write() {
    let (dir, config) = project();
    let before = snapshot(dir.path());
    let repo = MockRepository::new().with_dirty(&["notes.txt", "src/lib.rs"]);
    let mut reporter = RecordingReporter::new();

    let err = run_release(
        &args("Should not happen", VersionBump::Major, false),
        &config,
        dir.path(),
        &repo,
        today(),
        &mut reporter,
    )
    .unwrap_err();

    match err {
        ReleaseError::DirtyWorkingTree(paths) => assert_eq!(paths.len(), 2),
        other => panic!("expected DirtyWorkingTree, got {:?}", other),
    }
    assert_eq!(snapshot(dir.path()), before);
    assert!(repo.state().commits.is_empty());
}

#[test]
fn test_missing_version_file_starts_from_zero() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.versioned_files.clear();
    let repo = MockRepository::new();
    let mut reporter = RecordingReporter::new();

    let outcome = run_release(
        &args("First release", VersionBump::Patch, false),
        &config,
        dir.path(),
        &repo,
        today(),
        &mut reporter,
    )
    .unwrap();

    assert_eq!(outcome.previous, Version::new(0, 0, 0));
    assert_eq!(outcome.version, Version::new(0, 0, 1));
    assert_eq!(read(dir.path(), "VERSION"), "0.0.1\n");
    assert_eq!(
        read(dir.path(), "CHANGELOG.md"),
        "## [0.0.1] - 2024-03-09\n### ✨ Added\n- First release\n"
    );
    assert!(reporter.contains(Level::Warning, "VERSION not found"));
    assert!(reporter.contains(Level::Info, "Created CHANGELOG.md"));
}

#[test]
fn test_malformed_version_recovers_with_warning() {
    let (dir, config) = project();
    fs::write(dir.path().join("VERSION"), "1.2\n").unwrap();
    let repo = MockRepository::new();
    let mut reporter = RecordingReporter::new();

    let outcome = run_release(
        &args("Reset", VersionBump::Minor, false),
        &config,
        dir.path(),
        &repo,
        today(),
        &mut reporter,
    )
    .unwrap();

    assert_eq!(outcome.version, Version::new(0, 1, 0));
    assert!(reporter.contains(Level::Warning, "Malformed version '1.2'"));
}

#[test]
fn test_unmatched_and_missing_files_are_skipped() {
    let (dir, mut config) = project();
    fs::write(dir.path().join("README.md"), "# Demo\n\nNo version here.\n").unwrap();
    config.versioned_files = vec![
        VersionedFile::new("setup.py"),
        VersionedFile::new("README.md"),
        VersionedFile::new("src/__init__.py"),
    ];
    let repo = MockRepository::new();
    let mut reporter = RecordingReporter::new();

    let outcome = run_release(
        &args("Partial sync", VersionBump::Patch, false),
        &config,
        dir.path(),
        &repo,
        today(),
        &mut reporter,
    )
    .unwrap();

    assert_eq!(outcome.synced_files, vec![PathBuf::from("setup.py")]);
    assert_eq!(
        outcome.skipped_files,
        vec![PathBuf::from("README.md"), PathBuf::from("src/__init__.py")]
    );
    assert!(reporter.contains(Level::Warning, "No version token found in README.md"));
    assert!(reporter.contains(Level::Warning, "Versioned file not found: src/__init__.py"));
    assert_eq!(read(dir.path(), "README.md"), "# Demo\n\nNo version here.\n");
    assert!(!dir.path().join("src/__init__.py").exists());

    let staged = repo.state().staged;
    assert!(staged.is_empty(), "commit should consume the staged files");
    assert_eq!(repo.state().tags, vec!["v1.2.4".to_string()]);
}

#[test]
fn test_custom_pattern_replaces_only_version_group() {
    let (dir, mut config) = project();
    fs::write(
        dir.path().join("package.json"),
        "{\n  \"name\": \"demo\",\n  \"version\": \"1.2.3\",\n  \"engines\": \"1.2.3\"\n}\n",
    )
    .unwrap();
    config.versioned_files = vec![VersionedFile::with_pattern(
        "package.json",
        r#""version":\s*"(?P<version>[0-9]+\.[0-9]+\.[0-9]+)""#,
    )];
    let repo = MockRepository::new();
    let mut reporter = RecordingReporter::new();

    run_release(
        &args("Bump", VersionBump::Major, false),
        &config,
        dir.path(),
        &repo,
        today(),
        &mut reporter,
    )
    .unwrap();

    assert_eq!(
        read(dir.path(), "package.json"),
        "{\n  \"name\": \"demo\",\n  \"version\": \"2.0.0\",\n  \"engines\": \"1.2.3\"\n}\n"
    );
}

#[test]
fn test_category_selects_changelog_header() {
    let (dir, config) = project();
    let repo = MockRepository::new();
    let mut reporter = RecordingReporter::new();
    let mut release = args("Fix crash\nFix typo", VersionBump::Patch, false);
    release.category = Some("FIX".to_string());

    run_release(&release, &config, dir.path(), &repo, today(), &mut reporter).unwrap();

    assert!(read(dir.path(), "CHANGELOG.md")
        .contains("## [1.2.4] - 2024-03-09\n### 🐞 Fixed\n- Fix crash\n- Fix typo\n"));
}

#[test]
fn test_unknown_category_is_capitalized() {
    let (dir, config) = project();
    let repo = MockRepository::new();
    let mut reporter = RecordingReporter::new();
    let mut release = args("Faster startup", VersionBump::Patch, false);
    release.category = Some("performance".to_string());

    run_release(&release, &config, dir.path(), &repo, today(), &mut reporter).unwrap();

    assert!(read(dir.path(), "CHANGELOG.md").contains("### Performance\n- Faster startup\n"));
    assert!(reporter.contains(Level::Info, "Category 'performance' has no configured header"));
}

#[test]
fn test_existing_tag_stops_before_push() {
    let (dir, config) = project();
    let repo = MockRepository::new().with_tag("v1.2.4");
    let mut reporter = RecordingReporter::new();

    let err = run_release(
        &args("Again", VersionBump::Patch, false),
        &config,
        dir.path(),
        &repo,
        today(),
        &mut reporter,
    )
    .unwrap_err();

    assert!(matches!(err, ReleaseError::TagConflict(ref t) if t == "v1.2.4"));
    let state = repo.state();
    assert_eq!(state.commits.len(), 1);
    assert!(state.pushed.is_empty());
    assert!(reporter.contains(Level::Warning, "has not been reverted"));
    assert_eq!(read(dir.path(), "VERSION"), "1.2.4\n");
}

#[test]
fn test_push_failure_keeps_commit_and_tag() {
    let (dir, config) = project();
    let repo = MockRepository::new().with_push_failure("remote rejected");
    let mut reporter = RecordingReporter::new();

    let err = run_release(
        &args("Ship it", VersionBump::Patch, false),
        &config,
        dir.path(),
        &repo,
        today(),
        &mut reporter,
    )
    .unwrap_err();

    assert!(matches!(err, ReleaseError::Push(_)));
    assert_eq!(err.to_string(), "Push failed: remote rejected");
    let state = repo.state();
    assert_eq!(state.commits.len(), 1);
    assert_eq!(state.tags, vec!["v1.2.4".to_string()]);
    assert!(reporter.contains(Level::Warning, "git push origin main v1.2.4"));
}

#[test]
fn test_empty_message_is_rejected() {
    let (dir, config) = project();
    let before = snapshot(dir.path());
    let repo = MockRepository::new();
    let mut reporter = RecordingReporter::new();

    for message in ["", "   ", "\n\t\n"] {
        let err = run_release(
            &args(message, VersionBump::Patch, false),
            &config,
            dir.path(),
            &repo,
            today(),
            &mut reporter,
        )
        .unwrap_err();
        assert!(matches!(err, ReleaseError::Input(_)));
    }
    assert_eq!(snapshot(dir.path()), before);
    assert!(reporter.lines.is_empty());
}

#[test]
fn test_consecutive_releases_stack_changelog_entries() {
    let (dir, config) = project();
    let repo = MockRepository::new();
    let mut reporter = RecordingReporter::new();

    for (message, bump) in [
        ("One", VersionBump::Patch),
        ("Two", VersionBump::Minor),
        ("Three", VersionBump::Major),
    ] {
        run_release(&args(message, bump, false), &config, dir.path(), &repo, today(), &mut reporter)
            .unwrap();
    }

    let changelog = read(dir.path(), "CHANGELOG.md");
    let positions: Vec<usize> = ["## [2.0.0]", "## [1.3.0]", "## [1.2.4]", "## [1.2.3]"]
        .iter()
        .map(|h| changelog.find(h).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(changelog.starts_with("# Changelog\n\n## [2.0.0]"));
    assert_eq!(repo.state().tags, vec!["v1.2.4", "v1.3.0", "v2.0.0"]);
}

#[test]
fn test_bump_overflow_stops_before_any_write() {
    let (dir, config) = project();
    fs::write(dir.path().join("VERSION"), "0.0.4294967295\n").unwrap();
    let before = snapshot(dir.path());
    let repo = MockRepository::new();
    let mut reporter = RecordingReporter::new();

    let err = run_release(
        &args("Too far", VersionBump::Patch, false),
        &config,
        dir.path(),
        &repo,
        today(),
        &mut reporter,
    )
    .unwrap_err();

    assert!(matches!(err, ReleaseError::Input(_)));
    assert!(err.to_string().contains("patch segment of 0.0.4294967295"));
    assert_eq!(snapshot(dir.path()), before);
    assert!(repo.state().commits.is_empty());
}

#[test]
fn test_message_placeholders_are_committed_verbatim() {
    let (dir, config) = project();
    let repo = MockRepository::new();
    let mut reporter = RecordingReporter::new();

    run_release(
        &args("Document the {version} and {tag} placeholders", VersionBump::Patch, false),
        &config,
        dir.path(),
        &repo,
        today(),
        &mut reporter,
    )
    .unwrap();

    assert_eq!(
        repo.state().commits,
        vec!["Release: Document the {version} and {tag} placeholders (v1.2.4)".to_string()]
    );
    assert!(read(dir.path(), "CHANGELOG.md").contains("- Document the {version} and {tag} placeholders\n"));
}

#[test]
fn test_invalid_config_is_rejected_before_version_file_is_written() {
    let (dir, mut config) = project();
    config.versioned_files = vec![VersionedFile::with_pattern("setup.py", "version = (")];
    let before = snapshot(dir.path());
    let repo = MockRepository::new();
    let mut reporter = RecordingReporter::new();

    let err = run_release(
        &args("Broken pattern", VersionBump::Patch, false),
        &config,
        dir.path(),
        &repo,
        today(),
        &mut reporter,
    )
    .unwrap_err();

    assert!(matches!(err, ReleaseError::Config(_)));
    assert_eq!(snapshot(dir.path()), before);
    assert!(reporter.lines.is_empty());
}
