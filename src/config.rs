use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{CategoryMap, TagPattern};
use crate::error::{ReleaseError, Result};

/// File name searched for in the project root
pub const CONFIG_FILE_NAME: &str = "gitrelease.toml";

/// Pattern matching `version = "1.2.3"` and `__version__ = '1.2.3'` assignments.
pub const DEFAULT_VERSION_PATTERN: &str =
    r#"(?:__version__|version)\s*=\s*['"](?P<version>[0-9]+\.[0-9]+\.[0-9]+)['"]"#;

/// Represents the complete configuration for git-release.
///
/// Loaded once at startup and passed by reference into the synchronizer,
/// the changelog writer and the VCS driver.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default = "default_versioned_files")]
    pub versioned_files: Vec<VersionedFile>,

    #[serde(default)]
    pub changelog: ChangelogConfig,

    #[serde(default)]
    pub vcs: VcsConfig,
}

/// Locations of the canonical version file and the changelog.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FilesConfig {
    #[serde(default = "default_version_file")]
    pub version_file: PathBuf,

    #[serde(default = "default_changelog_file")]
    pub changelog: PathBuf,
}

fn default_version_file() -> PathBuf {
    PathBuf::from("VERSION")
}

fn default_changelog_file() -> PathBuf {
    PathBuf::from("CHANGELOG.md")
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            version_file: default_version_file(),
            changelog: default_changelog_file(),
        }
    }
}

/// A file, besides the version file, that embeds the version string.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VersionedFile {
    pub path: PathBuf,

    /// Regular expression locating the version token. The `version` named
    /// group (or group 1) is the part that gets replaced.
    #[serde(default = "default_version_pattern")]
    pub pattern: String,
}

impl VersionedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        VersionedFile {
            path: path.into(),
            pattern: default_version_pattern(),
        }
    }

    pub fn with_pattern(path: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        VersionedFile {
            path: path.into(),
            pattern: pattern.into(),
        }
    }

    /// Compile the pattern, checking it has a group to replace
    pub fn compile(&self) -> Result<Regex> {
        let re = Regex::new(&self.pattern).map_err(|e| {
            ReleaseError::config(format!(
                "Invalid pattern for {}: {}",
                self.path.display(),
                e
            ))
        })?;

        if re.captures_len() < 2 {
            return Err(ReleaseError::config(format!(
                "Pattern for {} has no capture group for the version",
                self.path.display()
            )));
        }
        Ok(re)
    }
}

fn default_version_pattern() -> String {
    DEFAULT_VERSION_PATTERN.to_string()
}

/// Returns the default list of versioned files.
fn default_versioned_files() -> Vec<VersionedFile> {
    vec![
        VersionedFile::new("setup.py"),
        VersionedFile::new("src/__init__.py"),
    ]
}

/// Configuration for changelog categories.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangelogConfig {
    #[serde(default = "default_category")]
    pub default_category: String,

    #[serde(default = "default_categories")]
    pub categories: HashMap<String, String>,
}

fn default_category() -> String {
    "feature".to_string()
}

/// Returns the default label -> header mapping.
fn default_categories() -> HashMap<String, String> {
    let mut map = HashMap::new();
    map.insert("feature".to_string(), "✨ Added".to_string());
    map.insert("fix".to_string(), "🐞 Fixed".to_string());
    map.insert("refactor".to_string(), "🔨 Refactor".to_string());
    map.insert("chore".to_string(), "🧹 Chore".to_string());
    map.insert("docs".to_string(), "📝 Docs".to_string());
    map
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            default_category: default_category(),
            categories: default_categories(),
        }
    }
}

impl ChangelogConfig {
    pub fn category_map(&self) -> CategoryMap {
        CategoryMap::new(&self.categories)
    }
}

/// Configuration for the commit/tag/push sequence.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VcsConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,

    /// Template with `{message}`, `{version}` and `{tag}` placeholders
    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    #[serde(default)]
    pub annotated_tag: bool,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_tag_pattern() -> String {
    "v{version}".to_string()
}

fn default_commit_message() -> String {
    "Release: {message} (v{version})".to_string()
}

impl Default for VcsConfig {
    fn default() -> Self {
        VcsConfig {
            remote: default_remote(),
            tag_pattern: default_tag_pattern(),
            commit_message: default_commit_message(),
            annotated_tag: false,
        }
    }
}

impl VcsConfig {
    pub fn tag_pattern(&self) -> Result<TagPattern> {
        TagPattern::new(self.tag_pattern.clone())
    }

    /// Fill in the commit message template.
    ///
    /// Placeholders are only recognized in the template, so braces inside
    /// the message itself are kept as typed.
    pub fn render_commit_message(&self, message: &str, version: &str, tag: &str) -> String {
        let placeholders = [("{message}", message), ("{version}", version), ("{tag}", tag)];

        let mut out = String::with_capacity(self.commit_message.len() + message.len());
        let mut rest = self.commit_message.as_str();
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            match placeholders
                .iter()
                .find(|(name, _)| tail.starts_with(name))
            {
                Some((name, value)) => {
                    out.push_str(value);
                    rest = &tail[name.len()..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            files: FilesConfig::default(),
            versioned_files: default_versioned_files(),
            changelog: ChangelogConfig::default(),
            vcs: VcsConfig::default(),
        }
    }
}

impl Config {
    /// Check everything that can be checked before the run starts.
    pub fn validate(&self) -> Result<()> {
        for file in &self.versioned_files {
            file.compile()?;
        }
        self.vcs.tag_pattern()?;

        if self.vcs.remote.trim().is_empty() {
            return Err(ReleaseError::config("Remote name must not be empty"));
        }
        if self.changelog.default_category.trim().is_empty() {
            return Err(ReleaseError::config("Default category must not be empty"));
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitrelease.toml` in the project root
/// 3. `.gitrelease.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// The loaded configuration is validated before it is returned.
pub fn load_config(config_path: Option<&Path>, root: &Path) -> Result<Config> {
    let config = match locate_config(config_path, root) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            let text = fs::read_to_string(&path).map_err(|e| ReleaseError::file(&path, e))?;
            toml::from_str::<Config>(&text).map_err(|e| {
                ReleaseError::config(format!("Cannot parse {}: {}", path.display(), e))
            })?
        }
        None => {
            tracing::debug!("no configuration file found, using defaults");
            Config::default()
        }
    };

    config.validate()?;
    Ok(config)
}

fn locate_config(config_path: Option<&Path>, root: &Path) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(path.to_path_buf());
    }

    let local = root.join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    let user = dirs::config_dir()?.join(format!(".{}", CONFIG_FILE_NAME));
    user.exists().then_some(user)
}
