use crate::error::{ReleaseError, Result};

use super::Version;

/// Tag naming pattern (e.g., "v{version}", "release-{version}")
#[derive(Debug, Clone)]
pub struct TagPattern {
    pub pattern: String,
}

impl TagPattern {
    /// Create a new tag pattern, rejecting patterns without exactly one
    /// `{version}` placeholder
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.matches("{version}").count() != 1 {
            return Err(ReleaseError::config(format!(
                "Tag pattern '{}' must contain exactly one {{version}} placeholder",
                pattern
            )));
        }
        Ok(TagPattern { pattern })
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version=1.2.3 -> "v1.2.3"
    pub fn format(&self, version: &Version) -> String {
        self.pattern.replace("{version}", &version.to_string())
    }
}

impl Default for TagPattern {
    fn default() -> Self {
        TagPattern {
            pattern: "v{version}".to_string(),
        }
    }
}
