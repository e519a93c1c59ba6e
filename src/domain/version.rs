use crate::error::{ReleaseError, Result};
use std::fmt;
use std::str::FromStr;

/// Semantic version representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a plain `MAJOR.MINOR.PATCH` string.
    ///
    /// Surrounding whitespace is ignored. Prefixes (`v1.2.3`), signs,
    /// pre-release suffixes and segments that overflow `u32` are rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() != 3 {
            return Err(ReleaseError::MalformedVersion(trimmed.to_string()));
        }

        let mut segments = [0u32; 3];
        for (slot, part) in segments.iter_mut().zip(&parts) {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(ReleaseError::MalformedVersion(trimmed.to_string()));
            }
            *slot = part
                .parse::<u32>()
                .map_err(|_| ReleaseError::MalformedVersion(trimmed.to_string()))?;
        }

        Ok(Version::new(segments[0], segments[1], segments[2]))
    }

    /// Bump version according to bump type
    ///
    /// Fails when the bumped segment is already `u32::MAX`.
    pub fn bump(&self, bump_type: VersionBump) -> Result<Self> {
        let overflow = || {
            ReleaseError::input(format!(
                "Cannot bump the {} segment of {}: it is already at its maximum",
                bump_type, self
            ))
        };

        let bumped = match bump_type {
            VersionBump::Major => Version {
                major: self.major.checked_add(1).ok_or_else(overflow)?,
                minor: 0,
                patch: 0,
            },
            VersionBump::Minor => Version {
                major: self.major,
                minor: self.minor.checked_add(1).ok_or_else(overflow)?,
                patch: 0,
            },
            VersionBump::Patch => Version {
                major: self.major,
                minor: self.minor,
                patch: self.patch.checked_add(1).ok_or_else(overflow)?,
            },
        };
        Ok(bumped)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

/// Which segment of the version to increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionBump {
    Major,
    Minor,
    #[default]
    Patch,
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionBump::Major => "major",
            VersionBump::Minor => "minor",
            VersionBump::Patch => "patch",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
    }

    #[test]
    fn test_version_parse_trims_whitespace() {
        assert_eq!(Version::parse("  0.9.5\n").unwrap(), Version::new(0, 9, 5));
    }

    #[test]
    fn test_version_parse_invalid() {
        for bad in [
            "", "1.2", "1.2.3.4", "v1.2.3", "1.2.x", "1..3", "+1.2.3", "1.2.3-rc.1", "-1.0.0",
            "99999999999.0.0",
        ] {
            assert!(
                matches!(Version::parse(bad), Err(ReleaseError::MalformedVersion(_))),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_version_from_str() {
        let v: Version = "10.0.1".parse().unwrap();
        assert_eq!(v, Version::new(10, 0, 1));
    }

    #[test]
    fn test_version_bump_major() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(VersionBump::Major).unwrap(), Version::new(2, 0, 0));
    }

    #[test]
    fn test_version_bump_minor() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(VersionBump::Minor).unwrap(), Version::new(1, 3, 0));
    }

    #[test]
    fn test_version_bump_patch() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(VersionBump::Patch).unwrap(), Version::new(1, 2, 4));
    }

    #[test]
    fn test_bump_resets_lower_segments_everywhere() {
        for major in [0, 1, 7] {
            for minor in [0, 4, 12] {
                for patch in [0, 9] {
                    let v = Version::new(major, minor, patch);
                    assert_eq!(v.bump(VersionBump::Major).unwrap(), Version::new(major + 1, 0, 0));
                    assert_eq!(v.bump(VersionBump::Minor).unwrap(), Version::new(major, minor + 1, 0));
                    assert_eq!(
                        v.bump(VersionBump::Patch).unwrap(),
                        Version::new(major, minor, patch + 1)
                    );
                }
            }
        }
    }

    #[test]
    fn test_bump_at_segment_maximum_fails() {
        let v = Version::parse("0.0.4294967295").unwrap();
        assert!(matches!(v.bump(VersionBump::Patch), Err(ReleaseError::Input(_))));
        assert_eq!(v.bump(VersionBump::Minor).unwrap(), Version::new(0, 1, 0));

        let v = Version::new(u32::MAX, 3, 7);
        assert!(v.bump(VersionBump::Major).is_err());
        assert_eq!(v.bump(VersionBump::Minor).unwrap(), Version::new(u32::MAX, 4, 0));
    }

    #[test]
    fn test_default_is_zero() {
        assert_eq!(Version::default().to_string(), "0.0.0");
        assert_eq!(VersionBump::default(), VersionBump::Patch);
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(0, 10, 0).to_string(), "0.10.0");
        assert_eq!(VersionBump::Minor.to_string(), "minor");
    }
}
