//! Version values and ranges for compatibility tracking

use std::fmt;

use semver::Version;
use serde::{Deserialize, Serialize};

/// Parse a library version string, tolerating a leading `v` and a missing
/// patch component ("2.0" is read as "2.0.0").
pub fn parse_version(raw: &str) -> Result<Version, semver::Error> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

    match Version::parse(trimmed) {
        Ok(v) => Ok(v),
        Err(err) => {
            // Doc frameworks commonly report "4.0" style versions.
            let dots = trimmed.chars().filter(|c| *c == '.').count();
            if dots == 1 && !trimmed.contains(['-', '+']) {
                Version::parse(&format!("{trimmed}.0"))
            } else {
                Err(err)
            }
        }
    }
}

/// A half-open version range: `min` inclusive, `max` exclusive.
///
/// Half-open spans make "non-overlapping and collectively covering" easy to
/// state: consecutive entries share a boundary without sharing a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSpan {
    /// Lowest version included in the span
    pub min: Version,
    /// First version excluded from the span
    pub max: Version,
}

impl VersionSpan {
    pub fn new(min: Version, max: Version) -> Self {
        Self { min, max }
    }

    /// Parse from two version strings
    pub fn parse(min: &str, max: &str) -> Result<Self, semver::Error> {
        Ok(Self::new(parse_version(min)?, parse_version(max)?))
    }

    /// Whether the span contains any version at all
    pub fn is_empty(&self) -> bool {
        self.min >= self.max
    }

    /// Whether `version` falls inside the span
    pub fn contains(&self, version: &Version) -> bool {
        *version >= self.min && *version < self.max
    }

    /// Whether two spans share at least one version
    pub fn overlaps(&self, other: &VersionSpan) -> bool {
        !self.is_empty() && !other.is_empty() && self.min < other.max && other.min < self.max
    }
}

impl fmt::Display for VersionSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ">={}, <{}", self.min, self.max)
    }
}
