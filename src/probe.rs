//! Version probing for the two external libraries
//!
//! The adapter sits between a data-validation library and a documentation
//! framework, both of which change shape across releases. The probe turns
//! the version strings the host reports into comparable version values and
//! caches them for the lifetime of the process: set once at first probe,
//! read-only thereafter, cleared only for test isolation.

use std::fmt;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{DocgenError, Result};
use crate::version::parse_version;

/// The external libraries the adapter must track versions of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Library {
    /// The data-validation library exposing model field schemas
    Validator,
    /// The documentation framework consuming rendered nodes
    Doctree,
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Library::Validator => write!(f, "validator"),
            Library::Doctree => write!(f, "doctree"),
        }
    }
}

/// Version strings as reported by the host embedding the adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostEnvironment {
    /// Reported release of the validation library (e.g. "1.8.2")
    pub validator_version: String,
    /// Reported release of the documentation framework (e.g. "4.0")
    pub doctree_version: String,
}

impl HostEnvironment {
    pub fn new(validator_version: impl Into<String>, doctree_version: impl Into<String>) -> Self {
        Self {
            validator_version: validator_version.into(),
            doctree_version: doctree_version.into(),
        }
    }
}

/// Parsed, immutable versions of both libraries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbedVersions {
    pub validator: Version,
    pub doctree: Version,
    /// When the probe first ran
    pub probed_at: DateTime<Utc>,
}

impl ProbedVersions {
    /// Version of the given library
    pub fn get(&self, library: Library) -> &Version {
        match library {
            Library::Validator => &self.validator,
            Library::Doctree => &self.doctree,
        }
    }
}

static PROBED: RwLock<Option<ProbedVersions>> = RwLock::new(None);

/// Process-wide version probe
pub struct Probe;

impl Probe {
    /// Parse and cache the versions reported by the host.
    ///
    /// The first successful call wins; later calls return the cached result
    /// even if the host hands in a different environment, matching the
    /// "resolved once per process" contract.
    pub fn ensure(env: &HostEnvironment) -> Result<ProbedVersions> {
        if let Some(existing) = Self::cached() {
            return Ok(existing);
        }

        let probed = Self::parse(env)?;

        let mut slot = PROBED
            .write()
            .map_err(|_| DocgenError::Environment("version cache lock poisoned".to_string()))?;
        // A concurrent probe may have won the race; keep the first result.
        if let Some(existing) = slot.as_ref() {
            return Ok(existing.clone());
        }
        info!(
            validator = %probed.validator,
            doctree = %probed.doctree,
            "probed library versions"
        );
        *slot = Some(probed.clone());
        Ok(probed)
    }

    /// The cached versions, or an environment error if no probe ran yet
    pub fn current() -> Result<ProbedVersions> {
        Self::cached().ok_or_else(|| {
            DocgenError::Environment("library versions have not been probed".to_string())
        })
    }

    /// Clear the cache. Test isolation only.
    pub fn reset() {
        if let Ok(mut slot) = PROBED.write() {
            *slot = None;
        }
    }

    /// Parse an environment without touching the cache
    pub fn parse(env: &HostEnvironment) -> Result<ProbedVersions> {
        let validator = Self::parse_one(Library::Validator, &env.validator_version)?;
        let doctree = Self::parse_one(Library::Doctree, &env.doctree_version)?;
        Ok(ProbedVersions {
            validator,
            doctree,
            probed_at: Utc::now(),
        })
    }

    fn parse_one(library: Library, raw: &str) -> Result<Version> {
        if raw.trim().is_empty() {
            return Err(DocgenError::Environment(format!(
                "{library} library reported no version"
            )));
        }
        parse_version(raw).map_err(|err| {
            DocgenError::Environment(format!(
                "{library} library reported unparseable version '{raw}': {err}"
            ))
        })
    }

    fn cached() -> Option<ProbedVersions> {
        PROBED.read().ok().and_then(|slot| slot.clone())
    }
}
