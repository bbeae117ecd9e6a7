//! Compatibility Registry
//!
//! Maps (library, version span) pairs to the extraction/rendering strategy
//! to use. This is the seam that keeps the extractor and renderer
//! version-agnostic: new library releases get a new entry (or a widened
//! span) here, never conditional branching in the strategies themselves.

use std::path::Path;

use semver::Version;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DocgenError, Result};
use crate::probe::Library;
use crate::version::VersionSpan;

/// A version-specific implementation of extraction or rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Validation-library 1.x model documents
    ValidatorLegacy,
    /// Validation-library 2.x model documents
    ValidatorModern,
    /// Documentation-framework 4.x/5.x field-list nodes
    DoctreeClassic,
    /// Documentation-framework 6.x+ definition-list nodes with
    /// cross-reference support
    DoctreeModern,
}

impl Strategy {
    /// The library this strategy implements a contract for
    pub fn library(&self) -> Library {
        match self {
            Strategy::ValidatorLegacy | Strategy::ValidatorModern => Library::Validator,
            Strategy::DoctreeClassic | Strategy::DoctreeModern => Library::Doctree,
        }
    }

    /// Stable identifier, as used in compatibility tables
    pub fn id(&self) -> &'static str {
        match self {
            Strategy::ValidatorLegacy => "validator-legacy",
            Strategy::ValidatorModern => "validator-modern",
            Strategy::DoctreeClassic => "doctree-classic",
            Strategy::DoctreeModern => "doctree-modern",
        }
    }
}

/// One row of the compatibility table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityEntry {
    pub library: Library,
    pub span: VersionSpan,
    pub strategy: Strategy,
}

impl CompatibilityEntry {
    pub fn new(library: Library, span: VersionSpan, strategy: Strategy) -> Self {
        Self {
            library,
            span,
            strategy,
        }
    }
}

/// Serialized form of the table, for `compat.toml` files:
///
/// ```toml
/// [[validator]]
/// min = "1.5.0"
/// max = "2.0.0"
/// strategy = "validator-legacy"
///
/// [[doctree]]
/// min = "4.0.0"
/// max = "6.0.0"
/// strategy = "doctree-classic"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompatibilityTable {
    #[serde(default)]
    pub validator: Vec<TableRow>,
    #[serde(default)]
    pub doctree: Vec<TableRow>,
}

/// One serialized table row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    pub min: Version,
    pub max: Version,
    pub strategy: Strategy,
}

/// The compatibility registry: validated at construction, immutable after
#[derive(Debug, Clone)]
pub struct CompatibilityRegistry {
    entries: Vec<CompatibilityEntry>,
}

impl CompatibilityRegistry {
    /// The built-in table. Kept in lockstep with the CI version matrix:
    /// every span here is exercised by at least one matrix cell.
    pub fn builtin() -> Self {
        let entries = vec![
            CompatibilityEntry::new(
                Library::Validator,
                VersionSpan::new(Version::new(1, 5, 0), Version::new(2, 0, 0)),
                Strategy::ValidatorLegacy,
            ),
            CompatibilityEntry::new(
                Library::Validator,
                VersionSpan::new(Version::new(2, 0, 0), Version::new(3, 0, 0)),
                Strategy::ValidatorModern,
            ),
            CompatibilityEntry::new(
                Library::Doctree,
                VersionSpan::new(Version::new(4, 0, 0), Version::new(6, 0, 0)),
                Strategy::DoctreeClassic,
            ),
            CompatibilityEntry::new(
                Library::Doctree,
                VersionSpan::new(Version::new(6, 0, 0), Version::new(9, 0, 0)),
                Strategy::DoctreeModern,
            ),
        ];
        // A vetted constant; the unit tests below run it through the same
        // validation as loaded tables.
        Self { entries }
    }

    /// Build a registry from explicit entries, validating that spans for the
    /// same library are non-empty and non-overlapping and that every
    /// strategy is registered under the library it implements.
    pub fn from_entries(entries: Vec<CompatibilityEntry>) -> Result<Self> {
        for entry in &entries {
            if entry.span.is_empty() {
                return Err(DocgenError::InvalidRegistry(format!(
                    "{} span {} contains no versions",
                    entry.library, entry.span
                )));
            }
            if entry.strategy.library() != entry.library {
                return Err(DocgenError::InvalidRegistry(format!(
                    "strategy '{}' implements the {} contract but is registered for {}",
                    entry.strategy.id(),
                    entry.strategy.library(),
                    entry.library
                )));
            }
        }

        for (i, a) in entries.iter().enumerate() {
            for b in entries.iter().skip(i + 1) {
                if a.library == b.library && a.span.overlaps(&b.span) {
                    return Err(DocgenError::InvalidRegistry(format!(
                        "{} spans overlap: {} and {}",
                        a.library, a.span, b.span
                    )));
                }
            }
        }

        Ok(Self { entries })
    }

    /// Build a registry from a serialized table
    pub fn from_table(table: CompatibilityTable) -> Result<Self> {
        let mut entries = Vec::new();
        for row in table.validator {
            entries.push(CompatibilityEntry::new(
                Library::Validator,
                VersionSpan::new(row.min, row.max),
                row.strategy,
            ));
        }
        for row in table.doctree {
            entries.push(CompatibilityEntry::new(
                Library::Doctree,
                VersionSpan::new(row.min, row.max),
                row.strategy,
            ));
        }
        Self::from_entries(entries)
    }

    /// Load a table from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = config_crate::Config::builder()
            .add_source(config_crate::File::from(path.as_ref().to_path_buf()))
            .build()?;
        let table: CompatibilityTable = raw.try_deserialize()?;
        Self::from_table(table)
    }

    /// All entries, in registration order
    pub fn entries(&self) -> &[CompatibilityEntry] {
        &self.entries
    }

    /// Entries for one library
    pub fn entries_for(&self, library: Library) -> Vec<&CompatibilityEntry> {
        self.entries
            .iter()
            .filter(|e| e.library == library)
            .collect()
    }

    /// Resolve the strategy whose registered span contains `version`.
    ///
    /// An unsupported version fails explicitly; falling back to a wrong
    /// strategy would produce incorrect documentation with no visible
    /// failure.
    pub fn resolve(&self, library: Library, version: &Version) -> Result<Strategy> {
        let strategy = self
            .entries
            .iter()
            .find(|e| e.library == library && e.span.contains(version))
            .map(|e| e.strategy)
            .ok_or_else(|| DocgenError::UnsupportedVersion {
                library,
                version: version.clone(),
            })?;
        debug!(%library, %version, strategy = strategy.id(), "resolved strategy");
        Ok(strategy)
    }
}

impl Default for CompatibilityRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_is_valid() {
        let registry = CompatibilityRegistry::builtin();
        assert_eq!(registry.entries().len(), 4);
        assert_eq!(registry.entries_for(Library::Validator).len(), 2);
        assert_eq!(registry.entries_for(Library::Doctree).len(), 2);
        // the constant must pass the same validation as loaded tables
        assert!(CompatibilityRegistry::from_entries(registry.entries().to_vec()).is_ok());
    }

    #[test]
    fn test_resolve_known_versions() {
        let registry = CompatibilityRegistry::builtin();
        assert_eq!(
            registry
                .resolve(Library::Validator, &Version::new(1, 8, 2))
                .unwrap(),
            Strategy::ValidatorLegacy
        );
        assert_eq!(
            registry
                .resolve(Library::Validator, &Version::new(2, 4, 1))
                .unwrap(),
            Strategy::ValidatorModern
        );
        assert_eq!(
            registry
                .resolve(Library::Doctree, &Version::new(4, 0, 0))
                .unwrap(),
            Strategy::DoctreeClassic
        );
        assert_eq!(
            registry
                .resolve(Library::Doctree, &Version::new(7, 2, 5))
                .unwrap(),
            Strategy::DoctreeModern
        );
    }

    #[test]
    fn test_resolve_boundary_is_half_open() {
        let registry = CompatibilityRegistry::builtin();
        // 2.0.0 belongs to the modern span, not the legacy one
        assert_eq!(
            registry
                .resolve(Library::Validator, &Version::new(2, 0, 0))
                .unwrap(),
            Strategy::ValidatorModern
        );
    }

    #[test]
    fn test_unsupported_version_is_explicit() {
        let registry = CompatibilityRegistry::builtin();
        let err = registry
            .resolve(Library::Validator, &Version::new(0, 9, 0))
            .unwrap_err();
        match err {
            DocgenError::UnsupportedVersion { library, version } => {
                assert_eq!(library, Library::Validator);
                assert_eq!(version, Version::new(0, 9, 0));
            }
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
        // The message must name the version
        let registry = CompatibilityRegistry::builtin();
        let msg = registry
            .resolve(Library::Doctree, &Version::new(3, 5, 0))
            .unwrap_err()
            .to_string();
        assert!(msg.contains("3.5.0"));
    }

    #[test]
    fn test_overlap_is_a_load_error() {
        let entries = vec![
            CompatibilityEntry::new(
                Library::Validator,
                VersionSpan::new(Version::new(1, 0, 0), Version::new(2, 0, 0)),
                Strategy::ValidatorLegacy,
            ),
            CompatibilityEntry::new(
                Library::Validator,
                VersionSpan::new(Version::new(1, 9, 0), Version::new(3, 0, 0)),
                Strategy::ValidatorModern,
            ),
        ];
        let err = CompatibilityRegistry::from_entries(entries).unwrap_err();
        assert!(matches!(err, DocgenError::InvalidRegistry(_)));
    }

    #[test]
    fn test_wrong_library_strategy_is_a_load_error() {
        let entries = vec![CompatibilityEntry::new(
            Library::Validator,
            VersionSpan::new(Version::new(1, 0, 0), Version::new(2, 0, 0)),
            Strategy::DoctreeClassic,
        )];
        let err = CompatibilityRegistry::from_entries(entries).unwrap_err();
        assert!(matches!(err, DocgenError::InvalidRegistry(_)));
    }

    #[test]
    fn test_empty_span_is_a_load_error() {
        let entries = vec![CompatibilityEntry::new(
            Library::Doctree,
            VersionSpan::new(Version::new(5, 0, 0), Version::new(5, 0, 0)),
            Strategy::DoctreeClassic,
        )];
        assert!(CompatibilityRegistry::from_entries(entries).is_err());
    }
}
