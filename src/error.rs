//! Error types for the documentation adapter

use thiserror::Error;

use crate::probe::Library;

/// Result type for adapter operations
pub type Result<T> = std::result::Result<T, DocgenError>;

/// Documentation adapter errors
#[derive(Error, Debug)]
pub enum DocgenError {
    /// Installed library versions could not be determined. Fatal for the
    /// whole build since no strategy can be resolved without them.
    #[error("environment error: {0}")]
    Environment(String),

    /// The installed version has no registered strategy. Fatal for the
    /// build; silently picking a default would produce wrong documentation.
    #[error("unsupported {library} version {version}: no compatibility entry covers it")]
    UnsupportedVersion { library: Library, version: semver::Version },

    /// The compatibility table itself is malformed (overlapping spans,
    /// strategy registered for the wrong library). Load-time only.
    #[error("invalid compatibility registry: {0}")]
    InvalidRegistry(String),

    /// A field's metadata could not be normalized under the resolved
    /// strategy. Scoped to one model; surfaced as a build warning.
    #[error("cannot extract schema for '{model}': field '{field}': {reason}")]
    SchemaExtraction {
        model: String,
        field: String,
        reason: String,
    },

    /// A normalized schema could not be converted to framework nodes.
    /// Scoped to one model.
    #[error("cannot render documentation for '{model}': {reason}")]
    Render { model: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl DocgenError {
    /// Whether the failure is scoped to a single model, so a batch build
    /// can record it and keep going.
    pub fn is_model_scoped(&self) -> bool {
        matches!(
            self,
            DocgenError::SchemaExtraction { .. } | DocgenError::Render { .. }
        )
    }

    /// Name of the model this error is attributed to, if any.
    pub fn model(&self) -> Option<&str> {
        match self {
            DocgenError::SchemaExtraction { model, .. } => Some(model),
            DocgenError::Render { model, .. } => Some(model),
            _ => None,
        }
    }
}
