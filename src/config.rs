//! Configuration for the documentation adapter
//!
//! Two layers: `RenderOptions` is the per-invocation option surface the
//! host passes alongside a directive (what to show per field), and
//! `DocConfig` is the file/environment configuration the binaries load:
//!
//! ```toml
//! [options]
//! show_default = true
//! show_constraints = true
//! field_order = "declaration"
//!
//! [compat]
//! table = "compat.toml"
//! ```
//!
//! Environment variables use the `SCHEMADOC_` prefix
//! (e.g. `SCHEMADOC_OPTIONS__SHOW_DEFAULT=false`).

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Order in which field entries are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldOrder {
    /// Declaration order from the model, the default and the guarantee
    #[default]
    Declaration,
    /// Alphabetical by field name, opt-in
    Alphabetical,
}

/// Per-invocation rendering options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Show model and field descriptions
    #[serde(default = "default_true")]
    pub show_description: bool,

    /// Show default values (and the explicit "no default" sentinel)
    #[serde(default = "default_true")]
    pub show_default: bool,

    /// Show validation constraints
    #[serde(default = "default_true")]
    pub show_constraints: bool,

    /// Show which validators check each field
    #[serde(default = "default_true")]
    pub show_validators: bool,

    /// Show the model-level validator summary
    #[serde(default = "default_true")]
    pub show_validator_summary: bool,

    /// Field entry ordering
    #[serde(default)]
    pub field_order: FieldOrder,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_description: true,
            show_default: true,
            show_constraints: true,
            show_validators: true,
            show_validator_summary: true,
            field_order: FieldOrder::Declaration,
        }
    }
}

/// Compatibility-table location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompatConfig {
    /// Path to a TOML compatibility table; the built-in table is used when
    /// absent
    #[serde(default)]
    pub table: Option<PathBuf>,
}

/// Full configuration as loaded by the binaries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocConfig {
    #[serde(default)]
    pub options: RenderOptions,

    #[serde(default)]
    pub compat: CompatConfig,
}

impl DocConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, optionally from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["schemadoc.toml", ".schemadoc.toml", "config/schemadoc.toml"];
        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("SCHEMADOC")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

fn default_true() -> bool {
    true
}
