//! The documentation pipeline
//!
//! Resolves both strategies once, then documents models: extract, render,
//! hand the node tree back to the host. Batch documentation recovers
//! locally from model-scoped failures so one malformed model does not
//! abort documentation for the rest of the project.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::RenderOptions;
use crate::error::{DocgenError, Result};
use crate::extract::{self, ExtractorKind};
use crate::model::{ModelIndex, ModelReference, NormalizedSchema};
use crate::probe::{HostEnvironment, Library, Probe, ProbedVersions};
use crate::registry::CompatibilityRegistry;
use crate::render::{self, DocNode, RendererKind};

/// A model-scoped failure recorded during a batch build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildWarning {
    /// Qualified name of the model that failed
    pub model: String,
    /// The failure, rendered
    pub message: String,
}

/// Result of documenting a set of models
#[derive(Debug, Clone, Default)]
pub struct BuildOutcome {
    /// Rendered sections, one per successfully documented model
    pub sections: Vec<DocNode>,
    /// Models skipped with a warning
    pub warnings: Vec<BuildWarning>,
}

/// Documents models under one resolved (validator, doctree) version pair
#[derive(Debug)]
pub struct SchemaDocumenter {
    versions: ProbedVersions,
    extractor: ExtractorKind,
    renderer: RendererKind,
    options: RenderOptions,
}

impl SchemaDocumenter {
    /// Probe the host environment (process-cached) and resolve strategies
    /// from the built-in compatibility table.
    pub fn new(env: &HostEnvironment) -> Result<Self> {
        let versions = Probe::ensure(env)?;
        Self::from_versions(versions, &CompatibilityRegistry::builtin(), RenderOptions::default())
    }

    /// Probe the host environment (process-cached) with an explicit
    /// registry and options.
    pub fn with_registry(
        env: &HostEnvironment,
        registry: &CompatibilityRegistry,
        options: RenderOptions,
    ) -> Result<Self> {
        let versions = Probe::ensure(env)?;
        Self::from_versions(versions, registry, options)
    }

    /// Build from already-probed versions. Fails with `UnsupportedVersion`
    /// when either version has no registered strategy; extraction and
    /// rendering are never attempted in that case.
    pub fn from_versions(
        versions: ProbedVersions,
        registry: &CompatibilityRegistry,
        options: RenderOptions,
    ) -> Result<Self> {
        let validator_strategy = registry.resolve(Library::Validator, &versions.validator)?;
        let doctree_strategy = registry.resolve(Library::Doctree, &versions.doctree)?;

        let extractor = ExtractorKind::from_strategy(validator_strategy).ok_or_else(|| {
            DocgenError::InvalidRegistry(format!(
                "'{}' is not an extraction strategy",
                validator_strategy.id()
            ))
        })?;
        let renderer = RendererKind::from_strategy(doctree_strategy).ok_or_else(|| {
            DocgenError::InvalidRegistry(format!(
                "'{}' is not a rendering strategy",
                doctree_strategy.id()
            ))
        })?;

        info!(
            validator = %versions.validator,
            doctree = %versions.doctree,
            extract = validator_strategy.id(),
            render = doctree_strategy.id(),
            "documenter ready"
        );

        Ok(Self {
            versions,
            extractor,
            renderer,
            options,
        })
    }

    /// The versions this documenter was resolved against
    pub fn versions(&self) -> &ProbedVersions {
        &self.versions
    }

    /// Normalize one model's schema without rendering it
    pub fn extract(&self, model: &ModelReference) -> Result<NormalizedSchema> {
        extract::extract(model, self.extractor)
    }

    /// Document one model: normalized schema in, framework nodes out.
    /// Nested references cross-link against `index`.
    pub fn document(&self, model: &ModelReference, index: &ModelIndex) -> Result<DocNode> {
        let schema = self.extract(model)?;
        render::render(&schema, self.renderer, index, &self.options)
    }

    /// Document every indexed model, in name order. Model-scoped failures
    /// become warnings and the build continues; environment or version
    /// failures abort.
    pub fn document_all(&self, index: &ModelIndex) -> Result<BuildOutcome> {
        let mut outcome = BuildOutcome::default();
        for model in index.iter() {
            match self.document(model, index) {
                Ok(section) => outcome.sections.push(section),
                Err(err) if err.is_model_scoped() => {
                    warn!(model = %model.qualified_name, error = %err, "skipping model");
                    outcome.warnings.push(BuildWarning {
                        model: model.qualified_name.clone(),
                        message: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }
        Ok(outcome)
    }
}
