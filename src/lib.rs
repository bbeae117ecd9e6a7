//! Schemadoc
//!
//! A version-tolerant adapter that documents typed data-model schemas as
//! structured documentation nodes. It sits between two independently
//! evolving external libraries: a data-validation library (which exposes
//! model classes with a declarative field schema) and a documentation
//! framework (which consumes rendered nodes and produces final output).
//! The caller never observes which version pair is installed.
//!
//! ## Features
//!
//! - **Version Probing**: installed library versions are parsed once per
//!   process and cached read-only
//! - **Compatibility Registry**: (library, version span) pairs map to
//!   extraction/rendering strategies; unsupported versions fail explicitly
//! - **Schema Normalization**: field names, types, optionality, defaults,
//!   constraints, and validator bindings in one version-independent shape
//! - **Node Rendering**: framework-native trees with cross-links from
//!   nested model types to their own generated sections
//!
//! ## Architecture
//!
//! ```text
//! HostEnvironment ──▶ Probe ──▶ CompatibilityRegistry
//!                                      │ resolves
//!                                      ▼
//! ModelReference ──▶ extract (per validator release family)
//!                                      │ NormalizedSchema
//!                                      ▼
//!                    render (per doctree release family) ──▶ DocNode
//! ```

pub mod config;
pub mod documenter;
pub mod error;
pub mod extract;
pub mod model;
pub mod probe;
pub mod registry;
pub mod render;
pub mod version;

pub use config::{DocConfig, FieldOrder, RenderOptions};
pub use documenter::{BuildOutcome, BuildWarning, SchemaDocumenter};
pub use error::{DocgenError, Result};
pub use extract::{extract, ExtractorKind};
pub use model::{
    FieldDefault, FieldDescriptor, ModelIndex, ModelReference, NormalizedSchema, TypeShape,
    ValidatorBinding,
};
pub use probe::{HostEnvironment, Library, Probe, ProbedVersions};
pub use registry::{CompatibilityEntry, CompatibilityRegistry, CompatibilityTable, Strategy};
pub use render::{render, DocNode, NodeKind, RendererKind};
pub use version::VersionSpan;
