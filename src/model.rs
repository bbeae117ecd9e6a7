//! Normalized model representation
//!
//! The version-independent shapes the extractor produces and the renderer
//! consumes. Nothing in this module knows which library versions are
//! installed; that is the whole point.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A data-model class to document: fully qualified name plus the model
/// document the validation library exposes for it. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelReference {
    /// Fully qualified model name (e.g. "shop.cart.Item")
    pub qualified_name: String,
    /// The library-exposed schema document, in whatever shape the installed
    /// release produces
    pub document: serde_json::Value,
}

impl ModelReference {
    pub fn new(qualified_name: impl Into<String>, document: serde_json::Value) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            document,
        }
    }

    /// Unqualified model name (last path segment)
    pub fn name(&self) -> &str {
        self.qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.qualified_name)
    }
}

/// Structured type shape of a field, kept alongside the display string so
/// renderers can cross-link nested models without re-parsing type text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TypeShape {
    /// A plain scalar type ("string", "integer", ...)
    Scalar { name: String },
    /// Homogeneous array
    Array { items: Box<TypeShape> },
    /// String-keyed map
    Map { values: Box<TypeShape> },
    /// Optional wrapper around an inner shape
    Optional { inner: Box<TypeShape> },
    /// Reference to another documented model, by name only. The renderer
    /// decides how to cross-link it; the fields are never inlined here.
    Nested { model: String },
    /// Anything the strategy recognized but cannot break down further
    Opaque { display: String },
}

impl TypeShape {
    /// The nested model name, if this shape (or its wrapper) is one
    pub fn nested_model(&self) -> Option<&str> {
        match self {
            TypeShape::Nested { model } => Some(model),
            TypeShape::Optional { inner } => inner.nested_model(),
            TypeShape::Array { items } => items.nested_model(),
            TypeShape::Map { values } => values.nested_model(),
            _ => None,
        }
    }

    /// Human-readable display form, identical across library versions
    pub fn display(&self) -> String {
        match self {
            TypeShape::Scalar { name } => name.clone(),
            TypeShape::Array { items } => format!("array<{}>", items.display()),
            TypeShape::Map { values } => format!("map<string, {}>", values.display()),
            TypeShape::Optional { inner } => format!("optional<{}>", inner.display()),
            TypeShape::Nested { model } => model.clone(),
            TypeShape::Opaque { display } => display.clone(),
        }
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Default state of a field.
///
/// A three-state value rather than `Option<String>` so that an optional
/// field with a falsy default ("0", "[]", "false") can never be confused
/// with "no default": optionality and absence of a default are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "value")]
pub enum FieldDefault {
    /// Required field: a value must be supplied, no default applies
    Required,
    /// Optional field without a declared default
    Unset,
    /// Optional field with a declared default, in rendered form
    Value(String),
}

impl FieldDefault {
    /// Rendered form for documentation output
    pub fn display(&self) -> Option<String> {
        match self {
            FieldDefault::Required => None,
            FieldDefault::Unset => Some("no default".to_string()),
            FieldDefault::Value(v) => Some(v.clone()),
        }
    }
}

/// Normalized representation of one model field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name; non-empty and unique within its model
    pub name: String,
    /// Declared type as a display string
    pub type_display: String,
    /// Structured type shape
    pub type_shape: TypeShape,
    /// Whether a value must be supplied on model creation
    pub required: bool,
    /// Default state; `Required` iff `required` is true
    pub default: FieldDefault,
    /// Help text, if declared
    pub description: Option<String>,
    /// Validation constraints as uniform human-readable strings
    pub constraints: Vec<String>,
}

impl FieldDescriptor {
    /// Check the descriptor's internal invariants
    pub fn is_consistent(&self) -> bool {
        let default_matches = match self.default {
            FieldDefault::Required => self.required,
            FieldDefault::Unset | FieldDefault::Value(_) => !self.required,
        };
        !self.name.is_empty() && default_matches
    }
}

/// A validator declared on the model, bound to the fields it checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorBinding {
    /// Validator function name as declared in the model body
    pub name: String,
    /// Names of the fields this validator checks, in declaration order.
    /// Empty when `applies_to_all` is set.
    pub fields: Vec<String>,
    /// Whether the validator targets every field ("*" in the model body)
    pub applies_to_all: bool,
}

impl ValidatorBinding {
    /// Display form of the field target list
    pub fn target_display(&self) -> String {
        if self.applies_to_all {
            "all fields".to_string()
        } else {
            self.fields.join(", ")
        }
    }
}

/// Ordered, version-independent schema of one model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedSchema {
    /// Model title (unqualified name unless the document declares one)
    pub title: String,
    /// Fully qualified model name
    pub qualified_name: String,
    /// Model-level description, if declared
    pub description: Option<String>,
    /// Fields in declaration order
    pub fields: Vec<FieldDescriptor>,
    /// Names of nested models referenced by any field, in first-use order
    pub nested_models: Vec<String>,
    /// Validators declared on the model, in declaration order
    pub validators: Vec<ValidatorBinding>,
}

impl NormalizedSchema {
    /// Field names in declaration order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Get a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validators bound to the given field, including all-fields validators
    pub fn validators_for(&self, field_name: &str) -> Vec<&ValidatorBinding> {
        self.validators
            .iter()
            .filter(|v| v.applies_to_all || v.fields.iter().any(|f| f == field_name))
            .collect()
    }
}

/// Lookup of already-discovered models, used to resolve nested references
/// by name. Keeping references name-based (instead of embedding sub-schemas)
/// means cyclic model graphs cannot recurse unboundedly.
#[derive(Debug, Clone, Default)]
pub struct ModelIndex {
    models: BTreeMap<String, ModelReference>,
}

impl ModelIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a discovered model under its unqualified name
    pub fn insert(&mut self, model: ModelReference) {
        self.models.insert(model.name().to_string(), model);
    }

    /// Whether a model with the given (unqualified) name is known
    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Look up a model by unqualified name
    pub fn get(&self, name: &str) -> Option<&ModelReference> {
        self.models.get(name)
    }

    /// Qualified name for a nested reference, when the target is indexed
    pub fn qualified_name(&self, name: &str) -> Option<&str> {
        self.models.get(name).map(|m| m.qualified_name.as_str())
    }

    /// All indexed models, in name order
    pub fn iter(&self) -> impl Iterator<Item = &ModelReference> {
        self.models.values()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
