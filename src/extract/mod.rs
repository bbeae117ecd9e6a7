//! Schema extraction
//!
//! Turns a library-exposed model document into a `NormalizedSchema`. Each
//! supported validation-library release family gets its own self-contained
//! strategy module; the shared helpers here exist so that both strategies
//! emit textually identical wording for defaults and constraints. The same
//! model documented under two different library versions must not leak
//! version-specific phrasing.

mod legacy;
mod modern;

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{DocgenError, Result};
use crate::model::{ModelReference, NormalizedSchema, TypeShape, ValidatorBinding};
use crate::registry::Strategy;

/// Extraction strategy families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorKind {
    /// Validation-library 1.x documents: `definitions`, `allOf`-wrapped
    /// refs, draft-4 boolean exclusive bounds, `validators` key
    Legacy,
    /// Validation-library 2.x documents: `$defs`, nullable `anyOf`
    /// wrappers, numeric exclusive bounds, `x-validators` key
    Modern,
}

impl ExtractorKind {
    /// The extractor a resolved strategy selects, if it is one
    pub fn from_strategy(strategy: Strategy) -> Option<Self> {
        match strategy {
            Strategy::ValidatorLegacy => Some(ExtractorKind::Legacy),
            Strategy::ValidatorModern => Some(ExtractorKind::Modern),
            Strategy::DoctreeClassic | Strategy::DoctreeModern => None,
        }
    }
}

/// Extract a normalized schema from a model document under the resolved
/// strategy. Fails with `SchemaExtraction` (naming the field) when a field's
/// metadata cannot be interpreted; this indicates an unhandled
/// library-version shape and is reported, never retried.
pub fn extract(model: &ModelReference, kind: ExtractorKind) -> Result<NormalizedSchema> {
    match kind {
        ExtractorKind::Legacy => legacy::extract(model),
        ExtractorKind::Modern => modern::extract(model),
    }
}

/// How a document expresses exclusive numeric bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExclusiveStyle {
    /// Draft-4 style: `exclusiveMinimum: true` modifies `minimum`
    BooleanFlag,
    /// Later drafts: `exclusiveMinimum: 0` carries the bound itself
    NumericValue,
}

pub(crate) fn field_error(
    model: &ModelReference,
    field: &str,
    reason: impl Into<String>,
) -> DocgenError {
    DocgenError::SchemaExtraction {
        model: model.qualified_name.clone(),
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Render a declared default value for documentation output. JSON-literal
/// form is used for every type so both strategies agree: `9.99`, `[]`,
/// `"gadget"`, `0`, `false`.
pub(crate) fn render_default(value: &Value) -> String {
    value.to_string()
}

/// Translate constraint keywords on a property into uniform wording.
///
/// The keyword set is shared across library versions; only the exclusive
/// bound encoding differs, which `style` resolves. Output order is fixed so
/// two strategies produce identical constraint lists.
pub(crate) fn constraint_strings(prop: &Map<String, Value>, style: ExclusiveStyle) -> Vec<String> {
    let mut out = Vec::new();

    push_bound(
        &mut out,
        prop,
        style,
        "minimum",
        "exclusiveMinimum",
        "minimum",
        "exclusive minimum",
    );
    push_bound(
        &mut out,
        prop,
        style,
        "maximum",
        "exclusiveMaximum",
        "maximum",
        "exclusive maximum",
    );

    if let Some(v) = prop.get("minLength") {
        out.push(format!("min length: {v}"));
    }
    if let Some(v) = prop.get("maxLength") {
        out.push(format!("max length: {v}"));
    }
    if let Some(v) = prop.get("minItems") {
        out.push(format!("min items: {v}"));
    }
    if let Some(v) = prop.get("maxItems") {
        out.push(format!("max items: {v}"));
    }
    if let Some(Value::String(pattern)) = prop.get("pattern") {
        if regex::Regex::new(pattern).is_err() {
            warn!(pattern = %pattern, "pattern constraint is not a well-formed regex");
        }
        out.push(format!("pattern: {pattern}"));
    }
    if let Some(v) = prop.get("multipleOf") {
        out.push(format!("multiple of: {v}"));
    }

    out
}

fn push_bound(
    out: &mut Vec<String>,
    prop: &Map<String, Value>,
    style: ExclusiveStyle,
    inclusive_key: &str,
    exclusive_key: &str,
    inclusive_label: &str,
    exclusive_label: &str,
) {
    match style {
        ExclusiveStyle::BooleanFlag => {
            let exclusive = prop
                .get(exclusive_key)
                .and_then(Value::as_bool)
                .unwrap_or(false);
            if let Some(bound) = prop.get(inclusive_key) {
                let label = if exclusive {
                    exclusive_label
                } else {
                    inclusive_label
                };
                out.push(format!("{label}: {bound}"));
            }
        }
        ExclusiveStyle::NumericValue => {
            if let Some(bound) = prop.get(exclusive_key) {
                out.push(format!("{exclusive_label}: {bound}"));
            } else if let Some(bound) = prop.get(inclusive_key) {
                out.push(format!("{inclusive_label}: {bound}"));
            }
        }
    }
}

/// Normalize the validator map a document carries under `key`:
/// `{ "check_name": ["name"], "check_everything": ["*"] }`.
/// Declaration order is preserved; a `*` target marks an all-fields
/// validator.
pub(crate) fn normalize_validators(
    model: &ModelReference,
    document: &Map<String, Value>,
    key: &str,
) -> Result<Vec<ValidatorBinding>> {
    let Some(raw) = document.get(key) else {
        return Ok(Vec::new());
    };
    let raw = raw
        .as_object()
        .ok_or_else(|| field_error(model, key, "validator map is not an object"))?;

    let mut bindings = Vec::new();
    for (name, targets) in raw {
        let targets = targets.as_array().ok_or_else(|| {
            field_error(model, name, "validator target list is not an array")
        })?;

        let mut fields = Vec::new();
        let mut applies_to_all = false;
        for target in targets {
            match target.as_str() {
                Some("*") => applies_to_all = true,
                Some(field) => fields.push(field.to_string()),
                None => {
                    return Err(field_error(
                        model,
                        name,
                        "validator target is not a string",
                    ))
                }
            }
        }
        if applies_to_all {
            fields.clear();
        }
        bindings.push(ValidatorBinding {
            name: name.clone(),
            fields,
            applies_to_all,
        });
    }
    Ok(bindings)
}

/// Collect nested model names referenced by the given shapes, in first-use
/// order without duplicates.
pub(crate) fn collect_nested(shapes: &[&TypeShape]) -> Vec<String> {
    let mut seen = Vec::new();
    for shape in shapes {
        if let Some(name) = shape.nested_model() {
            if !seen.iter().any(|s| s == name) {
                seen.push(name.to_string());
            }
        }
    }
    seen
}
