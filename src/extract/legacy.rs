//! Extraction strategy for validation-library 1.x model documents
//!
//! Dialect markers: nested definitions live under `definitions`, refs with
//! sibling metadata are wrapped in a single-element `allOf`, exclusive
//! numeric bounds are draft-4 boolean flags next to `minimum`/`maximum`,
//! and the validator map sits under `validators`.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::model::{
    FieldDefault, FieldDescriptor, ModelReference, NormalizedSchema, TypeShape,
};

use super::{
    collect_nested, constraint_strings, field_error, normalize_validators, render_default,
    ExclusiveStyle,
};

const REF_PREFIX: &str = "#/definitions/";
const VALIDATORS_KEY: &str = "validators";

pub(crate) fn extract(model: &ModelReference) -> Result<NormalizedSchema> {
    let doc = model
        .document
        .as_object()
        .ok_or_else(|| field_error(model, "(document)", "model document is not an object"))?;

    let title = doc
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or(model.name())
        .to_string();
    let description = doc
        .get("description")
        .and_then(Value::as_str)
        .map(String::from);

    let required: Vec<&str> = doc
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let empty = Map::new();
    let properties = match doc.get("properties") {
        Some(Value::Object(props)) => props,
        Some(_) => {
            return Err(field_error(model, "(document)", "'properties' is not an object"));
        }
        None => &empty,
    };

    let mut fields = Vec::with_capacity(properties.len());
    for (name, prop) in properties {
        let prop = prop
            .as_object()
            .ok_or_else(|| field_error(model, name, "field schema is not an object"))?;

        // A field-level nullable union only expresses optionality; the
        // required flag already carries that, so normalize to the inner
        // shape for wording identical to non-union dumps.
        let effective = nullable_branch(prop).unwrap_or(prop);

        let type_shape = shape_of(model, name, effective)?;
        let is_required = required.contains(&name.as_str());
        let default = if is_required {
            FieldDefault::Required
        } else {
            match prop.get("default") {
                Some(value) => FieldDefault::Value(render_default(value)),
                None => FieldDefault::Unset,
            }
        };

        fields.push(FieldDescriptor {
            name: name.clone(),
            type_display: type_shape.display(),
            type_shape,
            required: is_required,
            default,
            description: prop
                .get("description")
                .and_then(Value::as_str)
                .map(String::from),
            constraints: constraint_strings(effective, ExclusiveStyle::BooleanFlag),
        });
    }

    let shapes: Vec<&TypeShape> = fields.iter().map(|f| &f.type_shape).collect();
    let nested_models = collect_nested(&shapes);
    let validators = normalize_validators(model, doc, VALIDATORS_KEY)?;

    Ok(NormalizedSchema {
        title,
        qualified_name: model.qualified_name.clone(),
        description,
        fields,
        nested_models,
        validators,
    })
}

/// The non-null branch of a two-armed nullable union, if `prop` is one
fn nullable_branch(prop: &Map<String, Value>) -> Option<&Map<String, Value>> {
    let arms = prop.get("anyOf")?.as_array()?;
    if arms.len() != 2 {
        return None;
    }
    let (a, b) = (arms[0].as_object()?, arms[1].as_object()?);
    match (is_null_type(a), is_null_type(b)) {
        (false, true) => Some(a),
        (true, false) => Some(b),
        _ => None,
    }
}

fn is_null_type(prop: &Map<String, Value>) -> bool {
    prop.get("type").and_then(Value::as_str) == Some("null")
}

fn shape_of(
    model: &ModelReference,
    field: &str,
    prop: &Map<String, Value>,
) -> Result<TypeShape> {
    if let Some(reference) = prop.get("$ref") {
        return ref_shape(model, field, reference);
    }

    // 1.x wraps a ref in allOf whenever the field carries sibling metadata
    // (description, default) next to it.
    if let Some(Value::Array(arms)) = prop.get("allOf") {
        if let [Value::Object(inner)] = arms.as_slice() {
            return shape_of(model, field, inner);
        }
        return Err(field_error(model, field, "unsupported allOf shape"));
    }

    if let Some(Value::Array(arms)) = prop.get("anyOf") {
        if let Some(inner) = nullable_branch(prop) {
            return Ok(TypeShape::Optional {
                inner: Box::new(shape_of(model, field, inner)?),
            });
        }
        let mut displays = Vec::with_capacity(arms.len());
        for arm in arms {
            let arm = arm
                .as_object()
                .ok_or_else(|| field_error(model, field, "union arm is not an object"))?;
            displays.push(shape_of(model, field, arm)?.display());
        }
        return Ok(TypeShape::Opaque {
            display: format!("union<{}>", displays.join(" | ")),
        });
    }

    match prop.get("type") {
        Some(Value::String(kind)) => match kind.as_str() {
            "array" => {
                let items = match prop.get("items") {
                    Some(Value::Object(items)) => shape_of(model, field, items)?,
                    Some(_) => {
                        return Err(field_error(model, field, "'items' is not an object"));
                    }
                    None => TypeShape::Opaque {
                        display: "any".to_string(),
                    },
                };
                Ok(TypeShape::Array {
                    items: Box::new(items),
                })
            }
            "object" => match prop.get("additionalProperties") {
                Some(Value::Object(values)) => Ok(TypeShape::Map {
                    values: Box::new(shape_of(model, field, values)?),
                }),
                _ => Ok(TypeShape::Opaque {
                    display: "object".to_string(),
                }),
            },
            scalar => Ok(TypeShape::Scalar {
                name: scalar.to_string(),
            }),
        },
        Some(other) => Err(field_error(
            model,
            field,
            format!("unsupported type keyword: {other}"),
        )),
        None => Ok(TypeShape::Opaque {
            display: "any".to_string(),
        }),
    }
}

fn ref_shape(model: &ModelReference, field: &str, reference: &Value) -> Result<TypeShape> {
    let path = reference
        .as_str()
        .ok_or_else(|| field_error(model, field, "$ref is not a string"))?;
    let target = path
        .strip_prefix(REF_PREFIX)
        .ok_or_else(|| field_error(model, field, format!("unrecognized $ref path: {path}")))?;
    Ok(TypeShape::Nested {
        model: target.to_string(),
    })
}
