//! Node rendering
//!
//! Turns a `NormalizedSchema` into the node structure the resolved
//! documentation-framework release expects. Like extraction, each supported
//! framework family is a self-contained strategy module; the helpers here
//! keep the textual content identical between them so only the node
//! structure differs.

mod classic;
mod modern;
pub mod nodes;

pub use nodes::{DocNode, NodeKind};

use crate::config::{FieldOrder, RenderOptions};
use crate::error::{DocgenError, Result};
use crate::model::{FieldDescriptor, ModelIndex, NormalizedSchema};
use crate::registry::Strategy;

/// Rendering strategy families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    /// Framework 4.x/5.x: field-list nodes, no inline cross-references
    Classic,
    /// Framework 6.x+: definition-list nodes with `pending_xref`-style
    /// reference children
    Modern,
}

impl RendererKind {
    /// The renderer a resolved strategy selects, if it is one
    pub fn from_strategy(strategy: Strategy) -> Option<Self> {
        match strategy {
            Strategy::DoctreeClassic => Some(RendererKind::Classic),
            Strategy::DoctreeModern => Some(RendererKind::Modern),
            Strategy::ValidatorLegacy | Strategy::ValidatorModern => None,
        }
    }
}

/// Render a normalized schema under the resolved strategy. Fails with
/// `Render` (naming the model) when the framework's node API would reject
/// the constructed tree; the caller aborts that model only.
pub fn render(
    schema: &NormalizedSchema,
    kind: RendererKind,
    index: &ModelIndex,
    options: &RenderOptions,
) -> Result<DocNode> {
    let tree = match kind {
        RendererKind::Classic => classic::render(schema, options)?,
        RendererKind::Modern => modern::render(schema, index, options)?,
    };

    tree.check().map_err(|reason| DocgenError::Render {
        model: schema.qualified_name.clone(),
        reason,
    })?;
    Ok(tree)
}

pub(crate) fn render_error(schema: &NormalizedSchema, reason: impl Into<String>) -> DocgenError {
    DocgenError::Render {
        model: schema.qualified_name.clone(),
        reason: reason.into(),
    }
}

/// Stable section identifier for a model, used as the cross-reference
/// target of its generated section
pub fn section_id(qualified_name: &str) -> String {
    qualified_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

/// Fields in the order the options ask for; declaration order is the
/// default and the guarantee
pub(crate) fn ordered_fields<'a>(
    schema: &'a NormalizedSchema,
    options: &RenderOptions,
) -> Vec<&'a FieldDescriptor> {
    let mut fields: Vec<&FieldDescriptor> = schema.fields.iter().collect();
    if options.field_order == FieldOrder::Alphabetical {
        fields.sort_by(|a, b| a.name.cmp(&b.name));
    }
    fields
}

pub(crate) fn marker(field: &FieldDescriptor) -> &'static str {
    if field.required {
        "required"
    } else {
        "optional"
    }
}

/// "default: 9.99" / "no default"; required fields show nothing
pub(crate) fn default_line(field: &FieldDescriptor) -> Option<String> {
    match field.default.display() {
        Some(rendered) if rendered == "no default" => Some(rendered),
        Some(rendered) => Some(format!("default: {rendered}")),
        None => None,
    }
}

pub(crate) fn constraints_line(field: &FieldDescriptor) -> Option<String> {
    if field.constraints.is_empty() {
        None
    } else {
        Some(format!("constraints: {}", field.constraints.join("; ")))
    }
}

pub(crate) fn validators_line(
    schema: &NormalizedSchema,
    field: &FieldDescriptor,
) -> Option<String> {
    let names: Vec<&str> = schema
        .validators_for(&field.name)
        .iter()
        .map(|v| v.name.as_str())
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(format!("validated by: {}", names.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldDefault, TypeShape};

    fn field(name: &str, required: bool, default: FieldDefault) -> FieldDescriptor {
        FieldDescriptor {
            name: name.to_string(),
            type_display: "string".to_string(),
            type_shape: TypeShape::Scalar {
                name: "string".to_string(),
            },
            required,
            default,
            description: None,
            constraints: vec![],
        }
    }

    #[test]
    fn test_section_id_slug() {
        assert_eq!(section_id("shop.cart.Item"), "shop-cart-item");
    }

    #[test]
    fn test_default_line_states() {
        assert_eq!(
            default_line(&field("a", true, FieldDefault::Required)),
            None
        );
        assert_eq!(
            default_line(&field("a", false, FieldDefault::Unset)).as_deref(),
            Some("no default")
        );
        assert_eq!(
            default_line(&field("a", false, FieldDefault::Value("0".to_string()))).as_deref(),
            Some("default: 0")
        );
    }

    #[test]
    fn test_ordered_fields_alphabetical_opt_in() {
        let schema = NormalizedSchema {
            title: "M".to_string(),
            qualified_name: "m.M".to_string(),
            description: None,
            fields: vec![
                field("zeta", true, FieldDefault::Required),
                field("alpha", true, FieldDefault::Required),
            ],
            nested_models: vec![],
            validators: vec![],
        };

        let declared: Vec<&str> = ordered_fields(&schema, &RenderOptions::default())
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(declared, vec!["zeta", "alpha"]);

        let options = RenderOptions {
            field_order: FieldOrder::Alphabetical,
            ..RenderOptions::default()
        };
        let sorted: Vec<&str> = ordered_fields(&schema, &options)
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(sorted, vec!["alpha", "zeta"]);
    }
}
