//! Rendering strategy for documentation-framework 6.x and later
//!
//! These releases consume a definition list per model and accept inline
//! reference nodes, so nested model types cross-link to the target model's
//! own generated section. A nested type whose target model has not been
//! discovered falls back to literal text rather than emitting a dangling
//! reference the framework would warn about.

use tracing::debug;

use crate::config::RenderOptions;
use crate::error::Result;
use crate::model::{ModelIndex, NormalizedSchema, TypeShape};

use super::nodes::{DocNode, NodeKind};
use super::{
    constraints_line, default_line, marker, ordered_fields, render_error, section_id,
    validators_line,
};

pub(crate) fn render(
    schema: &NormalizedSchema,
    index: &ModelIndex,
    options: &RenderOptions,
) -> Result<DocNode> {
    let mut section = DocNode::element(NodeKind::Section)
        .with_attr("ids", section_id(&schema.qualified_name))
        .with_attr("names", schema.title.clone())
        .with_child(DocNode::leaf(NodeKind::Title, schema.title.clone()));

    if options.show_description {
        if let Some(description) = &schema.description {
            section.push(DocNode::leaf(NodeKind::Paragraph, description.clone()));
        }
    }

    let mut list = DocNode::element(NodeKind::DefinitionList);
    for field in ordered_fields(schema, options) {
        if field.name.trim().is_empty() {
            return Err(render_error(schema, "field entry without a name"));
        }

        let mut type_paragraph = DocNode::element(NodeKind::Paragraph);
        type_nodes(&field.type_shape, index, &mut type_paragraph);
        type_paragraph.push(DocNode::text(format!(" ({})", marker(field))));

        let mut definition = DocNode::element(NodeKind::Definition).with_child(type_paragraph);

        if options.show_default {
            if let Some(line) = default_line(field) {
                definition.push(DocNode::leaf(NodeKind::Paragraph, line));
            }
        }
        if options.show_description {
            if let Some(description) = &field.description {
                definition.push(DocNode::leaf(NodeKind::Paragraph, description.clone()));
            }
        }
        if options.show_constraints {
            if let Some(line) = constraints_line(field) {
                definition.push(DocNode::leaf(NodeKind::Paragraph, line));
            }
        }
        if options.show_validators {
            if let Some(line) = validators_line(schema, field) {
                definition.push(DocNode::leaf(NodeKind::Paragraph, line));
            }
        }

        list.push(
            DocNode::element(NodeKind::DefinitionListItem)
                .with_child(DocNode::leaf(NodeKind::Term, field.name.clone()))
                .with_child(definition),
        );
    }
    section.push(list);

    if options.show_validator_summary && !schema.validators.is_empty() {
        section.push(DocNode::leaf(NodeKind::Rubric, "Validators"));
        let mut summary = DocNode::element(NodeKind::BulletList);
        for validator in &schema.validators {
            summary.push(DocNode::element(NodeKind::ListItem).with_child(DocNode::leaf(
                NodeKind::Paragraph,
                format!("{} \u{bb} {}", validator.name, validator.target_display()),
            )));
        }
        section.push(summary);
    }

    Ok(section)
}

/// Append the nodes for a type shape: literal text, with reference nodes
/// for nested models that the index knows about. The reference targets the
/// nested model's own generated section, never an inlined duplicate.
fn type_nodes(shape: &TypeShape, index: &ModelIndex, out: &mut DocNode) {
    match shape {
        TypeShape::Nested { model } => match index.qualified_name(model) {
            Some(qualified) => out.push(
                DocNode::leaf(NodeKind::Reference, model.clone())
                    .with_attr("reftarget", section_id(qualified))
                    .with_attr("internal", "true"),
            ),
            None => {
                debug!(model = %model, "nested model not discovered, rendering as text");
                out.push(DocNode::text(model.clone()));
            }
        },
        TypeShape::Array { items } => {
            out.push(DocNode::text("array<"));
            type_nodes(items, index, out);
            out.push(DocNode::text(">"));
        }
        TypeShape::Map { values } => {
            out.push(DocNode::text("map<string, "));
            type_nodes(values, index, out);
            out.push(DocNode::text(">"));
        }
        TypeShape::Optional { inner } => {
            out.push(DocNode::text("optional<"));
            type_nodes(inner, index, out);
            out.push(DocNode::text(">"));
        }
        TypeShape::Scalar { .. } | TypeShape::Opaque { .. } => {
            out.push(DocNode::text(shape.display()));
        }
    }
}
