//! Rendering strategy for documentation-framework 4.x/5.x
//!
//! These releases consume a field list per model. Their node API has no
//! inline cross-reference children, so nested model types render as plain
//! literal text; the framework still resolves the section itself through
//! the section identifier.

use crate::config::RenderOptions;
use crate::error::Result;
use crate::model::NormalizedSchema;

use super::nodes::{DocNode, NodeKind};
use super::{
    constraints_line, default_line, marker, ordered_fields, render_error, section_id,
    validators_line,
};

pub(crate) fn render(schema: &NormalizedSchema, options: &RenderOptions) -> Result<DocNode> {
    let mut section = DocNode::element(NodeKind::Section)
        .with_attr("ids", section_id(&schema.qualified_name))
        .with_attr("names", schema.title.clone())
        .with_child(DocNode::leaf(NodeKind::Title, schema.title.clone()));

    if options.show_description {
        if let Some(description) = &schema.description {
            section.push(DocNode::leaf(NodeKind::Paragraph, description.clone()));
        }
    }

    let mut field_list = DocNode::element(NodeKind::FieldList);
    for field in ordered_fields(schema, options) {
        if field.name.trim().is_empty() {
            return Err(render_error(schema, "field entry without a name"));
        }

        let mut body = DocNode::element(NodeKind::FieldBody).with_child(DocNode::leaf(
            NodeKind::Paragraph,
            format!("{} ({})", field.type_display, marker(field)),
        ));

        if options.show_default {
            if let Some(line) = default_line(field) {
                body.push(DocNode::leaf(NodeKind::Paragraph, line));
            }
        }
        if options.show_description {
            if let Some(description) = &field.description {
                body.push(DocNode::leaf(NodeKind::Paragraph, description.clone()));
            }
        }
        if options.show_constraints {
            if let Some(line) = constraints_line(field) {
                body.push(DocNode::leaf(NodeKind::Paragraph, line));
            }
        }
        if options.show_validators {
            if let Some(line) = validators_line(schema, field) {
                body.push(DocNode::leaf(NodeKind::Paragraph, line));
            }
        }

        field_list.push(
            DocNode::element(NodeKind::Field)
                .with_child(DocNode::leaf(NodeKind::FieldName, field.name.clone()))
                .with_child(body),
        );
    }
    section.push(field_list);

    if options.show_validator_summary && !schema.validators.is_empty() {
        section.push(DocNode::leaf(NodeKind::Rubric, "Validators"));
        let mut list = DocNode::element(NodeKind::BulletList);
        for validator in &schema.validators {
            list.push(DocNode::element(NodeKind::ListItem).with_child(DocNode::leaf(
                NodeKind::Paragraph,
                format!("{} \u{bb} {}", validator.name, validator.target_display()),
            )));
        }
        section.push(list);
    }

    Ok(section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldDefault, FieldDescriptor, TypeShape};

    fn schema_with(fields: Vec<FieldDescriptor>) -> NormalizedSchema {
        NormalizedSchema {
            title: "Item".to_string(),
            qualified_name: "shop.cart.Item".to_string(),
            description: Some("A sellable item.".to_string()),
            fields,
            nested_models: vec![],
            validators: vec![],
        }
    }

    fn string_field(name: &str) -> FieldDescriptor {
        FieldDescriptor {
            name: name.to_string(),
            type_display: "string".to_string(),
            type_shape: TypeShape::Scalar {
                name: "string".to_string(),
            },
            required: true,
            default: FieldDefault::Required,
            description: None,
            constraints: vec![],
        }
    }

    #[test]
    fn test_field_list_structure() {
        let schema = schema_with(vec![string_field("name"), string_field("sku")]);
        let tree = render(&schema, &RenderOptions::default()).unwrap();

        assert_eq!(tree.kind, NodeKind::Section);
        assert_eq!(tree.attr("ids"), Some("shop-cart-item"));

        let names: Vec<String> = tree
            .find_all(NodeKind::FieldName)
            .iter()
            .map(|n| n.text_content())
            .collect();
        assert_eq!(names, vec!["name", "sku"]);
    }

    #[test]
    fn test_nested_types_are_plain_text() {
        let mut field = string_field("shipping");
        field.type_display = "Address".to_string();
        field.type_shape = TypeShape::Nested {
            model: "Address".to_string(),
        };
        let schema = schema_with(vec![field]);

        let tree = render(&schema, &RenderOptions::default()).unwrap();
        assert!(tree.find_all(NodeKind::Reference).is_empty());
        assert!(tree.text_content().contains("Address (required)"));
    }

    #[test]
    fn test_empty_field_name_is_rejected() {
        let schema = schema_with(vec![string_field("")]);
        let err = render(&schema, &RenderOptions::default()).unwrap_err();
        assert!(err.to_string().contains("shop.cart.Item"));
    }

    #[test]
    fn test_options_hide_sections() {
        let mut field = string_field("price");
        field.required = false;
        field.default = FieldDefault::Value("9.99".to_string());
        field.constraints = vec!["minimum: 0".to_string()];
        let schema = schema_with(vec![field]);

        let options = RenderOptions {
            show_default: false,
            show_constraints: false,
            ..RenderOptions::default()
        };
        let tree = render(&schema, &options).unwrap();
        let text = tree.text_content();
        assert!(!text.contains("default"));
        assert!(!text.contains("minimum"));
    }
}
