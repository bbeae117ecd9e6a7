//! Rendering behavior tests
//!
//! The reference scenario, the falsy-default regression, nested-model
//! cross-linking, batch recovery, and compatibility table loading.

use std::io::Write;

use schemadoc::{
    CompatibilityRegistry, DocNode, FieldOrder, Library, ModelIndex, ModelReference, NodeKind,
    ProbedVersions, RenderOptions, SchemaDocumenter,
};
use semver::Version;

fn documenter_with(validator: &str, doctree: &str, options: RenderOptions) -> SchemaDocumenter {
    let versions = ProbedVersions {
        validator: Version::parse(validator).unwrap(),
        doctree: Version::parse(doctree).unwrap(),
        probed_at: chrono::Utc::now(),
    };
    SchemaDocumenter::from_versions(versions, &CompatibilityRegistry::builtin(), options).unwrap()
}

fn documenter(validator: &str, doctree: &str) -> SchemaDocumenter {
    documenter_with(validator, doctree, RenderOptions::default())
}

fn item() -> ModelReference {
    ModelReference::new(
        "shop.cart.Item",
        serde_json::json!({
            "title": "Item",
            "type": "object",
            "properties": {
                "name": {"title": "Name", "type": "string"},
                "price": {"title": "Price", "type": "number", "default": 9.99},
                "tags": {
                    "title": "Tags",
                    "type": "array",
                    "items": {"type": "string"},
                    "default": []
                }
            },
            "required": ["name"]
        }),
    )
}

/// Body text of each field entry, in rendered order (classic renderer)
fn field_bodies(tree: &DocNode) -> Vec<String> {
    tree.find_all(NodeKind::FieldBody)
        .iter()
        .map(|n| n.text_content())
        .collect()
}

#[test]
fn test_item_scenario_exact_entries() {
    let tree = documenter("1.8.2", "4.0.0")
        .document(&item(), &ModelIndex::new())
        .unwrap();

    let names: Vec<String> = tree
        .find_all(NodeKind::FieldName)
        .iter()
        .map(|n| n.text_content())
        .collect();
    assert_eq!(names, vec!["name", "price", "tags"]);

    let bodies = field_bodies(&tree);
    assert_eq!(bodies.len(), 3);

    // name: required, no default line at all
    assert!(bodies[0].contains("string (required)"));
    assert!(!bodies[0].contains("default"));

    // price: optional with default 9.99
    assert!(bodies[1].contains("number (optional)"));
    assert!(bodies[1].contains("default: 9.99"));

    // tags: optional with default []
    assert!(bodies[2].contains("array<string> (optional)"));
    assert!(bodies[2].contains("default: []"));
}

#[test]
fn test_falsy_default_is_not_no_default() {
    let model = ModelReference::new(
        "shop.cart.Stock",
        serde_json::json!({
            "title": "Stock",
            "properties": {
                "sku": {"type": "string"},
                "quantity": {"type": "integer", "default": 0},
                "reserved": {"type": "integer"}
            },
            "required": ["sku"]
        }),
    );

    let tree = documenter("1.8.2", "4.0.0")
        .document(&model, &ModelIndex::new())
        .unwrap();
    let bodies = field_bodies(&tree);

    // required field: no default wording of any kind
    assert!(!bodies[0].contains("default"));
    // optional with falsy default: the value, not the sentinel
    assert!(bodies[1].contains("default: 0"));
    assert!(!bodies[1].contains("no default"));
    // optional without default: the explicit sentinel
    assert!(bodies[2].contains("no default"));
}

#[test]
fn test_nested_model_links_to_own_section() {
    let order = ModelReference::new(
        "shop.cart.Order",
        serde_json::json!({
            "title": "Order",
            "properties": {
                "shipping": {"allOf": [{"$ref": "#/definitions/Address"}]}
            },
            "required": ["shipping"],
            "definitions": {"Address": {"title": "Address"}}
        }),
    );
    let address = ModelReference::new(
        "shop.cart.Address",
        serde_json::json!({
            "title": "Address",
            "properties": {
                "street": {"type": "string"},
                "city": {"type": "string"}
            },
            "required": ["street", "city"]
        }),
    );

    let mut index = ModelIndex::new();
    index.insert(order.clone());
    index.insert(address.clone());

    let documenter = documenter("1.8.2", "7.2.5");
    let order_tree = documenter.document(&order, &index).unwrap();
    let address_tree = documenter.document(&address, &index).unwrap();

    // The shipping entry carries a reference node, not inlined fields
    let refs = order_tree.find_all(NodeKind::Reference);
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].text_content(), "Address");
    assert!(!order_tree.text_content().contains("street"));

    // ... and its target is the nested model's own generated section
    assert_eq!(refs[0].attr("reftarget"), address_tree.attr("ids"));
}

#[test]
fn test_cyclic_models_do_not_recurse() {
    // Two models referencing each other: documentation stays name-based.
    let employee = ModelReference::new(
        "org.Employee",
        serde_json::json!({
            "title": "Employee",
            "properties": {
                "name": {"type": "string"},
                "manager": {"allOf": [{"$ref": "#/definitions/Team"}]}
            },
            "required": ["name", "manager"],
            "definitions": {"Team": {"title": "Team"}}
        }),
    );
    let team = ModelReference::new(
        "org.Team",
        serde_json::json!({
            "title": "Team",
            "properties": {
                "lead": {"allOf": [{"$ref": "#/definitions/Employee"}]}
            },
            "required": ["lead"],
            "definitions": {"Employee": {"title": "Employee"}}
        }),
    );

    let mut index = ModelIndex::new();
    index.insert(employee);
    index.insert(team);

    let outcome = documenter("1.8.2", "7.2.5").document_all(&index).unwrap();
    assert_eq!(outcome.sections.len(), 2);
    assert!(outcome.warnings.is_empty());

    for section in &outcome.sections {
        assert_eq!(section.find_all(NodeKind::Reference).len(), 1);
    }
}

#[test]
fn test_document_all_recovers_per_model() {
    let mut index = ModelIndex::new();
    index.insert(item());
    index.insert(ModelReference::new(
        "shop.cart.Broken",
        serde_json::json!({
            "title": "Broken",
            "properties": {
                "mystery": {"$ref": "#/nowhere/Thing"}
            }
        }),
    ));

    let outcome = documenter("1.8.2", "4.0.0").document_all(&index).unwrap();
    assert_eq!(outcome.sections.len(), 1);
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].model, "shop.cart.Broken");
    assert!(outcome.warnings[0].message.contains("mystery"));
}

#[test]
fn test_alphabetical_order_is_opt_in() {
    let options = RenderOptions {
        field_order: FieldOrder::Alphabetical,
        ..RenderOptions::default()
    };
    let tree = documenter_with("1.8.2", "4.0.0", options)
        .document(&item(), &ModelIndex::new())
        .unwrap();

    let names: Vec<String> = tree
        .find_all(NodeKind::FieldName)
        .iter()
        .map(|n| n.text_content())
        .collect();
    assert_eq!(names, vec!["name", "price", "tags"]);

    // declaration order for this model happens to be alphabetical; use a
    // model where the two differ
    let reordered = ModelReference::new(
        "shop.cart.Zoo",
        serde_json::json!({
            "title": "Zoo",
            "properties": {
                "zebra": {"type": "string"},
                "ant": {"type": "string"}
            },
            "required": ["zebra", "ant"]
        }),
    );
    let options = RenderOptions {
        field_order: FieldOrder::Alphabetical,
        ..RenderOptions::default()
    };
    let tree = documenter_with("1.8.2", "4.0.0", options)
        .document(&reordered, &ModelIndex::new())
        .unwrap();
    let names: Vec<String> = tree
        .find_all(NodeKind::FieldName)
        .iter()
        .map(|n| n.text_content())
        .collect();
    assert_eq!(names, vec!["ant", "zebra"]);
}

#[test]
fn test_validator_summary_rendered() {
    let model = ModelReference::new(
        "shop.cart.Coupon",
        serde_json::json!({
            "title": "Coupon",
            "properties": {
                "code": {"type": "string"}
            },
            "required": ["code"],
            "validators": {
                "check_code": ["code"],
                "check_everything": ["*"]
            }
        }),
    );

    let tree = documenter("1.8.2", "4.0.0")
        .document(&model, &ModelIndex::new())
        .unwrap();
    let text = tree.text_content();

    assert!(text.contains("Validators"));
    assert!(text.contains("check_code \u{bb} code"));
    assert!(text.contains("check_everything \u{bb} all fields"));
    // field entry names its validators, including all-fields ones
    assert!(text.contains("validated by: check_code, check_everything"));
}

#[test]
fn test_compat_table_loads_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("compat.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(
        file,
        r#"
[[validator]]
min = "1.5.0"
max = "2.0.0"
strategy = "validator-legacy"

[[doctree]]
min = "4.0.0"
max = "6.0.0"
strategy = "doctree-classic"
"#
    )
    .unwrap();

    let registry = CompatibilityRegistry::from_toml_file(&path).unwrap();
    assert_eq!(registry.entries().len(), 2);
    registry
        .resolve(Library::Validator, &Version::new(1, 8, 2))
        .unwrap();
    assert!(registry
        .resolve(Library::Doctree, &Version::new(7, 0, 0))
        .is_err());
}

#[test]
fn test_compat_table_rejects_overlap() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("compat.toml");
    std::fs::write(
        &path,
        r#"
[[validator]]
min = "1.0.0"
max = "2.0.0"
strategy = "validator-legacy"

[[validator]]
min = "1.9.0"
max = "3.0.0"
strategy = "validator-modern"
"#,
    )
    .unwrap();

    let err = CompatibilityRegistry::from_toml_file(&path).unwrap_err();
    assert!(matches!(err, schemadoc::DocgenError::InvalidRegistry(_)));
}
