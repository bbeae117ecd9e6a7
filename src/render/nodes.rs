//! Framework-native documentation node tree
//!
//! The renderer hands the host framework a tree of these nodes; the
//! framework performs layout, cross-reference resolution, and final output
//! emission. The tree is serializable so builds can be inspected and
//! asserted on without the framework present.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Node kinds across the supported framework releases. Classic releases
/// consume the field-list family, modern releases the definition-list
/// family plus inline references; the structural kinds are shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Section,
    Title,
    Paragraph,
    Rubric,
    FieldList,
    Field,
    FieldName,
    FieldBody,
    DefinitionList,
    DefinitionListItem,
    Term,
    Definition,
    BulletList,
    ListItem,
    Literal,
    Reference,
    Text,
}

/// One documentation node: kind, attributes, children, optional raw text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocNode {
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl DocNode {
    /// A non-text element node
    pub fn element(kind: NodeKind) -> Self {
        Self {
            kind,
            attrs: BTreeMap::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// A raw text leaf
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text,
            attrs: BTreeMap::new(),
            children: Vec::new(),
            text: Some(content.into()),
        }
    }

    /// An element wrapping a single text leaf
    pub fn leaf(kind: NodeKind, content: impl Into<String>) -> Self {
        Self::element(kind).with_child(Self::text(content))
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: DocNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = DocNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn push(&mut self, child: DocNode) {
        self.children.push(child);
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Concatenated text of this node and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Depth-first search for all descendants of a kind, in document order
    pub fn find_all(&self, kind: NodeKind) -> Vec<&DocNode> {
        let mut found = Vec::new();
        self.walk(&mut |node| {
            if node.kind == kind {
                found.push(node);
            }
        });
        found
    }

    fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a DocNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Structural checks the framework's node API performs on ingestion.
    /// Violations mean the framework would reject the tree, so renderers
    /// run this before handing a tree back.
    pub fn check(&self) -> Result<(), String> {
        match self.kind {
            NodeKind::Text => {
                if self.text.as_deref().map(str::is_empty).unwrap_or(true) {
                    return Err("text node without content".to_string());
                }
                if !self.children.is_empty() {
                    return Err("text node with children".to_string());
                }
            }
            NodeKind::FieldName | NodeKind::Term => {
                if self.text_content().trim().is_empty() {
                    return Err(format!("{:?} node without a name", self.kind));
                }
            }
            NodeKind::Reference => {
                if self.attr("reftarget").map(str::is_empty).unwrap_or(true) {
                    return Err("reference node without a target".to_string());
                }
            }
            NodeKind::Field => {
                let kinds: Vec<NodeKind> = self.children.iter().map(|c| c.kind).collect();
                if kinds != [NodeKind::FieldName, NodeKind::FieldBody] {
                    return Err("field node must contain exactly a name and a body".to_string());
                }
            }
            _ => {}
        }
        for child in &self.children {
            child.check()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content_concatenates() {
        let node = DocNode::element(NodeKind::Paragraph)
            .with_child(DocNode::text("type: "))
            .with_child(DocNode::leaf(NodeKind::Reference, "Address").with_attr("reftarget", "x"));
        assert_eq!(node.text_content(), "type: Address");
    }

    #[test]
    fn test_check_rejects_empty_field_name() {
        let field = DocNode::element(NodeKind::Field)
            .with_child(DocNode::element(NodeKind::FieldName))
            .with_child(DocNode::element(NodeKind::FieldBody));
        assert!(field.check().is_err());
    }

    #[test]
    fn test_check_rejects_untargeted_reference() {
        let reference = DocNode::leaf(NodeKind::Reference, "Address");
        assert!(reference.check().is_err());

        let ok = reference.with_attr("reftarget", "shop-cart-address");
        assert!(ok.check().is_ok());
    }

    #[test]
    fn test_check_rejects_malformed_field() {
        let field = DocNode::element(NodeKind::Field)
            .with_child(DocNode::leaf(NodeKind::FieldName, "price"));
        assert!(field.check().is_err());
    }

    #[test]
    fn test_find_all_in_document_order() {
        let list = DocNode::element(NodeKind::FieldList)
            .with_child(
                DocNode::element(NodeKind::Field)
                    .with_child(DocNode::leaf(NodeKind::FieldName, "a"))
                    .with_child(DocNode::element(NodeKind::FieldBody)),
            )
            .with_child(
                DocNode::element(NodeKind::Field)
                    .with_child(DocNode::leaf(NodeKind::FieldName, "b"))
                    .with_child(DocNode::element(NodeKind::FieldBody)),
            );
        let names: Vec<String> = list
            .find_all(NodeKind::FieldName)
            .iter()
            .map(|n| n.text_content())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
