//! Loading a pre-parsed element tree from JSON
//!
//! The markup parser lives outside this crate. It hands over its output as a
//! nested tree:
//!
//! ```json
//! {"name": "html", "line": 1, "attributes": [["lang", "en"]], "children": [...]}
//! ```
//!
//! A top-level array is accepted for documents with several roots.

use serde::Deserialize;

use super::tree::{Document, ElementId};
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
struct NodeSpec {
    name: String,
    #[serde(default)]
    line: usize,
    #[serde(default)]
    attributes: Vec<(String, String)>,
    #[serde(default)]
    children: Vec<NodeSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TreeSpec {
    Single(NodeSpec),
    Many(Vec<NodeSpec>),
}

impl Document {
    /// Build a document from its JSON tree form
    pub fn from_json_str(content: &str) -> Result<Self> {
        let roots = match serde_json::from_str::<TreeSpec>(content)? {
            TreeSpec::Single(node) => vec![node],
            TreeSpec::Many(nodes) => nodes,
        };

        let mut document = Document::new();
        for node in &roots {
            let id = document.add_root(&node.name, node.line)?;
            fill(&mut document, id, node)?;
        }
        log::debug!("loaded document with {} elements", document.len());
        Ok(document)
    }
}

fn fill(document: &mut Document, id: ElementId, node: &NodeSpec) -> Result<()> {
    for (name, value) in &node.attributes {
        let present = document
            .get(id)
            .is_some_and(|element| element.attributes.contains(name));
        if present {
            return Err(Error::DuplicateAttribute {
                name: name.clone(),
                line: node.line,
            });
        }
        document.set_attribute(id, name, value)?;
    }
    for child in &node.children {
        let child_id = document.append_child(id, &child.name, child.line)?;
        fill(document, child_id, child)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_nested_tree() {
        let doc = Document::from_json_str(
            r#"{"name": "HTML", "line": 1, "attributes": [["amp", ""]], "children": [
                {"name": "head", "line": 2, "children": [{"name": "title", "line": 3}]},
                {"name": "body", "line": 5}
            ]}"#,
        )
        .unwrap();

        let names: Vec<_> = doc.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["html", "head", "title", "body"]);
        let html = doc.get(doc.roots()[0]).unwrap();
        assert!(html.attributes.contains("amp"));
        assert_eq!(doc.iter().nth(2).unwrap().line, 3);
    }

    #[test]
    fn test_load_multiple_roots() {
        let doc = Document::from_json_str(r#"[{"name": "p"}, {"name": "div"}]"#).unwrap();
        assert_eq!(doc.roots().len(), 2);
    }

    #[test]
    fn test_repeated_attribute_is_rejected() {
        let err = Document::from_json_str(
            r#"{"name": "p", "line": 4,
                "attributes": [["class", "a"], ["id", "x"], ["class", "b"]]}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateAttribute { ref name, line: 4 } if name == "class"
        ));
    }

    #[test]
    fn test_invalid_json() {
        let err = Document::from_json_str("{\"name\": ").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
