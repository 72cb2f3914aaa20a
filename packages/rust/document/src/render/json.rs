//! JSON dump of the document tree, for downstream tooling.

use nfdocs_shared::{NfDocsError, Result};

use super::Renderer;
use crate::node::DocumentNode;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, nodes: &[DocumentNode]) -> Result<String> {
        let mut text = serde_json::to_string_pretty(nodes)
            .map_err(|e| NfDocsError::Render(e.to_string()))?;
        text.push('\n');
        Ok(text)
    }

    fn name(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Inline, Section, Table, TableRow};

    #[test]
    fn output_is_tagged_tree() {
        let nodes = vec![DocumentNode::Section(Section {
            title: "Function".into(),
            children: vec![DocumentNode::Table(Table {
                title: Some("Input".into()),
                rows: vec![TableRow {
                    label: vec![Inline::Text("val".into())],
                    content: vec![DocumentNode::paragraph("x")],
                }],
            })],
        })];

        let text = JsonRenderer.render(&nodes).unwrap();
        assert!(text.ends_with('\n'));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["type"], "section");
        assert_eq!(value[0]["title"], "Function");
        let table = &value[0]["children"][0];
        assert_eq!(table["type"], "table");
        assert_eq!(table["rows"][0]["content"][0]["type"], "paragraph");
    }

    #[test]
    fn empty_document_is_empty_array() {
        assert_eq!(JsonRenderer.render(&[]).unwrap(), "[]\n");
    }
}
