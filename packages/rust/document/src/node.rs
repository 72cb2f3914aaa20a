//! Generic document tree.
//!
//! The tree mirrors the node set of a documentation host (sections, titles,
//! paragraphs, tables, lists) without depending on any one host. Renderers in
//! [`crate::render`] map it onto concrete markup.

use serde::Serialize;

/// A block-level node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentNode {
    Section(Section),
    /// A free-standing heading that does not open a section (a rubric).
    Title { content: Vec<Inline> },
    Paragraph { content: Vec<Inline> },
    Table(Table),
    List(List),
}

impl DocumentNode {
    /// A paragraph holding a single run of plain text.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph {
            content: vec![Inline::Text(text.into())],
        }
    }

    pub fn title(text: impl Into<String>) -> Self {
        Self::Title {
            content: vec![Inline::Text(text.into())],
        }
    }
}

/// Inline content inside titles, paragraphs, and table labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    Strong(String),
}

impl Inline {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) | Self::Strong(s) => s,
        }
    }
}

/// Concatenate inline runs without markup.
pub fn plain_text(content: &[Inline]) -> String {
    content.iter().map(Inline::as_str).collect()
}

/// A titled section with ordered children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub children: Vec<DocumentNode>,
}

/// A two-column table: a label cell and a content cell per row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub label: Vec<Inline>,
    /// Block content of the second cell (a paragraph or a nested table).
    pub content: Vec<DocumentNode>,
}

/// A bulleted list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct List {
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub children: Vec<DocumentNode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_drops_markup() {
        let content = vec![Inline::Strong("reads".into()), Inline::Text("(path)".into())];
        assert_eq!(plain_text(&content), "reads(path)");
    }

    #[test]
    fn nodes_serialize_with_type_tags() {
        let node = DocumentNode::Section(Section {
            title: "ALIGN".into(),
            children: vec![DocumentNode::paragraph("Align reads")],
        });
        let json = serde_json::to_value(&node).expect("serialize");
        assert_eq!(json["type"], "section");
        assert_eq!(json["title"], "ALIGN");
        assert_eq!(json["children"][0]["type"], "paragraph");
        assert_eq!(json["children"][0]["content"][0]["text"], "Align reads");
    }
}
