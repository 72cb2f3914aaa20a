//! reStructuredText renderer.
//!
//! Tables become `list-table` directives, which (unlike grid tables) can nest
//! a table inside a cell.

use nfdocs_shared::Result;

use super::{EMPTY_TABLE, Renderer, finish, hang, indent, join_blocks};
use crate::node::{DocumentNode, Inline, List, Section, Table};

/// Section underline characters by depth.
const ADORNMENTS: [char; 5] = ['=', '-', '~', '^', '"'];

#[derive(Debug, Clone, Copy, Default)]
pub struct RstRenderer;

impl Renderer for RstRenderer {
    fn render(&self, nodes: &[DocumentNode]) -> Result<String> {
        Ok(finish(blocks(nodes, 0)))
    }

    fn name(&self) -> &str {
        "rst"
    }
}

fn blocks(nodes: &[DocumentNode], depth: usize) -> Vec<String> {
    join_blocks(nodes.iter().map(|node| block(node, depth)).collect())
}

fn block(node: &DocumentNode, depth: usize) -> Vec<String> {
    match node {
        DocumentNode::Section(s) => section(s, depth),
        DocumentNode::Title { content } => vec![format!(".. rubric:: {}", inline(content))],
        DocumentNode::Paragraph { content } => inline(content).lines().map(str::to_string).collect(),
        DocumentNode::Table(t) => table(t, depth),
        DocumentNode::List(l) => list(l, depth),
    }
}

fn section(section: &Section, depth: usize) -> Vec<String> {
    let title = escape(&section.title);
    let adornment = ADORNMENTS[depth.min(ADORNMENTS.len() - 1)];
    let underline = adornment.to_string().repeat(title.chars().count().max(1));

    join_blocks(vec![
        vec![title, underline],
        blocks(&section.children, depth + 1),
    ])
}

fn table(table: &Table, depth: usize) -> Vec<String> {
    if table.rows.is_empty() {
        let body = vec![EMPTY_TABLE.to_string()];
        return match &table.title {
            Some(title) => join_blocks(vec![vec![format!(".. rubric:: {}", escape(title))], body]),
            None => body,
        };
    }

    let directive = match &table.title {
        Some(title) => format!(".. list-table:: {}", escape(title)),
        None => ".. list-table::".to_string(),
    };

    let mut body = vec![":widths: 1 2".to_string(), String::new()];
    for row in &table.rows {
        body.extend(hang("* - ", vec![inline(&row.label)]));
        body.extend(hang("  - ", blocks(&row.content, depth)));
    }

    let mut lines = vec![directive];
    lines.extend(indent(body, 3));
    lines
}

fn list(list: &List, depth: usize) -> Vec<String> {
    list.items
        .iter()
        .flat_map(|item| hang("- ", blocks(&item.children, depth)))
        .collect()
}

/// Inline markup. Strong text glued to neighbouring text needs an escaped
/// space (`\ `) to be recognized.
fn inline(content: &[Inline]) -> String {
    let mut out = String::new();
    for (i, run) in content.iter().enumerate() {
        match run {
            Inline::Text(s) => out.push_str(&escape(s)),
            Inline::Strong(s) => {
                if out.chars().last().is_some_and(|c| !c.is_whitespace()) {
                    out.push_str("\\ ");
                }
                out.push_str("**");
                out.push_str(&escape(s));
                out.push_str("**");
                let glued = content
                    .get(i + 1)
                    .and_then(|next| next.as_str().chars().next())
                    .is_some_and(|c| !c.is_whitespace());
                if glued {
                    out.push_str("\\ ");
                }
            }
        }
    }
    out
}

/// Backslash-escape inline markup starts. `_` ends a reference name and `:`
/// opens an interpreted-text role, so both are escaped with the usual set.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '`' | '|' | '_' | ':') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ListItem, TableRow};

    fn sample() -> Vec<DocumentNode> {
        vec![DocumentNode::Section(Section {
            title: "Process".into(),
            children: vec![DocumentNode::Section(Section {
                title: "ALIGN".into(),
                children: vec![
                    DocumentNode::paragraph("Align reads"),
                    DocumentNode::Table(Table {
                        title: Some("Input".into()),
                        rows: vec![
                            TableRow {
                                label: vec![
                                    Inline::Strong("meta".into()),
                                    Inline::Text("(map)".into()),
                                ],
                                content: vec![DocumentNode::paragraph("Sample metadata")],
                            },
                            TableRow {
                                label: vec![Inline::Strong("Tuple".into())],
                                content: vec![DocumentNode::Table(Table {
                                    title: None,
                                    rows: vec![TableRow {
                                        label: vec![Inline::Text("path".into())],
                                        content: vec![DocumentNode::paragraph("Reads")],
                                    }],
                                })],
                            },
                        ],
                    }),
                ],
            })],
        })]
    }

    #[test]
    fn renders_sections_and_nested_tables() {
        let expected = r#"Process
=======

ALIGN
-----

Align reads

.. list-table:: Input
   :widths: 1 2

   * - **meta**\ (map)
     - Sample metadata
   * - **Tuple**
     - .. list-table::
          :widths: 1 2

          * - path
            - Reads
"#;
        assert_eq!(RstRenderer.render(&sample()).unwrap(), expected);
    }

    #[test]
    fn renders_rubric_and_nested_list() {
        let nodes = vec![
            DocumentNode::title("Output"),
            DocumentNode::List(List {
                items: vec![ListItem {
                    children: vec![
                        DocumentNode::Paragraph {
                            content: vec![Inline::Strong("Tuple".into())],
                        },
                        DocumentNode::List(List {
                            items: vec![ListItem {
                                children: vec![
                                    DocumentNode::paragraph("val"),
                                    DocumentNode::paragraph("A value"),
                                ],
                            }],
                        }),
                    ],
                }],
            }),
        ];
        let expected = "\
.. rubric:: Output

- **Tuple**

  - val

    A value
";
        assert_eq!(RstRenderer.render(&nodes).unwrap(), expected);
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape("a*b|c`d"), "a\\*b\\|c\\`d");
        let content = vec![Inline::Text("x".into()), Inline::Strong("y".into())];
        assert_eq!(inline(&content), "x\\ **y**");
    }

    #[test]
    fn escapes_references_and_roles() {
        assert_eq!(escape("reads_"), "reads\\_");
        assert_eq!(escape(":math:`x`"), "\\:math\\:\\`x\\`");

        let nodes = vec![DocumentNode::paragraph("Uses reads_ and :ref:`index`")];
        assert_eq!(
            RstRenderer.render(&nodes).unwrap(),
            "Uses reads\\_ and \\:ref\\:\\`index\\`\n"
        );
    }

    #[test]
    fn empty_table_keeps_title() {
        let nodes = vec![
            DocumentNode::Table(Table {
                title: Some("Input".into()),
                rows: vec![],
            }),
            DocumentNode::paragraph("after"),
        ];
        assert_eq!(
            RstRenderer.render(&nodes).unwrap(),
            ".. rubric:: Input\n\nNone\n\nafter\n"
        );

        let untitled = vec![DocumentNode::Table(Table { title: None, rows: vec![] })];
        assert_eq!(RstRenderer.render(&untitled).unwrap(), "None\n");
    }

    #[test]
    fn deep_sections_reuse_last_adornment() {
        let mut node = DocumentNode::paragraph("leaf");
        for i in 0..7 {
            node = DocumentNode::Section(Section {
                title: format!("L{i}"),
                children: vec![node],
            });
        }
        let text = RstRenderer.render(&[node]).unwrap();
        assert!(text.contains("L6\n=="));
        assert!(text.contains("L0\n\"\""));
    }
}
