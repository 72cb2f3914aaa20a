//! Document model builder.
//!
//! Turns grouped definitions into one section per kind:
//!
//! ```text
//! Section "Processes"
//! ├── Section "ALIGN"
//! │   ├── Paragraph  summary
//! │   ├── Table      "Input"
//! │   └── Table      "Output"
//! └── Section "SORT"
//!     └── ...
//! ```
//!
//! Tuple parameters recurse into nested tables (or nested lists).

use nfdocs_shared::{Definition, Diagnostic, Layout, Result};
use tracing::{debug, instrument, warn};

use crate::groups::DefinitionGroups;
use crate::node::{DocumentNode, Inline, List, ListItem, Section, Table, TableRow};
use crate::params::{DocPayload, Parameter};

/// Label used for tuple rows that carry no name of their own.
const TUPLE_LABEL: &str = "Tuple";

/// Result of a build pass.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    /// One section per non-empty definition kind.
    pub nodes: Vec<DocumentNode>,
    /// Definitions that could not be rendered.
    pub diagnostics: Vec<Diagnostic>,
}

/// Build the document tree for every grouped definition.
///
/// A definition whose payload fails to decode is reported as a diagnostic and
/// left out; its siblings are still rendered. A kind whose definitions all
/// failed produces no section.
#[instrument(skip_all, fields(definitions = groups.len(), layout = %layout))]
pub fn build_document(groups: &DefinitionGroups, layout: Layout) -> BuildOutput {
    let mut output = BuildOutput::default();

    for (kind, definitions) in groups.iter() {
        let mut children = Vec::with_capacity(definitions.len());

        for definition in definitions {
            match render_definition(definition, layout) {
                Ok(node) => children.push(node),
                Err(e) => {
                    warn!(
                        file = %definition.file.display(),
                        name = %definition.name,
                        error = %e,
                        "skipping definition"
                    );
                    output.diagnostics.push(Diagnostic::from_error(
                        &definition.file,
                        Some(definition.lines),
                        &e,
                    ));
                }
            }
        }

        if children.is_empty() {
            continue;
        }

        debug!(%kind, count = children.len(), "kind section built");
        output.nodes.push(DocumentNode::Section(Section {
            title: kind.label(children.len()).to_string(),
            children,
        }));
    }

    output
}

/// Render one definition as a section: summary, then input and output.
fn render_definition(definition: &Definition, layout: Layout) -> Result<DocumentNode> {
    let payload = DocPayload::from_value(&definition.name, &definition.payload)?;

    let mut children = vec![DocumentNode::paragraph(payload.summary)];

    let io = [("Input", payload.input), ("Output", payload.output)];
    for (title, params) in io {
        if let Some(params) = params {
            children.extend(render_parameters(Some(title), &params, layout));
        }
    }

    Ok(DocumentNode::Section(Section {
        title: definition.name.clone(),
        children,
    }))
}

/// Render a parameter list with the chosen layout.
///
/// The table layout yields a single (optionally titled) [`Table`]. The list
/// layout yields an optional [`DocumentNode::Title`] followed by a [`List`].
pub fn render_parameters(
    title: Option<&str>,
    params: &[Parameter],
    layout: Layout,
) -> Vec<DocumentNode> {
    match layout {
        Layout::Table => vec![DocumentNode::Table(Table {
            title: title.map(str::to_string),
            rows: params.iter().map(parameter_row).collect(),
        })],
        Layout::List => {
            let mut nodes = Vec::with_capacity(2);
            if let Some(title) = title {
                nodes.push(DocumentNode::title(title));
            }
            nodes.push(DocumentNode::List(parameter_list(params)));
            nodes
        }
    }
}

fn parameter_row(param: &Parameter) -> TableRow {
    match param {
        Parameter::Tuple { name, members } => TableRow {
            label: tuple_label(name.as_deref()),
            content: render_parameters(None, members, Layout::Table),
        },
        Parameter::Scalar {
            name,
            ty,
            description,
        } => TableRow {
            label: scalar_label(name.as_deref(), ty),
            content: vec![DocumentNode::paragraph(description.clone())],
        },
    }
}

fn parameter_list(params: &[Parameter]) -> List {
    List {
        items: params.iter().map(parameter_item).collect(),
    }
}

fn parameter_item(param: &Parameter) -> ListItem {
    match param {
        Parameter::Tuple { name, members } => ListItem {
            children: vec![
                DocumentNode::Paragraph {
                    content: tuple_label(name.as_deref()),
                },
                DocumentNode::List(parameter_list(members)),
            ],
        },
        Parameter::Scalar {
            name,
            ty,
            description,
        } => ListItem {
            children: vec![
                DocumentNode::Paragraph {
                    content: scalar_label(name.as_deref(), ty),
                },
                DocumentNode::paragraph(description.clone()),
            ],
        },
    }
}

fn tuple_label(name: Option<&str>) -> Vec<Inline> {
    vec![Inline::Strong(name.unwrap_or(TUPLE_LABEL).to_string())]
}

/// `**name**(type)` when named, otherwise just `type`.
fn scalar_label(name: Option<&str>, ty: &str) -> Vec<Inline> {
    match name {
        Some(name) => vec![
            Inline::Strong(name.to_string()),
            Inline::Text(format!("({ty})")),
        ],
        None => vec![Inline::Text(ty.to_string())],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfdocs_annotations::{MarkupParser, YamlMarkup};
    use nfdocs_shared::{DefinitionKind, DiagnosticKind, LineRange};

    use crate::node::plain_text;

    fn def(kind: DefinitionKind, name: &str, yaml: &str) -> Definition {
        Definition {
            kind,
            name: name.into(),
            payload: YamlMarkup.parse(yaml).expect("valid yaml"),
            file: "main.nf".into(),
            lines: LineRange::new(0, 2),
        }
    }

    fn section(node: &DocumentNode) -> &Section {
        match node {
            DocumentNode::Section(s) => s,
            other => panic!("expected section, got {other:?}"),
        }
    }

    const TUPLE_YAML: &str = "summary: s\n\
        input:\n\
        \x20 - tuple:\n\
        \x20     - name: meta\n\
        \x20       type: map\n\
        \x20       description: Sample metadata\n\
        \x20     - name: reads\n\
        \x20       type: path\n\
        \x20       description: FASTQ files\n";

    #[test]
    fn summary_only_definition() {
        let groups: DefinitionGroups =
            std::iter::once(def(DefinitionKind::Process, "FOO", "summary: \"does X\"")).collect();
        let out = build_document(&groups, Layout::Table);

        assert!(out.diagnostics.is_empty());
        assert_eq!(out.nodes.len(), 1);

        let kind = section(&out.nodes[0]);
        assert_eq!(kind.title, "Process");
        let foo = section(&kind.children[0]);
        assert_eq!(foo.title, "FOO");
        assert_eq!(foo.children, vec![DocumentNode::paragraph("does X")]);
    }

    #[test]
    fn sections_sorted_by_name_and_pluralized() {
        let groups: DefinitionGroups = ["SORT", "ALIGN", "MARKDUP"]
            .into_iter()
            .map(|n| def(DefinitionKind::Process, n, "summary: s"))
            .collect();
        let out = build_document(&groups, Layout::Table);

        let kind = section(&out.nodes[0]);
        assert_eq!(kind.title, "Processes");
        let titles: Vec<&str> = kind.children.iter().map(|c| section(c).title.as_str()).collect();
        assert_eq!(titles, vec!["ALIGN", "MARKDUP", "SORT"]);
    }

    #[test]
    fn tuple_renders_nested_table() {
        let groups: DefinitionGroups =
            std::iter::once(def(DefinitionKind::Process, "ALIGN", TUPLE_YAML)).collect();
        let out = build_document(&groups, Layout::Table);

        let align = section(&section(&out.nodes[0]).children[0]);
        let DocumentNode::Table(table) = &align.children[1] else {
            panic!("expected input table");
        };
        assert_eq!(table.title.as_deref(), Some("Input"));
        assert_eq!(table.rows.len(), 1);

        let tuple = &table.rows[0];
        assert_eq!(tuple.label, vec![Inline::Strong("Tuple".into())]);
        let DocumentNode::Table(nested) = &tuple.content[0] else {
            panic!("expected nested table");
        };
        assert_eq!(nested.title, None);
        assert_eq!(nested.rows.len(), 2);
        assert_eq!(plain_text(&nested.rows[0].label), "meta(map)");
        assert_eq!(
            nested.rows[0].content,
            vec![DocumentNode::paragraph("Sample metadata")]
        );
        assert_eq!(
            nested.rows[1].label,
            vec![Inline::Strong("reads".into()), Inline::Text("(path)".into())]
        );
        assert_eq!(nested.rows[1].content, vec![DocumentNode::paragraph("FASTQ files")]);
    }

    #[test]
    fn tuple_renders_nested_list() {
        let groups: DefinitionGroups =
            std::iter::once(def(DefinitionKind::Process, "ALIGN", TUPLE_YAML)).collect();
        let out = build_document(&groups, Layout::List);

        let align = section(&section(&out.nodes[0]).children[0]);
        assert_eq!(align.children[1], DocumentNode::title("Input"));
        let DocumentNode::List(list) = &align.children[2] else {
            panic!("expected input list");
        };
        let tuple = &list.items[0];
        let DocumentNode::List(nested) = &tuple.children[1] else {
            panic!("expected nested list");
        };
        assert_eq!(nested.items.len(), 2);
        assert_eq!(
            nested.items[1].children,
            vec![
                DocumentNode::Paragraph {
                    content: vec![Inline::Strong("reads".into()), Inline::Text("(path)".into())]
                },
                DocumentNode::paragraph("FASTQ files"),
            ]
        );
    }

    const NESTED_TUPLE_YAML: &str = "summary: s\n\
        input:\n\
        \x20 - name: pair\n\
        \x20   tuple:\n\
        \x20     - tuple:\n\
        \x20         - name: x\n\
        \x20           type: val\n\
        \x20           description: Innermost\n";

    #[test]
    fn tuple_inside_tuple_nests_twice() {
        let groups: DefinitionGroups =
            std::iter::once(def(DefinitionKind::Process, "PAIR", NESTED_TUPLE_YAML)).collect();
        let innermost = DocumentNode::paragraph("Innermost");

        let out = build_document(&groups, Layout::Table);
        assert!(out.diagnostics.is_empty());
        let pair = section(&section(&out.nodes[0]).children[0]);
        let DocumentNode::Table(table) = &pair.children[1] else {
            panic!("expected input table");
        };
        assert_eq!(table.rows[0].label, vec![Inline::Strong("pair".into())]);
        let DocumentNode::Table(middle) = &table.rows[0].content[0] else {
            panic!("expected table for the outer tuple");
        };
        assert_eq!(middle.rows[0].label, vec![Inline::Strong("Tuple".into())]);
        let DocumentNode::Table(inner) = &middle.rows[0].content[0] else {
            panic!("expected table for the inner tuple");
        };
        assert_eq!(plain_text(&inner.rows[0].label), "x(val)");
        assert_eq!(inner.rows[0].content, vec![innermost.clone()]);

        let out = build_document(&groups, Layout::List);
        let pair = section(&section(&out.nodes[0]).children[0]);
        let DocumentNode::List(list) = &pair.children[2] else {
            panic!("expected input list");
        };
        let DocumentNode::List(middle) = &list.items[0].children[1] else {
            panic!("expected list for the outer tuple");
        };
        assert_eq!(
            middle.items[0].children[0],
            DocumentNode::Paragraph {
                content: vec![Inline::Strong("Tuple".into())]
            }
        );
        let DocumentNode::List(inner) = &middle.items[0].children[1] else {
            panic!("expected list for the inner tuple");
        };
        assert_eq!(inner.items[0].children[1], innermost);
    }

    #[test]
    fn named_tuple_and_unnamed_scalar_labels() {
        let params = vec![
            Parameter::Tuple {
                name: Some("sample".into()),
                members: vec![],
            },
            Parameter::Scalar {
                name: None,
                ty: "val".into(),
                description: "A value".into(),
            },
        ];
        let nodes = render_parameters(Some("Output"), &params, Layout::Table);
        let DocumentNode::Table(table) = &nodes[0] else {
            panic!("expected table");
        };
        assert_eq!(table.rows[0].label, vec![Inline::Strong("sample".into())]);
        assert_eq!(table.rows[1].label, vec![Inline::Text("val".into())]);
    }

    #[test]
    fn missing_summary_is_reported_and_siblings_render() {
        let groups: DefinitionGroups = vec![
            def(DefinitionKind::Process, "BAD", "input: []"),
            def(DefinitionKind::Process, "GOOD", "summary: fine"),
        ]
        .into_iter()
        .collect();
        let out = build_document(&groups, Layout::Table);

        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].kind, DiagnosticKind::MissingSummary);
        assert_eq!(out.diagnostics[0].lines, Some(LineRange::new(0, 2)));

        let kind = section(&out.nodes[0]);
        assert_eq!(kind.title, "Process");
        assert_eq!(kind.children.len(), 1);
        assert_eq!(section(&kind.children[0]).title, "GOOD");
    }

    #[test]
    fn kind_with_only_failures_is_omitted() {
        let groups: DefinitionGroups = vec![
            def(DefinitionKind::Function, "broken", "summary: s\ninput:\n  - name: x\n"),
            def(DefinitionKind::Workflow, "MAIN", "summary: entry"),
        ]
        .into_iter()
        .collect();
        let out = build_document(&groups, Layout::Table);

        assert_eq!(out.nodes.len(), 1);
        assert_eq!(section(&out.nodes[0]).title, "Workflow");
        assert_eq!(out.diagnostics[0].kind, DiagnosticKind::MalformedParameter);
    }

    #[test]
    fn empty_groups_build_empty_document() {
        let out = build_document(&DefinitionGroups::new(), Layout::List);
        assert!(out.nodes.is_empty());
        assert!(out.diagnostics.is_empty());
    }
}
