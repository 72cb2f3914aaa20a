//! Markdown (GFM) renderer.
//!
//! The tree is mapped onto a comrak AST and serialized with
//! [`format_commonmark`], so text that happens to look like markup (a leading
//! `#`, `1.`, or `<tag>`) is escaped by the writer rather than by hand.
//!
//! Pipe tables cannot nest, so a table is emitted as a pipe table only when
//! every content cell is a single paragraph. Otherwise it falls back to a
//! nested bullet list.

use comrak::nodes::{
    AstNode, ListType, NodeHeading, NodeList, NodeTable, NodeValue, TableAlignment,
};
use comrak::{Arena, Options, format_commonmark};
use nfdocs_shared::{NfDocsError, Result};

use super::{EMPTY_TABLE, Renderer};
use crate::node::{DocumentNode, Inline, List, Section, Table, TableRow};

/// Pipe table header cells.
const HEADER: [&str; 2] = ["Parameter", "Description"];

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, nodes: &[DocumentNode]) -> Result<String> {
        if nodes.is_empty() {
            return Ok(String::new());
        }

        let arena = Arena::new();
        let root = alloc(&arena, NodeValue::Document);
        for node in nodes {
            block(&arena, root, node, 0);
        }

        let mut out = Vec::new();
        format_commonmark(root, &options(), &mut out)
            .map_err(|e| NfDocsError::Render(format!("markdown serialization failed: {e}")))?;
        String::from_utf8(out)
            .map_err(|e| NfDocsError::Render(format!("markdown output is not UTF-8: {e}")))
    }

    fn name(&self) -> &str {
        "markdown"
    }
}

fn options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.table = true;
    options
}

type Node<'a> = &'a AstNode<'a>;

fn alloc<'a>(arena: &'a Arena<AstNode<'a>>, value: NodeValue) -> Node<'a> {
    arena.alloc(AstNode::from(value))
}

fn child<'a>(arena: &'a Arena<AstNode<'a>>, parent: Node<'a>, value: NodeValue) -> Node<'a> {
    let node = alloc(arena, value);
    parent.append(node);
    node
}

fn block<'a>(arena: &'a Arena<AstNode<'a>>, parent: Node<'a>, node: &DocumentNode, depth: usize) {
    match node {
        DocumentNode::Section(s) => section(arena, parent, s, depth),
        DocumentNode::Title { content } => {
            let paragraph = child(arena, parent, NodeValue::Paragraph);
            let strong = child(arena, paragraph, NodeValue::Strong);
            inlines(arena, strong, content, true);
        }
        DocumentNode::Paragraph { content } => {
            let paragraph = child(arena, parent, NodeValue::Paragraph);
            inlines(arena, paragraph, content, true);
        }
        DocumentNode::Table(t) => table(arena, parent, t, depth),
        DocumentNode::List(l) => list(arena, parent, l, depth),
    }
}

/// ATX heading by depth (capped at `######`), children as following siblings.
fn section<'a>(arena: &'a Arena<AstNode<'a>>, parent: Node<'a>, section: &Section, depth: usize) {
    let level = (depth + 1).min(6) as u8;
    let heading = child(
        arena,
        parent,
        NodeValue::Heading(NodeHeading {
            level,
            setext: false,
        }),
    );
    text(arena, heading, &section.title, false);

    for node in &section.children {
        block(arena, parent, node, depth + 1);
    }
}

fn table<'a>(arena: &'a Arena<AstNode<'a>>, parent: Node<'a>, table: &Table, depth: usize) {
    if let Some(title) = &table.title {
        let paragraph = child(arena, parent, NodeValue::Paragraph);
        let strong = child(arena, paragraph, NodeValue::Strong);
        text(arena, strong, title, false);
    }

    if table.rows.is_empty() {
        let paragraph = child(arena, parent, NodeValue::Paragraph);
        text(arena, paragraph, EMPTY_TABLE, false);
    } else if is_flat(table) {
        pipe_table(arena, parent, &table.rows);
    } else {
        rows_as_list(arena, parent, &table.rows, depth);
    }
}

fn is_flat(table: &Table) -> bool {
    table.rows.iter().all(|row| match row.content.as_slice() {
        [] | [DocumentNode::Paragraph { .. }] => true,
        _ => false,
    })
}

fn pipe_table<'a>(arena: &'a Arena<AstNode<'a>>, parent: Node<'a>, rows: &[TableRow]) {
    let columns = HEADER.len();
    let node = child(
        arena,
        parent,
        NodeValue::Table(NodeTable {
            alignments: vec![TableAlignment::None; columns],
            num_columns: columns,
            num_rows: rows.len() + 1,
            num_nonempty_cells: columns * (rows.len() + 1),
        }),
    );

    let header = child(arena, node, NodeValue::TableRow(true));
    for label in HEADER {
        let cell = child(arena, header, NodeValue::TableCell);
        text(arena, cell, label, false);
    }

    for row in rows {
        let tr = child(arena, node, NodeValue::TableRow(false));
        let label = child(arena, tr, NodeValue::TableCell);
        inlines(arena, label, &row.label, false);

        let description = child(arena, tr, NodeValue::TableCell);
        if let Some(DocumentNode::Paragraph { content }) = row.content.first() {
            inlines(arena, description, content, false);
        }
    }
}

/// Fallback for tables with nested content: `- label: description` items,
/// nested tables as sub-lists.
fn rows_as_list<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: Node<'a>,
    rows: &[TableRow],
    depth: usize,
) {
    let tight = rows.iter().all(|row| {
        row.content
            .iter()
            .skip(usize::from(matches!(
                row.content.first(),
                Some(DocumentNode::Paragraph { .. })
            )))
            .all(|node| matches!(node, DocumentNode::Table(_) | DocumentNode::List(_)))
    });
    let node = child(arena, parent, NodeValue::List(bullets(tight)));

    for row in rows {
        let item = child(arena, node, NodeValue::Item(bullets(tight)));
        let head = child(arena, item, NodeValue::Paragraph);
        inlines(arena, head, &row.label, true);

        let rest = match row.content.split_first() {
            Some((DocumentNode::Paragraph { content }, rest)) => {
                text(arena, head, ": ", false);
                inlines(arena, head, content, true);
                rest
            }
            _ => row.content.as_slice(),
        };

        for nested in rest {
            match nested {
                DocumentNode::Table(t) if t.rows.is_empty() => {
                    let paragraph = child(arena, item, NodeValue::Paragraph);
                    text(arena, paragraph, EMPTY_TABLE, false);
                }
                DocumentNode::Table(t) => rows_as_list(arena, item, &t.rows, depth),
                other => block(arena, item, other, depth),
            }
        }
    }
}

fn list<'a>(arena: &'a Arena<AstNode<'a>>, parent: Node<'a>, list: &List, depth: usize) {
    // A tight list drops the blank line between paragraphs of one item.
    let tight = list.items.iter().all(|item| {
        item.children
            .iter()
            .filter(|c| matches!(c, DocumentNode::Paragraph { .. } | DocumentNode::Title { .. }))
            .count()
            <= 1
    });
    let node = child(arena, parent, NodeValue::List(bullets(tight)));

    for entry in &list.items {
        let item = child(arena, node, NodeValue::Item(bullets(tight)));
        for c in &entry.children {
            block(arena, item, c, depth);
        }
    }
}

fn bullets(tight: bool) -> NodeList {
    NodeList {
        list_type: ListType::Bullet,
        bullet_char: b'-',
        tight,
        ..NodeList::default()
    }
}

/// Append inline runs. Table cells cannot hold line breaks, so with
/// `breaks` unset newlines collapse to spaces.
fn inlines<'a>(arena: &'a Arena<AstNode<'a>>, parent: Node<'a>, content: &[Inline], breaks: bool) {
    for run in content {
        match run {
            Inline::Text(s) => text(arena, parent, s, breaks),
            Inline::Strong(s) => {
                let strong = child(arena, parent, NodeValue::Strong);
                text(arena, strong, s, breaks);
            }
        }
    }
}

fn text<'a>(arena: &'a Arena<AstNode<'a>>, parent: Node<'a>, value: &str, breaks: bool) {
    if !breaks {
        child(arena, parent, NodeValue::Text(value.replace('\n', " ")));
        return;
    }
    for (i, line) in value.split('\n').enumerate() {
        if i > 0 {
            child(arena, parent, NodeValue::SoftBreak);
        }
        if !line.is_empty() {
            child(arena, parent, NodeValue::Text(line.to_string()));
        }
    }
}
