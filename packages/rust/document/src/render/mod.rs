//! Renderer trait and built-in output adapters.
//!
//! A renderer maps the generic [`DocumentNode`] tree onto a concrete markup.
//! None of them drop information: every scalar's type and description and
//! every tuple's members appear in the output.

mod json;
mod markdown;
mod rst;

use nfdocs_shared::{OutputFormat, Result};

use crate::node::DocumentNode;

pub use json::JsonRenderer;
pub use markdown::MarkdownRenderer;
pub use rst::RstRenderer;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Turns a document tree into text.
pub trait Renderer: Send + Sync {
    /// Render the top-level nodes of a document.
    fn render(&self, nodes: &[DocumentNode]) -> Result<String>;

    /// Human-readable renderer name for tracing.
    fn name(&self) -> &str;
}

/// The built-in renderer for an output format.
pub fn renderer_for(format: OutputFormat) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Rst => Box::new(RstRenderer),
        OutputFormat::Markdown => Box::new(MarkdownRenderer),
        OutputFormat::Json => Box::new(JsonRenderer),
    }
}

/// Body text for a parameter table with no rows, so its title is not
/// left dangling.
const EMPTY_TABLE: &str = "None";

// ---------------------------------------------------------------------------
// Line helpers
// ---------------------------------------------------------------------------

/// Prefix the first line with `marker` and indent the rest to line up under it.
/// Blank lines stay blank.
fn hang(marker: &str, lines: Vec<String>) -> Vec<String> {
    let pad = " ".repeat(marker.chars().count());
    if lines.is_empty() {
        return vec![marker.trim_end().to_string()];
    }
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                format!("{marker}{line}").trim_end().to_string()
            } else if line.is_empty() {
                line
            } else {
                format!("{pad}{line}")
            }
        })
        .collect()
}

/// Indent every non-blank line by `width` spaces.
fn indent(lines: Vec<String>, width: usize) -> Vec<String> {
    let pad = " ".repeat(width);
    lines
        .into_iter()
        .map(|line| if line.is_empty() { line } else { format!("{pad}{line}") })
        .collect()
}

/// Join blocks with one blank line between them.
fn join_blocks(blocks: Vec<Vec<String>>) -> Vec<String> {
    let mut out = Vec::new();
    for block in blocks.into_iter().filter(|b| !b.is_empty()) {
        if !out.is_empty() {
            out.push(String::new());
        }
        out.extend(block);
    }
    out
}

/// Final text with exactly one trailing newline (empty documents stay empty).
fn finish(lines: Vec<String>) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
}
