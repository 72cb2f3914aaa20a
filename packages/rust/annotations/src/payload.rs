//! Annotation payload extraction and structured-markup parsing.
//!
//! The payload of a block is its lines with the leading prefix removed,
//! joined with `\n`. The text is handed to a [`MarkupParser`]; the default
//! [`YamlMarkup`] parses it as YAML.

use nfdocs_shared::{NfDocsError, ParsedValue, Result};
use serde_yaml::Value;

use crate::scanner::{AnnotationPrefix, AnnotationRange};

// ---------------------------------------------------------------------------
// Parser seam
// ---------------------------------------------------------------------------

/// Parses structured text into a nested [`ParsedValue`].
pub trait MarkupParser: Send + Sync {
    /// Parse the full payload text of one block.
    fn parse(&self, text: &str) -> Result<ParsedValue>;

    /// Human-readable parser name for tracing.
    fn name(&self) -> &str;
}

/// YAML payloads via `serde_yaml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlMarkup;

impl MarkupParser for YamlMarkup {
    fn parse(&self, text: &str) -> Result<ParsedValue> {
        let value: Value = serde_yaml::from_str(text)
            .map_err(|e| NfDocsError::malformed_annotation(e.to_string()))?;
        Ok(from_yaml(value))
    }

    fn name(&self) -> &str {
        "yaml"
    }
}

/// Convert a YAML value into a [`ParsedValue`]. Scalars become text.
fn from_yaml(value: Value) -> ParsedValue {
    match value {
        Value::Null => ParsedValue::Null,
        Value::Bool(b) => ParsedValue::Text(b.to_string()),
        Value::Number(n) => ParsedValue::Text(n.to_string()),
        Value::String(s) => ParsedValue::Text(s),
        Value::Sequence(items) => ParsedValue::Sequence(items.into_iter().map(from_yaml).collect()),
        Value::Mapping(mapping) => ParsedValue::Mapping(
            mapping
                .into_iter()
                .map(|(k, v)| (key_text(k), from_yaml(v)))
                .collect(),
        ),
        Value::Tagged(tagged) => from_yaml(tagged.value),
    }
}

fn key_text(key: Value) -> String {
    match key {
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

// ---------------------------------------------------------------------------
// Block payloads
// ---------------------------------------------------------------------------

/// The prefix-stripped text of a block, with the block's line breaks kept.
pub fn strip_block<S: AsRef<str>>(
    lines: &[S],
    range: AnnotationRange,
    prefix: &AnnotationPrefix,
) -> String {
    range
        .lines()
        .indices()
        .filter_map(|i| lines.get(i))
        .map(|line| {
            let line = line.as_ref();
            prefix.strip(line).unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strip and parse one block's payload.
pub fn parse_block<S: AsRef<str>>(
    lines: &[S],
    range: AnnotationRange,
    prefix: &AnnotationPrefix,
    parser: &dyn MarkupParser,
) -> Result<ParsedValue> {
    let text = strip_block(lines, range, prefix);
    parser.parse(&text)
}
