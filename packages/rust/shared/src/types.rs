//! Core domain types for annotated pipeline definitions.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::NfDocsError;

// ---------------------------------------------------------------------------
// DefinitionKind
// ---------------------------------------------------------------------------

/// The three definition constructs recognized in pipeline sources.
///
/// Variant order is the order kind sections appear in the rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionKind {
    Workflow,
    Process,
    Function,
}

impl DefinitionKind {
    /// All kinds, in classification priority order.
    pub const ALL: [DefinitionKind; 3] = [Self::Workflow, Self::Process, Self::Function];

    /// The keyword that introduces this kind in a signature line.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Workflow => "workflow",
            Self::Process => "process",
            Self::Function => "function",
        }
    }

    /// Section label for a group of `count` definitions of this kind.
    pub fn label(self, count: usize) -> &'static str {
        match (self, count == 1) {
            (Self::Workflow, true) => "Workflow",
            (Self::Workflow, false) => "Workflows",
            (Self::Process, true) => "Process",
            (Self::Process, false) => "Processes",
            (Self::Function, true) => "Function",
            (Self::Function, false) => "Functions",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

// ---------------------------------------------------------------------------
// LineRange
// ---------------------------------------------------------------------------

/// Inclusive, zero-based line range within a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "line range start must not exceed end");
        Self { start, end }
    }

    /// Iterate the covered line indices.
    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Displays as 1-based editor line numbers, e.g. `3-7` or `3`.
impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start + 1)
        } else {
            write!(f, "{}-{}", self.start + 1, self.end + 1)
        }
    }
}

// ---------------------------------------------------------------------------
// ParsedValue
// ---------------------------------------------------------------------------

/// Nested value produced by the structured-markup parser.
///
/// Leaves are always text; mapping keys keep their source order.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedValue {
    Null,
    Text(String),
    Sequence(Vec<ParsedValue>),
    Mapping(Vec<(String, ParsedValue)>),
}

impl ParsedValue {
    /// Look up a key in a mapping. Returns `None` for non-mappings.
    pub fn get(&self, key: &str) -> Option<&ParsedValue> {
        match self {
            Self::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ParsedValue]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the value's shape, used in error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Text(_) => "text",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }
}

// ---------------------------------------------------------------------------
// Definition
// ---------------------------------------------------------------------------

/// A classified definition together with its parsed annotation payload.
#[derive(Debug, Clone)]
pub struct Definition {
    pub kind: DefinitionKind,
    pub name: String,
    pub payload: ParsedValue,
    /// Source file the definition was found in.
    pub file: PathBuf,
    /// Lines of the annotation block.
    pub lines: LineRange,
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Category of a reported, recoverable problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    Io,
    UnboundedCommentBlock,
    UnrecognizedDefinitionKind,
    MalformedAnnotation,
    MissingSummary,
    MalformedParameter,
    DuplicateDefinition,
    Internal,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Io => "io",
            Self::UnboundedCommentBlock => "unbounded-comment-block",
            Self::UnrecognizedDefinitionKind => "unrecognized-definition-kind",
            Self::MalformedAnnotation => "malformed-annotation",
            Self::MissingSummary => "missing-summary",
            Self::MalformedParameter => "malformed-parameter",
            Self::DuplicateDefinition => "duplicate-definition",
            Self::Internal => "internal",
        }
    }

    /// Stray blocks and shadowed names are warnings; everything else drops
    /// a definition or a file.
    pub fn severity(self) -> Severity {
        match self {
            Self::UnboundedCommentBlock | Self::DuplicateDefinition => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem tied to a file (and optionally a block of lines) that was
/// reported instead of aborting the run.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<LineRange>,
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        file: impl Into<PathBuf>,
        lines: Option<LineRange>,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            lines,
            severity: kind.severity(),
            kind,
            message: message.into(),
        }
    }

    /// Record a recoverable error against a file location.
    pub fn from_error(
        file: impl Into<PathBuf>,
        lines: Option<LineRange>,
        err: &NfDocsError,
    ) -> Self {
        Self::new(file, lines, err.diagnostic_kind(), err.to_string())
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file.display())?;
        if let Some(lines) = &self.lines {
            write!(f, ":{lines}")?;
        }
        write!(f, ": {}[{}]: {}", self.severity, self.kind, self.message)
    }
}
