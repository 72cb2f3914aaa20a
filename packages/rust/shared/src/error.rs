//! Error types for nfdocs.
//!
//! Library crates use [`NfDocsError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

use crate::types::DiagnosticKind;

/// Top-level error type for all nfdocs operations.
#[derive(Debug, thiserror::Error)]
pub enum NfDocsError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An annotation block runs into the end of the file, so no signature follows it.
    #[error("annotation block is not followed by a definition")]
    UnboundedCommentBlock,

    /// The signature line after a block names no workflow, process, or function.
    #[error("unrecognized definition kind in {signature:?}")]
    UnrecognizedDefinitionKind { signature: String },

    /// The prefix-stripped block text is not valid structured markup.
    #[error("malformed annotation: {message}")]
    MalformedAnnotation { message: String },

    /// The parsed payload has no `summary` key.
    #[error("definition {name:?} has no summary")]
    MissingSummary { name: String },

    /// An `input`/`output` entry is neither a valid tuple nor a valid scalar.
    #[error("malformed parameter: {message}")]
    MalformedParameter { message: String },

    /// Output rendering error.
    #[error("render error: {0}")]
    Render(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, NfDocsError>;

impl NfDocsError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a malformed-annotation error from any displayable message.
    pub fn malformed_annotation(msg: impl Into<String>) -> Self {
        Self::MalformedAnnotation {
            message: msg.into(),
        }
    }

    /// Create a malformed-parameter error from any displayable message.
    pub fn malformed_parameter(msg: impl Into<String>) -> Self {
        Self::MalformedParameter {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The diagnostic category this error is reported under.
    pub fn diagnostic_kind(&self) -> DiagnosticKind {
        match self {
            Self::Io { .. } => DiagnosticKind::Io,
            Self::UnboundedCommentBlock => DiagnosticKind::UnboundedCommentBlock,
            Self::UnrecognizedDefinitionKind { .. } => DiagnosticKind::UnrecognizedDefinitionKind,
            Self::MalformedAnnotation { .. } => DiagnosticKind::MalformedAnnotation,
            Self::MissingSummary { .. } => DiagnosticKind::MissingSummary,
            Self::MalformedParameter { .. } => DiagnosticKind::MalformedParameter,
            Self::Config { .. } | Self::Render(_) => DiagnosticKind::Internal,
        }
    }
}
