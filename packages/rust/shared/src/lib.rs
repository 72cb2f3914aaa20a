//! Shared types, error model, and configuration for nfdocs.
//!
//! This crate is the foundation depended on by all other nfdocs crates.
//! It provides:
//! - [`NfDocsError`], the unified error type
//! - Domain types ([`Definition`], [`DefinitionKind`], [`ParsedValue`], [`Diagnostic`])
//! - Configuration ([`AppConfig`], [`BuildConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AnnotationsConfig, AppConfig, BuildConfig, Layout, OutputConfig, OutputFormat, ScanConfig,
    config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{NfDocsError, Result};
pub use types::{
    Definition, DefinitionKind, Diagnostic, DiagnosticKind, LineRange, ParsedValue, Severity,
};
