//! Generic document model and renderers for extracted pipeline documentation.
//!
//! This crate provides:
//! - [`node`]: the [`DocumentNode`] tree handed to rendering hosts
//! - [`params`]: decoding of annotation payloads into [`DocPayload`] / [`Parameter`]
//! - [`groups`]: definitions grouped by kind and sorted by name
//! - [`builder`]: payloads → sections, tables, and lists
//! - [`render`]: reStructuredText, Markdown, and JSON adapters

pub mod builder;
pub mod groups;
pub mod node;
pub mod params;
pub mod render;

pub use builder::{BuildOutput, build_document, render_parameters};
pub use groups::DefinitionGroups;
pub use node::{DocumentNode, Inline, List, ListItem, Section, Table, TableRow};
pub use params::{DocPayload, Parameter};
pub use render::{JsonRenderer, MarkdownRenderer, Renderer, RstRenderer, renderer_for};
