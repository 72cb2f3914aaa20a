//! Annotation block scanning, definition classification, and payload parsing.
//!
//! This crate provides:
//! - [`scanner`]: locates contiguous runs of annotation-prefixed lines
//! - [`classify`]: reads the signature line after a block
//! - [`payload`]: strips the prefix and parses the block as structured markup

pub mod classify;
pub mod payload;
pub mod scanner;

pub use classify::{Signature, classify};
pub use payload::{MarkupParser, YamlMarkup, parse_block, strip_block};
pub use scanner::{AnnotationPrefix, AnnotationRange, scan};
