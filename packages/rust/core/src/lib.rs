//! Build orchestration for nfdocs.
//!
//! This crate ties together source discovery, annotation extraction, and
//! document building into the end-to-end [`pipeline::run_build`] workflow.

pub mod extract;
pub mod pipeline;

pub use extract::{FileExtraction, ScanOptions, extract_file, extract_source};
pub use pipeline::{
    BuildReport, Extraction, ProgressReporter, SilentProgress, collect_sources, extract_tree,
    run_build,
};
