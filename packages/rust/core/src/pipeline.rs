//! End-to-end pipeline: source tree → extraction → grouping → document tree.

use std::path::{Path, PathBuf};
use std::time::Instant;

use nfdocs_document::{DefinitionGroups, DocumentNode, build_document};
use nfdocs_shared::{BuildConfig, Diagnostic, DiagnosticKind, NfDocsError, Result};
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::extract::{FileExtraction, ScanOptions, extract_file};

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each source file has been extracted.
    fn file_scanned(&self, path: &Path, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, report: &BuildReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn file_scanned(&self, _path: &Path, _current: usize, _total: usize) {}
    fn done(&self, _report: &BuildReport) {}
}

// ---------------------------------------------------------------------------
// Source discovery
// ---------------------------------------------------------------------------

/// Source files under `root`, sorted by path.
///
/// A file root is returned as-is regardless of its extension. A directory is
/// walked recursively, keeping files whose extension equals `extension`.
pub fn collect_sources(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(root).map_err(|e| NfDocsError::io(root, e))?;
    if metadata.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut sources: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == extension))
        .collect();

    sources.sort();
    debug!(root = %root.display(), count = sources.len(), "collected sources");
    Ok(sources)
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Every definition found under a root, grouped, with the diagnostics raised
/// while finding them.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub groups: DefinitionGroups,
    pub diagnostics: Vec<Diagnostic>,
    pub files_scanned: usize,
}

/// Extract and group every definition under `root`.
///
/// With `parallel` set, files are extracted on the rayon pool. Results are
/// merged in path order either way, so both modes yield the same groups and
/// diagnostics.
#[instrument(skip_all, fields(root = %root.display(), parallel = parallel))]
pub fn extract_tree(
    root: &Path,
    options: &ScanOptions,
    parallel: bool,
    progress: &dyn ProgressReporter,
) -> Result<Extraction> {
    progress.phase("Collecting sources");
    let sources = collect_sources(root, &options.extension)?;
    let total = sources.len();

    progress.phase("Extracting annotations");
    let extractions: Vec<FileExtraction> = if parallel {
        sources
            .par_iter()
            .map(|path| extract_file(path, options))
            .collect()
    } else {
        sources
            .iter()
            .map(|path| extract_file(path, options))
            .collect()
    };

    let mut extraction = Extraction {
        files_scanned: total,
        ..Extraction::default()
    };
    for (i, (path, found)) in sources.iter().zip(extractions).enumerate() {
        progress.file_scanned(path, i + 1, total);
        extraction.diagnostics.extend(found.diagnostics);

        for definition in found.definitions {
            let (kind, name) = (definition.kind, definition.name.clone());
            let (file, lines) = (definition.file.clone(), definition.lines);
            if let Some(previous) = extraction.groups.insert(definition) {
                warn!(%kind, %name, "duplicate definition replaces earlier one");
                extraction.diagnostics.push(Diagnostic::new(
                    file,
                    Some(lines),
                    DiagnosticKind::DuplicateDefinition,
                    format!(
                        "{kind} {name:?} redefined; replaces the one at {}:{}",
                        previous.file.display(),
                        previous.lines
                    ),
                ));
            }
        }
    }

    Ok(extraction)
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

/// Result of [`run_build`].
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Document tree, one section per non-empty kind.
    pub nodes: Vec<DocumentNode>,
    /// Extraction and build diagnostics, in the order they were raised.
    pub diagnostics: Vec<Diagnostic>,
    pub files_scanned: usize,
    pub definitions_rendered: usize,
}

impl BuildReport {
    /// Whether any error-severity diagnostic was raised.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Run the full build: collect, extract, group, and build the document tree.
///
/// Only a missing or unreadable root aborts the run. Everything else is
/// reported through [`BuildReport::diagnostics`].
#[instrument(skip_all, fields(root = %root.display(), layout = %config.layout))]
pub fn run_build(
    root: &Path,
    config: &BuildConfig,
    progress: &dyn ProgressReporter,
) -> Result<BuildReport> {
    let start = Instant::now();
    config.validate()?;

    let options = ScanOptions::from(config);
    let extraction = extract_tree(root, &options, config.parallel, progress)?;

    progress.phase("Building document");
    let built = build_document(&extraction.groups, config.layout);

    // Each build diagnostic stands for one definition left out of the tree.
    let definitions_rendered = extraction.groups.len() - built.diagnostics.len();
    let mut diagnostics = extraction.diagnostics;
    diagnostics.extend(built.diagnostics);

    let report = BuildReport {
        definitions_rendered,
        nodes: built.nodes,
        diagnostics,
        files_scanned: extraction.files_scanned,
    };

    progress.done(&report);

    info!(
        files = report.files_scanned,
        definitions = report.definitions_rendered,
        diagnostics = report.diagnostics.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "build complete"
    );

    Ok(report)
}
