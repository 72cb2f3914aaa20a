//! Per-file extraction: annotation blocks → classified definitions.

use std::path::Path;

use nfdocs_annotations::{
    AnnotationPrefix, AnnotationRange, YamlMarkup, classify, parse_block, scan,
};
use nfdocs_shared::{
    BuildConfig, Definition, DefinitionKind, Diagnostic, NfDocsError, ParsedValue, Result,
};
use tracing::{debug, instrument, warn};

/// Title given to the pipeline's unnamed entry workflow.
const ENTRY_WORKFLOW_NAME: &str = "main";

/// Immutable scanning options shared by every file in a run.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub prefix: AnnotationPrefix,
    pub extension: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from(&BuildConfig::default())
    }
}

impl From<&BuildConfig> for ScanOptions {
    fn from(config: &BuildConfig) -> Self {
        Self {
            prefix: AnnotationPrefix::new(config.prefix.clone()),
            extension: config.extension.clone(),
        }
    }
}

/// Definitions and diagnostics from one source file.
#[derive(Debug, Clone, Default)]
pub struct FileExtraction {
    pub definitions: Vec<Definition>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Extract every annotated definition from already-loaded source text.
///
/// Each block is handled independently: a block that fails to classify or
/// parse becomes a diagnostic and the next block is still processed.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn extract_source(path: &Path, text: &str, options: &ScanOptions) -> FileExtraction {
    let lines: Vec<&str> = text.lines().collect();
    let mut out = FileExtraction::default();

    for range in scan(&lines, &options.prefix) {
        let location = Some(range.lines());

        let Some(signature_index) = range.signature_index(lines.len()) else {
            let err = NfDocsError::UnboundedCommentBlock;
            warn!(lines = %range.lines(), "annotation block at end of file");
            out.diagnostics.push(Diagnostic::from_error(path, location, &err));
            continue;
        };

        let result = extract_block(&lines, range, signature_index, &options.prefix);

        match result {
            Ok((kind, name, payload)) => {
                debug!(%kind, %name, lines = %range.lines(), "definition extracted");
                out.definitions.push(Definition {
                    kind,
                    name,
                    payload,
                    file: path.to_path_buf(),
                    lines: range.lines(),
                });
            }
            Err(e) => {
                warn!(lines = %range.lines(), error = %e, "skipping annotation block");
                out.diagnostics.push(Diagnostic::from_error(path, location, &e));
            }
        }
    }

    out
}

/// Classify the signature after `range`, then parse the block payload.
fn extract_block(
    lines: &[&str],
    range: AnnotationRange,
    signature_index: usize,
    prefix: &AnnotationPrefix,
) -> Result<(DefinitionKind, String, ParsedValue)> {
    let signature = classify(lines.get(signature_index).copied().unwrap_or_default())?;
    let name = if signature.name.is_empty() && signature.kind == DefinitionKind::Workflow {
        ENTRY_WORKFLOW_NAME.to_string()
    } else {
        signature.name
    };
    let payload = parse_block(lines, range, prefix, &YamlMarkup)?;
    Ok((signature.kind, name, payload))
}

/// Read and extract one file. A read failure is reported as an `io`
/// diagnostic for that file rather than aborting the run.
pub fn extract_file(path: &Path, options: &ScanOptions) -> FileExtraction {
    match std::fs::read_to_string(path) {
        Ok(text) => extract_source(path, &text, options),
        Err(e) => {
            let err = NfDocsError::io(path, e);
            warn!(path = %path.display(), error = %err, "could not read source file");
            FileExtraction {
                definitions: Vec::new(),
                diagnostics: vec![Diagnostic::from_error(path, None, &err)],
            }
        }
    }
}
