//! Annotation block scanner.
//!
//! A block is a maximal run of consecutive lines that start with the
//! annotation prefix (`/// ` by default). The line right after a block is the
//! signature of the definition it documents.

use nfdocs_shared::LineRange;
use tracing::trace;

// ---------------------------------------------------------------------------
// Prefix
// ---------------------------------------------------------------------------

/// The comment token marking documentation lines.
///
/// A line consisting of the prefix without its trailing whitespace (a bare
/// `///`) also counts as marked, so blank lines inside a payload keep the
/// block together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationPrefix {
    token: String,
    bare: String,
}

impl AnnotationPrefix {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        let bare = token.trim_end().to_string();
        Self { token, bare }
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Whether `line` is part of an annotation block.
    pub fn is_marked(&self, line: &str) -> bool {
        line.starts_with(&self.token) || self.is_bare(line)
    }

    /// Remove the leading prefix occurrence. Returns `None` for unmarked lines.
    ///
    /// Only the first occurrence is removed; payload text may itself contain
    /// the token.
    pub fn strip<'a>(&self, line: &'a str) -> Option<&'a str> {
        if let Some(rest) = line.strip_prefix(self.token.as_str()) {
            Some(rest)
        } else if self.is_bare(line) {
            Some("")
        } else {
            None
        }
    }

    fn is_bare(&self, line: &str) -> bool {
        !self.bare.is_empty() && line.trim_end() == self.bare
    }
}

impl Default for AnnotationPrefix {
    fn default() -> Self {
        Self::new("/// ")
    }
}

// ---------------------------------------------------------------------------
// Ranges
// ---------------------------------------------------------------------------

/// Inclusive line range of one annotation block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationRange {
    pub start: usize,
    pub end: usize,
}

impl AnnotationRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn lines(&self) -> LineRange {
        LineRange::new(self.start, self.end)
    }

    /// Index of the signature line following the block, if the file has one.
    pub fn signature_index(&self, line_count: usize) -> Option<usize> {
        let next = self.end + 1;
        (next < line_count).then_some(next)
    }
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// Find every annotation block in `lines`, in file order.
///
/// Neighbour lookups are bounds-checked, so blocks touching the first or last
/// line of the file are handled like any other block.
pub fn scan<S: AsRef<str>>(lines: &[S], prefix: &AnnotationPrefix) -> Vec<AnnotationRange> {
    let marked = |i: usize| lines.get(i).is_some_and(|l| prefix.is_marked(l.as_ref()));

    let mut ranges = Vec::new();
    let mut start: Option<usize> = None;

    for i in 0..lines.len() {
        if !marked(i) {
            continue;
        }

        let previous_marked = i.checked_sub(1).is_some_and(|p| marked(p));
        let next_marked = marked(i + 1);

        if !previous_marked {
            start = Some(i);
        }
        if !next_marked {
            if let Some(s) = start.take() {
                ranges.push(AnnotationRange::new(s, i));
            }
        }
    }

    trace!(blocks = ranges.len(), lines = lines.len(), "scanned annotation blocks");
    ranges
}
