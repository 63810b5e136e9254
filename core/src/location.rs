//! Source positions attached to diagnostics and sequence points.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// 1-based line and column inside a module source file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Path of the module file as given on the command line.
    pub file: String,
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number, starting at 1.
    pub column: usize,
}

impl Location {
    pub fn new(file: String, line: usize, column: usize) -> Self {
        Location { file, line, column }
    }

    /// The same position, attributed to `path`.
    pub fn in_file(self, path: &Path) -> Self {
        Location {
            file: path.display().to_string(),
            ..self
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Source range of a statement. A sequence point without one is hidden
/// from the debugger.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Span {
    /// First position covered by the statement.
    pub start: Location,
    /// Position just past the statement. Equal to `start` for a point.
    pub end: Location,
}

impl Span {
    pub fn new(start: Location, end: Location) -> Self {
        Span { start, end }
    }

    /// Zero-width span at `at`.
    pub fn point(at: Location) -> Self {
        Span {
            start: at.clone(),
            end: at,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{} - {}", self.start, self.end)
        }
    }
}
