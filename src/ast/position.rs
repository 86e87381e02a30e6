//! Source position tracking for error reporting
//!
//! The lexer produces tokens paired with byte ranges into the source text.
//! Before a failure is surfaced, byte offsets are converted to line/column
//! positions using [`SourceMap`]. The map precomputes the byte offset of
//! every line start once per parse call, so each conversion is a binary
//! search.

use std::fmt;
use std::ops::Range;

/// A position in Michelson source code.
///
/// Lines are 1-based, matching how editors and compilers report positions.
/// The column is the 0-based byte offset within the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Converts byte offsets within one source text to [`Position`] values.
pub struct SourceMap {
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];

        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }

        Self { line_starts }
    }

    /// Convert a byte offset to a line/column position.
    pub fn position(&self, byte_offset: usize) -> Position {
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1);

        let column = byte_offset - self.line_starts[line];

        Position::new(line + 1, column)
    }

    /// Position of the start of a byte range.
    pub fn start_of(&self, range: &Range<usize>) -> Position {
        self.position(range.start)
    }

    /// Total number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
