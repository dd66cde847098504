//! Source locations for forms.
//!
//! Every form produced by the reader carries a [`Span`] so that the compiler
//! can thread it into diagnostics and into the expression nodes it builds.

use serde::{Deserialize, Serialize};

/// A region of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset start (0-indexed)
    pub start: usize,
    /// Byte offset end (exclusive)
    pub end: usize,
    /// Line number (1-indexed)
    pub start_line: usize,
    /// Line number (1-indexed)
    pub end_line: usize,
    /// Column (1-indexed, in bytes)
    pub start_column: usize,
    /// Column (1-indexed, in bytes)
    pub end_column: usize,
}

impl Span {
    pub fn new(
        start: usize,
        end: usize,
        start_line: usize,
        end_line: usize,
        start_column: usize,
        end_column: usize,
    ) -> Self {
        Self {
            start,
            end,
            start_line,
            end_line,
            start_column,
            end_column,
        }
    }

    /// Span used for synthesized forms that have no source text.
    pub fn synthetic() -> Self {
        Self::default()
    }

    /// Span running from the start of `self` to the end of `last`.
    ///
    /// Used for compound forms: the opening delimiter's span joined with the
    /// closing delimiter's span.
    pub fn to(&self, last: &Span) -> Span {
        Span {
            start: self.start,
            end: last.end,
            start_line: self.start_line,
            end_line: last.end_line,
            start_column: self.start_column,
            end_column: last.end_column,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Render the first line of this span with a caret marker underneath.
    /// Returns an empty string when the span lies outside `source`.
    pub fn render_context(&self, source: &str) -> String {
        let Some(line) = source.lines().nth(self.start_line.saturating_sub(1)) else {
            return String::new();
        };

        let col = self.start_column.saturating_sub(1);
        let width = if self.start_line == self.end_line {
            self.end_column.saturating_sub(self.start_column).max(1)
        } else {
            1
        };
        let marker = "^".repeat(width.min(line.len().saturating_sub(col)).max(1));
        let gutter = " ".repeat(self.start_line.to_string().len());

        format!(
            "  {} | {}\n  {} | {}{}",
            self.start_line,
            line,
            gutter,
            " ".repeat(col),
            marker
        )
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_column)
    }
}

/// Maps byte offsets to line/column positions.
#[derive(Debug, Clone)]
pub struct SourceMap {
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(memchr::memchr_iter(b'\n', source.as_bytes()).map(|i| i + 1));
        Self { line_starts }
    }

    /// Line and column (both 1-indexed) for a byte offset.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        (line + 1, offset - line_start + 1)
    }

    pub fn span(&self, start: usize, end: usize) -> Span {
        let (start_line, start_column) = self.line_col(start);
        let (end_line, end_column) = self.line_col(end);
        Span {
            start,
            end,
            start_line,
            end_line,
            start_column,
            end_column,
        }
    }
}
