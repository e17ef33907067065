//! Source positions of tokens and tree nodes.

use std::sync::Arc;

use taskforge_foundation::SourceLocation;

/// Where a token or node sits in its program text.
///
/// `start..end` is a byte range; `line` and `column` (both 1-based) locate
/// `start` for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Span {
    /// First byte.
    pub start: usize,
    /// One past the last byte.
    pub end: usize,
    /// Line of `start`.
    pub line: u32,
    /// Column of `start`.
    pub column: u32,
}

impl Span {
    /// Creates a span.
    #[must_use]
    pub const fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Extends this span so it also covers `last`, keeping this start position.
    #[must_use]
    pub fn cover(self, last: Self) -> Self {
        Self {
            end: last.end.max(self.end),
            ..self
        }
    }

    /// Diagnostic location of the span start in `file`.
    #[must_use]
    pub fn location(&self, file: &Arc<str>) -> SourceLocation {
        SourceLocation::new(file.clone(), self.line, self.column)
    }
}
