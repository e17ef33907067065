//! Source locations attached to AST nodes and diagnostics.

use std::fmt;
use std::sync::Arc;

/// A position in a DSL source file.
///
/// Every AST node and every location-bearing error carries one of these so an
/// author can be pointed at the offending line.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// Name of the source file (or a synthetic name like `<input>`).
    pub file: Arc<str>,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

impl SourceLocation {
    /// Creates a new location.
    #[must_use]
    pub fn new(file: impl Into<Arc<str>>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// A location for values that did not come from source text
    /// (host registrations, natives).
    #[must_use]
    pub fn host() -> Self {
        Self::new("<host>", 0, 0)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
