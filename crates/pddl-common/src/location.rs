use std::fmt;

use serde::Serialize;

/// A source position: the file it came from and a 1-based line number.
///
/// `line == 0` is the sentinel for implicit, synthesized declarations (the
/// injected `object` type, the injected `=` predicate) that never appeared
/// in source text. Pretty-printers use it to suppress them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub path: String,
    pub line: u32,
}

impl Location {
    pub fn new(path: impl Into<String>, line: u32) -> Self {
        Self { path: path.into(), line }
    }

    /// The sentinel location used for synthesized declarations.
    pub fn synthetic(path: impl Into<String>) -> Self {
        Self { path: path.into(), line: 0 }
    }

    pub fn is_synthetic(&self) -> bool {
        self.line == 0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.line)
    }
}
