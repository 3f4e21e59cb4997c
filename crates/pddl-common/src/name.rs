use std::fmt;

use serde::Serialize;

use crate::Location;

/// An identifier with its source location.
///
/// Names compare and hash case-insensitively, matching PDDL's
/// case-insensitive symbol lookup, but preserve the original spelling for
/// display and diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct Name {
    pub text: String,
    pub location: Location,
}

impl Name {
    pub fn new(text: impl Into<String>, location: Location) -> Self {
        Self { text: text.into(), location }
    }

    /// Lowercased form used for namespace lookups.
    pub fn key(&self) -> String {
        self.text.to_ascii_lowercase()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.text.eq_ignore_ascii_case(&other.text)
    }
}

impl Eq for Name {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_equality() {
        let a = Name::new("Block", Location::new("d", 1));
        let b = Name::new("block", Location::new("d", 2));
        assert_eq!(a, b);
    }

    #[test]
    fn key_is_lowercase() {
        let n = Name::new("Physobj", Location::new("d", 1));
        assert_eq!(n.key(), "physobj");
    }
}
