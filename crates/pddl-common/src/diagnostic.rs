use std::fmt;

use serde::Serialize;

use crate::Location;

/// The uniform external diagnostic surface: `"<path>:<line>: <message>"`.
///
/// Every error kind produced by the lexer, parser, and semantic analyzer
/// eventually flattens into one of these; richer internal error enums
/// carry more structure but convert to a `Diagnostic` at the crate
/// boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub location: Location,
    pub message: String,
}

impl Diagnostic {
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self { location, message: message.into() }
    }

    /// The specialized shape for a missing-requirement diagnostic:
    /// `"<path>:<line>: <cause> requires <:requirement>"`.
    pub fn missing_requirement(
        location: Location,
        cause: impl fmt::Display,
        requirement: &str,
    ) -> Self {
        Self::new(location, format!("{cause} requires {requirement}"))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let d = Diagnostic::new(Location::new("d.pddl", 3), "expected (, got NAME");
        assert_eq!(d.to_string(), "d.pddl:3: expected (, got NAME");
    }

    #[test]
    fn missing_requirement_format() {
        let d = Diagnostic::missing_requirement(Location::new("d.pddl", 5), ":types", ":typing");
        assert_eq!(d.to_string(), "d.pddl:5: :types requires :typing");
    }
}
