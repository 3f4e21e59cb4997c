use serde::Serialize;

use pddl_common::Name;

use super::decl::TypedEntry;
use super::formula::Formula;

/// A fully parsed `(define (problem ...) ...)` file.
///
/// `domain` is the name written after `:domain`; the analyzer checks it
/// against the name of the domain it was paired with.
#[derive(Debug, Clone, Serialize)]
pub struct Problem {
    pub name: Name,
    pub domain: Name,
    pub requirements: Vec<Name>,
    pub objects: Vec<TypedEntry>,
    pub init: Vec<Formula>,
    pub goal: Formula,
}
