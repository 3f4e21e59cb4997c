use serde::Serialize;

use pddl_common::Name;

use super::decl::{Action, Function, Predicate, Type, TypedEntry};

/// A fully parsed `(define (domain ...) ...)` file.
///
/// `requirements` holds the raw `:`-prefixed names as written; the
/// semantic analyzer's requirements-closure pass turns them into the
/// enabled-requirement set consulted by every other pass.
#[derive(Debug, Clone, Serialize)]
pub struct Domain {
    pub name: Name,
    pub requirements: Vec<Name>,
    pub types: Vec<Type>,
    pub constants: Vec<TypedEntry>,
    pub predicates: Vec<Predicate>,
    pub functions: Vec<Function>,
    pub actions: Vec<Action>,
}
