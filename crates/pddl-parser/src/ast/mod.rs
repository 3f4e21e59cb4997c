//! The typed PDDL AST: passive data shared by the parser (which builds it)
//! and the semantic analyzer (which fills in the resolution fields left
//! `None` by parsing).

mod decl;
mod domain;
mod formula;
mod problem;

pub use decl::{
    Action, ConstRef, Function, FunctionId, Predicate, PredicateId, Type, TypeId, TypeName,
    TypedEntry,
};
pub use domain::Domain;
pub use formula::{
    Assign, AssignValue, Formula, FunctionInit, Literal, MultiFormula, Quantifier, Term, TermDef,
    VariableRef, When,
};
pub use problem::Problem;
