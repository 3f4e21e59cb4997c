use serde::Serialize;

use pddl_common::{Location, Name};

use super::decl::{ConstRef, FunctionId, PredicateId, TypeId, TypedEntry};

/// A resolved reference for a variable [`Term`]: the types of the
/// [`TypedEntry`] it was pushed onto the scope stack as.
///
/// Variables live inside an action's parameter list or a quantifier's
/// variable list, nested in the formula tree itself, so there is no global
/// arena to index into the way there is for types, predicates, and
/// functions. Storing the resolved type list directly avoids a
/// self-referential back-pointer into a sibling subtree.
#[derive(Debug, Clone, Serialize)]
pub struct VariableRef {
    pub types: Vec<TypeId>,
}

/// What a [`Term`] resolves to once analysis runs: either a constant (an
/// index into the domain's constants or the problem's objects) or a
/// variable (the resolved types of its binding site).
#[derive(Debug, Clone, Serialize)]
pub enum TermDef {
    Constant(ConstRef),
    Variable(VariableRef),
}

/// A name used as an argument to a predicate, function, or equality: either
/// a constant (plain `NAME`) or a variable (`?NAME`).
#[derive(Debug, Clone, Serialize)]
pub struct Term {
    pub name: Name,
    pub is_variable: bool,
    pub definition: Option<TermDef>,
}

impl Term {
    pub fn new(name: Name, is_variable: bool) -> Self {
        Self { name, is_variable, definition: None }
    }
}

/// A function applied to a term list, as it appears on either side of an
/// [`Assign`]: `(total-cost)`, `(distance ?a ?b)`.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionInit {
    pub location: Location,
    pub name: Name,
    pub terms: Vec<Term>,
    pub definition: Option<FunctionId>,
}

/// A possibly-negated predicate application: `(on ?a ?b)`, `(not (clear ?a))`.
///
/// `is_effect` marks a literal that appears in effect position; the
/// analyzer uses it to set the defining predicate's `pos_effect`/
/// `neg_effect` flag rather than to change how the literal itself is
/// checked.
#[derive(Debug, Clone, Serialize)]
pub struct Literal {
    pub location: Location,
    pub predicate: Name,
    pub negative: bool,
    pub terms: Vec<Term>,
    pub is_effect: bool,
    pub definition: Option<PredicateId>,
}

/// A parenthesized n-ary group: `(and ...)` / `(or ...)`.
#[derive(Debug, Clone, Serialize)]
pub struct MultiFormula {
    pub location: Location,
    pub items: Vec<Formula>,
}

/// `(forall (vars) body)` / `(exists (vars) body)`. `is_effect` is only
/// meaningful on a `ForAll`: it distinguishes a quantified effect (gated by
/// `:conditional-effects`) from a quantified precondition (gated by
/// `:universal-preconditions`).
#[derive(Debug, Clone, Serialize)]
pub struct Quantifier {
    pub location: Location,
    pub variables: Vec<TypedEntry>,
    pub body: Box<Formula>,
    pub is_effect: bool,
}

/// `(when condition effect)`, a conditional effect.
#[derive(Debug, Clone, Serialize)]
pub struct When {
    pub location: Location,
    pub condition: Box<Formula>,
    pub effect: Box<Formula>,
}

/// The right-hand side of an [`Assign`]: either a literal number or another
/// function application.
#[derive(Debug, Clone, Serialize)]
pub enum AssignValue {
    Number(String),
    Function(FunctionInit),
}

/// A function-cost assignment: `(= (total-cost) 0)`, `(increase (total-cost) 5)`.
///
/// `is_init` marks an assignment parsed from an `:init` block, where the
/// target-must-be-`total-cost` restriction does not apply (init elements
/// establish the starting numeric fluents, not just plan cost).
#[derive(Debug, Clone, Serialize)]
pub struct Assign {
    pub location: Location,
    pub op: Name,
    pub assigned_to: FunctionInit,
    pub value: AssignValue,
    pub is_init: bool,
}

/// The logical sub-language shared by preconditions, effects, goals, and
/// init elements.
///
/// A single tagged variant rather than a visitor-per-operation interface
/// split: dispatch is a `match`, and there is exactly one place each
/// operation's parsing, printing, and checking logic lives.
#[derive(Debug, Clone, Serialize)]
pub enum Formula {
    Literal(Literal),
    And(MultiFormula),
    Or(MultiFormula),
    Not(Location, Box<Formula>),
    Imply(Location, Box<Formula>, Box<Formula>),
    ForAll(Quantifier),
    Exists(Quantifier),
    When(When),
    Assign(Assign),
}

impl Formula {
    pub fn location(&self) -> &Location {
        match self {
            Formula::Literal(l) => &l.location,
            Formula::And(m) | Formula::Or(m) => &m.location,
            Formula::Not(loc, _) => loc,
            Formula::Imply(loc, ..) => loc,
            Formula::ForAll(q) | Formula::Exists(q) => &q.location,
            Formula::When(w) => &w.location,
            Formula::Assign(a) => &a.location,
        }
    }
}
