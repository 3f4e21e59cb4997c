use serde::Serialize;

use pddl_common::Name;

/// A dense arena index into [`crate::ast::Domain::types`], assigned during
/// semantic analysis.
pub type TypeId = usize;
pub type PredicateId = usize;
pub type FunctionId = usize;

/// A type name as it appears in a typed list: a [`Name`] which, once
/// analysis has run, also references the [`Type`] it names.
#[derive(Debug, Clone, Serialize)]
pub struct TypeName {
    pub name: Name,
    pub definition: Option<TypeId>,
}

impl TypeName {
    pub fn new(name: Name) -> Self {
        Self { name, definition: None }
    }
}

/// A named variable or constant, carrying the list of [`TypeName`]s it was
/// declared with. An empty list defaults to the implicit `object` type
/// once analysis runs.
#[derive(Debug, Clone, Serialize)]
pub struct TypedEntry {
    pub name: Name,
    pub id: Option<u32>,
    pub types: Vec<TypeName>,
}

/// Tags a resolved index as belonging to a domain's constants or a
/// problem's objects, the two namespaces a [`Type`]'s `domain` list draws
/// from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConstRef {
    Constant(usize),
    Object(usize),
}

/// A node in the type lattice. `predecessors` (self plus every transitive
/// super-type, always including `object`) and `domain` (every constant or
/// object declared of this type, transitively) are populated during
/// analysis.
#[derive(Debug, Clone, Serialize)]
pub struct Type {
    pub name: Name,
    pub id: Option<TypeId>,
    pub parents: Vec<TypeName>,
    pub predecessors: Vec<TypeId>,
    pub domain: Vec<ConstRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Predicate {
    pub name: Name,
    pub id: Option<PredicateId>,
    pub params: Vec<TypedEntry>,
    pub pos_effect: bool,
    pub neg_effect: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Function {
    pub name: Name,
    pub id: Option<FunctionId>,
    pub params: Vec<TypedEntry>,
    /// The literal `number` result type, if a `- number` suffix was given.
    /// `:action-costs` requires every declared function to carry one.
    pub result_type: Option<Name>,
}

impl Function {
    pub fn is_total_cost(&self) -> bool {
        self.name.key() == "total-cost" && self.params.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Action {
    pub name: Name,
    pub params: Vec<TypedEntry>,
    pub precondition: Option<super::Formula>,
    pub effect: Option<super::Formula>,
}
