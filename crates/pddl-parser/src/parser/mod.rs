//! Recursive-descent parser building the typed PDDL AST directly (no
//! intermediate concrete syntax tree): one function per grammar production,
//! each consuming its own parentheses and returning either a value or a
//! [`Diagnostic`]. There is no panic path for malformed input.

use pddl_common::{Diagnostic, Name, TokenKind};

use crate::ast::{
    Action, Assign, AssignValue, Domain, Formula, Function, FunctionInit, Literal, MultiFormula,
    Predicate, Problem, Quantifier, Term, Type, TypeName, TypedEntry, When,
};
use crate::token_buffer::TokenBuffer;

pub type ParseResult<T> = Result<T, Diagnostic>;

pub struct Parser<'src> {
    tb: TokenBuffer<'src>,
}

impl<'src> Parser<'src> {
    pub fn new(path: impl Into<String>, source: &'src str) -> Self {
        Self { tb: TokenBuffer::new(path, source) }
    }

    pub fn with_max_peek(path: impl Into<String>, source: &'src str, max_peek: usize) -> Self {
        Self { tb: TokenBuffer::with_max_peek(path, source, max_peek) }
    }

    // ── Top-level productions ───────────────────────────────────────────

    /// `(define (domain NAME) requirements? types? constants? predicates?
    /// functions? action*)`
    pub fn parse_domain(&mut self) -> ParseResult<Domain> {
        self.tb.expect(&["(", "define", "("])?;
        if !self.tb.accept(&["domain"]) {
            let tok = self.tb.peek().clone();
            return Err(Diagnostic::new(
                self.tb.location(),
                format!("not a domain: expected [domain], got [{}]", tok.text),
            ));
        }
        let name = self.parse_name(TokenKind::Name)?;
        self.tb.expect(&[")"])?;

        let requirements = self.parse_requirements()?;
        let types = self.parse_types_def()?;
        let constants = self.parse_typed_entries_block(":constants")?;
        let predicates = self.parse_predicates_def()?;
        let functions = self.parse_functions_def()?;
        let actions = self.parse_actions_def()?;
        self.tb.expect(&[")"])?;

        Ok(Domain { name, requirements, types, constants, predicates, functions, actions })
    }

    /// `(define (problem NAME) (:domain NAME) requirements? objects? init goal)`
    pub fn parse_problem(&mut self) -> ParseResult<Problem> {
        self.tb.expect(&["(", "define", "("])?;
        if !self.tb.accept(&["problem"]) {
            let tok = self.tb.peek().clone();
            return Err(Diagnostic::new(
                self.tb.location(),
                format!("not a problem: expected [problem], got [{}]", tok.text),
            ));
        }
        let name = self.parse_name(TokenKind::Name)?;
        self.tb.expect(&[")"])?;

        self.tb.expect(&["(", ":domain"])?;
        let domain = self.parse_name(TokenKind::Name)?;
        self.tb.expect(&[")"])?;

        let requirements = self.parse_requirements()?;
        let objects = self.parse_typed_entries_block(":objects")?;
        let init = self.parse_init()?;
        let goal = self.parse_goal()?;
        self.tb.expect(&[")"])?;

        Ok(Problem { name, domain, requirements, objects, init, goal })
    }

    // ── Names and typed lists ───────────────────────────────────────────

    fn parse_name(&mut self, kind: TokenKind) -> ParseResult<Name> {
        let loc = self.tb.location();
        let tok = self.tb.expect_kind(kind)?;
        Ok(Name::new(tok.text, loc))
    }

    fn parse_multiple_names(&mut self, kind: TokenKind) -> ParseResult<Vec<Name>> {
        let mut names = Vec::new();
        loop {
            let loc = self.tb.location();
            match self.tb.accept_kind(kind) {
                Some(tok) => names.push(Name::new(tok.text, loc)),
                None => break,
            }
        }
        Ok(names)
    }

    /// The repeated shape `NAME+ (- TYPE)?`, grouping each run of
    /// identifiers under the type suffix that follows it. A name with no
    /// declared type gets an empty type list, defaulted to `object` during
    /// analysis.
    fn parse_typed_list(&mut self, kind: TokenKind) -> ParseResult<Vec<TypedEntry>> {
        let mut list = Vec::new();
        loop {
            let ids = self.parse_multiple_names(kind)?;
            if ids.is_empty() {
                if self.tb.peek().kind == TokenKind::Minus {
                    // Permissive: a stray `-` with no preceding identifiers
                    // is harmless noise, not a parse error. Consume it and
                    // keep going.
                    self.tb.junk(1);
                    continue;
                }
                break;
            }
            let types = self.parse_type()?;
            for id in ids {
                list.push(TypedEntry { name: id, id: None, types: types.clone() });
            }
        }
        Ok(list)
    }

    /// `(- TYPE)?` where `TYPE` is a single NAME or `(either NAME+)`.
    fn parse_type(&mut self) -> ParseResult<Vec<TypeName>> {
        if !self.tb.accept(&["-"]) {
            return Ok(Vec::new());
        }
        if self.tb.accept(&["("]) {
            self.tb.expect(&["either"])?;
            let first = self.parse_name(TokenKind::Name)?;
            let mut names = vec![first];
            names.extend(self.parse_multiple_names(TokenKind::Name)?);
            self.tb.expect(&[")"])?;
            return Ok(names.into_iter().map(TypeName::new).collect());
        }
        let name = self.parse_name(TokenKind::Name)?;
        Ok(vec![TypeName::new(name)])
    }

    fn parse_requirements(&mut self) -> ParseResult<Vec<Name>> {
        if !self.tb.accept(&["(", ":requirements"]) {
            return Ok(Vec::new());
        }
        let mut reqs = Vec::new();
        while self.tb.peek().kind == TokenKind::CategoryName {
            reqs.push(self.parse_name(TokenKind::CategoryName)?);
        }
        self.tb.expect(&[")"])?;
        Ok(reqs)
    }

    fn parse_types_def(&mut self) -> ParseResult<Vec<Type>> {
        if !self.tb.accept(&["(", ":types"]) {
            return Ok(Vec::new());
        }
        let entries = self.parse_typed_list(TokenKind::Name)?;
        self.tb.expect(&[")"])?;
        Ok(entries
            .into_iter()
            .map(|e| Type {
                name: e.name,
                id: None,
                parents: e.types,
                predecessors: Vec::new(),
                domain: Vec::new(),
            })
            .collect())
    }

    /// Shared shape for `(:constants ...)` and `(:objects ...)`.
    fn parse_typed_entries_block(&mut self, keyword: &str) -> ParseResult<Vec<TypedEntry>> {
        if !self.tb.accept(&["(", keyword]) {
            return Ok(Vec::new());
        }
        let entries = self.parse_typed_list(TokenKind::Name)?;
        self.tb.expect(&[")"])?;
        Ok(entries)
    }

    fn parse_predicates_def(&mut self) -> ParseResult<Vec<Predicate>> {
        if !self.tb.accept(&["(", ":predicates"]) {
            return Ok(Vec::new());
        }
        let mut preds = Vec::new();
        while self.tb.peek().kind == TokenKind::Open {
            preds.push(self.parse_atomic_pred()?);
        }
        self.tb.expect(&[")"])?;
        Ok(preds)
    }

    fn parse_atomic_pred(&mut self) -> ParseResult<Predicate> {
        self.tb.expect(&["("])?;
        let name = self.parse_name(TokenKind::Name)?;
        let params = self.parse_typed_list(TokenKind::VariableName)?;
        self.tb.expect(&[")"])?;
        Ok(Predicate { name, id: None, params, pos_effect: false, neg_effect: false })
    }

    fn parse_functions_def(&mut self) -> ParseResult<Vec<Function>> {
        if !self.tb.accept(&["(", ":functions"]) {
            return Ok(Vec::new());
        }
        let funcs = self.parse_function_typed_list()?;
        self.tb.expect(&[")"])?;
        Ok(funcs)
    }

    /// Repeats groups of atomic function declarations, each group closed
    /// off by an optional `- number` suffix applied to every function in
    /// that group.
    fn parse_function_typed_list(&mut self) -> ParseResult<Vec<Function>> {
        let mut all = Vec::new();
        loop {
            let mut group = Vec::new();
            while self.tb.peek().kind == TokenKind::Open {
                group.push(self.parse_atomic_func()?);
            }
            if group.is_empty() {
                break;
            }
            let result_type = self.parse_function_result_type()?;
            for f in group.iter_mut() {
                f.result_type = result_type.clone();
            }
            all.extend(group);
        }
        Ok(all)
    }

    fn parse_atomic_func(&mut self) -> ParseResult<Function> {
        self.tb.expect(&["("])?;
        let name = self.parse_name(TokenKind::Name)?;
        let params = self.parse_typed_list(TokenKind::VariableName)?;
        self.tb.expect(&[")"])?;
        Ok(Function { name, id: None, params, result_type: None })
    }

    fn parse_function_result_type(&mut self) -> ParseResult<Option<Name>> {
        if !self.tb.accept(&["-"]) {
            return Ok(None);
        }
        let loc = self.tb.location();
        self.tb.expect(&["number"])?;
        Ok(Some(Name::new("number", loc)))
    }

    // ── Actions ──────────────────────────────────────────────────────────

    fn parse_actions_def(&mut self) -> ParseResult<Vec<Action>> {
        let mut actions = Vec::new();
        while self.tb.peek().kind == TokenKind::Open {
            actions.push(self.parse_action_def()?);
        }
        Ok(actions)
    }

    /// `(:action NAME :parameters (typed-variable-list) :precondition GD?
    /// :effect EFFECT?)`. An empty `()` precondition or effect is legal and
    /// leaves the corresponding field `None`.
    fn parse_action_def(&mut self) -> ParseResult<Action> {
        self.tb.expect(&["(", ":action"])?;
        let name = self.parse_name(TokenKind::Name)?;
        let params = self.parse_action_params()?;

        let mut precondition = None;
        if self.tb.accept(&[":precondition"]) && !self.tb.accept(&["(", ")"]) {
            precondition = Some(self.parse_gd()?);
        }
        let mut effect = None;
        if self.tb.accept(&[":effect"]) && !self.tb.accept(&["(", ")"]) {
            effect = Some(self.parse_effect()?);
        }
        self.tb.expect(&[")"])?;
        Ok(Action { name, params, precondition, effect })
    }

    fn parse_action_params(&mut self) -> ParseResult<Vec<TypedEntry>> {
        self.tb.expect(&[":parameters", "("])?;
        let params = self.parse_typed_list(TokenKind::VariableName)?;
        self.tb.expect(&[")"])?;
        Ok(params)
    }

    // ── Terms, literals, function applications ──────────────────────────

    fn parse_terms(&mut self) -> ParseResult<Vec<Term>> {
        let mut terms = Vec::new();
        loop {
            let loc = self.tb.location();
            if let Some(tok) = self.tb.accept_kind(TokenKind::Name) {
                terms.push(Term::new(Name::new(tok.text, loc), false));
                continue;
            }
            if let Some(tok) = self.tb.accept_kind(TokenKind::VariableName) {
                terms.push(Term::new(Name::new(tok.text, loc), true));
                continue;
            }
            break;
        }
        Ok(terms)
    }

    fn parse_function_init(&mut self) -> ParseResult<FunctionInit> {
        let loc = self.tb.location();
        self.tb.expect(&["("])?;
        let name = self.parse_name(TokenKind::Name)?;
        let terms = self.parse_terms()?;
        self.tb.expect(&[")"])?;
        Ok(FunctionInit { location: loc, name, terms, definition: None })
    }

    /// `(= t t)`, or `((not) (PRED-NAME term*))`. The leading `(not` is
    /// handled here (rather than only at the GD-level `Not` dispatch)
    /// because p-effects and init elements reach literals directly,
    /// without going through [`Self::parse_gd`]'s own `(not GD)` branch.
    fn parse_literal(&mut self, is_effect: bool) -> ParseResult<Literal> {
        let loc = self.tb.location();
        let negative = self.tb.accept(&["(", "not"]);
        self.tb.expect(&["("])?;
        let predicate = if self.tb.accept(&["="]) {
            Name::new("=", loc.clone())
        } else {
            self.parse_name(TokenKind::Name)?
        };
        let terms = self.parse_terms()?;
        self.tb.expect(&[")"])?;
        if negative {
            self.tb.expect(&[")"])?;
        }
        Ok(Literal { location: loc, predicate, negative, terms, is_effect, definition: None })
    }

    /// The operator token of an [`Assign`]: `=`, `assign`, or `increase`.
    /// `=` is lexed as its own punctuation token, not a NAME, so it needs
    /// its own acceptance path here.
    fn parse_op_name(&mut self) -> ParseResult<Name> {
        let loc = self.tb.location();
        if let Some(tok) = self.tb.accept_kind(TokenKind::Equal) {
            return Ok(Name::new(tok.text, loc));
        }
        let tok = self.tb.expect_kind(TokenKind::Name)?;
        Ok(Name::new(tok.text, loc))
    }

    /// `(OP function-head value)` where OP is `=`, `assign`, or `increase`
    /// and value is a NUMBER or another function-head. Used for p-effects;
    /// `:init` numeric assignments are parsed directly in
    /// [`Self::parse_init_el`], which restricts the value to a NUMBER and
    /// fixes the operator to `=`.
    fn parse_assign(&mut self) -> ParseResult<Assign> {
        let loc = self.tb.location();
        self.tb.expect(&["("])?;
        let op = self.parse_op_name()?;
        let assigned_to = self.parse_function_init()?;
        let value = if let Some(tok) = self.tb.accept_kind(TokenKind::Number) {
            AssignValue::Number(tok.text)
        } else {
            AssignValue::Function(self.parse_function_init()?)
        };
        self.tb.expect(&[")"])?;
        Ok(Assign { location: loc, op, assigned_to, value, is_init: false })
    }

    // ── GD (goal description): preconditions and goals ──────────────────

    /// Dispatches on the token pair following `(`.
    /// `(not GD)` collapses into a negated [`Literal`] when its body is a
    /// literal, rather than staying a `Not` node. This is the
    /// double-negation law falling out of applying the rule twice.
    fn parse_gd(&mut self) -> ParseResult<Formula> {
        let loc = self.tb.location();
        if self.tb.accept(&["(", "and"]) {
            let items = self.parse_gd_star()?;
            self.tb.expect(&[")"])?;
            return Ok(Formula::And(MultiFormula { location: loc, items }));
        }
        if self.tb.accept(&["(", "or"]) {
            let items = self.parse_gd_star()?;
            self.tb.expect(&[")"])?;
            return Ok(Formula::Or(MultiFormula { location: loc, items }));
        }
        if self.tb.accept(&["(", "not"]) {
            let inner = self.parse_gd()?;
            self.tb.expect(&[")"])?;
            return Ok(match inner {
                Formula::Literal(mut lit) => {
                    lit.negative = !lit.negative;
                    Formula::Literal(lit)
                }
                other => Formula::Not(loc, Box::new(other)),
            });
        }
        if self.tb.accept(&["(", "imply"]) {
            let left = self.parse_gd()?;
            let right = self.parse_gd()?;
            self.tb.expect(&[")"])?;
            return Ok(Formula::Imply(loc, Box::new(left), Box::new(right)));
        }
        if self.tb.accept(&["(", "exists"]) {
            let variables = self.parse_quant_variables()?;
            let body = self.parse_gd()?;
            self.tb.expect(&[")"])?;
            return Ok(Formula::Exists(Quantifier {
                location: loc,
                variables,
                body: Box::new(body),
                is_effect: false,
            }));
        }
        if self.tb.accept(&["(", "forall"]) {
            let variables = self.parse_quant_variables()?;
            let body = self.parse_gd()?;
            self.tb.expect(&[")"])?;
            return Ok(Formula::ForAll(Quantifier {
                location: loc,
                variables,
                body: Box::new(body),
                is_effect: false,
            }));
        }
        Ok(Formula::Literal(self.parse_literal(false)?))
    }

    fn parse_gd_star(&mut self) -> ParseResult<Vec<Formula>> {
        let mut items = Vec::new();
        while self.tb.peek().kind == TokenKind::Open {
            items.push(self.parse_gd()?);
        }
        Ok(items)
    }

    fn parse_quant_variables(&mut self) -> ParseResult<Vec<TypedEntry>> {
        self.tb.expect(&["("])?;
        let vars = self.parse_typed_list(TokenKind::VariableName)?;
        self.tb.expect(&[")"])?;
        Ok(vars)
    }

    // ── EFFECT ───────────────────────────────────────────────────────────

    /// Dispatches on the token pair following `(`. Unlike
    /// [`Self::parse_gd`], `forall` here marks its quantifier as an effect
    /// quantifier and there is no `Not`/`Or`/`Imply`/`Exists` in this
    /// grammar. Negation only ever appears on a leaf p-effect literal.
    fn parse_effect(&mut self) -> ParseResult<Formula> {
        let loc = self.tb.location();
        if self.tb.accept(&["(", "and"]) {
            let items = self.parse_effect_star()?;
            self.tb.expect(&[")"])?;
            return Ok(Formula::And(MultiFormula { location: loc, items }));
        }
        if self.tb.accept(&["(", "forall"]) {
            let variables = self.parse_quant_variables()?;
            let body = self.parse_effect()?;
            self.tb.expect(&[")"])?;
            return Ok(Formula::ForAll(Quantifier {
                location: loc,
                variables,
                body: Box::new(body),
                is_effect: true,
            }));
        }
        if self.tb.accept(&["(", "when"]) {
            let condition = self.parse_gd()?;
            let effect = self.parse_effect()?;
            self.tb.expect(&[")"])?;
            return Ok(Formula::When(When {
                location: loc,
                condition: Box::new(condition),
                effect: Box::new(effect),
            }));
        }
        self.parse_p_effect()
    }

    fn parse_effect_star(&mut self) -> ParseResult<Vec<Formula>> {
        let mut items = Vec::new();
        while self.tb.peek().kind == TokenKind::Open {
            items.push(self.parse_effect()?);
        }
        Ok(items)
    }

    /// A p-effect is either an [`Assign`] (`=`/`assign`/`increase`) or a
    /// possibly-negated literal flagged `is_effect = true`.
    fn parse_p_effect(&mut self) -> ParseResult<Formula> {
        if matches!(self.tb.peek_nth(2).text.as_str(), "=" | "assign" | "increase") {
            return Ok(Formula::Assign(self.parse_assign()?));
        }
        Ok(Formula::Literal(self.parse_literal(true)?))
    }

    // ── Problem-specific productions ────────────────────────────────────

    fn parse_init(&mut self) -> ParseResult<Vec<Formula>> {
        self.tb.expect(&["(", ":init"])?;
        let mut elements = Vec::new();
        while self.tb.peek().kind == TokenKind::Open {
            elements.push(self.parse_init_el()?);
        }
        self.tb.expect(&[")"])?;
        Ok(elements)
    }

    /// `(= function-head NUMBER)` or a literal. Disambiguated from the
    /// equality literal `(= t t)` by looking one token past the `=`: a
    /// function-head starts with `(`, a bare term never does.
    fn parse_init_el(&mut self) -> ParseResult<Formula> {
        let loc = self.tb.location();
        if self.tb.accept(&["(", "="]) {
            if self.tb.peek().kind == TokenKind::Open {
                let assigned_to = self.parse_function_init()?;
                let value = self.tb.expect_kind(TokenKind::Number)?;
                self.tb.expect(&[")"])?;
                return Ok(Formula::Assign(Assign {
                    location: loc.clone(),
                    op: Name::new("=", loc),
                    assigned_to,
                    value: AssignValue::Number(value.text),
                    is_init: true,
                }));
            }
            let terms = self.parse_terms()?;
            self.tb.expect(&[")"])?;
            return Ok(Formula::Literal(Literal {
                location: loc.clone(),
                predicate: Name::new("=", loc),
                negative: false,
                terms,
                is_effect: false,
                definition: None,
            }));
        }
        Ok(Formula::Literal(self.parse_literal(false)?))
    }

    fn parse_goal(&mut self) -> ParseResult<Formula> {
        self.tb.expect(&["(", ":goal"])?;
        let goal = self.parse_gd()?;
        self.tb.expect(&[")"])?;
        Ok(goal)
    }
}

/// Convenience entry point: parse a whole domain file.
pub fn parse_domain(path: impl Into<String>, source: &str) -> ParseResult<Domain> {
    Parser::new(path, source).parse_domain()
}

/// Convenience entry point: parse a whole problem file.
pub fn parse_problem(path: impl Into<String>, source: &str) -> ParseResult<Problem> {
    Parser::new(path, source).parse_problem()
}
