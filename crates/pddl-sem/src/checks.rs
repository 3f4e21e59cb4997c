//! The six analysis passes: requirements closure, types, constants/objects,
//! predicates, functions, and actions/formulae, plus the problem-level
//! pass that reuses the domain's symbol tables for init/goal checking.
//!
//! Every pass only ever *sets* resolution fields the parser left `None` (or
//! appends to a `domain` list); it never rewrites the AST's shape, so
//! running a pass twice over the same nodes is idempotent.

use rustc_hash::{FxHashMap, FxHashSet};

use pddl_common::{Diagnostic, Location, Name};
use pddl_parser::{
    Action, Assign, AssignValue, ConstRef, Domain, Formula, Function, FunctionId, FunctionInit,
    Literal, Predicate, PredicateId, Problem, Quantifier, Term, TermDef, Type, TypeId, TypeName,
    TypedEntry, VariableRef, When,
};

use crate::requirements;
use crate::scope::VarScope;

const OBJECT_TYPE: &str = "object";

/// The namespaces accumulated while walking a domain, extended with a
/// problem's objects and requirements when one is paired with it.
struct Defs {
    reqs: FxHashSet<String>,
    types: FxHashMap<String, TypeId>,
    consts: FxHashMap<String, ConstRef>,
    const_types: FxHashMap<String, Vec<TypeId>>,
    preds: FxHashMap<String, PredicateId>,
    funcs: FxHashMap<String, FunctionId>,
    vars: VarScope,
}

impl Defs {
    fn new() -> Self {
        Self {
            reqs: FxHashSet::default(),
            types: FxHashMap::default(),
            consts: FxHashMap::default(),
            const_types: FxHashMap::default(),
            preds: FxHashMap::default(),
            funcs: FxHashMap::default(),
            vars: VarScope::new(),
        }
    }

    fn has(&self, req: &str) -> bool {
        self.reqs.contains(req)
    }
}

/// Check a domain in isolation, returning its diagnostics.
pub fn check_domain(domain: &mut Domain) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    check_domain_inner(domain, &mut diags);
    diags
}

/// Check a domain and its paired problem together. Equivalent to
/// [`check_domain`] when `problem` is `None`.
pub fn check(domain: &mut Domain, problem: Option<&mut Problem>) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    let mut defs = check_domain_inner(domain, &mut diags);

    let Some(problem) = problem else { return diags };

    if problem.domain.key() != domain.name.key() {
        diags.push(Diagnostic::new(
            problem.name.location.clone(),
            format!(
                "problem {} expects domain {}, but got {}",
                problem.name, problem.domain, domain.name
            ),
        ));
    }
    check_requirements(&mut defs, &problem.requirements, &mut diags);
    check_consts_def(
        &mut defs,
        &mut domain.types,
        &mut problem.objects,
        ConstRef::Object,
        &mut diags,
    );
    for formula in problem.init.iter_mut() {
        check_formula(&mut defs, domain, formula, &mut diags);
    }
    check_formula(&mut defs, domain, &mut problem.goal, &mut diags);

    diags
}

fn check_domain_inner(domain: &mut Domain, diags: &mut Vec<Diagnostic>) -> Defs {
    let mut defs = Defs::new();
    check_requirements(&mut defs, &domain.requirements, diags);
    check_types_def(&mut defs, domain, diags);
    check_consts_def(
        &mut defs,
        &mut domain.types,
        &mut domain.constants,
        ConstRef::Constant,
        diags,
    );
    check_preds_def(&mut defs, domain, diags);
    check_funcs_def(&mut defs, &mut domain.functions, diags);

    let mut actions = std::mem::take(&mut domain.actions);
    for action in actions.iter_mut() {
        check_action_def(&mut defs, domain, action, diags);
    }
    domain.actions = actions;

    defs
}

// ── Pass 1: requirements closure ────────────────────────────────────────

fn check_requirements(defs: &mut Defs, reqs: &[Name], diags: &mut Vec<Diagnostic>) {
    for r in reqs {
        let key = r.key();
        if !requirements::is_known(&key) {
            diags.push(Diagnostic::new(
                r.location.clone(),
                format!("requirement {r} is not supported"),
            ));
            continue;
        }
        if !defs.reqs.insert(key) {
            diags.push(multiple_defs(r, "requirement"));
        }
    }
    apply_implications(defs);
}

fn apply_implications(defs: &mut Defs) {
    // A single pass suffices: neither `:adl` nor `:quantified-preconditions`
    // appears in the other's implication set.
    for base in [":adl", ":quantified-preconditions"] {
        if defs.reqs.contains(base) {
            for implied in requirements::implications(base) {
                defs.reqs.insert(implied.to_string());
            }
        }
    }
}

// ── Pass 2: types ────────────────────────────────────────────────────────

fn check_types_def(defs: &mut Defs, domain: &mut Domain, diags: &mut Vec<Diagnostic>) {
    if !domain.types.is_empty() && !defs.has(":typing") {
        diags.push(Diagnostic::missing_requirement(
            domain.types[0].name.location.clone(),
            ":types",
            ":typing",
        ));
    }

    if !domain.types.iter().any(|t| t.name.key() == OBJECT_TYPE) {
        let path = domain.name.location.path.clone();
        domain.types.push(Type {
            name: Name::new(OBJECT_TYPE, Location::synthetic(path)),
            id: None,
            parents: Vec::new(),
            predecessors: Vec::new(),
            domain: Vec::new(),
        });
    }

    for (i, t) in domain.types.iter_mut().enumerate() {
        t.id = Some(i);
        if t.parents.len() > 1 {
            diags.push(Diagnostic::new(
                t.name.location.clone(),
                "either super types are not semantically defined",
            ));
            continue;
        }
        if defs.types.contains_key(&t.name.key()) {
            diags.push(multiple_defs(&t.name, "type"));
            continue;
        }
        defs.types.insert(t.name.key(), i);
    }

    for t in domain.types.iter_mut() {
        check_type_names(defs, &mut t.parents, diags);
    }

    let predecessors = compute_predecessors(&domain.types);
    for (t, preds) in domain.types.iter_mut().zip(predecessors) {
        t.predecessors = preds;
    }
}

fn compute_predecessors(types: &[Type]) -> Vec<Vec<TypeId>> {
    let object_id = types
        .iter()
        .position(|t| t.name.key() == OBJECT_TYPE)
        .expect("object type is always injected before predecessors are computed");

    types
        .iter()
        .map(|t| {
            let mut seen = vec![false; types.len()];
            let mut stack = vec![t.id.expect("type id assigned before predecessor computation")];
            let mut preds = Vec::new();
            while let Some(id) = stack.pop() {
                if seen[id] {
                    continue;
                }
                seen[id] = true;
                preds.push(id);
                for parent in &types[id].parents {
                    if let Some(pid) = parent.definition {
                        stack.push(pid);
                    }
                }
            }
            if !seen[object_id] {
                preds.push(object_id);
            }
            preds
        })
        .collect()
}

fn check_type_names(defs: &Defs, names: &mut [TypeName], diags: &mut Vec<Diagnostic>) {
    if !names.is_empty() && !defs.has(":typing") {
        diags.push(Diagnostic::missing_requirement(
            names[0].name.location.clone(),
            "types",
            ":typing",
        ));
    }
    for t in names.iter_mut() {
        match defs.types.get(&t.name.key()) {
            Some(&id) => t.definition = Some(id),
            None => diags.push(undefined(&t.name, "type")),
        }
    }
}

// ── Pass 3: constants / objects ─────────────────────────────────────────

fn check_consts_def(
    defs: &mut Defs,
    types: &mut [Type],
    entries: &mut [TypedEntry],
    make_ref: impl Fn(usize) -> ConstRef,
    diags: &mut Vec<Diagnostic>,
) {
    for (i, e) in entries.iter_mut().enumerate() {
        let key = e.name.key();
        if defs.consts.contains_key(&key) {
            diags.push(multiple_defs(&e.name, "object"));
            continue;
        }
        e.id = Some(i as u32);
        defs.consts.insert(key, make_ref(i));
    }

    check_typed_entries(defs, entries, diags);

    for e in entries.iter() {
        let cref = match defs.consts.get(&e.name.key()) {
            Some(&cref) => cref,
            None => continue,
        };
        defs.const_types.insert(
            e.name.key(),
            e.types.iter().filter_map(|t| t.definition).collect(),
        );
        for t in &e.types {
            let Some(tid) = t.definition else { continue };
            for pred in types[tid].predecessors.clone() {
                add_to_domain(&mut types[pred], cref);
            }
        }
    }
}

fn add_to_domain(t: &mut Type, cref: ConstRef) {
    if !t.domain.contains(&cref) {
        t.domain.push(cref);
    }
}

fn check_typed_entries(defs: &Defs, entries: &mut [TypedEntry], diags: &mut Vec<Diagnostic>) {
    for e in entries.iter_mut() {
        check_type_names(defs, &mut e.types, diags);
        if e.types.is_empty() {
            let object_id = defs.types.get(OBJECT_TYPE).copied();
            e.types.push(TypeName {
                name: Name::new(OBJECT_TYPE, e.name.location.clone()),
                definition: object_id,
            });
        }
    }
}

fn check_duplicate_params(params: &[TypedEntry], diags: &mut Vec<Diagnostic>) {
    let mut seen = FxHashSet::default();
    for p in params {
        if !seen.insert(p.name.key()) {
            diags.push(multiple_defs(&p.name, "parameter"));
        }
    }
}

// ── Pass 4: predicates ──────────────────────────────────────────────────

fn check_preds_def(defs: &mut Defs, domain: &mut Domain, diags: &mut Vec<Diagnostic>) {
    if defs.has(":equality") && !domain.predicates.iter().any(|p| p.name.key() == "=") {
        let path = domain.name.location.path.clone();
        domain.predicates.push(Predicate {
            name: Name::new("=", Location::synthetic(path.clone())),
            id: None,
            params: vec![
                TypedEntry {
                    name: Name::new("?x", Location::synthetic(path.clone())),
                    id: None,
                    types: Vec::new(),
                },
                TypedEntry {
                    name: Name::new("?y", Location::synthetic(path)),
                    id: None,
                    types: Vec::new(),
                },
            ],
            pos_effect: false,
            neg_effect: false,
        });
    }

    for i in 0..domain.predicates.len() {
        let key = domain.predicates[i].name.key();
        if defs.preds.contains_key(&key) {
            diags.push(multiple_defs(&domain.predicates[i].name, "predicate"));
            continue;
        }
        check_typed_entries(defs, &mut domain.predicates[i].params, diags);
        check_duplicate_params(&domain.predicates[i].params, diags);
        domain.predicates[i].id = Some(i);
        defs.preds.insert(key, i);
    }
}

// ── Pass 5: functions ────────────────────────────────────────────────────

fn check_funcs_def(defs: &mut Defs, functions: &mut [Function], diags: &mut Vec<Diagnostic>) {
    if !functions.is_empty() && !defs.has(":action-costs") {
        diags.push(Diagnostic::missing_requirement(
            functions[0].name.location.clone(),
            ":functions",
            ":action-costs",
        ));
    }
    for i in 0..functions.len() {
        let key = functions[i].name.key();
        if defs.funcs.contains_key(&key) {
            diags.push(multiple_defs(&functions[i].name, "function"));
            continue;
        }
        check_typed_entries(defs, &mut functions[i].params, diags);
        check_duplicate_params(&functions[i].params, diags);
        functions[i].id = Some(i);
        defs.funcs.insert(key, i);
    }
}

// ── Pass 6: actions and formulae ─────────────────────────────────────────

fn check_action_def(defs: &mut Defs, domain: &mut Domain, action: &mut Action, diags: &mut Vec<Diagnostic>) {
    check_typed_entries(defs, &mut action.params, diags);
    check_duplicate_params(&action.params, diags);

    let pushed = push_vars(defs, &action.params);
    if let Some(pre) = &mut action.precondition {
        check_formula(defs, domain, pre, diags);
    }
    if let Some(eff) = &mut action.effect {
        check_formula(defs, domain, eff, diags);
    }
    pop_vars(defs, pushed);
}

fn push_vars(defs: &mut Defs, entries: &[TypedEntry]) -> usize {
    for e in entries {
        let types = e.types.iter().filter_map(|t| t.definition).collect();
        defs.vars.push(e.name.key(), VariableRef { types });
    }
    entries.len()
}

fn pop_vars(defs: &mut Defs, n: usize) {
    for _ in 0..n {
        defs.vars.pop();
    }
}

fn check_formula(defs: &mut Defs, domain: &mut Domain, f: &mut Formula, diags: &mut Vec<Diagnostic>) {
    match f {
        Formula::Literal(lit) => check_literal(defs, domain, lit, diags),
        Formula::And(m) => {
            for item in m.items.iter_mut() {
                check_formula(defs, domain, item, diags);
            }
        }
        Formula::Or(m) => {
            if !defs.has(":disjunctive-preconditions") {
                diags.push(Diagnostic::missing_requirement(
                    m.location.clone(),
                    "or",
                    ":disjunctive-preconditions",
                ));
            }
            for item in m.items.iter_mut() {
                check_formula(defs, domain, item, diags);
            }
        }
        Formula::Not(_, inner) => check_formula(defs, domain, inner, diags),
        Formula::Imply(loc, left, right) => {
            if !defs.has(":disjunctive-preconditions") {
                diags.push(Diagnostic::missing_requirement(
                    loc.clone(),
                    "imply",
                    ":disjunctive-preconditions",
                ));
            }
            check_formula(defs, domain, left, diags);
            check_formula(defs, domain, right, diags);
        }
        Formula::ForAll(q) => {
            let req = if q.is_effect { ":conditional-effects" } else { ":universal-preconditions" };
            if !defs.has(req) {
                diags.push(Diagnostic::missing_requirement(q.location.clone(), "forall", req));
            }
            check_quantifier(defs, domain, q, diags);
        }
        Formula::Exists(q) => {
            if !defs.has(":existential-preconditions") {
                diags.push(Diagnostic::missing_requirement(
                    q.location.clone(),
                    "exists",
                    ":existential-preconditions",
                ));
            }
            check_quantifier(defs, domain, q, diags);
        }
        Formula::When(w) => check_when(defs, domain, w, diags),
        Formula::Assign(a) => check_assign(defs, domain, a, diags),
    }
}

fn check_quantifier(defs: &mut Defs, domain: &mut Domain, q: &mut Quantifier, diags: &mut Vec<Diagnostic>) {
    check_typed_entries(defs, &mut q.variables, diags);
    check_duplicate_params(&q.variables, diags);
    let pushed = push_vars(defs, &q.variables);
    check_formula(defs, domain, &mut q.body, diags);
    pop_vars(defs, pushed);
}

fn check_when(defs: &mut Defs, domain: &mut Domain, w: &mut When, diags: &mut Vec<Diagnostic>) {
    if !defs.has(":conditional-effects") {
        diags.push(Diagnostic::missing_requirement(
            w.location.clone(),
            "when",
            ":conditional-effects",
        ));
    }
    check_formula(defs, domain, &mut w.condition, diags);
    check_formula(defs, domain, &mut w.effect, diags);
}

fn check_literal(defs: &mut Defs, domain: &mut Domain, lit: &mut Literal, diags: &mut Vec<Diagnostic>) {
    let pid = match defs.preds.get(&lit.predicate.key()).copied() {
        Some(id) => id,
        None => {
            diags.push(undefined(&lit.predicate, "predicate"));
            return;
        }
    };
    lit.definition = Some(pid);
    if lit.is_effect {
        if lit.negative {
            domain.predicates[pid].neg_effect = true;
        } else {
            domain.predicates[pid].pos_effect = true;
        }
    }
    let params = domain.predicates[pid].params.clone();
    check_inst(defs, domain, &lit.predicate, &mut lit.terms, &params, diags);
}

/// Resolves each term and checks arity/type compatibility against `params`.
/// Shared by predicate literals and function applications.
fn check_inst(
    defs: &mut Defs,
    domain: &Domain,
    name: &Name,
    args: &mut [Term],
    params: &[TypedEntry],
    diags: &mut Vec<Diagnostic>,
) {
    if args.len() != params.len() {
        let noun = if params.len() == 1 { "argument" } else { "arguments" };
        diags.push(Diagnostic::new(
            name.location.clone(),
            format!("{name} requires {} {noun}", params.len()),
        ));
    }

    let count = args.len().min(params.len());
    for i in 0..count {
        let key = args[i].name.key();
        let arg_types: Vec<TypeId>;
        if args[i].is_variable {
            match defs.vars.find(&key) {
                Some(v) => {
                    arg_types = v.types.clone();
                    args[i].definition = Some(TermDef::Variable(VariableRef { types: arg_types.clone() }));
                }
                None => {
                    diags.push(undefined(&args[i].name, "variable"));
                    continue;
                }
            }
        } else {
            match defs.consts.get(&key).copied() {
                Some(cref) => {
                    arg_types = defs.const_types.get(&key).cloned().unwrap_or_default();
                    args[i].definition = Some(TermDef::Constant(cref));
                }
                None => {
                    diags.push(undefined(&args[i].name, "constant"));
                    continue;
                }
            }
        }
        if !compat_types(&params[i].types, &arg_types, &domain.types) {
            diags.push(Diagnostic::new(
                args[i].name.location.clone(),
                format!("{} is incompatible with parameter {} of {name}", args[i].name, params[i].name),
            ));
        }
    }
}

/// At least one parameter predecessor must appear among each argument
/// type's predecessors. An unresolved parameter type is accepted
/// permissively (its compatibility could not be determined, which already
/// produced an "undefined type" diagnostic elsewhere).
fn compat_types(params: &[TypeName], arg_type_ids: &[TypeId], types: &[Type]) -> bool {
    for &r in arg_type_ids {
        let r_predecessors = &types[r].predecessors;
        let mut ok = false;
        for l in params {
            match l.definition {
                None => return true,
                Some(l_def) => {
                    if r_predecessors.contains(&l_def) {
                        ok = true;
                        break;
                    }
                }
            }
        }
        if !ok {
            return false;
        }
    }
    true
}

fn check_function_init(defs: &mut Defs, domain: &Domain, fi: &mut FunctionInit, diags: &mut Vec<Diagnostic>) {
    let fid = match defs.funcs.get(&fi.name.key()).copied() {
        Some(id) => id,
        None => {
            diags.push(undefined(&fi.name, "function"));
            return;
        }
    };
    fi.definition = Some(fid);
    let params = domain.functions[fid].params.clone();
    check_inst(defs, domain, &fi.name, &mut fi.terms, &params, diags);
}

fn check_assign(defs: &mut Defs, domain: &mut Domain, a: &mut Assign, diags: &mut Vec<Diagnostic>) {
    if !defs.has(":action-costs") {
        diags.push(Diagnostic::missing_requirement(a.location.clone(), &a.op, ":action-costs"));
    }
    check_function_init(defs, domain, &mut a.assigned_to, diags);
    match &mut a.value {
        AssignValue::Number(n) => {
            if is_negative(n) {
                diags.push(Diagnostic::new(
                    a.location.clone(),
                    "assigned value must not be negative with :action-costs",
                ));
            }
        }
        AssignValue::Function(fi) => check_function_init(defs, domain, fi, diags),
    }

    if !a.is_init {
        if let Some(fid) = a.assigned_to.definition {
            if !domain.functions[fid].is_total_cost() {
                diags.push(Diagnostic::new(
                    a.assigned_to.location.clone(),
                    "assignment target must be a 0-ary total-cost function with :action-costs",
                ));
            }
        }
        if let AssignValue::Function(fi) = &a.value {
            if let Some(fid) = fi.definition {
                if domain.functions[fid].is_total_cost() {
                    diags.push(Diagnostic::new(
                        fi.location.clone(),
                        "assigned value must not be total-cost with :action-costs",
                    ));
                }
            }
        }
    }
}

/// PDDL's sign-parity rule: each leading `-` toggles the sign, so `--5` is
/// positive and `---5` is negative.
fn is_negative(n: &str) -> bool {
    let mut neg = false;
    for c in n.chars() {
        if c != '-' {
            break;
        }
        neg = !neg;
    }
    neg
}

fn undefined(name: &Name, kind: &str) -> Diagnostic {
    Diagnostic::new(name.location.clone(), format!("undefined {kind} {name}"))
}

fn multiple_defs(name: &Name, kind: &str) -> Diagnostic {
    Diagnostic::new(name.location.clone(), format!("{kind} {name} defined multiple times"))
}
