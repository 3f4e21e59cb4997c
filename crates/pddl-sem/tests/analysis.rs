use pddl_parser::{parse_domain, parse_problem, Formula};
use pddl_sem::{check, check_domain};

#[test]
fn minimal_domain_synthesizes_object_with_no_diagnostics() {
    let mut d = parse_domain("d.pddl", "(define (domain d))").unwrap();
    let diags = check_domain(&mut d);
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(d.types.len(), 1);
    assert_eq!(d.types[0].name.text, "object");
    assert!(d.types[0].name.location.is_synthetic());
    assert_eq!(d.types[0].predecessors, vec![0]);
}

#[test]
fn types_without_typing_is_diagnosed() {
    let mut d = parse_domain("d.pddl", "(define (domain d) (:types block))").unwrap();
    let diags = check_domain(&mut d);
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains(":types requires :typing"));
}

#[test]
fn equality_is_synthesized_under_equality_requirement() {
    let mut d = parse_domain(
        "d.pddl",
        "(define (domain d) (:requirements :equality))",
    )
    .unwrap();
    let diags = check_domain(&mut d);
    assert!(diags.is_empty(), "{diags:?}");
    let eq = d.predicates.iter().find(|p| p.name.text == "=").unwrap();
    assert_eq!(eq.params.len(), 2);
    assert!(eq.name.location.is_synthetic());
}

#[test]
fn arity_mismatch_is_diagnosed() {
    let src = "(define (domain d)
      (:predicates (on ?a ?b))
      (:action a :parameters (?x) :precondition (on ?x)))";
    let mut d = parse_domain("d.pddl", src).unwrap();
    let diags = check_domain(&mut d);
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("on requires 2 arguments"), "{diags:?}");
}

#[test]
fn adl_expands_to_the_full_requirement_set() {
    let mut d = parse_domain("d.pddl", "(define (domain d) (:requirements :adl))").unwrap();
    let diags = check_domain(&mut d);
    assert!(diags.is_empty(), "{diags:?}");
    // Re-parse with each implied requirement individually used, to confirm
    // none of them trip a missing-requirement diagnostic.
    let src = "(define (domain d) (:requirements :adl)
      (:types block)
      (:predicates (p ?a - block) (q ?a))
      (:action a :parameters (?x - block)
        :precondition (and (not (p ?x)) (or (q ?x) (exists (?y - block) (p ?y))))
        :effect (forall (?z - block) (when (q ?z) (p ?z)))))";
    let mut d = parse_domain("d.pddl", src).unwrap();
    let diags = check_domain(&mut d);
    assert!(diags.is_empty(), "{diags:?}");
}

#[test]
fn subtype_is_compatible_with_ancestor_parameter() {
    let src = "(define (domain d)
      (:requirements :typing)
      (:types block - physobj physobj)
      (:constants b - block)
      (:predicates (heavy ?p - physobj))
      (:action noop :parameters () :precondition (heavy b)))";
    let mut d = parse_domain("d.pddl", src).unwrap();
    let diags = check_domain(&mut d);
    assert!(diags.is_empty(), "{diags:?}");
}

#[test]
fn incompatible_type_is_diagnosed() {
    let src = "(define (domain d)
      (:requirements :typing)
      (:types block table)
      (:constants t - table)
      (:predicates (heavy ?p - block))
      (:action noop :parameters () :precondition (heavy t)))";
    let mut d = parse_domain("d.pddl", src).unwrap();
    let diags = check_domain(&mut d);
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("incompatible"), "{diags:?}");
}

#[test]
fn multi_parent_type_is_rejected() {
    let src = "(define (domain d) (:requirements :typing)
      (:types c - (either a b) a b))";
    let mut d = parse_domain("d.pddl", src).unwrap();
    let diags = check_domain(&mut d);
    assert!(diags.iter().any(|d| d.message.contains("either super types")));
}

#[test]
fn undefined_predicate_is_diagnosed() {
    let src = "(define (domain d)
      (:action a :parameters () :precondition (missing)))";
    let mut d = parse_domain("d.pddl", src).unwrap();
    let diags = check_domain(&mut d);
    assert!(diags.iter().any(|d| d.message.contains("undefined predicate missing")));
}

#[test]
fn action_costs_rejects_negative_and_non_total_cost_target() {
    let src = "(define (domain d) (:requirements :action-costs)
      (:functions (total-cost) (distance) - number)
      (:action a :parameters ()
        :effect (and (increase (total-cost) -5) (increase (distance) 1))))";
    let mut d = parse_domain("d.pddl", src).unwrap();
    let diags = check_domain(&mut d);
    assert!(diags.iter().any(|d| d.message.contains("must not be negative")), "{diags:?}");
    assert!(diags.iter().any(|d| d.message.contains("must be a 0-ary total-cost")), "{diags:?}");
}

#[test]
fn variable_scope_depth_is_restored_after_each_action() {
    let src = "(define (domain d) (:requirements :typing :existential-preconditions)
      (:types block)
      (:predicates (p ?a - block))
      (:action a :parameters (?x - block) :precondition (exists (?y - block) (p ?y))))";
    let mut d = parse_domain("d.pddl", src).unwrap();
    // Checked twice: analysis must be idempotent, producing the same
    // diagnostics and resolution on a second run over the same AST.
    let first = check_domain(&mut d);
    let second = check_domain(&mut d);
    assert_eq!(first, second);
}

#[test]
fn problem_domain_name_mismatch_is_diagnosed() {
    let mut d = parse_domain("d.pddl", "(define (domain d))").unwrap();
    let mut p = parse_problem(
        "p.pddl",
        "(define (problem p) (:domain other) (:init) (:goal (and)))",
    )
    .unwrap();
    let diags = check(&mut d, Some(&mut p));
    assert!(diags.iter().any(|d| d.message.contains("expects domain other, but got d")));
}

#[test]
fn problem_init_and_goal_resolve_against_domain_symbols() {
    let mut d = parse_domain(
        "d.pddl",
        "(define (domain d) (:requirements :typing)
           (:types block)
           (:constants b - block)
           (:predicates (on ?a - block ?b - block)))",
    )
    .unwrap();
    let mut p = parse_problem(
        "p.pddl",
        "(define (problem p) (:domain d)
           (:objects c - block)
           (:init (on b c))
           (:goal (on c b)))",
    )
    .unwrap();
    let diags = check(&mut d, Some(&mut p));
    assert!(diags.is_empty(), "{diags:?}");
    match &p.init[0] {
        Formula::Literal(lit) => assert!(lit.definition.is_some()),
        other => panic!("expected literal, got {other:?}"),
    }
}

#[test]
fn action_costs_effect_requires_the_requirement() {
    let src = "(define (domain d)
      (:functions (total-cost) - number)
      (:action a :parameters () :effect (increase (total-cost) 1)))";
    let mut d = parse_domain("d.pddl", src).unwrap();
    let diags = check_domain(&mut d);
    assert!(diags.iter().any(|d| d.message.contains(":functions requires :action-costs")));
    assert!(diags.iter().any(|d| d.message.contains("requires :action-costs")));
}
