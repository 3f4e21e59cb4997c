//! End-to-end integration tests for the `pddlc` driver.
//!
//! Each test writes a domain/problem pair to a temp directory, invokes the
//! compiled `pddlc` binary, and asserts on its exit code and stderr/stdout.

use std::path::Path;
use std::process::{Command, Output};

fn pddlc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pddlc"))
}

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("failed to write fixture");
    path
}

fn run(domain: &str, problem: &str) -> Output {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let domain_path = write(dir.path(), "domain.pddl", domain);
    let problem_path = write(dir.path(), "problem.pddl", problem);
    pddlc()
        .args([&domain_path, &problem_path])
        .output()
        .expect("failed to invoke pddlc")
}

const BLOCKS_DOMAIN: &str = "(define (domain blocks)
  (:requirements :strips :typing)
  (:types block)
  (:predicates
    (on ?a - block ?b - block)
    (clear ?a - block)
    (on-table ?a - block))
  (:action stack
    :parameters (?a - block ?b - block)
    :precondition (and (clear ?a) (clear ?b))
    :effect (and (on ?a ?b) (not (clear ?b)))))";

const BLOCKS_PROBLEM: &str = "(define (problem blocks-1)
  (:domain blocks)
  (:objects a b - block)
  (:init (clear a) (clear b) (on-table a) (on-table b))
  (:goal (on a b)))";

#[test]
fn valid_domain_and_problem_exit_zero_with_no_output() {
    let out = run(BLOCKS_DOMAIN, BLOCKS_PROBLEM);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(out.stderr.is_empty());
}

#[test]
fn syntax_error_reports_location_and_exits_nonzero() {
    let out = run("(define (domain d)", BLOCKS_PROBLEM);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("domain.pddl:1:"), "stderr: {stderr}");
}

#[test]
fn undefined_predicate_is_reported_with_domain_path() {
    let domain = "(define (domain d)
      (:action a :parameters () :precondition (missing)))";
    let problem = "(define (problem p) (:domain d) (:init) (:goal (and)))";
    let out = run(domain, problem);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("undefined predicate missing"), "stderr: {stderr}");
}

#[test]
fn types_without_typing_requirement_is_reported() {
    let domain = "(define (domain d) (:types block))";
    let problem = "(define (problem p) (:domain d) (:init) (:goal (and)))";
    let out = run(domain, problem);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains(":types requires :typing"), "stderr: {stderr}");
}

#[test]
fn mismatched_problem_domain_name_is_reported() {
    let problem = "(define (problem p) (:domain other) (:init) (:goal (and)))";
    let out = run("(define (domain blocks))", problem);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("expects domain other, but got blocks"), "stderr: {stderr}");
}

#[test]
fn print_pddl_round_trips_a_minimal_domain_and_problem() {
    let dir = tempfile::tempdir().unwrap();
    let domain_path = write(dir.path(), "domain.pddl", "(define (domain d))");
    let problem_path = write(
        dir.path(),
        "problem.pddl",
        "(define (problem p) (:domain d) (:init) (:goal (and)))",
    );
    let out = pddlc()
        .args([&domain_path, &problem_path, &std::path::PathBuf::from("--print-pddl")])
        .output()
        .expect("failed to invoke pddlc");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("(define (domain d))"));
    assert!(stdout.contains("(define (problem p)"));
}

#[test]
fn missing_domain_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nonexistent.pddl");
    let problem_path = write(dir.path(), "problem.pddl", BLOCKS_PROBLEM);
    let out = pddlc()
        .args([&missing, &problem_path])
        .output()
        .expect("failed to invoke pddlc");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("failed to read"), "stderr: {stderr}");
}

#[test]
fn action_costs_example_passes_checks() {
    let domain = "(define (domain costs)
      (:requirements :strips :typing :action-costs)
      (:types block)
      (:predicates (on ?a - block ?b - block))
      (:functions (total-cost) - number)
      (:action move
        :parameters (?a - block ?b - block)
        :precondition ()
        :effect (and (on ?a ?b) (increase (total-cost) 1))))";
    let problem = "(define (problem costs-1)
      (:domain costs)
      (:objects a b - block)
      (:init (= (total-cost) 0))
      (:goal (on a b)))";
    let out = run(domain, problem);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
}
