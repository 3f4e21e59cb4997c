//! The PDDL front-end driver.
//!
//! Reads a domain file and a problem file, parses and semantically checks
//! them, and reports diagnostics in the `"<path>:<line>: <message>"` format.
//! Everything below this thin CLI (lexing, parsing, and analysis) lives
//! in `pddl-lexer`/`pddl-parser`/`pddl-sem`; this crate only owns file I/O,
//! argument parsing, and diagnostic printing.

use std::path::PathBuf;
use std::process;

use clap::Parser as ClapParser;

use pddl_common::Diagnostic;
use pddl_parser::Parser;
use pddl_sem::check;

mod pretty;

/// CLI configuration, doubling as the core's external configuration
/// surface: `domain_path`/`problem_path` select the two input files,
/// `max_peek` is plumbed straight into the parser's token buffer, and
/// `print_pddl` selects the round-trip pretty-printer below.
#[derive(ClapParser)]
#[command(name = "pddlc", version, about = "Parse and semantically check a PDDL domain/problem pair")]
struct Config {
    /// Path to the domain file
    domain_path: PathBuf,
    /// Path to the problem file
    problem_path: PathBuf,
    /// Maximum token lookahead depth the parser's token buffer allows
    #[arg(long = "max-peek", default_value_t = 2)]
    max_peek: usize,
    /// Pretty-print the parsed domain and problem back to canonical PDDL
    #[arg(long = "print-pddl")]
    print_pddl: bool,
}

fn main() {
    let config = Config::parse();
    process::exit(run(&config));
}

fn run(config: &Config) -> i32 {
    let domain_source = match std::fs::read_to_string(&config.domain_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: failed to read {}: {e}", config.domain_path.display());
            return 1;
        }
    };
    let problem_source = match std::fs::read_to_string(&config.problem_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: failed to read {}: {e}", config.problem_path.display());
            return 1;
        }
    };

    let domain_path = config.domain_path.display().to_string();
    let problem_path = config.problem_path.display().to_string();

    let mut domain = match Parser::with_max_peek(domain_path, &domain_source, config.max_peek)
        .parse_domain()
    {
        Ok(d) => d,
        Err(diag) => return report(&[diag]),
    };
    let mut problem = match Parser::with_max_peek(problem_path, &problem_source, config.max_peek)
        .parse_problem()
    {
        Ok(p) => p,
        Err(diag) => return report(&[diag]),
    };

    let diagnostics = check(&mut domain, Some(&mut problem));
    if !diagnostics.is_empty() {
        return report(&diagnostics);
    }

    if config.print_pddl {
        println!("{}", pretty::DomainPrinter(&domain));
        println!("{}", pretty::ProblemPrinter(&problem));
    }

    0
}

fn report(diagnostics: &[Diagnostic]) -> i32 {
    for d in diagnostics {
        eprintln!("{d}");
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parses_positional_paths_and_flags() {
        let cfg = Config::parse_from([
            "pddlc",
            "domain.pddl",
            "problem.pddl",
            "--max-peek",
            "3",
            "--print-pddl",
        ]);
        assert_eq!(cfg.domain_path, PathBuf::from("domain.pddl"));
        assert_eq!(cfg.problem_path, PathBuf::from("problem.pddl"));
        assert_eq!(cfg.max_peek, 3);
        assert!(cfg.print_pddl);
    }

    #[test]
    fn max_peek_defaults_to_two() {
        let cfg = Config::parse_from(["pddlc", "domain.pddl", "problem.pddl"]);
        assert_eq!(cfg.max_peek, 2);
        assert!(!cfg.print_pddl);
    }
}
