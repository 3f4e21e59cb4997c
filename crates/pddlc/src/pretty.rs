//! `--print-pddl`: a minimal round-trip printer from the parsed AST back to
//! canonical PDDL text.
//!
//! Two-space indentation per nesting level, typed-name groups separated by
//! `- TYPE`, and the implicit `object` type suppressed (it either was never
//! written, or it's a synthesized type carrying a line-0 sentinel location).
//! This is the CLI's own convenience, not a core deliverable. It does not
//! attempt optimal line-wrapping, just a direct recursive descent over the
//! AST.

use std::fmt;

use pddl_parser::{
    Assign, AssignValue, Domain, Formula, Literal, MultiFormula, Problem, Quantifier, Term,
    TypedEntry, When,
};

const INDENT: &str = "  ";

pub struct DomainPrinter<'a>(pub &'a Domain);
pub struct ProblemPrinter<'a>(pub &'a Problem);

fn indent(f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
    for _ in 0..level {
        f.write_str(INDENT)?;
    }
    Ok(())
}

/// Group consecutive entries sharing the same type list, so a typed list
/// declared `a b - t1 c - t2` prints back as the same two groups rather than
/// one `- TYPE` suffix per name.
fn type_suffix(entry: &TypedEntry) -> Option<String> {
    let names: Vec<&str> = entry
        .types
        .iter()
        .filter(|t| t.name.key() != "object")
        .map(|t| t.name.text.as_str())
        .collect();
    if names.is_empty() {
        None
    } else if names.len() == 1 {
        Some(names[0].to_string())
    } else {
        Some(format!("(either {})", names.join(" ")))
    }
}

fn write_typed_list(f: &mut fmt::Formatter<'_>, entries: &[TypedEntry]) -> fmt::Result {
    let mut i = 0;
    let mut first = true;
    while i < entries.len() {
        let suffix = type_suffix(&entries[i]);
        let mut j = i + 1;
        while j < entries.len() && type_suffix(&entries[j]) == suffix {
            j += 1;
        }
        if !first {
            f.write_str(" ")?;
        }
        first = false;
        for (k, e) in entries[i..j].iter().enumerate() {
            if k > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", e.name.text)?;
        }
        if let Some(suffix) = suffix {
            write!(f, " - {suffix}")?;
        }
        i = j;
    }
    Ok(())
}

fn write_term(f: &mut fmt::Formatter<'_>, term: &Term) -> fmt::Result {
    write!(f, "{}", term.name.text)
}

fn write_terms(f: &mut fmt::Formatter<'_>, terms: &[Term]) -> fmt::Result {
    for (i, t) in terms.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write_term(f, t)?;
    }
    Ok(())
}

fn write_literal(f: &mut fmt::Formatter<'_>, lit: &Literal) -> fmt::Result {
    if lit.negative {
        write!(f, "(not (")?;
    } else {
        f.write_str("(")?;
    }
    write!(f, "{}", lit.predicate.text)?;
    if !lit.terms.is_empty() {
        f.write_str(" ")?;
        write_terms(f, &lit.terms)?;
    }
    f.write_str(")")?;
    if lit.negative {
        f.write_str(")")?;
    }
    Ok(())
}

fn write_multi(
    f: &mut fmt::Formatter<'_>,
    keyword: &str,
    m: &MultiFormula,
    level: usize,
) -> fmt::Result {
    write!(f, "({keyword}")?;
    for item in &m.items {
        f.write_str("\n")?;
        indent(f, level + 1)?;
        write_formula(f, item, level + 1)?;
    }
    f.write_str(")")
}

fn write_quantifier(
    f: &mut fmt::Formatter<'_>,
    keyword: &str,
    q: &Quantifier,
    level: usize,
) -> fmt::Result {
    write!(f, "({keyword} (")?;
    write_typed_list(f, &q.variables)?;
    f.write_str(")\n")?;
    indent(f, level + 1)?;
    write_formula(f, &q.body, level + 1)?;
    f.write_str(")")
}

fn write_when(f: &mut fmt::Formatter<'_>, w: &When, level: usize) -> fmt::Result {
    f.write_str("(when ")?;
    write_formula(f, &w.condition, level)?;
    f.write_str("\n")?;
    indent(f, level + 1)?;
    write_formula(f, &w.effect, level + 1)?;
    f.write_str(")")
}

fn write_assign(f: &mut fmt::Formatter<'_>, a: &Assign) -> fmt::Result {
    write!(f, "({} ({}", a.op.text, a.assigned_to.name.text)?;
    if !a.assigned_to.terms.is_empty() {
        f.write_str(" ")?;
        write_terms(f, &a.assigned_to.terms)?;
    }
    f.write_str(") ")?;
    match &a.value {
        AssignValue::Number(n) => f.write_str(n)?,
        AssignValue::Function(fi) => {
            write!(f, "({}", fi.name.text)?;
            if !fi.terms.is_empty() {
                f.write_str(" ")?;
                write_terms(f, &fi.terms)?;
            }
            f.write_str(")")?;
        }
    }
    f.write_str(")")
}

fn write_formula(f: &mut fmt::Formatter<'_>, formula: &Formula, level: usize) -> fmt::Result {
    match formula {
        Formula::Literal(lit) => write_literal(f, lit),
        Formula::And(m) => write_multi(f, "and", m, level),
        Formula::Or(m) => write_multi(f, "or", m, level),
        Formula::Not(_, inner) => {
            f.write_str("(not ")?;
            write_formula(f, inner, level)?;
            f.write_str(")")
        }
        Formula::Imply(_, left, right) => {
            f.write_str("(imply ")?;
            write_formula(f, left, level)?;
            f.write_str(" ")?;
            write_formula(f, right, level)?;
            f.write_str(")")
        }
        Formula::ForAll(q) => write_quantifier(f, "forall", q, level),
        Formula::Exists(q) => write_quantifier(f, "exists", q, level),
        Formula::When(w) => write_when(f, w, level),
        Formula::Assign(a) => write_assign(f, a),
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, keyword: &str, entries: &[TypedEntry]) -> fmt::Result {
    if entries.is_empty() {
        return Ok(());
    }
    write!(f, "\n{INDENT}({keyword} ")?;
    write_typed_list(f, entries)?;
    f.write_str(")")
}

impl fmt::Display for DomainPrinter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.0;
        write!(f, "(define (domain {})", d.name.text)?;

        if !d.requirements.is_empty() {
            write!(f, "\n{INDENT}(:requirements")?;
            for r in &d.requirements {
                write!(f, " {}", r.text)?;
            }
            f.write_str(")")?;
        }

        let types: Vec<_> = d.types.iter().filter(|t| !t.name.location.is_synthetic()).collect();
        if !types.is_empty() {
            write!(f, "\n{INDENT}(:types ")?;
            for (i, t) in types.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", t.name.text)?;
                let parents: Vec<&str> =
                    t.parents.iter().filter(|p| p.name.key() != "object").map(|p| p.name.text.as_str()).collect();
                if parents.len() == 1 {
                    write!(f, " - {}", parents[0])?;
                } else if parents.len() > 1 {
                    write!(f, " - (either {})", parents.join(" "))?;
                }
            }
            f.write_str(")")?;
        }

        write_block(f, ":constants", &d.constants)?;

        let preds: Vec<_> = d.predicates.iter().filter(|p| !p.name.location.is_synthetic()).collect();
        if !preds.is_empty() {
            write!(f, "\n{INDENT}(:predicates")?;
            for p in &preds {
                write!(f, "\n{INDENT}{INDENT}({}", p.name.text)?;
                if !p.params.is_empty() {
                    f.write_str(" ")?;
                    write_typed_list(f, &p.params)?;
                }
                f.write_str(")")?;
            }
            f.write_str(")")?;
        }

        if !d.functions.is_empty() {
            write!(f, "\n{INDENT}(:functions")?;
            for fun in &d.functions {
                write!(f, "\n{INDENT}{INDENT}({}", fun.name.text)?;
                if !fun.params.is_empty() {
                    f.write_str(" ")?;
                    write_typed_list(f, &fun.params)?;
                }
                f.write_str(")")?;
                if let Some(rt) = &fun.result_type {
                    write!(f, " - {}", rt.text)?;
                }
            }
            f.write_str(")")?;
        }

        for a in &d.actions {
            write!(f, "\n{INDENT}(:action {}\n{INDENT}{INDENT}:parameters (", a.name.text)?;
            write_typed_list(f, &a.params)?;
            f.write_str(")")?;
            if let Some(pre) = &a.precondition {
                write!(f, "\n{INDENT}{INDENT}:precondition ")?;
                write_formula(f, pre, 2)?;
            }
            if let Some(eff) = &a.effect {
                write!(f, "\n{INDENT}{INDENT}:effect ")?;
                write_formula(f, eff, 2)?;
            }
            f.write_str(")")?;
        }

        f.write_str(")")
    }
}

impl fmt::Display for ProblemPrinter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.0;
        write!(f, "(define (problem {})\n{INDENT}(:domain {})", p.name.text, p.domain.text)?;

        if !p.requirements.is_empty() {
            write!(f, "\n{INDENT}(:requirements")?;
            for r in &p.requirements {
                write!(f, " {}", r.text)?;
            }
            f.write_str(")")?;
        }

        write_block(f, ":objects", &p.objects)?;

        write!(f, "\n{INDENT}(:init")?;
        for el in &p.init {
            f.write_str("\n")?;
            indent(f, 2)?;
            write_formula(f, el, 2)?;
        }
        f.write_str(")")?;

        write!(f, "\n{INDENT}(:goal ")?;
        write_formula(f, &p.goal, 1)?;
        f.write_str(")")?;

        f.write_str(")")
    }
}
