//! Hand-written character-level tokenizer for PDDL surface syntax.

mod cursor;
mod lexer;

pub use lexer::{tokenize, Lexer};
