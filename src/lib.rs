//! Lispy - a small expression-oriented Lisp interpreter
//!
//! This crate implements an interpreter for a minimal Lisp dialect built
//! around two expression forms:
//!
//! ```lisp
//! ; S-expressions are evaluated: the first element is applied as a
//! ; function to the rest.
//! (+ 1 (* 2 3))        ; => 7
//!
//! ; Q-expressions are literal lists: evaluation leaves them untouched.
//! {1 2 3}              ; => {1 2 3}
//! (head {1 2 3})       ; => {1}
//! (eval {+ 1 2})       ; => 3
//! ```
//!
//! The pipeline is: source text -> [`parser`] (generic labeled syntax
//! tree) -> [`reader`] (runtime [`ast::Value`] tree) -> [`evaluator`]
//! (recursive reduction against a mutable [`evaluator::Environment`]).
//!
//! Runtime failures are first-class [`ast::Value::Error`] values that
//! propagate through evaluation by replacing their enclosing expression;
//! the [`Error`] type below covers only the two failures that happen
//! before any value tree exists (bad input text, malformed syntax tree).
//!
//! ```
//! use lispy::{evaluator, parser, reader};
//!
//! let mut env = evaluator::create_global_env();
//! let ast = parser::parse("+ 1 (* 2 3)").unwrap();
//! let value = reader::read(ast).unwrap();
//! assert_eq!(evaluator::eval(&mut env, value).to_string(), "7");
//! ```
//!
//! ## Modules
//!
//! - `ast`: the runtime value representation
//! - `parser`: source text to generic syntax tree
//! - `reader`: generic syntax tree to value tree
//! - `evaluator`: binding environment and expression reduction
//! - `builtins`: the fixed set of primitive operations

use std::fmt;

/// Maximum parsing depth, bounding nesting of `(` and `{` forms.
/// Deeper input is rejected at parse time rather than risking a stack
/// overflow during reading or evaluation.
pub const MAX_PARSE_DEPTH: usize = 32;

/// Failures that occur before a value tree exists.
///
/// Everything after the reader reports errors as [`ast::Value::Error`]
/// values instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The input text was rejected by the grammar.
    Parse(String),
    /// The generic syntax tree violated the reader's input contract.
    /// This indicates a bug in the tree producer, not bad user input.
    MalformedTree(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(msg) => write!(f, "ParseError: {msg}"),
            Error::MalformedTree(msg) => write!(f, "Invalid abstract syntax tree: {msg}"),
        }
    }
}

pub mod ast;
pub mod builtins;
pub mod evaluator;
pub mod parser;
pub mod reader;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let cases = vec![
            (
                Error::Parse("Unexpected remaining input: ')'".into()),
                "ParseError: Unexpected remaining input: ')'",
            ),
            (
                Error::MalformedTree("unexpected node tag 'bogus'".into()),
                "Invalid abstract syntax tree: unexpected node tag 'bogus'",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }
}
