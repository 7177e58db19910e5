//! The core runtime value type for the interpreter. The main enum,
//! [`Value`], covers the closed set of variants: numbers, error values,
//! symbols, builtin functions, s-expressions and q-expressions. Ergonomic
//! helper functions such as [`sym`], [`sexpr`] and [`qexpr`] are provided
//! for convenient construction in tests. Display logic renders values the
//! way the REPL prints them, including the `Error: <message>` form for
//! error values and the opaque `<function>` token for builtins.

use crate::builtins::BuiltinOp;

/// Type alias for number values in the interpreter
pub type NumberType = i64;

/// Core runtime value.
///
/// A `Value` is a tree: `SExpr`/`QExpr` children are exclusively owned by
/// their parent, so `Clone` is the deep copy the environment relies on.
/// `Error` values are terminal: once produced they are never evaluated,
/// iterated, or used as operands, and they propagate by replacing the
/// expression that contains them.
#[derive(Clone)]
pub enum Value {
    /// Signed integer
    Number(NumberType),
    /// Terminal failure carrying its message
    Error(String),
    /// Unresolved identifier, resolved by environment lookup
    Symbol(String),
    /// A primitive operation from the closed builtin table. Copyable
    /// capability with no captured state; equality is by name.
    Builtin(&'static BuiltinOp),
    /// Expression awaiting evaluation; the first evaluated child is
    /// applied as a function to the rest
    SExpr(Vec<Value>),
    /// Literal, unevaluated list
    QExpr(Vec<Value>),
}

impl Value {
    /// Construct an error value from a message.
    pub fn error(message: impl Into<String>) -> Value {
        Value::Error(message.into())
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "Number({n})"),
            Value::Error(msg) => write!(f, "Error({msg:?})"),
            Value::Symbol(s) => write!(f, "Symbol({s})"),
            Value::Builtin(op) => write!(f, "Builtin({})", op.name),
            Value::SExpr(items) => write_items(f, "SExpr(", items, ")"),
            Value::QExpr(items) => write_items(f, "QExpr(", items, ")"),
        }
    }
}

fn write_items(
    f: &mut std::fmt::Formatter<'_>,
    open: &str,
    items: &[Value],
    close: &str,
) -> std::fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item:?}")?;
    }
    write!(f, "{close}")
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Error(msg) => write!(f, "Error: {msg}"),
            Value::Symbol(s) => write!(f, "{s}"),
            Value::Builtin(_) => write!(f, "<function>"),
            Value::SExpr(items) => write_expr(f, '(', items, ')'),
            Value::QExpr(items) => write_expr(f, '{', items, '}'),
        }
    }
}

fn write_expr(
    f: &mut std::fmt::Formatter<'_>,
    open: char,
    items: &[Value],
    close: char,
) -> std::fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "{close}")
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            // Builtins carry no state; the name identifies the operation
            (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
            (Value::SExpr(a), Value::SExpr(b)) => a == b,
            (Value::QExpr(a), Value::QExpr(b)) => a == b,
            _ => false, // Different variants are never equal
        }
    }
}

/// Helper function for creating number values
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn num(n: NumberType) -> Value {
    Value::Number(n)
}

/// Helper function for creating symbols
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn sym<S: AsRef<str>>(name: S) -> Value {
    Value::Symbol(name.as_ref().to_owned())
}

/// Helper function for creating s-expressions
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn sexpr(items: Vec<Value>) -> Value {
    Value::SExpr(items)
}

/// Helper function for creating q-expressions
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn qexpr(items: Vec<Value>) -> Value {
    Value::QExpr(items)
}

#[cfg(test)]
#[expect(clippy::unwrap_used)] // test code OK
mod tests {
    use super::*;
    use crate::builtins::find_op;

    #[test]
    fn test_display_data_driven() {
        // Test cases as (Value, rendered text) pairs covering the full
        // printing contract.
        let test_cases = vec![
            (num(42), "42"),
            (num(-17), "-17"),
            (num(0), "0"),
            (Value::error("Division by zero."), "Error: Division by zero."),
            (sym("head"), "head"),
            (sym("+"), "+"),
            (Value::Builtin(find_op("+").unwrap()), "<function>"),
            (sexpr(vec![]), "()"),
            (qexpr(vec![]), "{}"),
            (sexpr(vec![sym("+"), num(1), num(2)]), "(+ 1 2)"),
            (qexpr(vec![num(1), num(2), num(3)]), "{1 2 3}"),
            (
                sexpr(vec![sym("head"), qexpr(vec![num(1), qexpr(vec![num(2)])])]),
                "(head {1 {2}})",
            ),
            (
                qexpr(vec![sexpr(vec![sym("/"), num(1), num(0)])]),
                "{(/ 1 0)}",
            ),
        ];

        for (i, (value, expected)) in test_cases.iter().enumerate() {
            assert_eq!(
                value.to_string(),
                *expected,
                "Display test #{} failed for {value:?}",
                i + 1
            );
        }
    }

    #[test]
    fn test_equality() {
        assert_eq!(num(1), num(1));
        assert_ne!(num(1), num(2));
        assert_ne!(num(1), sym("1"));
        assert_eq!(sym("x"), sym("x"));
        assert_eq!(Value::error("a"), Value::error("a"));
        assert_ne!(Value::error("a"), Value::error("b"));

        // Structurally identical s- and q-expressions are distinct values
        assert_ne!(sexpr(vec![num(1)]), qexpr(vec![num(1)]));
        assert_eq!(qexpr(vec![num(1), num(2)]), qexpr(vec![num(1), num(2)]));

        // Builtins compare by name
        assert_eq!(
            Value::Builtin(find_op("head").unwrap()),
            Value::Builtin(find_op("head").unwrap())
        );
        assert_ne!(
            Value::Builtin(find_op("head").unwrap()),
            Value::Builtin(find_op("tail").unwrap())
        );
    }

    #[test]
    fn test_clone_is_deep() {
        let original = qexpr(vec![num(1), qexpr(vec![num(2), num(3)])]);
        let mut copy = original.clone();

        // Mutating the copy must not be visible through the original.
        if let Value::QExpr(items) = &mut copy {
            items.remove(0);
        }
        assert_eq!(original, qexpr(vec![num(1), qexpr(vec![num(2), num(3)])]));
        assert_eq!(copy, qexpr(vec![qexpr(vec![num(2), num(3)])]));
    }
}
