//! Binding environment and expression reduction.
//!
//! Evaluation is a plain recursive reduction with no interpreter state
//! beyond the [`Environment`]: symbols resolve to copies of their bound
//! values, s-expressions evaluate their children left to right and apply
//! the first as a function to the rest, and everything else is already a
//! value. Error values short-circuit: the first error produced while
//! evaluating an s-expression's children replaces the whole expression.

use crate::ast::Value;
use crate::builtins;

/// Mutable binding table from symbol name to value.
///
/// Bindings keep insertion order and names are unique within one
/// environment. Lookups fall back to the optional parent chain; insertion
/// is always local. There is no deletion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    bindings: Vec<(String, Value)>,
    parent: Option<Box<Environment>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    /// An empty environment whose lookups fall back to `parent`.
    pub fn with_parent(parent: Environment) -> Self {
        Environment {
            bindings: Vec::new(),
            parent: Some(Box::new(parent)),
        }
    }

    /// Look up a symbol, returning a copy of its bound value or the
    /// runtime value `Error("Unbound symbol.")`. Never mutates.
    pub fn get(&self, name: &str) -> Value {
        for (bound, value) in &self.bindings {
            if bound == name {
                return value.clone();
            }
        }
        match &self.parent {
            Some(parent) => parent.get(name),
            None => Value::error("Unbound symbol."),
        }
    }

    /// Bind `name` to `value`, replacing an existing binding in place or
    /// appending a new one. The environment owns the stored value, so no
    /// caller-side alias can reach it afterwards.
    pub fn put(&mut self, name: &str, value: Value) {
        for (bound, slot) in &mut self.bindings {
            if bound == name {
                *slot = value;
                return;
            }
        }
        self.bindings.push((name.to_owned(), value));
    }

    /// Local bindings in insertion order.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Create the global environment with every builtin registered.
pub fn create_global_env() -> Environment {
    let mut env = Environment::new();
    for op in builtins::ops() {
        env.put(op.name, Value::Builtin(op));
    }
    env
}

/// Reduce a value to its final form, consuming it.
pub fn eval(env: &mut Environment, value: Value) -> Value {
    match value {
        Value::Symbol(name) => env.get(&name),
        Value::SExpr(children) if !children.is_empty() => eval_sexpr(env, children),
        // Numbers, errors, builtins, q-expressions and the empty
        // s-expression are already values.
        other => other,
    }
}

fn eval_sexpr(env: &mut Environment, children: Vec<Value>) -> Value {
    // Evaluate children left to right. The first error wins: it is
    // returned immediately and the trailing children are dropped
    // unevaluated.
    let mut evaluated = Vec::with_capacity(children.len());
    for child in children {
        let result = eval(env, child);
        if matches!(result, Value::Error(_)) {
            return result;
        }
        evaluated.push(result);
    }

    // An s-expression of one element evaluates to that element.
    if evaluated.len() == 1
        && let Some(single) = evaluated.pop()
    {
        return single;
    }

    let head = evaluated.remove(0);
    match head {
        Value::Builtin(op) => (op.func)(env, evaluated),
        _ => Value::error("An S-expression must start with a function."),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used)] // test code OK
mod tests {
    use super::*;
    use crate::ast::{num, qexpr, sexpr, sym};
    use crate::parser::parse;
    use crate::reader::read;
    use pretty_assertions::assert_eq;

    /// Parse, read and evaluate one line in the given environment,
    /// returning the printed form of the result.
    fn eval_str(env: &mut Environment, input: &str) -> String {
        let ast = parse(input).unwrap();
        let value = read(ast).unwrap();
        eval(env, value).to_string()
    }

    /// Run (input, expected printed result) cases, each in a fresh
    /// global environment.
    fn run_eval_tests(test_cases: Vec<(&str, &str)>) {
        for (i, (input, expected)) in test_cases.iter().enumerate() {
            let mut env = create_global_env();
            assert_eq!(
                eval_str(&mut env, input),
                *expected,
                "Eval test #{} for '{input}'",
                i + 1
            );
        }
    }

    #[test]
    fn test_eval_comprehensive() {
        let test_cases = vec![
            // === SELF-EVALUATING FORMS ===
            ("42", "42"),
            ("-17", "-17"),
            ("()", "()"),
            ("", "()"),
            ("{}", "{}"),
            ("{1 2 3}", "{1 2 3}"),
            // Q-expression contents are never evaluated.
            ("{+ 1 (/ 1 0) undefined}", "{+ 1 (/ 1 0) undefined}"),
            // A builtin resolves to an opaque function value.
            ("+", "<function>"),
            // === ARITHMETIC ===
            ("+ 1 2", "3"),
            ("(+ 1 2)", "3"),
            ("* 6 7", "42"),
            ("- 10 3 2", "5"),
            ("- 5", "-5"), // unary negation
            ("/ 10 2", "5"),
            ("/ 7 2", "3"),   // truncating division
            ("/ -7 2", "-3"), // toward zero
            ("+ 1 2 3 4 5", "15"),
            ("+ (* 2 3) (- 8 2)", "12"),
            ("(+ 1 (* 7 5) 3)", "39"),
            // === ARITHMETIC ERRORS ===
            ("/ 10 0", "Error: Division by zero."),
            ("/ 10 2 0", "Error: Division by zero."),
            ("+ 1 {2}", "Error: Cannot operate on non-number."),
            ("+ {1} 2", "Error: Cannot operate on non-number."),
            ("* <function>", "Error: Unbound symbol."),
            // === LIST OPERATIONS ===
            ("list 1 2 3", "{1 2 3}"),
            // A one-element s-expression is its element, so a bare
            // builtin is never applied to zero arguments.
            ("(list)", "<function>"),
            ("list {1} (+ 1 1)", "{{1} 2}"),
            ("head {1 2 3}", "{1}"),
            ("tail {1 2 3}", "{2 3}"),
            ("tail {1}", "{}"),
            ("join {1 2} {3}", "{1 2 3}"),
            ("join {1} {} {2 3}", "{1 2 3}"),
            ("eval {+ 1 2}", "3"),
            ("eval (list + 1 2)", "3"),
            ("head (list 1 2 3)", "{1}"),
            ("eval (tail {tail tail {5 6 7}})", "{6 7}"),
            // Argument validation happens after evaluation, with the
            // offending function named in the message.
            (
                "head {}",
                "Error: Function 'head' received an invalid argument, {}.",
            ),
            (
                "head 1",
                "Error: Function 'head' received an argument of invalid type.",
            ),
            (
                "head {1} {2}",
                "Error: Function 'head' received an invalid number of arguments.",
            ),
            // === ERROR PROPAGATION ===
            ("undefined", "Error: Unbound symbol."),
            ("(+ 1 hello)", "Error: Unbound symbol."),
            // Left-to-right, first error wins: the division fails before
            // the unbound symbol is ever evaluated.
            ("+ 1 (/ 1 0) undefined", "Error: Division by zero."),
            ("(1 2 3)", "Error: An S-expression must start with a function."),
            ("{1} {2}", "Error: An S-expression must start with a function."),
            ("(+ 1 2) (+ 3 4)", "Error: An S-expression must start with a function."),
            ("hello world", "Error: Unbound symbol."),
            // Number literals that overflow become error values.
            ("99999999999999999999", "Error: Invalid number."),
            ("+ 1 99999999999999999999", "Error: Invalid number."),
        ];

        run_eval_tests(test_cases);
    }

    #[test]
    fn test_environment_put_and_get() {
        let mut env = Environment::new();
        assert_eq!(env.get("x"), Value::error("Unbound symbol."));

        env.put("x", num(42));
        assert_eq!(env.get("x"), num(42));

        // Overwrite replaces in place; no duplicate binding appears.
        env.put("x", num(7));
        assert_eq!(env.get("x"), num(7));
        assert_eq!(env.bindings().count(), 1);

        // Idempotent re-put keeps exactly one binding.
        env.put("y", qexpr(vec![num(1)]));
        env.put("y", qexpr(vec![num(1)]));
        assert_eq!(env.bindings().count(), 2);
        assert_eq!(env.get("y"), qexpr(vec![num(1)]));
    }

    #[test]
    fn test_environment_insertion_order() {
        let mut env = Environment::new();
        env.put("b", num(2));
        env.put("a", num(1));
        env.put("b", num(3)); // overwrite must not move the binding

        let names: Vec<&str> = env.bindings().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_environment_parent_chain() {
        let mut parent = Environment::new();
        parent.put("x", num(1));
        parent.put("y", num(2));

        let mut child = Environment::with_parent(parent);
        child.put("x", num(10)); // shadows the parent binding

        assert_eq!(child.get("x"), num(10));
        assert_eq!(child.get("y"), num(2));
        assert_eq!(child.get("z"), Value::error("Unbound symbol."));

        // Insertion stays local: the child gained one binding only.
        assert_eq!(child.bindings().count(), 1);
    }

    #[test]
    fn test_lookup_returns_a_copy() {
        let mut env = create_global_env();
        env.put("xs", qexpr(vec![num(1), num(2), num(3)]));

        // head consumes a copy of the binding...
        assert_eq!(eval_str(&mut env, "head xs"), "{1}");
        assert_eq!(eval_str(&mut env, "tail xs"), "{2 3}");

        // ...and the stored value is unchanged.
        assert_eq!(eval_str(&mut env, "xs"), "{1 2 3}");
        assert_eq!(env.get("xs"), qexpr(vec![num(1), num(2), num(3)]));
    }

    #[test]
    fn test_rebinding_builtin_names_is_permitted() {
        let mut env = create_global_env();
        env.put("+", num(1));

        // `+` now resolves to a number, so applying it fails.
        assert_eq!(
            eval_str(&mut env, "+ 1 2"),
            "Error: An S-expression must start with a function."
        );
        assert_eq!(eval_str(&mut env, "+"), "1");

        // Other builtins are unaffected.
        assert_eq!(eval_str(&mut env, "* 2 3"), "6");
    }

    #[test]
    fn test_eval_consumes_symbol() {
        let mut env = create_global_env();
        env.put("x", num(5));

        let result = eval(&mut env, sym("x"));
        assert_eq!(result, num(5));

        // A bare non-sexpr value is returned unchanged.
        let untouched = eval(&mut env, qexpr(vec![sym("x")]));
        assert_eq!(untouched, qexpr(vec![sym("x")]));

        // A single-element s-expression evaluates to its element.
        let single = eval(&mut env, sexpr(vec![sexpr(vec![sym("+"), num(2), num(2)])]));
        assert_eq!(single, num(4));
    }
}
