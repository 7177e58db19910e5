//! The fixed set of primitive operations.
//!
//! Builtins form a closed registry: the global environment is seeded from
//! [`ops`] and no mechanism exists to define new functions at runtime.
//! Each builtin receives its already-evaluated arguments and returns a
//! plain [`Value`]; failures are reported as error values with the same
//! messages for the same conditions everywhere.

use crate::ast::{NumberType, Value};
use crate::evaluator::{self, Environment};

/// Signature shared by all builtin operations. Arguments arrive fully
/// evaluated and error-free; the environment is needed only by `eval`.
pub type BuiltinFn = fn(&mut Environment, Vec<Value>) -> Value;

/// A named primitive operation.
pub struct BuiltinOp {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl std::fmt::Debug for BuiltinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BuiltinOp({})", self.name)
    }
}

/// The complete builtin registry.
static BUILTIN_OPS: &[BuiltinOp] = &[
    // List operations
    BuiltinOp { name: "list", func: builtin_list },
    BuiltinOp { name: "head", func: builtin_head },
    BuiltinOp { name: "tail", func: builtin_tail },
    BuiltinOp { name: "eval", func: builtin_eval },
    BuiltinOp { name: "join", func: builtin_join },
    // Arithmetic
    BuiltinOp { name: "+", func: builtin_add },
    BuiltinOp { name: "-", func: builtin_sub },
    BuiltinOp { name: "*", func: builtin_mul },
    BuiltinOp { name: "/", func: builtin_div },
];

/// All registered builtins, in registration order.
pub fn ops() -> impl Iterator<Item = &'static BuiltinOp> {
    BUILTIN_OPS.iter()
}

/// Look up a builtin by name.
pub fn find_op(name: &str) -> Option<&'static BuiltinOp> {
    BUILTIN_OPS.iter().find(|op| op.name == name)
}

fn err_num_args(name: &str) -> Value {
    Value::error(format!(
        "Function '{name}' received an invalid number of arguments."
    ))
}

fn err_arg_type(name: &str) -> Value {
    Value::error(format!(
        "Function '{name}' received an argument of invalid type."
    ))
}

fn err_empty_arg(name: &str) -> Value {
    Value::error(format!(
        "Function '{name}' received an invalid argument, {{}}."
    ))
}

/// `list`: package the evaluated arguments as a q-expression.
fn builtin_list(_env: &mut Environment, args: Vec<Value>) -> Value {
    Value::QExpr(args)
}

/// `head`: q-expression containing only the first element of the argument.
fn builtin_head(_env: &mut Environment, mut args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return err_num_args("head");
    }
    match args.pop() {
        Some(Value::QExpr(items)) if items.is_empty() => err_empty_arg("head"),
        Some(Value::QExpr(mut items)) => {
            items.truncate(1);
            Value::QExpr(items)
        }
        _ => err_arg_type("head"),
    }
}

/// `tail`: the argument without its first element.
fn builtin_tail(_env: &mut Environment, mut args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return err_num_args("tail");
    }
    match args.pop() {
        Some(Value::QExpr(items)) if items.is_empty() => err_empty_arg("tail"),
        Some(Value::QExpr(mut items)) => {
            items.remove(0);
            Value::QExpr(items)
        }
        _ => err_arg_type("tail"),
    }
}

/// `eval`: treat a q-expression as an s-expression and evaluate it.
fn builtin_eval(env: &mut Environment, mut args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return err_num_args("eval");
    }
    match args.pop() {
        Some(Value::QExpr(items)) => evaluator::eval(env, Value::SExpr(items)),
        _ => err_arg_type("eval"),
    }
}

/// `join`: concatenate q-expressions in argument order.
fn builtin_join(_env: &mut Environment, args: Vec<Value>) -> Value {
    // Reject mixed arguments before consuming anything.
    if !args.iter().all(|arg| matches!(arg, Value::QExpr(_))) {
        return err_arg_type("join");
    }
    let mut joined = Vec::new();
    for arg in args {
        if let Value::QExpr(items) = arg {
            joined.extend(items);
        }
    }
    Value::QExpr(joined)
}

#[derive(Clone, Copy)]
enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Left fold over numeric arguments. `-` with a single argument negates.
/// The fold stops at the leftmost failing operand, so a zero divisor to
/// the left of a non-number still reports the division error. Division
/// truncates toward zero; overflow anywhere stops the fold.
fn builtin_arith(op: ArithOp, args: Vec<Value>) -> Value {
    let unary = args.len() == 1;
    let mut args = args.into_iter();

    let first = match args.next() {
        Some(Value::Number(n)) => n,
        _ => return Value::error("Cannot operate on non-number."),
    };

    if unary && matches!(op, ArithOp::Sub) {
        return match first.checked_neg() {
            Some(n) => Value::Number(n),
            None => Value::error("Integer overflow."),
        };
    }

    let mut acc: NumberType = first;
    for arg in args {
        let Value::Number(y) = arg else {
            return Value::error("Cannot operate on non-number.");
        };
        let folded = match op {
            ArithOp::Add => acc.checked_add(y),
            ArithOp::Sub => acc.checked_sub(y),
            ArithOp::Mul => acc.checked_mul(y),
            ArithOp::Div => {
                if y == 0 {
                    return Value::error("Division by zero.");
                }
                acc.checked_div(y)
            }
        };
        match folded {
            Some(n) => acc = n,
            None => return Value::error("Integer overflow."),
        }
    }
    Value::Number(acc)
}

fn builtin_add(_env: &mut Environment, args: Vec<Value>) -> Value {
    builtin_arith(ArithOp::Add, args)
}

fn builtin_sub(_env: &mut Environment, args: Vec<Value>) -> Value {
    builtin_arith(ArithOp::Sub, args)
}

fn builtin_mul(_env: &mut Environment, args: Vec<Value>) -> Value {
    builtin_arith(ArithOp::Mul, args)
}

fn builtin_div(_env: &mut Environment, args: Vec<Value>) -> Value {
    builtin_arith(ArithOp::Div, args)
}
