//! Generic syntax tree to runtime value tree.
//!
//! The reader is the only component that touches both worlds: it consumes
//! the parser's [`SyntaxNode`] tree and produces an [`ast::Value`] tree
//! ready for evaluation. Structural delimiter tokens and the synthetic
//! root/regex markers are filtered out here; everything else must carry
//! one of the known tags. An unknown tag means the tree producer broke
//! its contract, which is reported to the caller (and logged) rather
//! than surfaced as a runtime error value.

use tracing::error;

use crate::Error;
use crate::ast::{NumberType, Value};
use crate::parser::SyntaxNode;

/// Convert a generic syntax tree into a value tree.
///
/// Number literals are converted to [`Value::Number`] here; a literal
/// that does not fit the number type (overflow) becomes the runtime
/// value `Error("Invalid number.")` rather than a reader failure, since
/// the input text itself was well-formed.
pub fn read(node: SyntaxNode) -> Result<Value, Error> {
    let SyntaxNode {
        tag,
        contents,
        children,
    } = node;

    if tag.contains("number") {
        return Ok(match contents.parse::<NumberType>() {
            Ok(n) => Value::Number(n),
            Err(_) => Value::error("Invalid number."),
        });
    }
    if tag.contains("symbol") {
        return Ok(Value::Symbol(contents));
    }

    let is_qexpr = tag.contains("qexpr");
    if !is_qexpr && tag != ">" && !tag.contains("sexpr") {
        error!(%tag, "invalid abstract syntax tree node");
        return Err(Error::MalformedTree(format!("unexpected node tag '{tag}'")));
    }

    let mut items = Vec::with_capacity(children.len());
    for child in children {
        if child.tag == "regex" || matches!(child.contents.as_str(), "(" | ")" | "{" | "}") {
            continue;
        }
        items.push(read(child)?);
    }

    Ok(if is_qexpr {
        Value::QExpr(items)
    } else {
        Value::SExpr(items)
    })
}
