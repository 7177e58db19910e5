//! Source text to generic syntax tree.
//!
//! The parser knows nothing about runtime values: it produces a generic
//! labeled tree ([`SyntaxNode`]) of tagged nodes carrying literal text and
//! ordered children, which the [`crate::reader`] then converts into
//! [`crate::ast::Value`] trees. The tree keeps the shape a grammar-driven
//! parser generator would emit: interior nodes carry their delimiter
//! tokens as literal children, and the root carries synthetic `regex`
//! anchor markers. Filtering those out is the reader's job.
//!
//! Grammar:
//!
//! ```text
//! number : /-?[0-9]+/
//! symbol : /[a-zA-Z0-9_+\-*\/\\=<>!&]+/
//! sexpr  : '(' <expr>* ')'
//! qexpr  : '{' <expr>* '}'
//! expr   : <number> | <symbol> | <sexpr> | <qexpr>
//! lispy  : /^/ <expr>* /$/
//! ```

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::{opt, recognize},
    error::ErrorKind,
    multi::many0,
    sequence::{pair, preceded, terminated},
};

use crate::Error;
use crate::MAX_PARSE_DEPTH;

/// Allowed non-alphanumeric characters in symbol names
const SYMBOL_SPECIAL_CHARS: &str = "_+-*/\\=<>!&";

/// A node of the generic labeled syntax tree.
///
/// Leaves are tagged with a rule path containing `number` or `symbol` and
/// carry their literal text; interior nodes are tagged with a path
/// containing `sexpr` or `qexpr` and carry ordered children, delimiter
/// tokens included. The root node is tagged `>`.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub tag: String,
    pub contents: String,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    fn leaf(tag: &str, contents: &str) -> SyntaxNode {
        SyntaxNode {
            tag: tag.to_owned(),
            contents: contents.to_owned(),
            children: Vec::new(),
        }
    }

    fn branch(tag: &str, children: Vec<SyntaxNode>) -> SyntaxNode {
        SyntaxNode {
            tag: tag.to_owned(),
            contents: String::new(),
            children,
        }
    }

    /// Synthetic anchor node emitted for the root rule's `/^/` and `/$/`.
    fn regex_marker() -> SyntaxNode {
        SyntaxNode::leaf("regex", "")
    }

    /// Literal delimiter token kept as a child of its expression node.
    fn delimiter(token: char) -> SyntaxNode {
        SyntaxNode::leaf("char", &token.to_string())
    }
}

/// Convert nom parsing errors to user-friendly messages
fn parse_error_to_message(input: &str, error: nom::Err<nom::error::Error<&str>>) -> String {
    match error {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let position = input.len().saturating_sub(e.input.len());
            match e.code {
                ErrorKind::Char => format!("Expected character at position {position}"),
                ErrorKind::TooLarge => {
                    format!("Expression too deeply nested (max depth: {MAX_PARSE_DEPTH})")
                }
                _ => {
                    if position < input.len() {
                        let remaining_chars: String =
                            input.chars().skip(position).take(10).collect();
                        format!("Invalid syntax near '{remaining_chars}'")
                    } else {
                        "Unexpected end of input".into()
                    }
                }
            }
        }
        nom::Err::Incomplete(_) => "Incomplete input".into(),
    }
}

/// Parse a number literal. Only the text is captured here; numeric
/// conversion (and its overflow handling) belongs to the reader.
fn parse_number(input: &str) -> IResult<&str, SyntaxNode> {
    let (input, number_str) = recognize(pair(
        opt(char('-')),
        take_while1(|c: char| c.is_ascii_digit()),
    ))
    .parse(input)?;

    Ok((input, SyntaxNode::leaf("expr|number|regex", number_str)))
}

/// Parse a symbol (identifier or operator name)
fn parse_symbol(input: &str) -> IResult<&str, SyntaxNode> {
    let (input, name) = take_while1(|c: char| {
        c.is_ascii_alphanumeric() || SYMBOL_SPECIAL_CHARS.contains(c)
    })
    .parse(input)?;

    Ok((input, SyntaxNode::leaf("expr|symbol|regex", name)))
}

/// Parse a delimited expression list: `(...)` for s-expressions, `{...}`
/// for q-expressions. The delimiters stay in the tree as literal children.
fn parse_delimited<'a>(
    input: &'a str,
    open: char,
    close: char,
    tag: &str,
    depth: usize,
) -> IResult<&'a str, SyntaxNode> {
    let (input, _) = char(open).parse(input)?;
    let (input, elements) = many0(|input| parse_expr(input, depth + 1)).parse(input)?;
    let (input, _) = multispace0.parse(input)?;
    let (input, _) = char(close).parse(input)?;

    let mut children = Vec::with_capacity(elements.len() + 2);
    children.push(SyntaxNode::delimiter(open));
    children.extend(elements);
    children.push(SyntaxNode::delimiter(close));

    Ok((input, SyntaxNode::branch(tag, children)))
}

/// Parse one expression, enforcing the nesting limit
fn parse_expr(input: &str, depth: usize) -> IResult<&str, SyntaxNode> {
    if depth >= MAX_PARSE_DEPTH {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            ErrorKind::TooLarge,
        )));
    }
    preceded(
        multispace0,
        alt((
            |input| parse_delimited(input, '(', ')', "expr|sexpr|>", depth),
            |input| parse_delimited(input, '{', '}', "expr|qexpr|>", depth),
            parse_number,
            parse_symbol,
        )),
    )
    .parse(input)
}

/// Parse a complete input line into a generic syntax tree.
///
/// The root node is tagged `>` and behaves as one s-expression, so a line
/// like `+ 1 2` works without outer parentheses. An empty line yields a
/// root with no expression children.
pub fn parse(input: &str) -> Result<SyntaxNode, Error> {
    match terminated(many0(|input| parse_expr(input, 0)), multispace0).parse(input) {
        Ok(("", elements)) => {
            let mut children = Vec::with_capacity(elements.len() + 2);
            children.push(SyntaxNode::regex_marker());
            children.extend(elements);
            children.push(SyntaxNode::regex_marker());
            Ok(SyntaxNode::branch(">", children))
        }
        Ok((remaining, _)) => Err(Error::Parse(format!(
            "Unexpected remaining input: '{remaining}'"
        ))),
        Err(e) => Err(Error::Parse(parse_error_to_message(input, e))),
    }
}
