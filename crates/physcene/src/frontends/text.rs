//! Statement-syntax frontend
//!
//! The compact scene syntax:
//!
//! ```text
//! // two boxes joined by a spring
//! a: rectangle 0 0 10 10 #static;
//! b: rectangle 50 0 10 10 color="red";
//! a ~~ b stiffness=0.05;
//!
//! row: fn(n) { repeat(n, |i| circle (i * 20) 100 5) };
//! { row(4) } translate=[0, 40] rotate=15;
//! ```
//!
//! Statements end with `;` (optional before `}` and at end of input).
//! Edges are `--` rigid, `~~` spring, `-o-` pin, and `..` rope. Infix
//! arithmetic lowers to calls of the `+ - * /` built-ins.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, multispace1, one_of, satisfy},
    combinator::{all_consuming, eof, map, not, opt, peek, recognize, value},
    multi::{many0, separated_list0},
    number::complete::recognize_float,
    sequence::{delimited, pair, preceded, terminated, tuple},
    Finish, IResult,
};

use crate::ast::{EdgeKind, RawNode};
use crate::frontend::{ParseError, SceneFrontend};
use crate::value::Shape;

/// Statement-syntax frontend.
///
/// # Example
///
/// ```
/// use physcene::frontends::TextFrontend;
/// use physcene::SceneFrontend;
///
/// let raw = TextFrontend::new()
///     .parse("a: rectangle 0 0 10 10; b: rectangle 50 0 10 10; a -- b;")
///     .unwrap();
/// assert_eq!(raw.children.len(), 3);
/// assert_eq!(raw.children[2].tag, "constraint");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextFrontend;

impl TextFrontend {
    /// Create a new statement-syntax frontend.
    pub fn new() -> Self {
        Self
    }
}

impl SceneFrontend for TextFrontend {
    fn parse(&self, source: &str) -> Result<RawNode, ParseError> {
        let (_, stmts) = all_consuming(terminated(statements, sp))(source)
            .finish()
            .map_err(|e| {
                ParseError::at_remaining(
                    format!("unexpected input ({})", e.code.description()),
                    source,
                    e.input,
                )
            })?;
        Ok(RawNode::new("composite", stmts))
    }

    fn name(&self) -> &str {
        "text"
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Lexical
// ═══════════════════════════════════════════════════════════════════════

/// Whitespace and `//` line comments.
fn sp(input: &str) -> IResult<&str, &str> {
    recognize(many0(alt((
        multispace1,
        recognize(pair(tag("//"), take_while(|c| c != '\n'))),
    ))))(input)
}

/// At least one whitespace character before the next token.
fn sp1(input: &str) -> IResult<&str, &str> {
    preceded(multispace1, sp)(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)
}

fn symbol(input: &str) -> IResult<&str, RawNode> {
    map(identifier, RawNode::symbol)(input)
}

fn number(input: &str) -> IResult<&str, RawNode> {
    map(recognize_float, RawNode::number)(input)
}

fn string(input: &str) -> IResult<&str, RawNode> {
    map(
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
        RawNode::string,
    )(input)
}

fn comma(input: &str) -> IResult<&str, char> {
    delimited(sp, char(','), sp)(input)
}

// ═══════════════════════════════════════════════════════════════════════
// Statements
// ═══════════════════════════════════════════════════════════════════════

fn statements(input: &str) -> IResult<&str, Vec<RawNode>> {
    let (input, _) = many0(preceded(sp, char(';')))(input)?;
    many0(delimited(sp, statement, terminator))(input)
}

/// `;` (repeatable), or nothing before `}` and end of input.
fn terminator(input: &str) -> IResult<&str, ()> {
    preceded(
        sp,
        alt((
            value((), many0_semicolons),
            value((), peek(char('}'))),
            value((), eof),
        )),
    )(input)
}

fn many0_semicolons(input: &str) -> IResult<&str, ()> {
    let (input, _) = char(';')(input)?;
    let (input, _) = many0(preceded(sp, char(';')))(input)?;
    Ok((input, ()))
}

fn statement(input: &str) -> IResult<&str, RawNode> {
    alt((label, constraint_or_expr))(input)
}

/// `name: value`
fn label(input: &str) -> IResult<&str, RawNode> {
    let (input, name) = terminated(symbol, tuple((sp, char(':'), sp)))(input)?;
    let (input, value) = constraint_or_expr(input)?;
    Ok((input, RawNode::new("label", vec![name, value])))
}

/// `expr` or `expr EDGE expr attrs`
fn constraint_or_expr(input: &str) -> IResult<&str, RawNode> {
    let (input, from) = expr(input)?;
    let (input, rest) = opt(tuple((
        delimited(sp, edge, sp),
        expr,
        attr_list,
    )))(input)?;

    match rest {
        None => Ok((input, from)),
        Some((kind, to, attrs)) => {
            let mut children = vec![from, RawNode::new(kind.tag(), vec![]), to];
            if !attrs.children.is_empty() {
                children.push(attrs);
            }
            Ok((input, RawNode::new("constraint", children)))
        }
    }
}

fn edge(input: &str) -> IResult<&str, EdgeKind> {
    alt((
        value(EdgeKind::Pin, tag("-o-")),
        value(EdgeKind::Rigid, tag("--")),
        value(EdgeKind::Spring, tag("~~")),
        value(EdgeKind::Rope, tag("..")),
    ))(input)
}

// ═══════════════════════════════════════════════════════════════════════
// Attributes
// ═══════════════════════════════════════════════════════════════════════

/// Zero or more whitespace-separated `key=value` or `#flag` items.
fn attr_list(input: &str) -> IResult<&str, RawNode> {
    map(many0(preceded(sp1, attr_or_flag)), |attrs| {
        RawNode::new("attrs", attrs)
    })(input)
}

fn attr_or_flag(input: &str) -> IResult<&str, RawNode> {
    alt((attr, flag))(input)
}

fn attr(input: &str) -> IResult<&str, RawNode> {
    let (input, key) = terminated(symbol, delimited(sp, char('='), sp))(input)?;
    let (input, value) = primary(input)?;
    Ok((input, RawNode::new("attr", vec![key, value])))
}

fn flag(input: &str) -> IResult<&str, RawNode> {
    map(preceded(char('#'), symbol), |key| {
        RawNode::new("flag", vec![key])
    })(input)
}

// ═══════════════════════════════════════════════════════════════════════
// Expressions
// ═══════════════════════════════════════════════════════════════════════

fn expr(input: &str) -> IResult<&str, RawNode> {
    let (input, first) = term(input)?;
    let (input, rest) = many0(pair(delimited(sp, additive_op, sp), term))(input)?;
    Ok((input, fold_infix(first, rest)))
}

/// `+` or a `-` that does not start an edge.
fn additive_op(input: &str) -> IResult<&str, char> {
    alt((
        char('+'),
        terminated(char('-'), not(one_of("-o"))),
    ))(input)
}

fn term(input: &str) -> IResult<&str, RawNode> {
    let (input, first) = application(input)?;
    let (input, rest) = many0(pair(delimited(sp, one_of("*/"), sp), application))(input)?;
    Ok((input, fold_infix(first, rest)))
}

fn fold_infix(first: RawNode, rest: Vec<(char, RawNode)>) -> RawNode {
    rest.into_iter().fold(first, |lhs, (op, rhs)| {
        RawNode::new("call", vec![RawNode::symbol(op.to_string()), lhs, rhs])
    })
}

fn application(input: &str) -> IResult<&str, RawNode> {
    alt((body, primary))(input)
}

/// `shape arg* attr*` for a known shape, or `body NAME arg* attr*`.
fn body(input: &str) -> IResult<&str, RawNode> {
    let (input, shape) = alt((
        preceded(pair(tag("body"), sp1), alt((symbol, string))),
        map(shape_name, RawNode::symbol),
    ))(input)?;
    let (input, items) = many0(preceded(sp1, alt((attr_or_flag, primary))))(input)?;

    let mut children = Vec::with_capacity(items.len() + 1);
    children.push(shape);
    children.extend(items);
    Ok((input, RawNode::new("body", children)))
}

fn shape_name(input: &str) -> IResult<&str, &str> {
    let (rest, name) = identifier(input)?;
    match Shape::from_name(name) {
        Some(_) => Ok((rest, name)),
        None => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Tag,
        ))),
    }
}

fn primary(input: &str) -> IResult<&str, RawNode> {
    alt((
        number,
        string,
        vector,
        parenthesized,
        scope,
        function,
        lambda,
        call,
        symbol,
    ))(input)
}

/// `[x, y]`
fn vector(input: &str) -> IResult<&str, RawNode> {
    let (input, _) = pair(char('['), sp)(input)?;
    let (input, x) = expr(input)?;
    let (input, _) = comma(input)?;
    let (input, y) = expr(input)?;
    let (input, _) = pair(sp, char(']'))(input)?;
    Ok((input, RawNode::new("vector", vec![x, y])))
}

fn parenthesized(input: &str) -> IResult<&str, RawNode> {
    delimited(pair(char('('), sp), constraint_or_expr, pair(sp, char(')')))(input)
}

/// `{ stmts } attrs`
fn scope(input: &str) -> IResult<&str, RawNode> {
    let (input, stmts) = block(input)?;
    let (input, attrs) = attr_list(input)?;

    let mut children = vec![RawNode::new("composite", stmts)];
    if !attrs.children.is_empty() {
        children.push(attrs);
    }
    Ok((input, RawNode::new("scope", children)))
}

fn block(input: &str) -> IResult<&str, Vec<RawNode>> {
    delimited(char('{'), statements, pair(sp, char('}')))(input)
}

fn params(input: &str) -> IResult<&str, RawNode> {
    map(
        delimited(sp, separated_list0(comma, symbol), sp),
        |names| RawNode::new("params", names),
    )(input)
}

/// `fn(x, y) { stmts }`
fn function(input: &str) -> IResult<&str, RawNode> {
    let (input, _) = pair(tag("fn"), sp)(input)?;
    let (input, params) = delimited(char('('), params, char(')'))(input)?;
    let (input, stmts) = preceded(sp, block)(input)?;
    Ok((
        input,
        RawNode::new("fn", vec![params, RawNode::new("composite", stmts)]),
    ))
}

/// `|x, y| expr`
fn lambda(input: &str) -> IResult<&str, RawNode> {
    let (input, params) = delimited(char('|'), params, char('|'))(input)?;
    let (input, body) = preceded(sp, constraint_or_expr)(input)?;
    Ok((input, RawNode::new("lambda", vec![params, body])))
}

/// `name(args)`
fn call(input: &str) -> IResult<&str, RawNode> {
    let (input, callee) = symbol(input)?;
    let (input, args) = delimited(
        pair(char('('), sp),
        separated_list0(comma, constraint_or_expr),
        pair(sp, char(')')),
    )(input)?;

    let mut children = Vec::with_capacity(args.len() + 1);
    children.push(callee);
    children.extend(args);
    Ok((input, RawNode::new("call", children)))
}
