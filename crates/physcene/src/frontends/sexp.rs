//! S-expression frontend
//!
//! Spells the raw parse tree directly: every list is `(tag child*)`, and
//! atoms are strings, numbers, or symbols (`:name` keyword spelling is
//! accepted for symbols). Top-level forms are wrapped in a `composite`
//! unless the source is a single `(composite ...)` form.
//!
//! ```text
//! (label :a (body "circle" 0 0 10))
//! (constraint a (rigid) (body rectangle 40 0 10 10))
//! ```

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, multispace1},
    combinator::{all_consuming, map, recognize},
    multi::many0,
    number::complete::recognize_float,
    sequence::{delimited, pair, preceded, terminated},
    Finish, IResult,
};

use crate::ast::RawNode;
use crate::frontend::{ParseError, SceneFrontend};

/// S-expression frontend.
///
/// # Example
///
/// ```
/// use physcene::frontends::SexpFrontend;
/// use physcene::SceneFrontend;
///
/// let raw = SexpFrontend::new().parse("(body circle 0 0 10)").unwrap();
/// assert_eq!(raw.tag, "composite");
/// assert_eq!(raw.children[0].tag, "body");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SexpFrontend;

impl SexpFrontend {
    /// Create a new s-expression frontend.
    pub fn new() -> Self {
        Self
    }
}

impl SceneFrontend for SexpFrontend {
    fn parse(&self, source: &str) -> Result<RawNode, ParseError> {
        let (_, forms) = all_consuming(delimited(sp, many0(terminated(form, sp)), sp))(source)
            .finish()
            .map_err(|e| {
                ParseError::at_remaining(
                    format!("unexpected input ({})", e.code.description()),
                    source,
                    e.input,
                )
            })?;

        match <[RawNode; 1]>::try_from(forms) {
            Ok([only]) if only.tag == "composite" => Ok(only),
            Ok([only]) => Ok(RawNode::new("composite", vec![only])),
            Err(forms) => Ok(RawNode::new("composite", forms)),
        }
    }

    fn name(&self) -> &str {
        "sexp"
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Grammar
// ═══════════════════════════════════════════════════════════════════════

/// Whitespace and `;` line comments.
fn sp(input: &str) -> IResult<&str, &str> {
    recognize(many0(alt((
        multispace1,
        recognize(pair(char(';'), take_while(|c| c != '\n'))),
    ))))(input)
}

fn form(input: &str) -> IResult<&str, RawNode> {
    alt((list, string, number, symbol))(input)
}

fn list(input: &str) -> IResult<&str, RawNode> {
    let (input, _) = char('(')(input)?;
    let (input, tag) = preceded(sp, take_while1(|c: char| c.is_alphanumeric() || c == '_'))(input)?;
    let (input, children) = many0(preceded(sp, form))(input)?;
    let (input, _) = preceded(sp, char(')'))(input)?;
    Ok((input, RawNode::new(tag, children)))
}

fn string(input: &str) -> IResult<&str, RawNode> {
    map(
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
        RawNode::string,
    )(input)
}

fn number(input: &str) -> IResult<&str, RawNode> {
    map(recognize_float, RawNode::number)(input)
}

fn symbol(input: &str) -> IResult<&str, RawNode> {
    map(take_while1(is_symbol_char), RawNode::symbol)(input)
}

fn is_symbol_char(c: char) -> bool {
    c.is_alphanumeric() || "_-+*/<>=!?:.#".contains(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> RawNode {
        SexpFrontend::new().parse(source).unwrap()
    }

    #[test]
    fn test_label_form() {
        let raw = parse(r#"(label :a (body "circle" 0 0 10))"#);
        let expected = RawNode::new(
            "composite",
            vec![RawNode::new(
                "label",
                vec![
                    RawNode::symbol(":a"),
                    RawNode::new(
                        "body",
                        vec![
                            RawNode::string("circle"),
                            RawNode::number("0"),
                            RawNode::number("0"),
                            RawNode::number("10"),
                        ],
                    ),
                ],
            )],
        );
        assert_eq!(raw, expected);
    }

    #[test]
    fn test_single_composite_is_not_rewrapped() {
        let raw = parse("(composite (body circle 0 0 1) (body circle 5 0 1))");
        assert_eq!(raw.tag, "composite");
        assert_eq!(raw.children.len(), 2);
    }

    #[test]
    fn test_comments_and_operators() {
        let raw = parse("; sum\n(call + 1 -2.5)");
        let call = &raw.children[0];
        assert_eq!(call.children[0], RawNode::symbol("+"));
        assert_eq!(call.children[2], RawNode::number("-2.5"));
    }

    #[test]
    fn test_empty_string_literal() {
        let raw = parse(r#"(body circle 0 0 1 (attr color ""))"#);
        let attr = &raw.children[0].children[4];
        assert_eq!(attr.children[1], RawNode::string(""));
    }

    #[test]
    fn test_unbalanced_parens() {
        let err = SexpFrontend::new().parse("(body circle 0 0 1").unwrap_err();
        assert!(err.location.is_some());
    }
}
