//! Raw parse tree → scene AST
//!
//! A pure rewrite that never consults the environment. Any structural
//! mismatch is a [`NormalizeError`]: it means the frontend's grammar and
//! this module disagree, not that the program is wrong.

use std::sync::Arc;

use crate::ast::{Attr, EdgeKind, FnDef, Node, RawNode};
use crate::error::NormalizeError;

/// Normalize a raw parse tree.
///
/// # Errors
///
/// Returns a `NormalizeError` for unknown tags, wrong arities, or
/// malformed terminals.
pub fn normalize(raw: &RawNode) -> Result<Node, NormalizeError> {
    match raw.tag.as_str() {
        "composite" => Ok(Node::Composite(normalize_all(&raw.children)?)),

        "body" => normalize_body(raw),
        "constraint" => normalize_constraint(raw),

        "scope" => {
            expect_arity(raw, 1, 2, "1 or 2")?;
            let body = normalize(&raw.children[0])?;
            let attrs = match raw.children.get(1) {
                Some(attrs) => normalize_attr_list(attrs)?,
                None => Vec::new(),
            };
            Ok(Node::Scope {
                body: Box::new(body),
                attrs,
            })
        }

        "label" => {
            expect_arity(raw, 2, 2, "2")?;
            Ok(Node::Label {
                name: symbol_name(&raw.children[0])?,
                value: Box::new(normalize(&raw.children[1])?),
            })
        }

        // `lambda` is function-literal sugar with the same shape as `fn`
        "fn" | "lambda" => {
            expect_arity(raw, 2, 2, "2")?;
            Ok(Node::Fn(FnDef {
                params: normalize_params(&raw.children[0])?,
                body: Arc::new(normalize(&raw.children[1])?),
            }))
        }

        "call" => {
            if raw.children.is_empty() {
                return Err(arity_error(raw, "at least 1"));
            }
            Ok(Node::Call {
                callee: symbol_name(&raw.children[0])?,
                args: normalize_all(&raw.children[1..])?,
            })
        }

        "vector" => {
            expect_arity(raw, 2, 2, "2")?;
            Ok(Node::Vector(
                Box::new(normalize(&raw.children[0])?),
                Box::new(normalize(&raw.children[1])?),
            ))
        }

        "symbol" => Ok(Node::Symbol(symbol_text(raw)?)),

        "number" => {
            let text = token_text(raw)?;
            text.trim()
                .parse::<f64>()
                .map(Node::Number)
                .map_err(|_| NormalizeError::InvalidNumber {
                    text: text.to_string(),
                })
        }

        "string" => Ok(Node::Str(unquote(token_text(raw)?).to_string())),

        "attrs" | "attr" | "flag" | "params" | "rigid" | "spring" | "pin" | "rope" => {
            Err(NormalizeError::Unexpected {
                found: raw.tag.clone(),
                context: "expression position".to_string(),
            })
        }

        other => Err(NormalizeError::UnknownTag {
            tag: other.to_string(),
        }),
    }
}

fn normalize_all(children: &[RawNode]) -> Result<Vec<Node>, NormalizeError> {
    children.iter().map(normalize).collect()
}

/// `body`: `[shape, (arg | attr | flag | attrs)*]`
fn normalize_body(raw: &RawNode) -> Result<Node, NormalizeError> {
    let Some((shape, rest)) = raw.children.split_first() else {
        return Err(arity_error(raw, "at least 1"));
    };

    let shape = match shape.tag.as_str() {
        "symbol" => symbol_text(shape)?,
        "string" => unquote(token_text(shape)?).to_string(),
        other => {
            return Err(NormalizeError::Unexpected {
                found: other.to_string(),
                context: "body shape".to_string(),
            })
        }
    };

    let mut args = Vec::new();
    let mut attrs = Vec::new();
    for child in rest {
        match child.tag.as_str() {
            "attr" | "flag" => attrs.push(normalize_attr(child)?),
            "attrs" => attrs.extend(normalize_attr_list(child)?),
            _ => args.push(normalize(child)?),
        }
    }

    Ok(Node::Body { shape, args, attrs })
}

/// `constraint`: `[from, edge-kind, to, attrs?]`
fn normalize_constraint(raw: &RawNode) -> Result<Node, NormalizeError> {
    expect_arity(raw, 3, 4, "3 or 4")?;
    let from = normalize(&raw.children[0])?;
    let kind = edge_kind(&raw.children[1])?;
    let to = normalize(&raw.children[2])?;
    let attrs = match raw.children.get(3) {
        Some(attrs) => normalize_attr_list(attrs)?,
        None => Vec::new(),
    };
    Ok(Node::Constraint {
        from: Box::new(from),
        kind,
        to: Box::new(to),
        attrs,
    })
}

/// Edge kinds arrive either as a tagged node or as a symbol naming the kind.
fn edge_kind(raw: &RawNode) -> Result<EdgeKind, NormalizeError> {
    if let Some(kind) = EdgeKind::from_tag(&raw.tag) {
        return Ok(kind);
    }
    if raw.tag == "symbol" {
        if let Some(kind) = EdgeKind::from_tag(&symbol_text(raw)?) {
            return Ok(kind);
        }
    }
    Err(NormalizeError::Unexpected {
        found: raw.text.clone().unwrap_or_else(|| raw.tag.clone()),
        context: "constraint edge kind".to_string(),
    })
}

fn normalize_attr_list(raw: &RawNode) -> Result<Vec<Attr>, NormalizeError> {
    if raw.tag != "attrs" {
        return Err(NormalizeError::Unexpected {
            found: raw.tag.clone(),
            context: "attribute list".to_string(),
        });
    }
    raw.children.iter().map(normalize_attr).collect()
}

fn normalize_attr(raw: &RawNode) -> Result<Attr, NormalizeError> {
    match raw.tag.as_str() {
        "attr" => {
            expect_arity(raw, 2, 2, "2")?;
            Ok(Attr::new(
                symbol_name(&raw.children[0])?,
                normalize(&raw.children[1])?,
            ))
        }
        "flag" => {
            expect_arity(raw, 1, 1, "1")?;
            Ok(Attr::flag(symbol_name(&raw.children[0])?))
        }
        other => Err(NormalizeError::Unexpected {
            found: other.to_string(),
            context: "attribute".to_string(),
        }),
    }
}

fn normalize_params(raw: &RawNode) -> Result<Vec<String>, NormalizeError> {
    if raw.tag != "params" {
        return Err(NormalizeError::Unexpected {
            found: raw.tag.clone(),
            context: "parameter list".to_string(),
        });
    }
    raw.children.iter().map(symbol_name).collect()
}

/// The name carried by a child that must be a `symbol`.
fn symbol_name(raw: &RawNode) -> Result<String, NormalizeError> {
    if raw.tag != "symbol" {
        return Err(NormalizeError::Unexpected {
            found: raw.tag.clone(),
            context: "name position".to_string(),
        });
    }
    symbol_text(raw)
}

/// Symbol text with keyword-style `:name` spelling folded to `name`.
fn symbol_text(raw: &RawNode) -> Result<String, NormalizeError> {
    let text = token_text(raw)?;
    let name = text.strip_prefix(':').unwrap_or(text);
    Ok(name.to_string())
}

fn token_text(raw: &RawNode) -> Result<&str, NormalizeError> {
    raw.text
        .as_deref()
        .ok_or_else(|| NormalizeError::MissingText {
            tag: raw.tag.clone(),
        })
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}

fn expect_arity(
    raw: &RawNode,
    min: usize,
    max: usize,
    expected: &str,
) -> Result<(), NormalizeError> {
    let got = raw.children.len();
    if got < min || got > max {
        return Err(arity_error(raw, expected));
    }
    Ok(())
}

fn arity_error(raw: &RawNode, expected: &str) -> NormalizeError {
    NormalizeError::Arity {
        tag: raw.tag.clone(),
        expected: expected.to_string(),
        got: raw.children.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_symbol_keyword_prefix_is_dropped() {
        assert_eq!(
            normalize(&RawNode::symbol(":a")).unwrap(),
            Node::symbol("a")
        );
    }

    #[test]
    fn test_number_and_string_terminals() {
        assert_eq!(normalize(&RawNode::number("2.5")).unwrap(), Node::Number(2.5));
        assert_eq!(
            normalize(&RawNode::string("\"red\"")).unwrap(),
            Node::string("red")
        );
        assert!(matches!(
            normalize(&RawNode::number("1.2.3")),
            Err(NormalizeError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_terminal_without_text() {
        let raw = RawNode::new("number", vec![]);
        assert!(matches!(
            normalize(&raw),
            Err(NormalizeError::MissingText { .. })
        ));
    }

    #[test]
    fn test_body_splits_args_and_attrs() {
        let raw = RawNode::new(
            "body",
            vec![
                RawNode::string("circle"),
                RawNode::number("0"),
                RawNode::number("0"),
                RawNode::new("attr", vec![RawNode::symbol("color"), RawNode::symbol("red")]),
                RawNode::number("10"),
                RawNode::new("flag", vec![RawNode::symbol("static")]),
            ],
        );
        let expected = Node::Body {
            shape: "circle".to_string(),
            args: vec![Node::Number(0.0), Node::Number(0.0), Node::Number(10.0)],
            attrs: vec![
                Attr::new("color", Node::symbol("red")),
                Attr::flag("static"),
            ],
        };
        assert_eq!(normalize(&raw).unwrap(), expected);
    }

    #[test]
    fn test_constraint_arity_is_fixed() {
        let raw = RawNode::new(
            "constraint",
            vec![RawNode::symbol("a"), RawNode::new("rigid", vec![])],
        );
        assert!(matches!(
            normalize(&raw),
            Err(NormalizeError::Arity { got: 2, .. })
        ));
    }

    #[test]
    fn test_constraint_edge_kind_as_symbol() {
        let raw = RawNode::new(
            "constraint",
            vec![
                RawNode::symbol("a"),
                RawNode::symbol("rope"),
                RawNode::symbol("b"),
                RawNode::new(
                    "attrs",
                    vec![RawNode::new(
                        "attr",
                        vec![RawNode::symbol("length"), RawNode::number("40")],
                    )],
                ),
            ],
        );
        match normalize(&raw).unwrap() {
            Node::Constraint { kind, attrs, .. } => {
                assert_eq!(kind, EdgeKind::Rope);
                assert_eq!(attrs, vec![Attr::new("length", Node::Number(40.0))]);
            }
            other => panic!("expected constraint, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_edge_kind() {
        let raw = RawNode::new(
            "constraint",
            vec![
                RawNode::symbol("a"),
                RawNode::symbol("glue"),
                RawNode::symbol("b"),
            ],
        );
        assert!(matches!(
            normalize(&raw),
            Err(NormalizeError::Unexpected { .. })
        ));
    }

    #[test]
    fn test_lambda_sugar_matches_fn() {
        let params = RawNode::new("params", vec![RawNode::symbol("x")]);
        let body = RawNode::symbol("x");
        let sugar = RawNode::new("lambda", vec![params.clone(), body.clone()]);
        let canonical = RawNode::new("fn", vec![params, body]);
        assert_eq!(normalize(&sugar).unwrap(), normalize(&canonical).unwrap());
    }

    #[test]
    fn test_params_must_be_symbols() {
        let raw = RawNode::new(
            "fn",
            vec![
                RawNode::new("params", vec![RawNode::number("1")]),
                RawNode::symbol("x"),
            ],
        );
        assert!(matches!(
            normalize(&raw),
            Err(NormalizeError::Unexpected { .. })
        ));
    }

    #[test]
    fn test_unknown_tag() {
        let raw = RawNode::new("while", vec![]);
        assert!(matches!(
            normalize(&raw),
            Err(NormalizeError::UnknownTag { tag }) if tag == "while"
        ));
    }

    #[test]
    fn test_vector_arity() {
        let raw = RawNode::new("vector", vec![RawNode::number("1")]);
        assert!(matches!(normalize(&raw), Err(NormalizeError::Arity { .. })));
    }

    #[test]
    fn test_scope_with_attrs() {
        let raw = RawNode::new(
            "scope",
            vec![
                RawNode::new("composite", vec![]),
                RawNode::new(
                    "attrs",
                    vec![RawNode::new(
                        "attr",
                        vec![RawNode::symbol("scale"), RawNode::number("2")],
                    )],
                ),
            ],
        );
        assert_eq!(
            normalize(&raw).unwrap(),
            Node::Scope {
                body: Box::new(Node::Composite(vec![])),
                attrs: vec![Attr::new("scale", Node::Number(2.0))],
            }
        );
    }
}
