//! Statement sequences and isolated scopes

use indexmap::IndexMap;

use crate::ast::{Attr, Node};
use crate::error::type_name;
use crate::value::{Transform, Value};
use crate::{Environment, EvalContext, EvalError};

use super::{eval_attrs, EvalResult, Evaluate};

/// Evaluate statements in order, threading the environment.
///
/// The value is that of the last statement, or unit when empty.
///
/// # Errors
///
/// Returns errors from statement evaluation.
pub fn eval_composite(stmts: &[Node], env: Environment, ctx: &EvalContext) -> EvalResult {
    let mut env = env;
    let mut last_value = Value::Unit;

    for stmt in stmts {
        let (next, value) = stmt.eval(env, ctx)?;
        env = next;
        last_value = value;
    }

    Ok((env, last_value))
}

/// Evaluate a `scope` node.
///
/// The body runs with empty accumulators and inherited labels. Its
/// entities are wrapped into one composite, which is accumulated into the
/// enclosing environment. Labels bound inside do not leak out.
///
/// # Errors
///
/// Returns errors from the body or a malformed transform attribute.
pub fn eval_scope(body: &Node, attrs: &[Attr], env: Environment, ctx: &EvalContext) -> EvalResult {
    let (env, props) = eval_attrs(attrs, env, ctx)?;
    let (transform, props) = split_transform(props)?;

    let (inner, _) = body.eval(env.with_cleared_entities(), ctx)?;
    let composite = Value::from(inner.into_composite(ctx.mint_id(), transform, props));

    let env = env.accumulate(&composite, ctx.label_policy)?;
    Ok((env, composite))
}

/// Pull placement attributes out of a scope's attribute map.
///
/// Recognized keys: `translate` (vector), `x` and `y` (added to the
/// translation), `rotate` or `angle` (degrees), and `scale`. Everything else
/// is returned untouched.
///
/// # Errors
///
/// Returns `TypeError` if a recognized key has the wrong type.
pub fn split_transform(
    mut props: IndexMap<String, Value>,
) -> Result<(Transform, IndexMap<String, Value>), EvalError> {
    let mut transform = Transform::default();

    if let Some(value) = props.shift_remove("translate") {
        transform.translate = value
            .as_point()
            .ok_or_else(|| transform_error("translate", "vector", &value))?;
    }
    if let Some(value) = props.shift_remove("x") {
        transform.translate.x += expect_number("x", &value)?;
    }
    if let Some(value) = props.shift_remove("y") {
        transform.translate.y += expect_number("y", &value)?;
    }
    for key in ["rotate", "angle"] {
        if let Some(value) = props.shift_remove(key) {
            transform.rotate = expect_number(key, &value)?;
        }
    }
    if let Some(value) = props.shift_remove("scale") {
        transform.scale = expect_number("scale", &value)?;
    }

    Ok((transform, props))
}

fn expect_number(key: &str, value: &Value) -> Result<f64, EvalError> {
    value
        .as_number()
        .ok_or_else(|| transform_error(key, "number", value))
}

fn transform_error(key: &str, expected: &str, got: &Value) -> EvalError {
    EvalError::TypeError {
        context: format!("scope attribute `{}`", key),
        expected: expected.to_string(),
        got: type_name(got).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Point;

    fn circle() -> Node {
        Node::body(
            "circle",
            vec![Node::Number(0.0), Node::Number(0.0), Node::Number(5.0)],
        )
    }

    #[test]
    fn test_composite_returns_last_value() {
        let stmts = vec![Node::Number(1.0), Node::Number(2.0)];
        let (_, value) = eval_composite(&stmts, Environment::new(), &EvalContext::new()).unwrap();
        assert_eq!(value, Value::Number(2.0));
    }

    #[test]
    fn test_scope_isolates_entities() {
        let body = Node::Composite(vec![circle(), circle()]);
        let (env, value) =
            eval_scope(&body, &[], Environment::new(), &EvalContext::new()).unwrap();

        assert!(env.bodies().is_empty());
        assert_eq!(env.composites().len(), 1);
        assert_eq!(value.as_composite().unwrap().bodies.len(), 2);
    }

    #[test]
    fn test_scope_labels_do_not_leak() {
        let body = Node::Composite(vec![Node::label("w", Node::Number(3.0))]);
        let (env, _) = eval_scope(&body, &[], Environment::new(), &EvalContext::new()).unwrap();
        assert!(!env.contains("w"));
    }

    #[test]
    fn test_split_transform() {
        let mut props = IndexMap::new();
        props.insert("translate".to_string(), Value::vector(10.0, 0.0));
        props.insert("y".to_string(), Value::Number(5.0));
        props.insert("rotate".to_string(), Value::Number(90.0));
        props.insert("color".to_string(), Value::string("red"));

        let (transform, rest) = split_transform(props).unwrap();
        assert_eq!(transform.translate, Point::new(10.0, 5.0));
        assert_eq!(transform.rotate, 90.0);
        assert_eq!(transform.scale, 1.0);
        assert_eq!(rest.len(), 1);
        assert!(rest.contains_key("color"));
    }

    #[test]
    fn test_split_transform_type_error() {
        let mut props = IndexMap::new();
        props.insert("scale".to_string(), Value::string("big"));
        assert!(matches!(
            split_transform(props),
            Err(EvalError::TypeError { .. })
        ));
    }
}
