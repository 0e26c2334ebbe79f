//! Body construction

use indexmap::IndexMap;

use crate::ast::{Attr, Node};
use crate::error::type_name;
use crate::value::{Body, Shape, Value};
use crate::{Environment, EvalContext, EvalError};

use super::{eval_args, eval_attrs, EvalResult};

/// Evaluate a `body` node.
///
/// Positional arguments are assigned to the shape's signature, attributes
/// become properties, and the new body is accumulated and returned so a
/// wrapping constraint or label can refer to it.
///
/// # Errors
///
/// - `UnknownShape` if `shape` is not in the signature table
/// - `ShapeArity` if the positional count does not fit the signature
/// - `TypeError` if a parameter has the wrong type
pub fn eval_body(
    shape: &str,
    args: &[Node],
    attrs: &[Attr],
    env: Environment,
    ctx: &EvalContext,
) -> EvalResult {
    let shape = Shape::from_name(shape).ok_or_else(|| EvalError::UnknownShape {
        shape: shape.to_string(),
    })?;

    let (env, args) = eval_args(args, env, ctx)?;
    let (env, props) = eval_attrs(attrs, env, ctx)?;
    let params = assign_params(shape, args)?;

    let body = Value::from(Body {
        id: ctx.mint_id(),
        shape,
        params,
        props,
        label: None,
    });
    let env = env.accumulate(&body, ctx.label_policy)?;
    Ok((env, body))
}

/// Assign positional values to signature names.
///
/// Fixed parameters must be numbers. A variadic shape's rest parameter
/// collects the remaining values, which must be vectors.
///
/// # Errors
///
/// Returns `ShapeArity` or `TypeError`.
pub fn assign_params(shape: Shape, args: Vec<Value>) -> Result<IndexMap<String, Value>, EvalError> {
    let signature = shape.signature();
    let fixed = if shape.is_variadic() {
        signature.len() - 1
    } else {
        signature.len()
    };

    let fits = if shape.is_variadic() {
        args.len() >= fixed
    } else {
        args.len() == fixed
    };
    if !fits {
        return Err(EvalError::ShapeArity {
            shape: shape.name().to_string(),
            expected: if shape.is_variadic() {
                format!("at least {}", fixed)
            } else {
                fixed.to_string()
            },
            got: args.len(),
        });
    }

    let mut params = IndexMap::with_capacity(signature.len());
    let mut args = args.into_iter();

    for (name, value) in signature[..fixed].iter().zip(args.by_ref()) {
        if value.as_number().is_none() {
            return Err(param_type_error(shape, name, "number", &value));
        }
        params.insert((*name).to_string(), value);
    }

    if shape.is_variadic() {
        let name = signature[fixed];
        let mut rest = Vec::new();
        for value in args {
            if value.as_point().is_none() {
                return Err(param_type_error(shape, name, "vector", &value));
            }
            rest.push(value);
        }
        params.insert(name.to_string(), Value::list(rest));
    }

    Ok(params)
}

fn param_type_error(shape: Shape, name: &str, expected: &str, got: &Value) -> EvalError {
    EvalError::TypeError {
        context: format!("{} parameter `{}`", shape, name),
        expected: expected.to_string(),
        got: type_name(got).to_string(),
    }
}
