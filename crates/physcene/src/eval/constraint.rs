//! Constraint construction

use std::sync::Arc;

use crate::ast::{Attr, EdgeKind, Node};
use crate::error::type_name;
use crate::value::{Constraint, Endpoint, Value};
use crate::{Environment, EvalContext, EvalError};

use super::{eval_attrs, EvalResult, Evaluate};

/// Evaluate a `constraint` node.
///
/// Endpoints are resolved left to right, so an inline body on the `from`
/// side is accumulated before one on the `to` side.
///
/// # Errors
///
/// Returns `InvalidEndpoint` if an endpoint is neither a body nor a label.
pub fn eval_constraint(
    from: &Node,
    kind: EdgeKind,
    to: &Node,
    attrs: &[Attr],
    env: Environment,
    ctx: &EvalContext,
) -> EvalResult {
    let (env, from) = eval_endpoint(from, env, ctx)?;
    let (env, to) = eval_endpoint(to, env, ctx)?;
    let (env, attrs) = eval_attrs(attrs, env, ctx)?;

    let constraint = Value::Constraint(Arc::new(Constraint {
        id: ctx.mint_id(),
        from,
        kind,
        to,
        attrs,
    }));
    let env = env.accumulate(&constraint, ctx.label_policy)?;
    Ok((env, constraint))
}

/// Resolve one side of a constraint.
///
/// A bare symbol bound to a body yields that body's id. An unbound symbol
/// stays symbolic and is resolved against the label index at hydration,
/// which is what lets constraints name bodies declared later or in other
/// scopes. Any other expression is evaluated (accumulating inline bodies)
/// and must produce a body or a string.
///
/// # Errors
///
/// Returns `InvalidEndpoint` for any other value.
pub fn eval_endpoint(
    node: &Node,
    env: Environment,
    ctx: &EvalContext,
) -> Result<(Environment, Endpoint), EvalError> {
    if let Node::Symbol(name) = node {
        let endpoint = match env.get(name) {
            None => Endpoint::Label(name.clone()),
            Some(value) => endpoint_of(value)?,
        };
        return Ok((env, endpoint));
    }

    let (env, value) = node.eval(env, ctx)?;
    let endpoint = endpoint_of(&value)?;
    Ok((env, endpoint))
}

fn endpoint_of(value: &Value) -> Result<Endpoint, EvalError> {
    match value {
        Value::Body(body) => Ok(Endpoint::Id(body.id)),
        Value::String(name) => Ok(Endpoint::Label(name.as_str().to_string())),
        other => Err(EvalError::InvalidEndpoint {
            got: type_name(other).to_string(),
        }),
    }
}
