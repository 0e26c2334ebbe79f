//! Label declarations

use std::sync::Arc;

use crate::ast::Node;
use crate::value::{EntityId, Value};
use crate::{Environment, EvalContext};

use super::{EvalResult, Evaluate};

/// Evaluate `name: value`.
///
/// An unlabelled body or composite is relabelled where it sits in its
/// accumulator, and the name is bound to it so later constraints resolve to
/// the same id. An entity that already has a label only gains `name` as an
/// alias. Anything else is bound as a scalar.
///
/// # Errors
///
/// Returns errors from the value, or `DuplicateLabel`.
pub fn eval_label(name: &str, value: &Node, env: Environment, ctx: &EvalContext) -> EvalResult {
    let (env, value) = value.eval(env, ctx)?;

    let unlabelled = match &value {
        Value::Body(body) if body.label.is_none() => Some(body.id),
        Value::Composite(composite) if composite.label.is_none() => Some(composite.id),
        _ => None,
    };

    let Some(id) = unlabelled else {
        return Ok((env.define(name, value.clone()), value));
    };

    let (env, relabelled) = env.relabel(id, name, ctx.label_policy)?;
    let value = relabelled.unwrap_or_else(|| detached_label(value, id, name));
    Ok((env.define(name, value.clone()), value))
}

/// Label an entity that is not in the current accumulators, e.g. one
/// produced in another scope and passed in by value.
fn detached_label(value: Value, id: EntityId, name: &str) -> Value {
    match value {
        Value::Body(body) if body.id == id => {
            let mut body = Arc::unwrap_or_clone(body);
            body.label = Some(name.to_string());
            Value::from(body)
        }
        Value::Composite(composite) if composite.id == id => {
            let mut composite = Arc::unwrap_or_clone(composite);
            composite.label = Some(name.to_string());
            Value::from(composite)
        }
        other => other,
    }
}
