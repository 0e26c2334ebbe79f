//! Literal evaluation: symbols and vectors

use crate::ast::Node;
use crate::error::type_name;
use crate::value::{Point, Value};
use crate::{Environment, EvalContext, EvalError};

use super::{EvalResult, Evaluate};

/// Resolve a symbol against the labels.
///
/// Unbound symbols evaluate to their own name, so colors and forward
/// references can be written bare.
pub fn eval_symbol(name: &str, env: Environment) -> (Environment, Value) {
    let value = env
        .get(name)
        .cloned()
        .unwrap_or_else(|| Value::string(name));
    (env, value)
}

/// Evaluate a two-element vector literal into a point.
///
/// # Errors
///
/// Returns `TypeError` if either component is not a number.
pub fn eval_vector(x: &Node, y: &Node, env: Environment, ctx: &EvalContext) -> EvalResult {
    let (env, xv) = x.eval(env, ctx)?;
    let (env, yv) = y.eval(env, ctx)?;
    let point = Point::new(component(&xv, "x")?, component(&yv, "y")?);
    Ok((env, Value::Vector(point)))
}

fn component(value: &Value, axis: &str) -> Result<f64, EvalError> {
    value.as_number().ok_or_else(|| EvalError::TypeError {
        context: format!("vector {} component", axis),
        expected: "number".to_string(),
        got: type_name(value).to_string(),
    })
}
