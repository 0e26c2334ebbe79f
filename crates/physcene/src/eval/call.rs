//! Function call evaluation

use crate::ast::Node;
use crate::environment::builtin;
use crate::error::type_name;
use crate::value::{BuiltinFn, Closure, Value};
use crate::{Environment, EvalContext, EvalError};

use super::{eval_args, EvalResult, Evaluate};

/// Evaluate a call by name.
///
/// The callee is looked up in the labels first, then in the built-ins
/// table. Arguments are evaluated left to right in the caller's environment.
///
/// # Errors
///
/// - `FunctionNotFound` if neither lookup succeeds
/// - `NotCallable` if the label is bound to a non-callable value
pub fn eval_call(callee: &str, args: &[Node], env: Environment, ctx: &EvalContext) -> EvalResult {
    let func = match env.get(callee) {
        Some(value) => value.clone(),
        None => match builtin(callee) {
            Some(b) => Value::Builtin(b),
            None => {
                return Err(EvalError::FunctionNotFound {
                    name: callee.to_string(),
                    labels: env.label_snapshot(),
                })
            }
        },
    };

    let (env, args) = eval_args(args, env, ctx)?;
    call_value(callee, &func, args, env, ctx)
}

/// Call a Value as a function.
///
/// Only the callee's entity accumulators flow back to the caller; labels
/// bound during the call are dropped.
///
/// # Errors
///
/// Returns `NotCallable` if the value is not callable.
/// Returns `ArityMismatch` if the argument count doesn't match.
pub fn call_value(
    name: &str,
    func: &Value,
    args: Vec<Value>,
    env: Environment,
    ctx: &EvalContext,
) -> EvalResult {
    match func {
        Value::Closure(c) => call_closure(name, c, args, env, ctx),
        Value::Builtin(b) => call_builtin(b, args, env, ctx),
        other => Err(EvalError::NotCallable {
            name: name.to_string(),
            found: type_name(other).to_string(),
        }),
    }
}

/// Call a closure.
fn call_closure(
    name: &str,
    closure: &Closure,
    args: Vec<Value>,
    env: Environment,
    ctx: &EvalContext,
) -> EvalResult {
    let caller = env.with_cleared_entities();

    let inner = env
        .with_fallback_labels(&closure.captured)
        .bind_params(name, &closure.params, args)?
        .enter_call(ctx.max_call_depth)?;

    let (inner, value) = closure.body.eval(inner, ctx)?;
    Ok((caller.with_entities_of(inner), value))
}

/// Call a built-in function.
fn call_builtin(
    func: &BuiltinFn,
    args: Vec<Value>,
    env: Environment,
    ctx: &EvalContext,
) -> EvalResult {
    // Check arity (if not variadic)
    if func.arity >= 0 && args.len() != func.arity as usize {
        return Err(EvalError::ArityMismatch {
            name: func.name.clone(),
            expected: func.arity as usize,
            got: args.len(),
        });
    }

    let caller = env.with_cleared_entities();
    let (inner, value) = (func.func)(env, &args, ctx)?;
    Ok((caller.with_entities_of(inner), value))
}
