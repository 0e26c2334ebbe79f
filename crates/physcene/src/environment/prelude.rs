//! Core built-ins available to every program

use super::Environment;
use crate::error::type_name;
use crate::eval::call_value;
use crate::value::{BuiltinFn, Value};
use crate::{EvalContext, EvalError};

type BuiltinResult = Result<(Environment, Value), EvalError>;

const BUILTIN_NAMES: &[&str] = &["+", "-", "*", "/", "repeat", "grid"];

/// Names of every built-in, in table order.
pub fn builtin_names() -> &'static [&'static str] {
    BUILTIN_NAMES
}

/// Look up a built-in by name.
pub fn builtin(name: &str) -> Option<BuiltinFn> {
    let b = match name {
        // Arithmetic
        "+" => BuiltinFn::new("+", -1, builtin_add),
        "-" => BuiltinFn::new("-", -1, builtin_sub),
        "*" => BuiltinFn::new("*", -1, builtin_mul),
        "/" => BuiltinFn::new("/", -1, builtin_div),

        // Iteration
        "repeat" => BuiltinFn::new("repeat", 2, builtin_repeat),
        "grid" => BuiltinFn::new("grid", 3, builtin_grid),

        _ => return None,
    };
    Some(b)
}

// ═══════════════════════════════════════════════════════════════════════
// Arithmetic
// ═══════════════════════════════════════════════════════════════════════

fn builtin_add(env: Environment, args: &[Value], _ctx: &EvalContext) -> BuiltinResult {
    let sum = numbers("+", args)?.into_iter().sum::<f64>();
    Ok((env, Value::Number(sum)))
}

fn builtin_mul(env: Environment, args: &[Value], _ctx: &EvalContext) -> BuiltinResult {
    let product = numbers("*", args)?.into_iter().product::<f64>();
    Ok((env, Value::Number(product)))
}

fn builtin_sub(env: Environment, args: &[Value], _ctx: &EvalContext) -> BuiltinResult {
    let nums = numbers("-", args)?;
    let result = match nums.as_slice() {
        [] => 0.0,
        [only] => -only,
        [first, rest @ ..] => rest.iter().fold(*first, |acc, n| acc - n),
    };
    Ok((env, Value::Number(result)))
}

/// Division follows IEEE semantics: dividing by zero yields an infinity.
fn builtin_div(env: Environment, args: &[Value], _ctx: &EvalContext) -> BuiltinResult {
    let nums = numbers("/", args)?;
    let result = match nums.as_slice() {
        [] => 1.0,
        [only] => 1.0 / only,
        [first, rest @ ..] => rest.iter().fold(*first, |acc, n| acc / n),
    };
    Ok((env, Value::Number(result)))
}

fn numbers(op: &str, args: &[Value]) -> Result<Vec<f64>, EvalError> {
    args.iter()
        .enumerate()
        .map(|(i, arg)| {
            arg.as_number().ok_or_else(|| EvalError::TypeError {
                context: format!("argument {} of `{}`", i + 1, op),
                expected: "number".to_string(),
                got: type_name(arg).to_string(),
            })
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════
// Iteration
// ═══════════════════════════════════════════════════════════════════════

/// `repeat(n, f)`: call `f` `n` times, threading the environment.
///
/// `f` receives the iteration index if it takes a parameter.
fn builtin_repeat(env: Environment, args: &[Value], ctx: &EvalContext) -> BuiltinResult {
    let [n, f] = args else {
        return Err(arity_error("repeat", 2, args.len()));
    };
    let n = count("repeat", n)?;

    let mut env = env;
    let mut last = Value::Unit;
    for i in 0..n {
        let call_args = iteration_args(f, vec![Value::Number(i as f64)]);
        let (next, value) = call_value("repeat", f, call_args, env, ctx)?;
        env = next;
        last = value;
    }
    Ok((env, last))
}

/// `grid(nx, ny, f)`: call `f(x, y)` over the grid in row-major order.
fn builtin_grid(env: Environment, args: &[Value], ctx: &EvalContext) -> BuiltinResult {
    let [nx, ny, f] = args else {
        return Err(arity_error("grid", 3, args.len()));
    };
    let nx = count("grid", nx)?;
    let ny = count("grid", ny)?;

    let mut env = env;
    let mut last = Value::Unit;
    for y in 0..ny {
        for x in 0..nx {
            let call_args =
                iteration_args(f, vec![Value::Number(x as f64), Value::Number(y as f64)]);
            let (next, value) = call_value("grid", f, call_args, env, ctx)?;
            env = next;
            last = value;
        }
    }
    Ok((env, last))
}

/// Zero-parameter closures are called without the loop indices.
fn iteration_args(f: &Value, indices: Vec<Value>) -> Vec<Value> {
    match f {
        Value::Closure(c) if c.arity() == 0 => Vec::new(),
        _ => indices,
    }
}

fn arity_error(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::ArityMismatch {
        name: name.to_string(),
        expected,
        got,
    }
}

/// Iteration count: truncated toward zero, negative and NaN run zero times.
fn count(op: &str, value: &Value) -> Result<usize, EvalError> {
    let n = value.as_number().ok_or_else(|| EvalError::TypeError {
        context: format!("count argument of `{}`", op),
        expected: "number".to_string(),
        got: type_name(value).to_string(),
    })?;
    if n.is_nan() || n <= 0.0 {
        return Ok(0);
    }
    Ok(n.trunc() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(name: &str, args: &[Value]) -> Value {
        let b = builtin(name).unwrap();
        let (_, value) = (b.func)(Environment::new(), args, &EvalContext::new()).unwrap();
        value
    }

    fn n(v: f64) -> Value {
        Value::Number(v)
    }

    #[test]
    fn test_every_name_resolves() {
        for name in builtin_names() {
            assert!(builtin(name).is_some(), "missing builtin {}", name);
        }
        assert!(builtin("print").is_none());
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(apply("+", &[n(1.0), n(2.0), n(3.0)]), n(6.0));
        assert_eq!(apply("+", &[]), n(0.0));
        assert_eq!(apply("*", &[n(2.0), n(4.0)]), n(8.0));
        assert_eq!(apply("-", &[n(10.0), n(3.0), n(2.0)]), n(5.0));
        assert_eq!(apply("-", &[n(4.0)]), n(-4.0));
        assert_eq!(apply("/", &[n(12.0), n(3.0)]), n(4.0));
        assert_eq!(apply("/", &[n(4.0)]), n(0.25));
    }

    #[test]
    fn test_division_by_zero_does_not_raise() {
        assert_eq!(apply("/", &[n(1.0), n(0.0)]), n(f64::INFINITY));
    }

    #[test]
    fn test_arithmetic_type_error() {
        let b = builtin("+").unwrap();
        let result = (b.func)(
            Environment::new(),
            &[n(1.0), Value::string("x")],
            &EvalContext::new(),
        );
        assert!(matches!(result, Err(EvalError::TypeError { .. })));
    }

    #[test]
    fn test_count_truncates_and_clamps() {
        assert_eq!(count("repeat", &n(3.9)).unwrap(), 3);
        assert_eq!(count("repeat", &n(-2.0)).unwrap(), 0);
        assert_eq!(count("repeat", &n(f64::NAN)).unwrap(), 0);
        assert!(count("repeat", &Value::Unit).is_err());
    }

    #[test]
    fn test_repeat_with_builtin_callee() {
        let add = Value::Builtin(builtin("+").unwrap());
        let (_, value) = builtin_repeat(Environment::new(), &[n(4.0), add], &EvalContext::new())
            .unwrap();
        // Last iteration index is 3
        assert_eq!(value, n(3.0));
    }

    #[test]
    fn test_repeat_zero_times() {
        let add = Value::Builtin(builtin("+").unwrap());
        let (env, value) =
            builtin_repeat(Environment::new(), &[n(0.0), add], &EvalContext::new()).unwrap();
        assert!(value.is_unit());
        assert_eq!(env.entity_count(), 0);
    }
}
