//! Callable value types: closures and builtins

use std::sync::Arc;

use crate::ast::{FnDef, Node};
use crate::{Environment, EvalContext, EvalError};

use super::{Labels, Value};

/// Type alias for builtin function pointers to reduce complexity
pub type BuiltinFnPtr = Arc<
    dyn Fn(Environment, &[Value], &EvalContext) -> Result<(Environment, Value), EvalError>
        + Send
        + Sync,
>;

/// A user-defined function created by evaluating a `fn` node.
///
/// The body runs in the caller's labels with the parameters bound on top.
/// `captured` is consulted only for names the caller does not bind, which
/// keeps parameters of enclosing functions visible to functions they return.
#[derive(Debug, Clone)]
pub struct Closure {
    /// Parameter names
    pub params: Vec<String>,

    /// The closure body
    pub body: Arc<Node>,

    /// Labels visible where the closure was created
    pub captured: Arc<Labels>,
}

impl Closure {
    /// Create a closure from a function literal and the current labels.
    pub fn new(def: &FnDef, captured: Arc<Labels>) -> Self {
        Self {
            params: def.params.clone(),
            body: Arc::clone(&def.body),
            captured,
        }
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// A built-in native function.
///
/// Built-ins receive the caller's environment and return it, possibly with
/// more entities accumulated.
#[derive(Clone)]
pub struct BuiltinFn {
    /// Function name (for display/debugging)
    pub name: String,

    /// Arity (-1 for variadic)
    pub arity: i32,

    /// The actual function pointer
    pub func: BuiltinFnPtr,
}

impl BuiltinFn {
    /// Create a builtin from a plain function.
    pub fn new<F>(name: impl Into<String>, arity: i32, func: F) -> Self
    where
        F: Fn(Environment, &[Value], &EvalContext) -> Result<(Environment, Value), EvalError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            arity,
            func: Arc::new(func),
        }
    }
}

impl std::fmt::Debug for BuiltinFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BuiltinFn({})", self.name)
    }
}
