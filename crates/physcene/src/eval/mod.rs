//! Expression evaluation

pub mod body;
pub mod call;
pub mod composite;
pub mod constraint;
pub mod function;
pub mod label;
pub mod literal;

pub use call::call_value;

use indexmap::IndexMap;
use tracing::trace;

use crate::ast::{Attr, Node};
use crate::value::{EntityId, Scene, Transform, Value};
use crate::{Environment, EvalContext, EvalError};

/// What every evaluation step produces: the next environment and a value.
pub type EvalResult = Result<(Environment, Value), EvalError>;

/// Trait for evaluating AST nodes to values.
///
/// This is the core abstraction for the tree-walking interpreter. The
/// environment is taken by value and handed back, so every step is a pure
/// function of its inputs apart from id minting.
pub trait Evaluate {
    /// Evaluate this AST node in the given environment.
    fn eval(&self, env: Environment, ctx: &EvalContext) -> EvalResult;
}

// ═══════════════════════════════════════════════════════════════════════
// Main Node Dispatcher
// ═══════════════════════════════════════════════════════════════════════

impl Evaluate for Node {
    fn eval(&self, env: Environment, ctx: &EvalContext) -> EvalResult {
        // Check for interruption before each node
        if ctx.is_interrupted() {
            return Err(EvalError::Interrupted);
        }

        if ctx.trace {
            trace!(kind = self.kind_name(), depth = env.call_depth(), "eval");
        }

        match self {
            Node::Symbol(name) => Ok(literal::eval_symbol(name, env)),
            Node::Number(n) => Ok((env, Value::Number(*n))),
            Node::Str(s) => Ok((env, Value::string(s.clone()))),
            Node::Bool(b) => Ok((env, Value::Bool(*b))),
            Node::Vector(x, y) => literal::eval_vector(x, y, env, ctx),

            Node::Body { shape, args, attrs } => body::eval_body(shape, args, attrs, env, ctx),
            Node::Constraint {
                from,
                kind,
                to,
                attrs,
            } => constraint::eval_constraint(from, *kind, to, attrs, env, ctx),

            Node::Composite(stmts) => composite::eval_composite(stmts, env, ctx),
            Node::Scope { body, attrs } => composite::eval_scope(body, attrs, env, ctx),

            Node::Label { name, value } => label::eval_label(name, value, env, ctx),
            Node::Fn(def) => Ok(function::eval_fn(def, env)),
            Node::Call { callee, args } => call::eval_call(callee, args, env, ctx),
        }
    }
}

/// Evaluate a whole program into a [`Scene`].
///
/// The program runs in a fresh environment; its accumulators become the
/// root composite.
///
/// # Errors
///
/// Returns the first evaluation error; nothing is returned for a partial run.
pub fn eval_program(program: &Node, ctx: &EvalContext) -> Result<Scene, EvalError> {
    eval_program_in(program, Environment::new(), ctx)
}

/// Evaluate a program starting from a prepared environment.
///
/// # Errors
///
/// Returns the first evaluation error.
pub fn eval_program_in(
    program: &Node,
    env: Environment,
    ctx: &EvalContext,
) -> Result<Scene, EvalError> {
    let (env, value) = program.eval(env, ctx)?;
    let root = env.into_composite(EntityId(0), Transform::default(), IndexMap::new());
    tracing::debug!(
        bodies = root.total_bodies(),
        constraints = root.total_constraints(),
        composites = root.composites.len(),
        "program evaluated"
    );
    Ok(Scene { root, value })
}

/// Evaluate nodes left-to-right, threading the environment.
///
/// # Errors
///
/// Returns the first evaluation error.
pub fn eval_args(
    nodes: &[Node],
    env: Environment,
    ctx: &EvalContext,
) -> Result<(Environment, Vec<Value>), EvalError> {
    let mut env = env;
    let mut values = Vec::with_capacity(nodes.len());
    for node in nodes {
        let (next, value) = node.eval(env, ctx)?;
        env = next;
        values.push(value);
    }
    Ok((env, values))
}

/// Evaluate attribute values left-to-right into an ordered map.
///
/// A repeated key keeps its first position and its last value.
///
/// # Errors
///
/// Returns the first evaluation error.
pub fn eval_attrs(
    attrs: &[Attr],
    env: Environment,
    ctx: &EvalContext,
) -> Result<(Environment, IndexMap<String, Value>), EvalError> {
    let mut env = env;
    let mut out = IndexMap::with_capacity(attrs.len());
    for attr in attrs {
        let (next, value) = attr.value.eval(env, ctx)?;
        env = next;
        out.insert(attr.key.clone(), value);
    }
    Ok((env, out))
}
