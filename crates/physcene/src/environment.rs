//! Runtime environment: label bindings and entity accumulators

mod accumulator;
mod prelude;

pub use prelude::{builtin, builtin_names};

use std::sync::Arc;

use crate::error::EvalError;
use crate::value::{Body, Composite, Constraint, Labels, Value};

/// The record threaded through evaluation.
///
/// Every evaluation step takes an environment by value and returns the
/// next one. `labels` is shared copy-on-write; the entity accumulators only
/// ever grow.
///
/// # Example
///
/// ```
/// use physcene::{Environment, Value};
///
/// let env = Environment::new().define("x", Value::Number(1.0));
///
/// // Parameters shadow outer bindings for the duration of a call
/// let inner = env
///     .clone()
///     .bind_params("f", &["x".to_string()], vec![Value::Number(10.0)])
///     .unwrap();
/// assert_eq!(inner.get("x"), Some(&Value::Number(10.0)));
///
/// // The caller's binding is untouched
/// assert_eq!(env.get("x"), Some(&Value::Number(1.0)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Resolved name bindings
    labels: Arc<Labels>,

    /// Bodies realized so far in the current scope
    bodies: Vec<Arc<Body>>,

    /// Constraints realized so far in the current scope
    constraints: Vec<Arc<Constraint>>,

    /// Nested composites realized so far in the current scope
    composites: Vec<Arc<Composite>>,

    /// Current closure call depth
    call_depth: usize,
}

impl Environment {
    /// Create a new empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an environment with pre-bound labels.
    pub fn with_labels(labels: Labels) -> Self {
        Self {
            labels: Arc::new(labels),
            ..Default::default()
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Label Lookup and Binding
    // ═══════════════════════════════════════════════════════════════════

    /// Look up a binding by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.labels.get(name)
    }

    /// Check if a binding exists.
    pub fn contains(&self, name: &str) -> bool {
        self.labels.contains_key(name)
    }

    /// The current bindings.
    pub fn labels(&self) -> &Arc<Labels> {
        &self.labels
    }

    /// Copy of the current bindings in definition order (for diagnostics).
    pub fn label_snapshot(&self) -> Vec<(String, Value)> {
        self.labels
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Bind `name` to `value`, replacing any previous binding.
    pub fn define(mut self, name: impl Into<String>, value: Value) -> Self {
        Arc::make_mut(&mut self.labels).insert(name.into(), value);
        self
    }

    /// Bind parameters to arguments, shadowing previous bindings.
    ///
    /// Entity accumulators are carried over unchanged so whatever the call
    /// appends extends the caller's lists once merged back.
    ///
    /// # Errors
    ///
    /// Returns `ArityMismatch` if the argument count differs from the
    /// parameter count.
    pub fn bind_params(
        mut self,
        callee: &str,
        params: &[String],
        args: Vec<Value>,
    ) -> Result<Self, EvalError> {
        if params.len() != args.len() {
            return Err(EvalError::ArityMismatch {
                name: callee.to_string(),
                expected: params.len(),
                got: args.len(),
            });
        }

        let labels = Arc::make_mut(&mut self.labels);
        for (param, arg) in params.iter().zip(args) {
            labels.insert(param.clone(), arg);
        }
        Ok(self)
    }

    /// Add bindings for names this environment does not bind yet.
    pub fn with_fallback_labels(mut self, fallback: &Labels) -> Self {
        let missing: Vec<_> = fallback
            .iter()
            .filter(|(name, _)| !self.labels.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            let labels = Arc::make_mut(&mut self.labels);
            for (name, value) in missing {
                labels.insert(name.clone(), value.clone());
            }
        }
        self
    }

    // ═══════════════════════════════════════════════════════════════════
    // Call Depth Tracking (Stack Overflow Protection)
    // ═══════════════════════════════════════════════════════════════════

    /// Enter a closure call. Returns error if max depth exceeded.
    pub fn enter_call(mut self, max_depth: usize) -> Result<Self, EvalError> {
        if self.call_depth >= max_depth {
            return Err(EvalError::StackOverflow {
                depth: self.call_depth,
                max: max_depth,
            });
        }
        self.call_depth += 1;
        Ok(self)
    }

    /// Get current call depth.
    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    // ═══════════════════════════════════════════════════════════════════
    // Scope Isolation and Merging
    // ═══════════════════════════════════════════════════════════════════

    /// Same labels and depth, empty accumulators.
    pub fn with_cleared_entities(&self) -> Self {
        Self {
            labels: Arc::clone(&self.labels),
            bodies: Vec::new(),
            constraints: Vec::new(),
            composites: Vec::new(),
            call_depth: self.call_depth,
        }
    }

    /// Keep this environment's labels and depth, take `callee`'s accumulators.
    ///
    /// `callee` must have started from this environment's accumulators, so
    /// its lists are this environment's lists plus whatever it appended.
    pub fn with_entities_of(self, callee: Environment) -> Self {
        Self {
            labels: self.labels,
            bodies: callee.bodies,
            constraints: callee.constraints,
            composites: callee.composites,
            call_depth: self.call_depth,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// Bodies accumulated in this scope.
    pub fn bodies(&self) -> &[Arc<Body>] {
        &self.bodies
    }

    /// Constraints accumulated in this scope.
    pub fn constraints(&self) -> &[Arc<Constraint>] {
        &self.constraints
    }

    /// Composites accumulated in this scope.
    pub fn composites(&self) -> &[Arc<Composite>] {
        &self.composites
    }

    /// Total entities accumulated in this scope (not counting nested ones).
    pub fn entity_count(&self) -> usize {
        self.bodies.len() + self.constraints.len() + self.composites.len()
    }
}
