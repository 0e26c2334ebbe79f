//! Error types for normalization, evaluation, and hydration

use thiserror::Error;

use crate::frontend::ParseError;
use crate::value::Value;

/// Structural error raised while normalizing a raw parse tree.
///
/// These indicate drift between a frontend's grammar and the normalizer,
/// never a user mistake, and always abort the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    /// A node had the wrong number of children for its tag
    #[error("malformed `{tag}` node: expected {expected} children, got {got}")]
    Arity {
        /// Node tag
        tag: String,
        /// Human-readable expected arity
        expected: String,
        /// Actual child count
        got: usize,
    },

    /// A tag outside the grammar vocabulary
    #[error("unknown node tag `{tag}`")]
    UnknownTag {
        /// The offending tag
        tag: String,
    },

    /// A child had a tag not allowed in its position
    #[error("unexpected `{found}` node in {context}")]
    Unexpected {
        /// Tag that was found
        found: String,
        /// Where it was found
        context: String,
    },

    /// A terminal node without token text
    #[error("`{tag}` node is missing its token text")]
    MissingText {
        /// Node tag
        tag: String,
    },

    /// A `number` token that does not parse
    #[error("invalid number literal `{text}`")]
    InvalidNumber {
        /// Token text
        text: String,
    },
}

/// Runtime error raised by the evaluator.
#[derive(Error, Debug, Clone)]
pub enum EvalError {
    /// A `body` named a shape outside the signature table
    #[error("unknown shape `{shape}`")]
    UnknownShape {
        /// Shape name as written
        shape: String,
    },

    /// Wrong number of positional shape parameters
    #[error("shape `{shape}` takes {expected} positional parameters, got {got}")]
    ShapeArity {
        /// Shape name
        shape: String,
        /// Human-readable expected count
        expected: String,
        /// Actual count
        got: usize,
    },

    /// Callee resolved neither in labels nor in the built-ins table
    #[error("function `{}` not found (labels in scope: {})", .name, label_names(.labels))]
    FunctionNotFound {
        /// Unresolved callee
        name: String,
        /// Snapshot of the caller's label bindings
        labels: Vec<(String, Value)>,
    },

    /// Callee resolved to a value that cannot be called
    #[error("`{name}` is bound to a {found}, which is not callable")]
    NotCallable {
        /// Callee name
        name: String,
        /// Type of the bound value
        found: String,
    },

    /// Closure called with the wrong number of arguments
    #[error("`{name}` expects {expected} arguments, got {got}")]
    ArityMismatch {
        /// Callee name
        name: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        got: usize,
    },

    /// A value of the wrong type where a specific one was required
    #[error("type error in {context}: expected {expected}, got {got}")]
    TypeError {
        /// Where the value was used
        context: String,
        /// Expected type
        expected: String,
        /// Actual type
        got: String,
    },

    /// A constraint endpoint that is neither a body nor a label
    #[error("constraint endpoint must be a body or a label, got {got}")]
    InvalidEndpoint {
        /// Type of the offending value
        got: String,
    },

    /// Two entities in the same scope carry the same explicit label
    #[error("duplicate label `{name}` in the same scope")]
    DuplicateLabel {
        /// The repeated label
        name: String,
    },

    /// Closure nesting exceeded the configured depth
    #[error("stack overflow: call depth {depth} exceeds maximum {max}")]
    StackOverflow {
        /// Depth reached
        depth: usize,
        /// Configured maximum
        max: usize,
    },

    /// Evaluation was interrupted through the context flag
    #[error("evaluation interrupted")]
    Interrupted,
}

/// Error raised while materializing a scene into an engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HydrateError {
    /// A constraint endpoint with no matching body (strict policy only)
    #[error("constraint {constraint} endpoint `{endpoint}` does not resolve to a body")]
    UnresolvedEndpoint {
        /// Internal id of the constraint
        constraint: u64,
        /// Endpoint as written
        endpoint: String,
    },

    /// The engine rejected a call
    #[error("engine error: {0}")]
    Engine(String),
}

/// Umbrella error for a full source-to-world run.
#[derive(Error, Debug)]
pub enum SceneError {
    /// Frontend failed to parse the source
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Raw tree did not match the grammar vocabulary
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// Evaluation failed
    #[error(transparent)]
    Eval(#[from] EvalError),

    /// Hydration failed
    #[error(transparent)]
    Hydrate(#[from] HydrateError),

    /// Configuration could not be loaded
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type alias for full runs.
pub type Result<T> = std::result::Result<T, SceneError>;

/// Get a human-readable type name for a value.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Unit => "unit",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Vector(_) => "vector",
        Value::List(_) => "list",
        Value::Body(_) => "body",
        Value::Constraint(_) => "constraint",
        Value::Composite(_) => "composite",
        Value::Closure(_) => "closure",
        Value::Builtin(_) => "builtin",
    }
}

fn label_names(labels: &[(String, Value)]) -> String {
    if labels.is_empty() {
        return "none".to_string();
    }
    labels
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_not_found_lists_labels() {
        let err = EvalError::FunctionNotFound {
            name: "spin".to_string(),
            labels: vec![
                ("a".to_string(), Value::Number(1.0)),
                ("b".to_string(), Value::string("red")),
            ],
        };
        assert_eq!(
            err.to_string(),
            "function `spin` not found (labels in scope: a, b)"
        );
    }

    #[test]
    fn test_function_not_found_without_labels() {
        let err = EvalError::FunctionNotFound {
            name: "spin".to_string(),
            labels: vec![],
        };
        assert!(err.to_string().ends_with("(labels in scope: none)"));
    }

    #[test]
    fn test_scene_error_from_eval() {
        let err: SceneError = EvalError::Interrupted.into();
        assert!(matches!(err, SceneError::Eval(EvalError::Interrupted)));
    }
}
