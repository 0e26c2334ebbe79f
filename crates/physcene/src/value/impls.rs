//! Value trait implementations: constructors, predicates, extractors, From traits, PartialEq

use std::sync::Arc;

use super::*;

// ═══════════════════════════════════════════════════════════════════
// Convenience Constructors
// ═══════════════════════════════════════════════════════════════════

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Arc::new(s.into()))
    }

    /// Create a list value
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Arc::new(items))
    }

    /// Create a vector value
    pub fn vector(x: f64, y: f64) -> Self {
        Value::Vector(Point::new(x, y))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Type Predicates
    // ═══════════════════════════════════════════════════════════════════

    /// Check if value is unit type
    pub fn is_unit(&self) -> bool {
        matches!(self, Value::Unit)
    }

    /// Check if value is a realized entity
    pub fn is_entity(&self) -> bool {
        matches!(
            self,
            Value::Body(_) | Value::Constraint(_) | Value::Composite(_)
        )
    }

    /// Check if value can be called
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Closure(_) | Value::Builtin(_))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Extractors
    // ═══════════════════════════════════════════════════════════════════

    /// Get the number, if this is one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the string contents, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get the boolean, if this is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the point, if this is a vector
    pub fn as_point(&self) -> Option<Point> {
        match self {
            Value::Vector(p) => Some(*p),
            _ => None,
        }
    }

    /// Get the body, if this is one
    pub fn as_body(&self) -> Option<&Arc<Body>> {
        match self {
            Value::Body(b) => Some(b),
            _ => None,
        }
    }

    /// Get the composite, if this is one
    pub fn as_composite(&self) -> Option<&Arc<Composite>> {
        match self {
            Value::Composite(c) => Some(c),
            _ => None,
        }
    }

    /// Get the constraint, if this is one
    pub fn as_constraint(&self) -> Option<&Arc<Constraint>> {
        match self {
            Value::Constraint(c) => Some(c),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// From Implementations
// ═══════════════════════════════════════════════════════════════════

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::new(s))
    }
}

impl From<Point> for Value {
    fn from(p: Point) -> Self {
        Value::Vector(p)
    }
}

impl From<Body> for Value {
    fn from(b: Body) -> Self {
        Value::Body(Arc::new(b))
    }
}

impl From<Composite> for Value {
    fn from(c: Composite) -> Self {
        Value::Composite(Arc::new(c))
    }
}

// ═══════════════════════════════════════════════════════════════════
// PartialEq
// ═══════════════════════════════════════════════════════════════════

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Vector(a), Value::Vector(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Body(a), Value::Body(b)) => a == b,
            (Value::Constraint(a), Value::Constraint(b)) => a == b,
            (Value::Composite(a), Value::Composite(b)) => a == b,
            // Callables compare by identity
            (Value::Closure(a), Value::Closure(b)) => Arc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
            _ => false,
        }
    }
}
