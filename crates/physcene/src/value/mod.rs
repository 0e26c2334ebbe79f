//! Value representation for runtime values

mod callable;
mod display;
mod entity;
mod impls;

pub use callable::{BuiltinFn, BuiltinFnPtr, Closure};
pub use entity::{
    Body, Composite, Constraint, Endpoint, EntityId, Point, Scene, Shape, Transform,
};

use std::sync::Arc;

use indexmap::IndexMap;

/// Ordered name → value bindings.
pub type Labels = IndexMap<String, Value>;

/// Runtime value produced by evaluating a scene node.
///
/// Values are organized into three tiers:
/// - Tier 1: Scalars bound by labels and passed to shapes
/// - Tier 2: Realized entities (Arc-wrapped, shared with accumulators)
/// - Tier 3: Callables
#[derive(Debug, Clone, Default)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Tier 1: Scalars
    // ═══════════════════════════════════════════════════════════════════
    /// Result of statements with nothing to return
    #[default]
    Unit,

    /// Flag value
    Bool(bool),

    /// All numbers are double precision
    Number(f64),

    /// Strings, including unbound symbols evaluated verbatim
    String(Arc<String>),

    /// `[x, y]` point
    Vector(Point),

    /// Ordered list (collected polygon vertices)
    List(Arc<Vec<Value>>),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 2: Entities
    // ═══════════════════════════════════════════════════════════════════
    /// Realized body
    Body(Arc<Body>),

    /// Realized constraint
    Constraint(Arc<Constraint>),

    /// Realized nested composite
    Composite(Arc<Composite>),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 3: Callables
    // ═══════════════════════════════════════════════════════════════════
    /// User-defined function
    Closure(Arc<Closure>),

    /// Core built-in
    Builtin(BuiltinFn),
}
