//! Realized scene entities: bodies, constraints, composites

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::ast::EdgeKind;

use super::Value;

/// Internal identifier minted for every body, constraint, and composite.
///
/// Unique within one evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Create a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Shapes
// ═══════════════════════════════════════════════════════════════════════

/// Shapes a body can take, each with a fixed positional signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// `x y width height`
    Rectangle,
    /// `x y radius`
    Circle,
    /// `x y sides radius`
    Polygon,
    /// `x y width height slope`
    Trapezoid,
    /// `x y vertices...`
    FromVertices,
}

impl Shape {
    /// Look up a shape by the name used in programs.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "rectangle" => Some(Shape::Rectangle),
            "circle" => Some(Shape::Circle),
            "polygon" => Some(Shape::Polygon),
            "trapezoid" => Some(Shape::Trapezoid),
            "fromVertices" => Some(Shape::FromVertices),
            _ => None,
        }
    }

    /// The name used in programs.
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Rectangle => "rectangle",
            Shape::Circle => "circle",
            Shape::Polygon => "polygon",
            Shape::Trapezoid => "trapezoid",
            Shape::FromVertices => "fromVertices",
        }
    }

    /// Positional parameter names.
    ///
    /// For variadic shapes the last name collects every remaining argument.
    pub fn signature(&self) -> &'static [&'static str] {
        match self {
            Shape::Rectangle => &["x", "y", "width", "height"],
            Shape::Circle => &["x", "y", "radius"],
            Shape::Polygon => &["x", "y", "sides", "radius"],
            Shape::Trapezoid => &["x", "y", "width", "height", "slope"],
            Shape::FromVertices => &["x", "y", "vertices"],
        }
    }

    /// Whether the last signature entry is a rest parameter.
    pub fn is_variadic(&self) -> bool {
        matches!(self, Shape::FromVertices)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Bodies
// ═══════════════════════════════════════════════════════════════════════

/// A realized physical object.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Internal identifier
    pub id: EntityId,

    /// Shape kind
    pub shape: Shape,

    /// Shape parameters keyed by signature name
    pub params: IndexMap<String, Value>,

    /// Physical and rendering properties (`restitution`, `color`, ...)
    pub props: IndexMap<String, Value>,

    /// Explicit label, if one was declared
    pub label: Option<String>,
}

impl Body {
    /// Numeric shape parameter, if present and numeric.
    pub fn param(&self, name: &str) -> Option<f64> {
        self.params.get(name).and_then(Value::as_number)
    }

    /// Property value by name.
    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Constraints
// ═══════════════════════════════════════════════════════════════════════

/// One side of a constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Body resolved during evaluation
    Id(EntityId),

    /// Symbolic reference resolved against labels at hydration
    Label(String),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Id(id) => write!(f, "{}", id),
            Endpoint::Label(name) => f.write_str(name),
        }
    }
}

/// A realized edge between two bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Internal identifier
    pub id: EntityId,

    /// First endpoint
    pub from: Endpoint,

    /// Edge kind
    pub kind: EdgeKind,

    /// Second endpoint
    pub to: Endpoint,

    /// Override attributes (`length`, `stiffness`, `damping`, `color`, ...)
    pub attrs: IndexMap<String, Value>,
}

// ═══════════════════════════════════════════════════════════════════════
// Composites
// ═══════════════════════════════════════════════════════════════════════

/// Placement applied to a composite after its contents are created.
///
/// Applied in the fixed order translate, rotate, scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Offset
    pub translate: Point,

    /// Rotation in degrees
    pub rotate: f64,

    /// Uniform scale factor
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translate: Point::default(),
            rotate: 0.0,
            scale: 1.0,
        }
    }
}

impl Transform {
    /// Translation-only transform.
    pub fn translation(x: f64, y: f64) -> Self {
        Self {
            translate: Point::new(x, y),
            ..Default::default()
        }
    }

    /// Whether applying this transform would change anything.
    pub fn is_identity(&self) -> bool {
        self.translate == Point::default() && self.rotate == 0.0 && self.scale == 1.0
    }
}

/// A group of bodies, constraints, and nested composites.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Composite {
    /// Internal identifier (`EntityId(0)` for the program root)
    pub id: EntityId,

    /// Explicit label, if one was declared
    pub label: Option<String>,

    /// Bodies in accumulation order
    pub bodies: Vec<Arc<Body>>,

    /// Constraints in accumulation order
    pub constraints: Vec<Arc<Constraint>>,

    /// Nested composites in accumulation order
    pub composites: Vec<Arc<Composite>>,

    /// Placement
    pub transform: Transform,

    /// Attributes not consumed by the transform
    pub props: IndexMap<String, Value>,
}

impl Composite {
    /// Total bodies in this composite and every nested one.
    pub fn total_bodies(&self) -> usize {
        self.bodies.len()
            + self
                .composites
                .iter()
                .map(|c| c.total_bodies())
                .sum::<usize>()
    }

    /// Total constraints in this composite and every nested one.
    pub fn total_constraints(&self) -> usize {
        self.constraints.len()
            + self
                .composites
                .iter()
                .map(|c| c.total_constraints())
                .sum::<usize>()
    }

    /// Every body in the tree, depth-first.
    pub fn walk_bodies(&self) -> Vec<&Body> {
        let mut out: Vec<&Body> = self.bodies.iter().map(|b| b.as_ref()).collect();
        for child in &self.composites {
            out.extend(child.walk_bodies());
        }
        out
    }

    /// Find a body anywhere in the tree by its label.
    pub fn find_body(&self, label: &str) -> Option<&Body> {
        self.walk_bodies()
            .into_iter()
            .find(|b| b.label.as_deref() == Some(label))
    }
}

/// The fully evaluated program: the root composite.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    /// Root composite
    pub root: Composite,

    /// Value of the last top-level statement
    pub value: Value,
}

impl Scene {
    /// Total bodies across the scene.
    pub fn body_count(&self) -> usize {
        self.root.total_bodies()
    }

    /// Total constraints across the scene.
    pub fn constraint_count(&self) -> usize {
        self.root.total_constraints()
    }
}
