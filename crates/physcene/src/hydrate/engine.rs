//! Physics engine boundary
//!
//! The hydrator only ever talks to an engine through [`Engine`]. Handles are
//! opaque indices minted by the engine; specs are plain data with every
//! default already applied.

use indexmap::IndexMap;

use crate::ast::EdgeKind;
use crate::error::HydrateError;
use crate::value::Point;

/// Engine-side body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub usize);

/// Engine-side composite group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupHandle(pub usize);

/// Engine-side constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintHandle(pub usize);

// ═══════════════════════════════════════════════════════════════════════
// Specs
// ═══════════════════════════════════════════════════════════════════════

/// Geometry of a body, positioned at its centre.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeSpec {
    /// Axis-aligned box
    Rectangle {
        /// Centre
        position: Point,
        /// Width
        width: f64,
        /// Height
        height: f64,
    },

    /// Disc
    Circle {
        /// Centre
        position: Point,
        /// Radius
        radius: f64,
    },

    /// Regular polygon
    Polygon {
        /// Centre
        position: Point,
        /// Side count
        sides: usize,
        /// Circumradius
        radius: f64,
    },

    /// Trapezoid
    Trapezoid {
        /// Centre
        position: Point,
        /// Width
        width: f64,
        /// Height
        height: f64,
        /// Slope of the sides
        slope: f64,
    },

    /// Arbitrary outline
    FromVertices {
        /// Centre
        position: Point,
        /// Outline vertices
        vertices: Vec<Point>,
    },
}

impl ShapeSpec {
    /// Centre of the body.
    pub fn position(&self) -> Point {
        match self {
            ShapeSpec::Rectangle { position, .. }
            | ShapeSpec::Circle { position, .. }
            | ShapeSpec::Polygon { position, .. }
            | ShapeSpec::Trapezoid { position, .. }
            | ShapeSpec::FromVertices { position, .. } => *position,
        }
    }
}

/// Everything an engine needs to create one body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodySpec {
    /// Geometry
    pub shape: ShapeSpec,

    /// Label carried over from the scene, for engine-side debugging
    pub label: Option<String>,

    /// Bounciness
    pub restitution: f64,

    /// Surface friction
    pub friction: f64,

    /// Pinned in place
    pub is_static: bool,

    /// Initial rotation in radians
    pub angle: f64,

    /// Render fill colour
    pub fill_style: Option<String>,

    /// Remaining numeric options (`density`, `frictionAir`, ...)
    pub extra: IndexMap<String, f64>,
}

/// Everything an engine needs to create one constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSpec {
    /// Edge kind the defaults came from
    pub kind: EdgeKind,

    /// First body
    pub body_a: BodyHandle,

    /// Second body
    pub body_b: BodyHandle,

    /// Attachment offset on the first body
    pub point_a: Point,

    /// Attachment offset on the second body
    pub point_b: Point,

    /// Rest length; `None` lets the engine use the current distance
    pub length: Option<f64>,

    /// Stiffness in `0..=1`
    pub stiffness: f64,

    /// Damping in `0..=1`
    pub damping: f64,

    /// Render stroke colour
    pub stroke_style: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// Engine trait
// ═══════════════════════════════════════════════════════════════════════

/// A physics world the hydrator can populate.
///
/// Group transforms apply to every body in the group, including bodies in
/// nested groups.
pub trait Engine {
    /// The world's root group.
    fn root(&self) -> GroupHandle;

    /// Create a body, not yet attached to any group.
    ///
    /// # Errors
    ///
    /// Returns `HydrateError::Engine` if the engine rejects the spec.
    fn create_body(&mut self, spec: &BodySpec) -> Result<BodyHandle, HydrateError>;

    /// Create an empty group.
    ///
    /// # Errors
    ///
    /// Returns `HydrateError::Engine` if the engine rejects the group.
    fn create_group(&mut self, label: Option<&str>) -> Result<GroupHandle, HydrateError>;

    /// Attach a body to a group.
    ///
    /// # Errors
    ///
    /// Returns `HydrateError::Engine` for unknown handles.
    fn add_body(&mut self, group: GroupHandle, body: BodyHandle) -> Result<(), HydrateError>;

    /// Attach a group to a parent group.
    ///
    /// # Errors
    ///
    /// Returns `HydrateError::Engine` for unknown handles.
    fn add_group(&mut self, parent: GroupHandle, child: GroupHandle) -> Result<(), HydrateError>;

    /// Move every body in a group.
    ///
    /// # Errors
    ///
    /// Returns `HydrateError::Engine` for unknown handles.
    fn translate_group(&mut self, group: GroupHandle, by: Point) -> Result<(), HydrateError>;

    /// Rotate every body in a group about a point.
    ///
    /// # Errors
    ///
    /// Returns `HydrateError::Engine` for unknown handles.
    fn rotate_group(
        &mut self,
        group: GroupHandle,
        radians: f64,
        about: Point,
    ) -> Result<(), HydrateError>;

    /// Scale every body in a group about a point.
    ///
    /// # Errors
    ///
    /// Returns `HydrateError::Engine` for unknown handles.
    fn scale_group(
        &mut self,
        group: GroupHandle,
        factor: f64,
        about: Point,
    ) -> Result<(), HydrateError>;

    /// Create a constraint between two existing bodies.
    ///
    /// # Errors
    ///
    /// Returns `HydrateError::Engine` if either body is unknown.
    fn create_constraint(
        &mut self,
        spec: &ConstraintSpec,
    ) -> Result<ConstraintHandle, HydrateError>;

    /// Attach a constraint to a group.
    ///
    /// # Errors
    ///
    /// Returns `HydrateError::Engine` for unknown handles.
    fn add_constraint(
        &mut self,
        group: GroupHandle,
        constraint: ConstraintHandle,
    ) -> Result<(), HydrateError>;

    /// Stop the runner and renderer, clear every body, group, and
    /// listener, and leave an empty root ready for the next hydration.
    fn teardown(&mut self);
}
