//! World hydration
//!
//! Materializes an evaluated [`Scene`] into an [`Engine`] in two strictly
//! ordered passes:
//!
//! 1. `create_bodies` walks the composite tree depth-first, creating every
//!    body and group and applying each composite's transform.
//! 2. `create_constraints` walks the same tree again and wires constraints,
//!    resolving their endpoints through the index built by pass 1.
//!
//! Constraints can only reference bodies that already exist, which is why
//! the passes never interleave.

mod engine;
mod handle;
mod index;
mod world;

pub use engine::{
    BodyHandle, BodySpec, ConstraintHandle, ConstraintSpec, Engine, GroupHandle, ShapeSpec,
};
pub use handle::{RestartError, Session, WorldHandle};
pub use index::BodyIndex;
pub use world::{SceneWorld, WorldBody, WorldConstraint, WorldGroup};

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ast::EdgeKind;
use crate::error::HydrateError;
use crate::value::{
    Body, Composite, Constraint, Endpoint, EntityId, Point, Scene, Shape, Value,
};

/// What to do with a constraint whose endpoint matches no body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointPolicy {
    /// Skip the constraint and log it at debug level
    #[default]
    Lenient,

    /// Fail hydration with `UnresolvedEndpoint`
    Strict,
}

/// Hydration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydrateOptions {
    /// Unresolved endpoint handling
    pub endpoint_policy: EndpointPolicy,

    /// Body restitution when no `restitution` prop is given
    pub restitution: f64,

    /// Body friction when no `friction` prop is given
    pub friction: f64,
}

impl Default for HydrateOptions {
    fn default() -> Self {
        Self {
            endpoint_policy: EndpointPolicy::default(),
            restitution: 0.9,
            friction: 0.1,
        }
    }
}

impl HydrateOptions {
    /// Set the endpoint policy (builder pattern).
    pub fn with_endpoint_policy(mut self, policy: EndpointPolicy) -> Self {
        self.endpoint_policy = policy;
        self
    }
}

/// Engine group created for a composite, mirroring the composite tree.
struct GroupTree {
    handle: GroupHandle,
    children: Vec<GroupTree>,
}

/// Two-pass scene materializer.
#[derive(Debug, Clone, Default)]
pub struct Hydrator {
    options: HydrateOptions,
}

impl Hydrator {
    /// Create a hydrator with the given options.
    pub fn new(options: HydrateOptions) -> Self {
        Self { options }
    }

    /// The options this hydrator was built with.
    pub fn options(&self) -> &HydrateOptions {
        &self.options
    }

    /// Populate `engine` with every body, group, and constraint in `scene`.
    ///
    /// The engine is expected to be empty; callers tear down any previous
    /// world first (see [`WorldHandle`]).
    ///
    /// # Errors
    ///
    /// - `UnresolvedEndpoint` under [`EndpointPolicy::Strict`]
    /// - `Engine` if the engine rejects a call
    pub fn hydrate<E: Engine + ?Sized>(
        &self,
        engine: &mut E,
        scene: &Scene,
    ) -> Result<BodyIndex, HydrateError> {
        let mut index = BodyIndex::default();
        let root = engine.root();

        let tree = self.create_bodies(engine, &scene.root, root, &mut index)?;
        debug!(bodies = index.len(), "created bodies");

        let constraints = self.create_constraints(engine, &scene.root, &tree, &index)?;
        debug!(constraints, "created constraints");

        Ok(index)
    }

    /// Validate endpoints without touching an engine.
    ///
    /// Always succeeds under [`EndpointPolicy::Lenient`].
    ///
    /// # Errors
    ///
    /// Returns the first `UnresolvedEndpoint` under
    /// [`EndpointPolicy::Strict`].
    pub fn check(&self, scene: &Scene) -> Result<(), HydrateError> {
        if self.options.endpoint_policy == EndpointPolicy::Lenient {
            return Ok(());
        }

        let bodies = scene.root.walk_bodies();
        let labels: IndexSet<&str> = bodies.iter().filter_map(|b| b.label.as_deref()).collect();
        let ids: IndexSet<EntityId> = bodies.iter().map(|b| b.id).collect();
        let known = |endpoint: &Endpoint| match endpoint {
            Endpoint::Id(id) => ids.contains(id),
            Endpoint::Label(name) => labels.contains(name.as_str()),
        };

        let mut pending = vec![&scene.root];
        while let Some(composite) = pending.pop() {
            for constraint in &composite.constraints {
                if let Some(endpoint) = [&constraint.from, &constraint.to]
                    .into_iter()
                    .find(|e| !known(*e))
                {
                    return Err(unresolved(constraint, endpoint));
                }
            }
            pending.extend(composite.composites.iter().map(|c| c.as_ref()));
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Pass 1: bodies and groups
    // ═══════════════════════════════════════════════════════════════════

    fn create_bodies<E: Engine + ?Sized>(
        &self,
        engine: &mut E,
        composite: &Composite,
        group: GroupHandle,
        index: &mut BodyIndex,
    ) -> Result<GroupTree, HydrateError> {
        for body in &composite.bodies {
            let handle = engine.create_body(&self.body_spec(body))?;
            engine.add_body(group, handle)?;
            if let Some(previous) = index.insert(body, handle) {
                warn!(
                    label = body.label.as_deref().unwrap_or_default(),
                    kept = %previous.0,
                    "duplicate body label, keeping the first"
                );
            }
        }

        let mut children = Vec::with_capacity(composite.composites.len());
        for child in &composite.composites {
            let child_group = engine.create_group(child.label.as_deref())?;
            let subtree = self.create_bodies(engine, child, child_group, index)?;

            let t = child.transform;
            if !t.is_identity() {
                engine.translate_group(child_group, t.translate)?;
                engine.rotate_group(child_group, t.rotate.to_radians(), t.translate)?;
                engine.scale_group(child_group, t.scale, t.translate)?;
            }
            engine.add_group(group, child_group)?;
            children.push(subtree);
        }

        Ok(GroupTree {
            handle: group,
            children,
        })
    }

    fn body_spec(&self, body: &Body) -> BodySpec {
        let mut spec = BodySpec {
            shape: shape_spec(body),
            label: body.label.clone(),
            restitution: self.options.restitution,
            friction: self.options.friction,
            is_static: false,
            angle: 0.0,
            fill_style: None,
            extra: IndexMap::new(),
        };

        for (key, value) in &body.props {
            match key.as_str() {
                "restitution" => set_number(&mut spec.restitution, value),
                "friction" => set_number(&mut spec.friction, value),
                "angle" => {
                    if let Some(degrees) = value.as_number() {
                        spec.angle = degrees.to_radians();
                    }
                }
                "color" => spec.fill_style = Some(style(value)),
                "static" | "isStatic" => spec.is_static = truthy(value),
                _ => {
                    if let Some(n) = value.as_number() {
                        spec.extra.insert(key.clone(), n);
                    }
                }
            }
        }
        spec
    }

    // ═══════════════════════════════════════════════════════════════════
    // Pass 2: constraints
    // ═══════════════════════════════════════════════════════════════════

    fn create_constraints<E: Engine + ?Sized>(
        &self,
        engine: &mut E,
        composite: &Composite,
        tree: &GroupTree,
        index: &BodyIndex,
    ) -> Result<usize, HydrateError> {
        let mut created = 0;

        for constraint in &composite.constraints {
            let endpoints = (index.resolve(&constraint.from), index.resolve(&constraint.to));
            let (Some(a), Some(b)) = endpoints else {
                self.skip_unresolved(constraint, index)?;
                continue;
            };
            let handle = engine.create_constraint(&constraint_spec(constraint, a, b))?;
            engine.add_constraint(tree.handle, handle)?;
            created += 1;
        }

        for (child, subtree) in composite.composites.iter().zip(&tree.children) {
            created += self.create_constraints(engine, child, subtree, index)?;
        }
        Ok(created)
    }

    fn skip_unresolved(
        &self,
        constraint: &Constraint,
        index: &BodyIndex,
    ) -> Result<(), HydrateError> {
        let endpoint = if index.resolve(&constraint.from).is_none() {
            &constraint.from
        } else {
            &constraint.to
        };
        match self.options.endpoint_policy {
            EndpointPolicy::Strict => Err(unresolved(constraint, endpoint)),
            EndpointPolicy::Lenient => {
                debug!(
                    constraint = %constraint.id,
                    %endpoint,
                    "skipping constraint with unresolved endpoint"
                );
                Ok(())
            }
        }
    }
}

fn unresolved(constraint: &Constraint, endpoint: &Endpoint) -> HydrateError {
    HydrateError::UnresolvedEndpoint {
        constraint: constraint.id.0,
        endpoint: endpoint.to_string(),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Spec building
// ═══════════════════════════════════════════════════════════════════════

fn shape_spec(body: &Body) -> ShapeSpec {
    let p = |name: &str| body.param(name).unwrap_or(0.0);
    let position = Point::new(p("x"), p("y"));

    match body.shape {
        Shape::Rectangle => ShapeSpec::Rectangle {
            position,
            width: p("width"),
            height: p("height"),
        },
        Shape::Circle => ShapeSpec::Circle {
            position,
            radius: p("radius"),
        },
        Shape::Polygon => ShapeSpec::Polygon {
            position,
            sides: p("sides").max(0.0) as usize,
            radius: p("radius"),
        },
        Shape::Trapezoid => ShapeSpec::Trapezoid {
            position,
            width: p("width"),
            height: p("height"),
            slope: p("slope"),
        },
        Shape::FromVertices => ShapeSpec::FromVertices {
            position,
            vertices: match body.params.get("vertices") {
                Some(Value::List(items)) => items.iter().filter_map(Value::as_point).collect(),
                _ => Vec::new(),
            },
        },
    }
}

/// Per-kind constraint defaults: `(stiffness, damping, length)`.
fn kind_defaults(kind: EdgeKind) -> (f64, f64, Option<f64>) {
    match kind {
        EdgeKind::Rigid => (1.0, 0.0, None),
        EdgeKind::Spring => (0.01, 0.0, None),
        EdgeKind::Pin => (1.0, 0.0, Some(0.0)),
        EdgeKind::Rope => (0.3, 0.7, None),
    }
}

fn constraint_spec(
    constraint: &Constraint,
    body_a: BodyHandle,
    body_b: BodyHandle,
) -> ConstraintSpec {
    let (stiffness, damping, length) = kind_defaults(constraint.kind);
    let mut spec = ConstraintSpec {
        kind: constraint.kind,
        body_a,
        body_b,
        point_a: Point::default(),
        point_b: Point::default(),
        length,
        stiffness,
        damping,
        stroke_style: None,
    };

    for (key, value) in &constraint.attrs {
        match key.as_str() {
            "length" => {
                if let Some(n) = value.as_number() {
                    spec.length = Some(n);
                }
            }
            "stiffness" => set_number(&mut spec.stiffness, value),
            "damping" => set_number(&mut spec.damping, value),
            "pointA" => set_point(&mut spec.point_a, value),
            "pointB" => set_point(&mut spec.point_b, value),
            "color" => spec.stroke_style = Some(style(value)),
            _ => {}
        }
    }
    spec
}

fn set_number(slot: &mut f64, value: &Value) {
    if let Some(n) = value.as_number() {
        *slot = n;
    }
}

fn set_point(slot: &mut Point, value: &Value) {
    if let Some(p) = value.as_point() {
        *slot = p;
    }
}

fn style(value: &Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn body(id: u64, shape: Shape, params: &[(&str, f64)], label: Option<&str>) -> Arc<Body> {
        Arc::new(Body {
            id: EntityId(id),
            shape,
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), Value::Number(*v)))
                .collect(),
            props: IndexMap::new(),
            label: label.map(str::to_string),
        })
    }

    #[test]
    fn test_body_defaults_and_overrides() {
        let params = [("x", 1.0), ("y", 2.0), ("radius", 3.0)];
        let mut b = (*body(1, Shape::Circle, &params, None)).clone();
        b.props.insert("friction".into(), Value::Number(0.5));
        b.props.insert("angle".into(), Value::Number(180.0));
        b.props.insert("color".into(), Value::string("red"));
        b.props.insert("isStatic".into(), Value::Bool(true));
        b.props.insert("density".into(), Value::Number(0.002));
        b.props.insert("note".into(), Value::string("ignored"));

        let spec = Hydrator::default().body_spec(&b);
        assert_eq!(
            spec.shape,
            ShapeSpec::Circle {
                position: Point::new(1.0, 2.0),
                radius: 3.0
            }
        );
        assert_eq!(spec.restitution, 0.9);
        assert_eq!(spec.friction, 0.5);
        assert!((spec.angle - std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(spec.fill_style.as_deref(), Some("red"));
        assert!(spec.is_static);
        assert_eq!(spec.extra.len(), 1);
        assert_eq!(spec.extra.get("density"), Some(&0.002));
    }

    #[test]
    fn test_kind_defaults() {
        for (kind, stiffness, damping, length) in [
            (EdgeKind::Rigid, 1.0, 0.0, None),
            (EdgeKind::Spring, 0.01, 0.0, None),
            (EdgeKind::Pin, 1.0, 0.0, Some(0.0)),
            (EdgeKind::Rope, 0.3, 0.7, None),
        ] {
            let c = Constraint {
                id: EntityId(9),
                from: Endpoint::Id(EntityId(1)),
                kind,
                to: Endpoint::Id(EntityId(2)),
                attrs: IndexMap::new(),
            };
            let spec = constraint_spec(&c, BodyHandle(0), BodyHandle(1));
            assert_eq!(
                (spec.stiffness, spec.damping, spec.length),
                (stiffness, damping, length)
            );
        }
    }

    #[test]
    fn test_constraint_overrides() {
        let mut attrs = IndexMap::new();
        attrs.insert("length".to_string(), Value::Number(40.0));
        attrs.insert("stiffness".to_string(), Value::Number(0.2));
        attrs.insert("pointA".to_string(), Value::vector(0.0, 5.0));
        attrs.insert("color".to_string(), Value::string("blue"));
        let c = Constraint {
            id: EntityId(3),
            from: Endpoint::Id(EntityId(1)),
            kind: EdgeKind::Spring,
            to: Endpoint::Id(EntityId(2)),
            attrs,
        };

        let spec = constraint_spec(&c, BodyHandle(0), BodyHandle(1));
        assert_eq!(spec.length, Some(40.0));
        assert_eq!(spec.stiffness, 0.2);
        assert_eq!(spec.point_a, Point::new(0.0, 5.0));
        assert_eq!(spec.point_b, Point::default());
        assert_eq!(spec.stroke_style.as_deref(), Some("blue"));
    }

    #[test]
    fn test_polygon_sides_truncate() {
        let params = [("x", 0.0), ("y", 0.0), ("sides", 5.7), ("radius", 2.0)];
        let b = body(1, Shape::Polygon, &params, None);
        match shape_spec(&b) {
            ShapeSpec::Polygon { sides, .. } => assert_eq!(sides, 5),
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_check_strict_reports_missing_label() {
        let mut root = Composite::default();
        root.bodies.push(body(1, Shape::Circle, &[], Some("a")));
        root.constraints.push(Arc::new(Constraint {
            id: EntityId(2),
            from: Endpoint::Label("a".into()),
            kind: EdgeKind::Rigid,
            to: Endpoint::Label("missing".into()),
            attrs: IndexMap::new(),
        }));
        let scene = Scene {
            root,
            value: Value::Unit,
        };

        assert!(Hydrator::default().check(&scene).is_ok());
        let strict =
            Hydrator::new(HydrateOptions::default().with_endpoint_policy(EndpointPolicy::Strict));
        assert_eq!(
            strict.check(&scene),
            Err(HydrateError::UnresolvedEndpoint {
                constraint: 2,
                endpoint: "missing".to_string()
            })
        );
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: HydrateOptions =
            serde_json::from_str(r#"{ "endpoint_policy": "strict" }"#).unwrap();
        assert_eq!(options.endpoint_policy, EndpointPolicy::Strict);
        assert_eq!(options.restitution, 0.9);
        assert_eq!(options.friction, 0.1);
    }
}
