//! In-memory engine
//!
//! `SceneWorld` keeps every body, group, and constraint it is handed and
//! applies group transforms to body positions, so a hydrated scene can be
//! inspected without a physics backend.

use tracing::debug;

use super::engine::{
    BodyHandle, BodySpec, ConstraintHandle, ConstraintSpec, Engine, GroupHandle,
};
use crate::error::HydrateError;
use crate::value::Point;

/// A body as placed in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldBody {
    /// Spec the body was created from
    pub spec: BodySpec,

    /// Current centre, after group transforms
    pub position: Point,

    /// Current rotation in radians
    pub angle: f64,

    /// Accumulated scale factor
    pub scale: f64,

    /// Group the body is attached to
    pub group: Option<GroupHandle>,
}

/// A group as placed in the world.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldGroup {
    /// Label carried over from the composite
    pub label: Option<String>,

    /// Directly attached bodies
    pub bodies: Vec<BodyHandle>,

    /// Directly attached child groups
    pub groups: Vec<GroupHandle>,

    /// Directly attached constraints
    pub constraints: Vec<ConstraintHandle>,

    /// Parent group, `None` for the root and for detached groups
    pub parent: Option<GroupHandle>,
}

/// A constraint as placed in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldConstraint {
    /// Spec the constraint was created from
    pub spec: ConstraintSpec,

    /// Group the constraint is attached to
    pub group: Option<GroupHandle>,
}

/// Recording engine with no simulation step.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneWorld {
    bodies: Vec<WorldBody>,
    groups: Vec<WorldGroup>,
    constraints: Vec<WorldConstraint>,
    teardowns: usize,
}

impl Default for SceneWorld {
    fn default() -> Self {
        Self {
            bodies: Vec::new(),
            groups: vec![WorldGroup::default()],
            constraints: Vec::new(),
            teardowns: 0,
        }
    }
}

impl SceneWorld {
    /// Create an empty world with just a root group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every body, in creation order.
    pub fn bodies(&self) -> &[WorldBody] {
        &self.bodies
    }

    /// Look up a body by handle.
    pub fn body(&self, handle: BodyHandle) -> Option<&WorldBody> {
        self.bodies.get(handle.0)
    }

    /// First body whose spec carries `label`.
    pub fn body_labelled(&self, label: &str) -> Option<&WorldBody> {
        self.bodies
            .iter()
            .find(|b| b.spec.label.as_deref() == Some(label))
    }

    /// Every constraint, in creation order.
    pub fn constraints(&self) -> &[WorldConstraint] {
        &self.constraints
    }

    /// Look up a group by handle.
    pub fn group(&self, handle: GroupHandle) -> Option<&WorldGroup> {
        self.groups.get(handle.0)
    }

    /// Number of groups, excluding the root.
    pub fn group_count(&self) -> usize {
        self.groups.len() - 1
    }

    /// How many times this world has been torn down.
    pub fn teardown_count(&self) -> usize {
        self.teardowns
    }

    /// Whether the world holds nothing but its root.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty() && self.constraints.is_empty() && self.groups.len() == 1
    }

    fn group_mut(&mut self, handle: GroupHandle) -> Result<&mut WorldGroup, HydrateError> {
        self.groups
            .get_mut(handle.0)
            .ok_or_else(|| HydrateError::Engine(format!("unknown group {}", handle.0)))
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut WorldBody, HydrateError> {
        self.bodies
            .get_mut(handle.0)
            .ok_or_else(|| HydrateError::Engine(format!("unknown body {}", handle.0)))
    }

    /// Bodies in `group` and every group nested under it.
    fn bodies_under(&self, group: GroupHandle) -> Result<Vec<BodyHandle>, HydrateError> {
        let mut out = Vec::new();
        let mut pending = vec![group];
        while let Some(handle) = pending.pop() {
            let g = self
                .groups
                .get(handle.0)
                .ok_or_else(|| HydrateError::Engine(format!("unknown group {}", handle.0)))?;
            out.extend(g.bodies.iter().copied());
            pending.extend(g.groups.iter().copied());
        }
        Ok(out)
    }

    fn for_each_body_under(
        &mut self,
        group: GroupHandle,
        mut f: impl FnMut(&mut WorldBody),
    ) -> Result<(), HydrateError> {
        for handle in self.bodies_under(group)? {
            f(self.body_mut(handle)?);
        }
        Ok(())
    }
}

impl Engine for SceneWorld {
    fn root(&self) -> GroupHandle {
        GroupHandle(0)
    }

    fn create_body(&mut self, spec: &BodySpec) -> Result<BodyHandle, HydrateError> {
        let handle = BodyHandle(self.bodies.len());
        self.bodies.push(WorldBody {
            position: spec.shape.position(),
            angle: spec.angle,
            scale: 1.0,
            group: None,
            spec: spec.clone(),
        });
        Ok(handle)
    }

    fn create_group(&mut self, label: Option<&str>) -> Result<GroupHandle, HydrateError> {
        let handle = GroupHandle(self.groups.len());
        self.groups.push(WorldGroup {
            label: label.map(str::to_string),
            ..Default::default()
        });
        Ok(handle)
    }

    fn add_body(&mut self, group: GroupHandle, body: BodyHandle) -> Result<(), HydrateError> {
        self.body_mut(body)?.group = Some(group);
        self.group_mut(group)?.bodies.push(body);
        Ok(())
    }

    fn add_group(&mut self, parent: GroupHandle, child: GroupHandle) -> Result<(), HydrateError> {
        if parent == child {
            return Err(HydrateError::Engine(format!(
                "group {} cannot contain itself",
                child.0
            )));
        }
        self.group_mut(child)?.parent = Some(parent);
        self.group_mut(parent)?.groups.push(child);
        Ok(())
    }

    fn translate_group(&mut self, group: GroupHandle, by: Point) -> Result<(), HydrateError> {
        self.for_each_body_under(group, |body| {
            body.position.x += by.x;
            body.position.y += by.y;
        })
    }

    fn rotate_group(
        &mut self,
        group: GroupHandle,
        radians: f64,
        about: Point,
    ) -> Result<(), HydrateError> {
        let (sin, cos) = radians.sin_cos();
        self.for_each_body_under(group, |body| {
            let dx = body.position.x - about.x;
            let dy = body.position.y - about.y;
            body.position = Point::new(
                about.x + dx * cos - dy * sin,
                about.y + dx * sin + dy * cos,
            );
            body.angle += radians;
        })
    }

    fn scale_group(
        &mut self,
        group: GroupHandle,
        factor: f64,
        about: Point,
    ) -> Result<(), HydrateError> {
        self.for_each_body_under(group, |body| {
            body.position = Point::new(
                about.x + (body.position.x - about.x) * factor,
                about.y + (body.position.y - about.y) * factor,
            );
            body.scale *= factor;
        })
    }

    fn create_constraint(
        &mut self,
        spec: &ConstraintSpec,
    ) -> Result<ConstraintHandle, HydrateError> {
        for body in [spec.body_a, spec.body_b] {
            if self.body(body).is_none() {
                return Err(HydrateError::Engine(format!("unknown body {}", body.0)));
            }
        }
        let handle = ConstraintHandle(self.constraints.len());
        self.constraints.push(WorldConstraint {
            spec: spec.clone(),
            group: None,
        });
        Ok(handle)
    }

    fn add_constraint(
        &mut self,
        group: GroupHandle,
        constraint: ConstraintHandle,
    ) -> Result<(), HydrateError> {
        let slot = self.constraints.get_mut(constraint.0).ok_or_else(|| {
            HydrateError::Engine(format!("unknown constraint {}", constraint.0))
        })?;
        slot.group = Some(group);
        self.group_mut(group)?.constraints.push(constraint);
        Ok(())
    }

    fn teardown(&mut self) {
        debug!(
            bodies = self.bodies.len(),
            constraints = self.constraints.len(),
            groups = self.group_count(),
            "tearing down world"
        );
        self.bodies.clear();
        self.constraints.clear();
        self.groups.clear();
        self.groups.push(WorldGroup::default());
        self.teardowns += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hydrate::ShapeSpec;
    use indexmap::IndexMap;

    fn circle(x: f64, y: f64) -> BodySpec {
        BodySpec {
            shape: ShapeSpec::Circle {
                position: Point::new(x, y),
                radius: 1.0,
            },
            label: None,
            restitution: 0.9,
            friction: 0.1,
            is_static: false,
            angle: 0.0,
            fill_style: None,
            extra: IndexMap::new(),
        }
    }

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_transforms_reach_nested_groups() {
        let mut world = SceneWorld::new();
        let outer = world.create_group(None).unwrap();
        let inner = world.create_group(None).unwrap();
        let b = world.create_body(&circle(1.0, 0.0)).unwrap();
        world.add_body(inner, b).unwrap();
        world.add_group(outer, inner).unwrap();

        world.translate_group(outer, Point::new(10.0, 0.0)).unwrap();
        assert!(close(world.body(b).unwrap().position, Point::new(11.0, 0.0)));

        world
            .rotate_group(outer, std::f64::consts::FRAC_PI_2, Point::new(10.0, 0.0))
            .unwrap();
        assert!(close(world.body(b).unwrap().position, Point::new(10.0, 1.0)));

        world.scale_group(outer, 3.0, Point::new(10.0, 0.0)).unwrap();
        assert!(close(world.body(b).unwrap().position, Point::new(10.0, 3.0)));
        assert_eq!(world.body(b).unwrap().scale, 3.0);
    }

    #[test]
    fn test_teardown_resets_to_root() {
        let mut world = SceneWorld::new();
        let root = world.root();
        let b = world.create_body(&circle(0.0, 0.0)).unwrap();
        world.add_body(root, b).unwrap();
        assert!(!world.is_empty());

        world.teardown();
        assert!(world.is_empty());
        assert_eq!(world.teardown_count(), 1);
    }

    #[test]
    fn test_unknown_handles_are_engine_errors() {
        let mut world = SceneWorld::new();
        assert!(matches!(
            world.add_body(GroupHandle(0), BodyHandle(4)),
            Err(HydrateError::Engine(_))
        ));
        assert!(world.translate_group(GroupHandle(9), Point::default()).is_err());
    }
}
