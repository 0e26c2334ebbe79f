//! Entity accumulation: append, relabel, and wrap into composites

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use super::Environment;
use crate::context::LabelPolicy;
use crate::error::{type_name, EvalError};
use crate::value::{Composite, EntityId, Transform, Value};

impl Environment {
    /// Append an entity to the accumulator of its kind.
    ///
    /// # Errors
    ///
    /// - `TypeError` if `entity` is not a body, constraint, or composite
    /// - `DuplicateLabel` if it carries a label already used in this scope
    ///   and the policy is `Reject`
    pub fn accumulate(mut self, entity: &Value, policy: LabelPolicy) -> Result<Self, EvalError> {
        match entity {
            Value::Body(body) => {
                if let Some(label) = &body.label {
                    self.check_label_free(label, body.id, policy)?;
                }
                debug!(id = %body.id, shape = %body.shape, "body accumulated");
                self.bodies.push(Arc::clone(body));
            }
            Value::Constraint(constraint) => {
                debug!(id = %constraint.id, kind = %constraint.kind, "constraint accumulated");
                self.constraints.push(Arc::clone(constraint));
            }
            Value::Composite(composite) => {
                if let Some(label) = &composite.label {
                    self.check_label_free(label, composite.id, policy)?;
                }
                debug!(
                    id = %composite.id,
                    bodies = composite.bodies.len(),
                    constraints = composite.constraints.len(),
                    "composite accumulated"
                );
                self.composites.push(Arc::clone(composite));
            }
            other => {
                return Err(EvalError::TypeError {
                    context: "entity accumulation".to_string(),
                    expected: "body, constraint, or composite".to_string(),
                    got: type_name(other).to_string(),
                })
            }
        }
        Ok(self)
    }

    /// Set the label of an already-accumulated body or composite.
    ///
    /// The entity is replaced in place in its accumulator. Returns the
    /// relabelled entity, or `None` if `id` is not in this scope.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateLabel` if another entity in this scope already
    /// carries `name` and the policy is `Reject`.
    pub fn relabel(
        mut self,
        id: EntityId,
        name: &str,
        policy: LabelPolicy,
    ) -> Result<(Self, Option<Value>), EvalError> {
        self.check_label_free(name, id, policy)?;

        if let Some(pos) = self.bodies.iter().rposition(|b| b.id == id) {
            let body = Arc::make_mut(&mut self.bodies[pos]);
            body.label = Some(name.to_string());
            let value = Value::Body(Arc::clone(&self.bodies[pos]));
            return Ok((self, Some(value)));
        }

        if let Some(pos) = self.composites.iter().rposition(|c| c.id == id) {
            let composite = Arc::make_mut(&mut self.composites[pos]);
            composite.label = Some(name.to_string());
            let value = Value::Composite(Arc::clone(&self.composites[pos]));
            return Ok((self, Some(value)));
        }

        Ok((self, None))
    }

    /// Wrap this scope's accumulators into a composite.
    pub fn into_composite(
        self,
        id: EntityId,
        transform: Transform,
        props: IndexMap<String, Value>,
    ) -> Composite {
        Composite {
            id,
            label: None,
            bodies: self.bodies,
            constraints: self.constraints,
            composites: self.composites,
            transform,
            props,
        }
    }

    fn check_label_free(
        &self,
        name: &str,
        owner: EntityId,
        policy: LabelPolicy,
    ) -> Result<(), EvalError> {
        if policy == LabelPolicy::Allow {
            return Ok(());
        }
        let taken = self
            .bodies
            .iter()
            .any(|b| b.id != owner && b.label.as_deref() == Some(name))
            || self
                .composites
                .iter()
                .any(|c| c.id != owner && c.label.as_deref() == Some(name));
        if taken {
            return Err(EvalError::DuplicateLabel {
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Body, Shape};

    fn body(id: u64, label: Option<&str>) -> Value {
        Value::from(Body {
            id: EntityId(id),
            shape: Shape::Circle,
            params: IndexMap::new(),
            props: IndexMap::new(),
            label: label.map(String::from),
        })
    }

    #[test]
    fn test_accumulate_appends_in_order() {
        let env = Environment::new()
            .accumulate(&body(1, None), LabelPolicy::Reject)
            .unwrap()
            .accumulate(&body(2, None), LabelPolicy::Reject)
            .unwrap();
        let ids: Vec<_> = env.bodies().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![EntityId(1), EntityId(2)]);
    }

    #[test]
    fn test_accumulate_rejects_scalars() {
        let result = Environment::new().accumulate(&Value::Number(1.0), LabelPolicy::Reject);
        assert!(matches!(result, Err(EvalError::TypeError { .. })));
    }

    #[test]
    fn test_relabel_replaces_in_place() {
        let env = Environment::new()
            .accumulate(&body(1, None), LabelPolicy::Reject)
            .unwrap();
        let (env, value) = env.relabel(EntityId(1), "ball", LabelPolicy::Reject).unwrap();
        assert_eq!(env.bodies().len(), 1);
        assert_eq!(env.bodies()[0].label.as_deref(), Some("ball"));
        assert_eq!(
            value.and_then(|v| v.as_body().and_then(|b| b.label.clone())),
            Some("ball".to_string())
        );
    }

    #[test]
    fn test_relabel_unknown_id() {
        let (_, value) = Environment::new()
            .relabel(EntityId(9), "x", LabelPolicy::Reject)
            .unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let env = Environment::new()
            .accumulate(&body(1, Some("a")), LabelPolicy::Reject)
            .unwrap()
            .accumulate(&body(2, None), LabelPolicy::Reject)
            .unwrap();
        let result = env.relabel(EntityId(2), "a", LabelPolicy::Reject);
        assert!(matches!(result, Err(EvalError::DuplicateLabel { name }) if name == "a"));
    }

    #[test]
    fn test_duplicate_label_allowed() {
        let env = Environment::new()
            .accumulate(&body(1, Some("a")), LabelPolicy::Allow)
            .unwrap()
            .accumulate(&body(2, Some("a")), LabelPolicy::Allow)
            .unwrap();
        assert_eq!(env.bodies().len(), 2);
    }

    #[test]
    fn test_relabel_same_entity_twice_is_fine() {
        let env = Environment::new()
            .accumulate(&body(1, Some("a")), LabelPolicy::Reject)
            .unwrap();
        assert!(env.relabel(EntityId(1), "a", LabelPolicy::Reject).is_ok());
    }

    #[test]
    fn test_into_composite_moves_accumulators() {
        let env = Environment::new()
            .accumulate(&body(1, None), LabelPolicy::Reject)
            .unwrap();
        let composite = env.into_composite(EntityId(5), Transform::default(), IndexMap::new());
        assert_eq!(composite.id, EntityId(5));
        assert_eq!(composite.bodies.len(), 1);
        assert!(composite.label.is_none());
    }
}
