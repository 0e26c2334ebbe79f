//! Body lookup built by the first hydration pass

use indexmap::IndexMap;

use super::BodyHandle;
use crate::value::{Body, Endpoint, EntityId};

/// Engine handles for every hydrated body, by label and by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyIndex {
    by_label: IndexMap<String, BodyHandle>,
    by_id: IndexMap<EntityId, BodyHandle>,
}

impl BodyIndex {
    /// Record a hydrated body.
    ///
    /// The first body registered under a label keeps it. Returns that
    /// earlier handle when `body`'s label was already taken.
    pub fn insert(&mut self, body: &Body, handle: BodyHandle) -> Option<BodyHandle> {
        self.by_id.insert(body.id, handle);

        let label = body.label.as_ref()?;
        match self.by_label.get(label) {
            Some(existing) => Some(*existing),
            None => {
                self.by_label.insert(label.clone(), handle);
                None
            }
        }
    }

    /// Resolve a constraint endpoint.
    pub fn resolve(&self, endpoint: &Endpoint) -> Option<BodyHandle> {
        match endpoint {
            Endpoint::Id(id) => self.by_id.get(id).copied(),
            Endpoint::Label(name) => self.by_label.get(name).copied(),
        }
    }

    /// Handle of the body carrying `label`.
    pub fn by_label(&self, label: &str) -> Option<BodyHandle> {
        self.by_label.get(label).copied()
    }

    /// Handle of the body with `id`.
    pub fn by_id(&self, id: EntityId) -> Option<BodyHandle> {
        self.by_id.get(&id).copied()
    }

    /// Labels in registration order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.by_label.keys().map(String::as_str)
    }

    /// Number of hydrated bodies.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether no bodies were hydrated.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
