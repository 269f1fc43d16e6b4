//! Named registries: Model and Group accumulation contexts.
//!
//! Accumulation is an ordinary fold: the first pushed entity seeds the
//! composite, every later push is unioned in. Named entities are recorded
//! pre-union so fully-identified sub-parts stay retrievable after merging.

use std::collections::HashMap;

use tracing::debug;

use crate::entity::Entity;
use crate::error::ModelError;

/// A build context that accumulates entities into one composite and keeps a
/// name registry of the parts pushed into it.
pub struct Model {
    name: String,
    accumulator: Option<Entity>,
    registry: HashMap<String, Entity>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accumulator: None,
            registry: HashMap::new(),
        }
    }

    /// Fold an entity into the composite. A named entity is recorded in the
    /// registry as pushed, before any union.
    pub fn push(mut self, entity: Entity) -> Result<Self, ModelError> {
        if let Some(name) = entity.name() {
            debug!(part = name, model = %self.name, "registering named part");
            self.registry.insert(name.to_string(), entity.clone());
        }
        self.accumulator = Some(match self.accumulator.take() {
            None => entity,
            Some(acc) => acc.union(&entity)?,
        });
        Ok(self)
    }

    /// Exact-name lookup of a pre-union part.
    pub fn find(&self, name: &str) -> Result<Entity, ModelError> {
        self.registry
            .get(name)
            .cloned()
            .ok_or_else(|| ModelError::NotFound {
                name: name.to_string(),
            })
    }

    /// Shorthand for [`find`](Model::find).
    pub fn f(&self, name: &str) -> Result<Entity, ModelError> {
        self.find(name)
    }

    /// Finalize: label the composite with the model's name and hand it out.
    pub fn finish(self) -> Result<Entity, ModelError> {
        match self.accumulator {
            Some(entity) => Ok(entity.named(self.name)),
            None => Err(ModelError::NotFound { name: self.name }),
        }
    }
}

/// Accumulation context without a registry. Its result is an ordinary
/// entity, so a finished group can be moved, aligned and tagged like any
/// other part.
pub struct Group {
    accumulator: Option<Entity>,
}

impl Group {
    pub fn new() -> Self {
        Self { accumulator: None }
    }

    pub fn push(mut self, entity: Entity) -> Result<Self, ModelError> {
        self.accumulator = Some(match self.accumulator.take() {
            None => entity,
            Some(acc) => acc.union(&entity)?,
        });
        Ok(self)
    }

    pub fn finish(self) -> Result<Entity, ModelError> {
        self.accumulator.ok_or_else(|| ModelError::NotFound {
            name: "<empty group>".to_string(),
        })
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}
