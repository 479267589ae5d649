//! Host Simulation Contract
//!
//! The registry never owns entities. It reads them through [`EntityHost`],
//! which the host simulation implements over its own live-object table.
//! [`EntityTable`] is a plain in-memory host used by the demo binary and tests.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use entity_model::{Entity, EntityId};

/// One `(source entity, weight)` pair from the host's weight-source list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceWeight {
    pub entity: EntityId,
    /// Host-defined units
    pub weight: f64,
}

impl SourceWeight {
    pub fn new(entity: EntityId, weight: impl Into<f64>) -> Self {
        Self {
            entity,
            weight: weight.into(),
        }
    }
}

/// Read access to the host's live entities.
pub trait EntityHost {
    /// Every live entity of the tracked kind, in a stable order.
    fn live_entities(&self) -> Vec<(EntityId, &Entity)>;

    /// The live entity behind `instance`, or `None` once it is destroyed.
    fn entity(&self, instance: EntityId) -> Option<&Entity>;

    /// Weight-source list read directly from the host.
    ///
    /// Used only when the captured list is unavailable.
    fn source_list(&self) -> Vec<SourceWeight> {
        Vec::new()
    }
}

/// In-memory live-object table.
///
/// Instance keys increase monotonically and are never reused, so a destroyed
/// entity's key keeps missing after recreation.
#[derive(Debug, Clone, Default)]
pub struct EntityTable {
    entities: BTreeMap<EntityId, Entity>,
    next_instance: u64,
    sources: Vec<SourceWeight>,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a live entity and returns its instance key.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        self.next_instance += 1;
        let instance = EntityId(self.next_instance);
        self.entities.insert(instance, entity);
        instance
    }

    /// Destroys an entity. Returns the entity if it was live.
    pub fn destroy(&mut self, instance: EntityId) -> Option<Entity> {
        self.entities.remove(&instance)
    }

    /// Destroys every live entity, as happens at a session boundary.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.sources.clear();
    }

    /// Replaces the host's own weight-source list.
    pub fn set_source_list(&mut self, sources: Vec<SourceWeight>) {
        self.sources = sources;
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl EntityHost for EntityTable {
    fn live_entities(&self) -> Vec<(EntityId, &Entity)> {
        self.entities.iter().map(|(id, e)| (*id, e)).collect()
    }

    fn entity(&self, instance: EntityId) -> Option<&Entity> {
        self.entities.get(&instance)
    }

    fn source_list(&self) -> Vec<SourceWeight> {
        self.sources.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity_model::fixtures;

    #[test]
    fn test_spawn_and_destroy() {
        let mut table = EntityTable::new();
        let lamp = table.spawn(fixtures::flashlight());

        assert_eq!(table.len(), 1);
        assert!(table.entity(lamp).is_some());

        assert!(table.destroy(lamp).is_some());
        assert!(table.entity(lamp).is_none());
        assert!(table.destroy(lamp).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_instance_keys_never_reused() {
        let mut table = EntityTable::new();
        let first = table.spawn(fixtures::shovel());
        table.clear();
        let second = table.spawn(fixtures::shovel());

        assert_ne!(first, second);
        assert!(table.entity(first).is_none());
    }

    #[test]
    fn test_live_entities_in_spawn_order() {
        let mut table = EntityTable::new();
        let a = table.spawn(fixtures::shovel());
        let b = table.spawn(fixtures::flashlight());

        let ids: Vec<EntityId> = table.live_entities().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_clear_drops_source_list() {
        let mut table = EntityTable::new();
        let a = table.spawn(fixtures::shovel());
        table.set_source_list(vec![SourceWeight::new(a, 10)]);
        assert_eq!(table.source_list().len(), 1);

        table.clear();
        assert!(table.source_list().is_empty());
    }
}
