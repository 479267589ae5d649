//! ECS Host Adapter
//!
//! Runs the registry inside a `bevy_ecs` world. Tracked entities carry an
//! [`ItemDefinition`] component, the [`Registry`] lives in the world as a
//! resource, and construction signals come from `Added<ItemDefinition>`.
//!
//! Schedule order per run: the registry tick drains due registrations first,
//! then new components are signalled, so a signalled entity is registered on a
//! later run at the earliest.

use bevy_ecs::entity::Entity as EcsEntity;
use bevy_ecs::prelude::*;

use entity_model::{Entity, EntityId, HandleId};

use crate::host::{EntityHost, SourceWeight};
use crate::registry::Registry;

/// Component marking an ECS entity as tracked by the registry.
#[derive(Component, Debug, Clone)]
pub struct ItemDefinition(pub Entity);

/// Weight-source list maintained by the host, read on capture fallback.
#[derive(Resource, Debug, Clone, Default)]
pub struct HostSourceList(pub Vec<SourceWeight>);

/// Read-only [`EntityHost`] view of a world.
pub struct EcsHost<'w> {
    world: &'w World,
}

impl<'w> EcsHost<'w> {
    pub fn new(world: &'w World) -> Self {
        Self { world }
    }
}

/// Instance key of an ECS entity.
pub fn instance_of(entity: EcsEntity) -> EntityId {
    EntityId(entity.to_bits())
}

impl EntityHost for EcsHost<'_> {
    fn live_entities(&self) -> Vec<(EntityId, &Entity)> {
        self.world
            .iter_entities()
            .filter_map(|entity_ref| {
                entity_ref
                    .get::<ItemDefinition>()
                    .map(|definition| (instance_of(entity_ref.id()), &definition.0))
            })
            .collect()
    }

    fn entity(&self, instance: EntityId) -> Option<&Entity> {
        let entity = EcsEntity::try_from_bits(instance.0).ok()?;
        self.world.get::<ItemDefinition>(entity).map(|definition| &definition.0)
    }

    fn source_list(&self) -> Vec<SourceWeight> {
        self.world
            .get_resource::<HostSourceList>()
            .map(|list| list.0.clone())
            .unwrap_or_default()
    }
}

/// Signals every newly added [`ItemDefinition`] to the registry.
pub fn signal_constructed(query: Query<EcsEntity, Added<ItemDefinition>>, mut registry: ResMut<Registry>) {
    for entity in &query {
        registry.on_constructed(instance_of(entity));
    }
}

/// Drains due registrations against the current world.
pub fn tick_registry(world: &mut World) {
    world.resource_scope(|world, mut registry: Mut<Registry>| {
        registry.tick(&EcsHost::new(world));
    });
}

/// Rescans the world after a scene change.
pub fn scene_transition(world: &mut World) -> Vec<HandleId> {
    world.resource_scope(|world, mut registry: Mut<Registry>| {
        registry.on_scene_transition(&EcsHost::new(world))
    })
}

/// Feeds a captured weight-source list to the registry.
pub fn capture_sources(world: &mut World, captured: Option<&[SourceWeight]>) -> usize {
    world.resource_scope(|world, mut registry: Mut<Registry>| {
        registry.on_source_list_captured(&EcsHost::new(world), captured)
    })
}

/// Schedule running the registry once per host update.
pub fn registry_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((tick_registry, signal_constructed).chain());
    schedule
}
