//! Identity Handle Pool
//!
//! Deduplicating store of identity handles. [`HandlePool::get_or_create`] is
//! the only place handles are inserted, so the pool holds exactly one handle
//! per distinct `(numeric id, fingerprint, behavior type)`.
//!
//! Each handle has a resolution cache: the instance key of the live entity it
//! last resolved to. The cache is checked against the host on every lookup and
//! re-derived with a linear scan when it misses.

use entity_model::{loosely_equals, Entity, EntityId, HandleId, IdentityHandle};

use crate::host::EntityHost;

/// Outcome of [`HandlePool::get_or_create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// A new handle was stored for the entity
    New(HandleId),
    /// A loosely equal handle already existed
    Existing(HandleId),
}

impl Registration {
    pub fn handle(self) -> HandleId {
        match self {
            Registration::New(id) | Registration::Existing(id) => id,
        }
    }

    pub fn is_new(self) -> bool {
        matches!(self, Registration::New(_))
    }
}

#[derive(Debug, Clone)]
struct PoolEntry {
    handle: IdentityHandle,
    resolved: Option<EntityId>,
}

/// Process-lifetime store of identity handles. Never evicts.
#[derive(Debug, Clone, Default)]
pub struct HandlePool {
    entries: Vec<PoolEntry>,
}

impl HandlePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle for `entity`, creating it on first sight.
    ///
    /// Returns `None` when the entity has no behavior to derive an identity
    /// from. `instance` seeds the resolution cache of a new handle.
    pub fn get_or_create(&mut self, instance: EntityId, entity: &Entity) -> Option<Registration> {
        entity.behavior.as_ref()?;

        if let Some(existing) = self
            .entries
            .iter()
            .find(|entry| loosely_equals(Some(&entry.handle), Some(entity)))
        {
            return Some(Registration::Existing(existing.handle.id()));
        }

        let id = HandleId(self.entries.len());
        self.entries.push(PoolEntry {
            handle: IdentityHandle::snapshot(id, entity),
            resolved: Some(instance),
        });
        Some(Registration::New(id))
    }

    /// Looks up a live instance in the host and registers it.
    ///
    /// Returns `None` if the instance is already destroyed.
    pub fn get_or_create_live<H>(&mut self, host: &H, instance: EntityId) -> Option<Registration>
    where
        H: EntityHost + ?Sized,
    {
        let entity = host.entity(instance)?;
        self.get_or_create(instance, entity)
    }

    /// Resolves a handle to whichever live entity currently matches it.
    pub fn resolve<'h, H>(&mut self, id: HandleId, host: &'h H) -> Option<(EntityId, &'h Entity)>
    where
        H: EntityHost + ?Sized,
    {
        let entry = self.entries.get_mut(id.0)?;

        if let Some(cached) = entry.resolved {
            if let Some(entity) = host.entity(cached) {
                if loosely_equals(Some(&entry.handle), Some(entity)) {
                    return Some((cached, entity));
                }
            }
        }

        let found = host
            .live_entities()
            .into_iter()
            .find(|(_, entity)| loosely_equals(Some(&entry.handle), Some(*entity)));
        entry.resolved = found.map(|(instance, _)| instance);
        found
    }

    /// Instance key the handle last resolved to, without checking liveness.
    pub fn cached_instance(&self, id: HandleId) -> Option<EntityId> {
        self.entries.get(id.0).and_then(|entry| entry.resolved)
    }

    pub fn get(&self, id: HandleId) -> Option<&IdentityHandle> {
        self.entries.get(id.0).map(|entry| &entry.handle)
    }

    /// All handles in creation order.
    pub fn handles(&self) -> impl Iterator<Item = &IdentityHandle> {
        self.entries.iter().map(|entry| &entry.handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
