//! Registry Context
//!
//! [`Registry`] owns the handle pool, the discovery engine and the weighted
//! index, and exposes the callbacks a host integration wires up:
//!
//! - [`Registry::on_scene_transition`] after a level/scene change
//! - [`Registry::on_constructed`] once per new entity instance
//! - [`Registry::on_source_list_captured`] whenever the weight-source list is captured
//! - [`Registry::tick`] once per host update
//!
//! Every handle the registry creates, whatever the trigger, is appended to the
//! discovery log and announced to subscribers.

use bevy_ecs::prelude::Resource;
use rand::Rng;

use entity_model::{Entity, EntityId, HandleId, IdentityHandle, LooseIdentity};

use crate::config::RegistryConfig;
use crate::discovery::DiscoveryEngine;
use crate::error::SamplingError;
use crate::host::{EntityHost, SourceWeight};
use crate::index::{WeightEntry, WeightedIndex};
use crate::pool::{HandlePool, Registration};
use crate::probability::clamp_weight;

/// Explicit registry context. Construct one per host session or test.
#[derive(Resource, Debug)]
pub struct Registry {
    config: RegistryConfig,
    pool: HandlePool,
    discovery: DiscoveryEngine,
    index: WeightedIndex,
}

impl Registry {
    pub fn new(config: RegistryConfig) -> Self {
        let discovery = DiscoveryEngine::new(config.discovery.construction_delay_ticks);
        let index = WeightedIndex::with_max_weight(config.sampling.max_weight);
        Self {
            config,
            pool: HandlePool::new(),
            discovery,
            index,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(RegistryConfig::default())
    }

    /// Registers every live entity in the host.
    pub fn scan_all<H>(&mut self, host: &H) -> Vec<HandleId>
    where
        H: EntityHost + ?Sized,
    {
        self.discovery.scan_all(&mut self.pool, host)
    }

    /// Host callback after a scene change.
    pub fn on_scene_transition<H>(&mut self, host: &H) -> Vec<HandleId>
    where
        H: EntityHost + ?Sized,
    {
        if !self.config.discovery.scan_on_scene_transition {
            return Vec::new();
        }
        self.scan_all(host)
    }

    /// Host callback for a freshly constructed entity.
    ///
    /// Registration happens on a later [`tick`](Self::tick).
    pub fn on_constructed(&mut self, instance: EntityId) {
        self.discovery.on_constructed(instance);
    }

    /// Advances the registry by one host update.
    pub fn tick<H>(&mut self, host: &H) -> Vec<HandleId>
    where
        H: EntityHost + ?Sized,
    {
        self.discovery.tick(&mut self.pool, host)
    }

    /// Returns the handle for a live instance, creating it on first sight.
    pub fn get_or_create<H>(&mut self, host: &H, instance: EntityId) -> Option<HandleId>
    where
        H: EntityHost + ?Sized,
    {
        self.discovery
            .register(&mut self.pool, host, instance)
            .map(Registration::handle)
    }

    /// Subscribes to discoveries, replaying every identity found so far.
    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: FnMut(&IdentityHandle) + Send + Sync + 'static,
    {
        self.discovery.subscribe(&self.pool, handler);
    }

    /// Subscribes to weight snapshot replacements.
    pub fn on_index_updated<F>(&mut self, listener: F)
    where
        F: FnMut() + Send + Sync + 'static,
    {
        self.index.on_updated(listener);
    }

    /// Replaces the weight snapshot with `items`.
    ///
    /// Items whose source entity is destroyed or has no identity are skipped.
    /// Returns the number of entries stored.
    pub fn capture<H>(&mut self, host: &H, items: &[SourceWeight]) -> usize
    where
        H: EntityHost + ?Sized,
    {
        let max_weight = self.config.sampling.max_weight;
        let mut entries = Vec::with_capacity(items.len());

        for item in items {
            match self.get_or_create(host, item.entity) {
                Some(handle) => entries.push(WeightEntry {
                    handle,
                    weight: clamp_weight(item.weight, max_weight),
                }),
                None => tracing::debug!("Skipping weight source {}: no identity", item.entity),
            }
        }

        let stored = entries.len();
        self.index.replace(entries);
        tracing::debug!("Captured {} weight entries from {} sources", stored, items.len());
        stored
    }

    /// Host callback for a captured weight-source list.
    ///
    /// Falls back to the host's own source list when the capture is missing
    /// or empty.
    pub fn on_source_list_captured<H>(&mut self, host: &H, captured: Option<&[SourceWeight]>) -> usize
    where
        H: EntityHost + ?Sized,
    {
        match captured {
            Some(items) if !items.is_empty() => self.capture(host, items),
            _ => {
                tracing::warn!("Captured weight-source list missing or empty, reading it from the host");
                let fallback = host.source_list();
                self.capture(host, &fallback)
            }
        }
    }

    /// Summed weight of `identity` in the current snapshot.
    pub fn weight_of<I>(&self, identity: Option<&I>) -> f64
    where
        I: LooseIdentity + ?Sized,
    {
        self.index.weight_of(&self.pool, identity)
    }

    /// Summed weight of a pooled handle in the current snapshot.
    pub fn weight_of_handle(&self, id: HandleId) -> f64 {
        self.weight_of(self.pool.get(id))
    }

    /// Live entity currently matching a handle.
    pub fn resolve<'h, H>(&mut self, id: HandleId, host: &'h H) -> Option<&'h Entity>
    where
        H: EntityHost + ?Sized,
    {
        self.pool.resolve(id, host).map(|(_, entity)| entity)
    }

    /// Live instance key currently matching a handle.
    pub fn resolve_instance<H>(&mut self, id: HandleId, host: &H) -> Option<EntityId>
    where
        H: EntityHost + ?Sized,
    {
        self.pool.resolve(id, host).map(|(instance, _)| instance)
    }

    /// Picks a handle from the current snapshot by weight.
    pub fn sample<R>(&self, rng: &mut R) -> Result<HandleId, SamplingError>
    where
        R: Rng + ?Sized,
    {
        self.index.sample(rng)
    }

    /// Where a handle's behavior type came from, e.g. `"Base"` or `"Mods.X"`.
    pub fn origin_label(&self, id: HandleId) -> Option<String> {
        let handle = self.pool.get(id)?;
        let label = match &handle.behavior_type {
            Some(behavior_type) => behavior_type.origin_label(&self.config.origins.base_origins),
            None => "Unknown".to_string(),
        };
        Some(label)
    }

    pub fn handle(&self, id: HandleId) -> Option<&IdentityHandle> {
        self.pool.get(id)
    }

    pub fn handles(&self) -> impl Iterator<Item = &IdentityHandle> {
        self.pool.handles()
    }

    /// Handles in discovery order.
    pub fn discovered(&self) -> &[HandleId] {
        self.discovery.log()
    }

    pub fn index(&self) -> &WeightedIndex {
        &self.index
    }

    pub fn pending_registrations(&self) -> usize {
        self.discovery.pending()
    }

    pub fn current_tick(&self) -> u64 {
        self.discovery.current_tick()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
