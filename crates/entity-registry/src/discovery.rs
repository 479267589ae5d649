//! Discovery Engine
//!
//! Funnels candidate entities through the handle pool and announces every
//! newly created handle exactly once.
//!
//! - Full scans enumerate the host's live entities.
//! - Construction signals are queued and registered a fixed number of ticks
//!   later, once the host has finished initializing the entity. A queued
//!   entity that is gone by then is dropped.
//! - Subscribers first get the whole discovery log replayed in order, then
//!   live announcements.

use std::collections::VecDeque;

use entity_model::{EntityId, HandleId, IdentityHandle};

use crate::host::EntityHost;
use crate::pool::{HandlePool, Registration};

/// Handler called once per discovered identity.
pub type DiscoveryHandler = Box<dyn FnMut(&IdentityHandle) + Send + Sync>;

/// A construction signal waiting for its tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredRegistration {
    pub instance: EntityId,
    pub due_tick: u64,
}

/// Discovery log, subscribers and deferred registration queue.
pub struct DiscoveryEngine {
    log: Vec<HandleId>,
    subscribers: Vec<DiscoveryHandler>,
    pending: VecDeque<DeferredRegistration>,
    current_tick: u64,
    construction_delay: u64,
}

impl DiscoveryEngine {
    /// Registration runs on a later tick, so a delay of 0 is raised to 1.
    pub fn new(construction_delay: u64) -> Self {
        Self {
            log: Vec::new(),
            subscribers: Vec::new(),
            pending: VecDeque::new(),
            current_tick: 0,
            construction_delay: construction_delay.max(1),
        }
    }

    /// Registers every live entity. Returns the handles created by this scan.
    pub fn scan_all<H>(&mut self, pool: &mut HandlePool, host: &H) -> Vec<HandleId>
    where
        H: EntityHost + ?Sized,
    {
        let mut discovered = Vec::new();
        for (instance, entity) in host.live_entities() {
            if let Some(Registration::New(id)) = pool.get_or_create(instance, entity) {
                self.announce(pool, id);
                discovered.push(id);
            }
        }

        if !discovered.is_empty() {
            tracing::info!("Scan discovered {} new identities", discovered.len());
        }
        discovered
    }

    /// Registers one live instance, announcing it if its handle is new.
    pub fn register<H>(&mut self, pool: &mut HandlePool, host: &H, instance: EntityId) -> Option<Registration>
    where
        H: EntityHost + ?Sized,
    {
        let registration = pool.get_or_create_live(host, instance)?;
        if let Registration::New(id) = registration {
            self.announce(pool, id);
        }
        Some(registration)
    }

    /// Queues an entity for registration after the construction delay.
    pub fn on_constructed(&mut self, instance: EntityId) {
        self.pending.push_back(DeferredRegistration {
            instance,
            due_tick: self.current_tick + self.construction_delay,
        });
    }

    /// Advances one tick and registers every due construction.
    ///
    /// Returns the handles created during this tick.
    pub fn tick<H>(&mut self, pool: &mut HandlePool, host: &H) -> Vec<HandleId>
    where
        H: EntityHost + ?Sized,
    {
        self.current_tick += 1;

        let mut discovered = Vec::new();
        while let Some(task) = self.pending.front().copied() {
            if task.due_tick > self.current_tick {
                break;
            }
            self.pending.pop_front();

            if host.entity(task.instance).is_none() {
                tracing::debug!("Dropping {}: destroyed before registration", task.instance);
                continue;
            }
            if let Some(Registration::New(id)) = self.register(pool, host, task.instance) {
                discovered.push(id);
            }
        }
        discovered
    }

    /// Replays the discovery log to `handler`, then keeps it for live events.
    pub fn subscribe<F>(&mut self, pool: &HandlePool, mut handler: F)
    where
        F: FnMut(&IdentityHandle) + Send + Sync + 'static,
    {
        for handle in self.log.iter().filter_map(|id| pool.get(*id)) {
            handler(handle);
        }
        self.subscribers.push(Box::new(handler));
    }

    fn announce(&mut self, pool: &HandlePool, id: HandleId) {
        let Some(handle) = pool.get(id) else {
            return;
        };

        tracing::debug!("Registering identity: {}", handle.fingerprint);
        self.log.push(id);
        for subscriber in self.subscribers.iter_mut() {
            subscriber(handle);
        }
    }

    /// Handles in discovery order.
    pub fn log(&self) -> &[HandleId] {
        &self.log
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    pub fn construction_delay(&self) -> u64 {
        self.construction_delay
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for DiscoveryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryEngine")
            .field("log", &self.log)
            .field("subscribers", &self.subscribers.len())
            .field("pending", &self.pending)
            .field("current_tick", &self.current_tick)
            .field("construction_delay", &self.construction_delay)
            .finish()
    }
}
