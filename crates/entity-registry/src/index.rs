//! Weighted Index
//!
//! Snapshot of `(identity, weight)` entries taken from the host's weight-source
//! list. Every capture replaces the snapshot wholesale; an identity may appear
//! several times in one capture and its weights add up.

use rand::Rng;
use serde::{Deserialize, Serialize};

use entity_model::{loosely_equals, HandleId, LooseIdentity};

use crate::error::SamplingError;
use crate::pool::HandlePool;
use crate::probability::{sample_weighted_with_max, MAX_WEIGHT};

/// Listener called after every capture.
pub type IndexListener = Box<dyn FnMut() + Send + Sync>;

/// One entry of the current snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub handle: HandleId,
    /// Clamped to `[0, max_weight]`
    pub weight: f64,
}

/// Current weight snapshot plus its update listeners.
pub struct WeightedIndex {
    entries: Vec<WeightEntry>,
    listeners: Vec<IndexListener>,
    captures: u64,
    max_weight: f64,
}

impl WeightedIndex {
    pub fn new() -> Self {
        Self::with_max_weight(MAX_WEIGHT)
    }

    /// Index whose sampling clamps weights to `[0, max_weight]`.
    pub fn with_max_weight(max_weight: f64) -> Self {
        Self {
            entries: Vec::new(),
            listeners: Vec::new(),
            captures: 0,
            max_weight,
        }
    }

    /// Replaces the snapshot and notifies listeners.
    pub fn replace(&mut self, entries: Vec<WeightEntry>) {
        self.entries = entries;
        self.captures += 1;
        for listener in self.listeners.iter_mut() {
            listener();
        }
    }

    /// Registers a listener for future snapshot replacements.
    pub fn on_updated<F>(&mut self, listener: F)
    where
        F: FnMut() + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Sum of the weights of every entry loosely equal to `identity`.
    ///
    /// Returns 0 for `None` and for identities not in the snapshot.
    pub fn weight_of<I>(&self, pool: &HandlePool, identity: Option<&I>) -> f64
    where
        I: LooseIdentity + ?Sized,
    {
        let Some(identity) = identity else {
            return 0.0;
        };

        let total: f64 = self
            .entries
            .iter()
            .filter(|entry| loosely_equals(pool.get(entry.handle), Some(identity)))
            .map(|entry| entry.weight)
            .sum();
        total.max(0.0)
    }

    /// Picks an entry's handle with probability proportional to its weight.
    pub fn sample<R>(&self, rng: &mut R) -> Result<HandleId, SamplingError>
    where
        R: Rng + ?Sized,
    {
        let weights: Vec<f64> = self.entries.iter().map(|entry| entry.weight).collect();
        let index = sample_weighted_with_max(&weights, self.max_weight, rng)?;
        Ok(self.entries[index].handle)
    }

    pub fn entries(&self) -> &[WeightEntry] {
        &self.entries
    }

    /// Total weight of the snapshot.
    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|entry| entry.weight).sum()
    }

    /// Number of captures taken so far.
    pub fn captures(&self) -> u64 {
        self.captures
    }

    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for WeightedIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WeightedIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeightedIndex")
            .field("entries", &self.entries)
            .field("listeners", &self.listeners.len())
            .field("captures", &self.captures)
            .field("max_weight", &self.max_weight)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::EntityTable;
    use entity_model::{fixtures, Entity, IdentityHandle};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn pool_with(entities: &[Entity]) -> (HandlePool, Vec<HandleId>) {
        let mut pool = HandlePool::new();
        let mut table = EntityTable::new();
        let ids: Vec<HandleId> = entities
            .iter()
            .map(|e| {
                let instance = table.spawn(e.clone());
                pool.get_or_create_live(&table, instance).unwrap().handle()
            })
            .collect();
        (pool, ids)
    }

    #[test]
    fn test_weight_of_sums_duplicates() {
        let (pool, ids) = pool_with(&[fixtures::shovel(), fixtures::flashlight()]);
        let mut index = WeightedIndex::new();
        index.replace(vec![
            WeightEntry { handle: ids[0], weight: 3.0 },
            WeightEntry { handle: ids[1], weight: 5.0 },
            WeightEntry { handle: ids[0], weight: 2.0 },
        ]);

        assert_eq!(index.weight_of(&pool, pool.get(ids[0])), 5.0);
        assert_eq!(index.weight_of(&pool, pool.get(ids[1])), 5.0);
        assert_eq!(index.total_weight(), 10.0);
    }

    #[test]
    fn test_weight_of_accepts_live_entity() {
        let (pool, ids) = pool_with(&[fixtures::shovel()]);
        let mut index = WeightedIndex::new();
        index.replace(vec![WeightEntry { handle: ids[0], weight: 7.0 }]);

        let recreated = fixtures::shovel();
        assert_eq!(index.weight_of(&pool, Some(&recreated)), 7.0);
    }

    #[test]
    fn test_weight_of_missing_identity() {
        let (pool, ids) = pool_with(&[fixtures::shovel()]);
        let mut index = WeightedIndex::new();
        index.replace(vec![WeightEntry { handle: ids[0], weight: 7.0 }]);

        assert_eq!(index.weight_of::<IdentityHandle>(&pool, None), 0.0);
        assert_eq!(index.weight_of(&pool, Some(&fixtures::plushie())), 0.0);
    }

    #[test]
    fn test_replace_discards_previous_snapshot() {
        let (pool, ids) = pool_with(&[fixtures::shovel(), fixtures::flashlight()]);
        let mut index = WeightedIndex::new();
        index.replace(vec![WeightEntry { handle: ids[0], weight: 3.0 }]);
        index.replace(vec![WeightEntry { handle: ids[1], weight: 4.0 }]);

        assert_eq!(index.weight_of(&pool, pool.get(ids[0])), 0.0);
        assert_eq!(index.weight_of(&pool, pool.get(ids[1])), 4.0);
        assert_eq!(index.captures(), 2);
    }

    #[test]
    fn test_listeners_fire_on_every_replace() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let mut index = WeightedIndex::new();
        index.on_updated(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        index.replace(Vec::new());
        index.replace(Vec::new());
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_sample_empty_snapshot() {
        let index = WeightedIndex::new();
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(index.sample(&mut rng), Err(SamplingError::EmptyWeights));
    }

    #[test]
    fn test_sample_follows_weights() {
        let (_pool, ids) = pool_with(&[fixtures::shovel(), fixtures::flashlight()]);
        let mut index = WeightedIndex::new();
        index.replace(vec![
            WeightEntry { handle: ids[0], weight: 0.0 },
            WeightEntry { handle: ids[1], weight: 1.0 },
        ]);

        let mut rng = SmallRng::seed_from_u64(77);
        for _ in 0..100 {
            assert_eq!(index.sample(&mut rng), Ok(ids[1]));
        }
    }
}
