//! Table implementation
//!
//! Sharded maps with an atomic entry counter and a destruction flag.

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};

use crossbeam::utils::CachePadded;

use super::scan::Scan;
use super::shard::Shard;
use super::{TableKey, TableValue};
use crate::config::{Concurrency, Config, Ordering};
use crate::registry::TableId;

/// Shared key-value table
///
/// ## Concurrency
/// - Each key lives in exactly one shard, picked by hash
/// - Point operations take one shard lock (read for lookups, write for
///   mutations) and never touch other shards
/// - `len` is adjusted under the shard lock, so every observed count matched
///   the table at some instant
/// - Scans copy one shard at a time and give no isolation against writers
///
/// Every method panics once the table has been destroyed.
pub struct Table<K, V> {
    /// Identity assigned by the owning registry
    id: TableId,

    /// Config the table was built from (validated)
    config: Config,

    /// Stripes, padded so neighbouring locks do not share a cache line
    shards: Box<[CachePadded<Shard<K, V>>]>,

    /// Routes keys to shards
    hasher: RandomState,

    /// Live entry count
    len: AtomicUsize,

    /// Set once by `destroy`
    destroyed: AtomicBool,
}

impl<K, V> Table<K, V>
where
    K: TableKey,
    V: TableValue,
{
    /// Create an empty table. `config` must already be validated.
    pub(crate) fn new(id: TableId, config: Config) -> Self {
        let shards = (0..config.shard_count())
            .map(|_| CachePadded::new(Shard::new(config.ordering)))
            .collect();

        Self {
            id,
            config,
            shards,
            hasher: RandomState::new(),
            len: AtomicUsize::new(0),
            destroyed: AtomicBool::new(false),
        }
    }

    // =========================================================================
    // Primitives
    // =========================================================================

    /// Insert or overwrite the entry for `key`.
    /// Returns the previous value, if any.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.assert_live();
        self.shard_for(&key)
            .insert(key, value, || self.increment())
    }

    /// Insert only if `key` is absent. Returns whether the entry was inserted.
    pub fn insert_new(&self, key: K, value: V) -> bool {
        self.assert_live();
        self.shard_for(&key)
            .insert_new(key, value, || self.increment())
    }

    /// Point lookup
    pub fn lookup<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Ord + ?Sized,
    {
        self.assert_live();
        self.shard_for(key).get(key)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Ord + ?Sized,
    {
        self.assert_live();
        self.shard_for(key).contains(key)
    }

    /// Point delete. Removing an absent key is a no-op.
    pub fn remove<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Ord + ?Sized,
    {
        self.take(key);
    }

    /// Remove the entry for `key` and return its value
    pub fn take<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Ord + ?Sized,
    {
        self.assert_live();
        self.shard_for(key).remove(key, || self.decrement())
    }

    /// Start a lazy snapshot scan. Ordered tables yield ascending keys.
    pub fn scan(&self) -> Scan<'_, K, V> {
        self.assert_live();
        tracing::trace!("Scanning table {} ({:?})", self.id, self.config.ordering);
        match self.config.ordering {
            Ordering::Unordered => Scan::unordered(&self.shards),
            Ordering::Ordered => Scan::ordered(&self.shards),
        }
    }

    /// Current entry count
    pub fn len(&self) -> usize {
        self.assert_live();
        self.len.load(AtomicOrdering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every entry, one shard at a time
    pub fn clear(&self) {
        self.assert_live();
        self.clear_shards();
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Destroy the table and release its storage.
    ///
    /// Returns false if it was already destroyed.
    pub(crate) fn destroy(&self) -> bool {
        if self.destroyed.swap(true, AtomicOrdering::AcqRel) {
            return false;
        }
        self.clear_shards();
        true
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(AtomicOrdering::Acquire)
    }

    /// Panic if the table has been destroyed.
    ///
    /// Using a table after destruction is a caller contract violation.
    pub(crate) fn assert_live(&self) {
        if self.is_destroyed() {
            panic!("table {} used after it was destroyed", self.id);
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ordering(&self) -> Ordering {
        self.config.ordering
    }

    pub fn concurrency(&self) -> Concurrency {
        self.config.concurrency
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Shard count is a power of two, so masking the hash picks a shard
    fn shard_for<Q>(&self, key: &Q) -> &Shard<K, V>
    where
        Q: Hash + ?Sized,
    {
        let index = (self.hasher.hash_one(key) as usize) & (self.shards.len() - 1);
        &self.shards[index]
    }

    fn increment(&self) {
        self.len.fetch_add(1, AtomicOrdering::AcqRel);
    }

    fn decrement(&self) {
        self.len.fetch_sub(1, AtomicOrdering::AcqRel);
    }

    fn clear_shards(&self) {
        for shard in self.shards.iter() {
            shard.clear(|dropped| {
                self.len.fetch_sub(dropped, AtomicOrdering::AcqRel);
            });
        }
    }
}
