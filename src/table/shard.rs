//! Shard storage
//!
//! One lock-protected map. A table owns a fixed array of these.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use parking_lot::RwLock;

use crate::config::Ordering;

/// A single stripe of a table
pub(crate) enum Shard<K, V> {
    /// Unordered storage
    Hashed(RwLock<HashMap<K, V>>),

    /// Key-ordered storage
    Sorted(RwLock<BTreeMap<K, V>>),
}

impl<K, V> Shard<K, V>
where
    K: Hash + Ord,
{
    pub(crate) fn new(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Unordered => Shard::Hashed(RwLock::new(HashMap::new())),
            Ordering::Ordered => Shard::Sorted(RwLock::new(BTreeMap::new())),
        }
    }

    /// Copy out the value for `key` (read lock)
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Ord + ?Sized,
        V: Clone,
    {
        match self {
            Shard::Hashed(map) => map.read().get(key).cloned(),
            Shard::Sorted(map) => map.read().get(key).cloned(),
        }
    }

    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Ord + ?Sized,
    {
        match self {
            Shard::Hashed(map) => map.read().contains_key(key),
            Shard::Sorted(map) => map.read().contains_key(key),
        }
    }

    /// Insert or overwrite (write lock). `on_new` runs under the lock when
    /// the key was absent.
    pub(crate) fn insert(&self, key: K, value: V, on_new: impl FnOnce()) -> Option<V> {
        match self {
            Shard::Hashed(map) => {
                let mut map = map.write();
                let old = map.insert(key, value);
                if old.is_none() {
                    on_new();
                }
                old
            }
            Shard::Sorted(map) => {
                let mut map = map.write();
                let old = map.insert(key, value);
                if old.is_none() {
                    on_new();
                }
                old
            }
        }
    }

    /// Insert only when absent (write lock). Returns whether it inserted.
    pub(crate) fn insert_new(&self, key: K, value: V, on_new: impl FnOnce()) -> bool {
        match self {
            Shard::Hashed(map) => {
                let mut map = map.write();
                if map.contains_key(&key) {
                    return false;
                }
                map.insert(key, value);
            }
            Shard::Sorted(map) => {
                let mut map = map.write();
                if map.contains_key(&key) {
                    return false;
                }
                map.insert(key, value);
            }
        }
        on_new();
        true
    }

    /// Remove and return (write lock). `on_removed` runs under the lock when
    /// an entry was removed.
    pub(crate) fn remove<Q>(&self, key: &Q, on_removed: impl FnOnce()) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Ord + ?Sized,
    {
        match self {
            Shard::Hashed(map) => {
                let mut map = map.write();
                let old = map.remove(key);
                if old.is_some() {
                    on_removed();
                }
                old
            }
            Shard::Sorted(map) => {
                let mut map = map.write();
                let old = map.remove(key);
                if old.is_some() {
                    on_removed();
                }
                old
            }
        }
    }

    /// Copy every entry out under one read lock.
    /// Sorted shards yield ascending keys.
    pub(crate) fn snapshot(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        match self {
            Shard::Hashed(map) => {
                let map = map.read();
                map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
            }
            Shard::Sorted(map) => {
                let map = map.read();
                map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
            }
        }
    }

    /// Drop every entry and release the allocation. `on_cleared` receives the
    /// number of entries dropped, under the lock.
    pub(crate) fn clear(&self, on_cleared: impl FnOnce(usize)) {
        match self {
            Shard::Hashed(map) => {
                let mut map = map.write();
                let dropped = std::mem::take(&mut *map);
                on_cleared(dropped.len());
            }
            Shard::Sorted(map) => {
                let mut map = map.write();
                let dropped = std::mem::take(&mut *map);
                on_cleared(dropped.len());
            }
        }
    }
}
