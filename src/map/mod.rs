//! Map Module
//!
//! `SharedMap<K, V>`: the map-like handle over a shared table.
//!
//! ## Reference semantics
//! A `SharedMap` is a reference, not a container. Cloning it, or opening the
//! same `TableId` again through the registry, yields another handle onto the
//! same entries:
//!
//! ```
//! use sharedmap::SharedMap;
//!
//! let a: SharedMap<&str, i32> = SharedMap::new();
//! let b = a.clone();
//! a.put("x", 10);
//! assert_eq!(b.fetch("x"), Some(10));
//! ```
//!
//! Operations that a value-typed map would express as "return a new map"
//! (`put`, `delete`, `merge`, `drop_keys`, ...) mutate the shared table in
//! place and return `&Self` for chaining.
//!
//! ## Atomicity
//! Single-key operations are atomic. Everything in `ops` that touches more
//! than one key, or reads before it writes, is a plain sequence of single-key
//! operations and can interleave with other writers.

mod builder;
mod fmt;
mod iter;
mod ops;

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::{Arc, Weak};

pub use builder::MapBuilder;

use crate::config::{Config, Ordering};
use crate::error::Result;
use crate::registry::{Registry, RegistryInner, TableId};
use crate::table::{Scan, Table, TableKey, TableValue};

/// Handle to a shared, concurrently accessible key-value table.
///
/// Dropping a handle never destroys the table; only [`SharedMap::destroy`]
/// or [`Registry::destroy`] does (or dropping the owning registry). Using any
/// handle after its table was destroyed panics.
pub struct SharedMap<K, V> {
    /// Arena slot of the table (keeps memory alive, not identity)
    table: Arc<Table<K, V>>,

    /// Owning registry, used to create sibling tables and to unregister
    registry: Weak<RegistryInner>,
}

impl<K, V> SharedMap<K, V>
where
    K: TableKey,
    V: TableValue,
{
    // =========================================================================
    // Construction
    // =========================================================================

    /// Create an empty unordered table in the global registry
    pub fn new() -> Self {
        Registry::global().inner().allocate(Config::default())
    }

    /// Create an empty table in the global registry
    pub fn with_config(config: &Config) -> Result<Self> {
        Registry::global().create(config)
    }

    /// Start building a table with options and initial contents
    pub fn builder() -> MapBuilder<K, V> {
        MapBuilder::new()
    }

    pub(crate) fn from_parts(table: Arc<Table<K, V>>, registry: Weak<RegistryInner>) -> Self {
        Self { table, registry }
    }

    /// New empty table in the same registry with the same options
    pub(crate) fn sibling(&self) -> Self {
        self.table.assert_live();
        match self.registry.upgrade() {
            Some(inner) => inner.allocate(self.table.config().clone()),
            None => panic!("registry owning table {} has been dropped", self.id()),
        }
    }

    // =========================================================================
    // Primitives
    // =========================================================================

    /// Insert or overwrite `key`. Visible through every handle on return.
    pub fn put(&self, key: K, value: V) -> &Self {
        self.table.insert(key, value);
        self
    }

    /// Insert or overwrite `key`, returning the previous value
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.table.insert(key, value)
    }

    /// Current value for `key`, if any
    pub fn fetch<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Ord + ?Sized,
    {
        self.table.lookup(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Ord + ?Sized,
    {
        self.table.contains(key)
    }

    /// Remove `key`. Absent keys are ignored.
    pub fn delete<Q>(&self, key: &Q) -> &Self
    where
        K: Borrow<Q>,
        Q: Hash + Ord + ?Sized,
    {
        self.table.remove(key);
        self
    }

    /// Remove `key` and return its value
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Ord + ?Sized,
    {
        self.table.take(key)
    }

    /// Lazy snapshot scan of all entries
    pub fn iter(&self) -> Scan<'_, K, V> {
        self.table.scan()
    }

    /// Entry count (may be stale under concurrent writes)
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Remove every entry. Not atomic across shards.
    pub fn clear(&self) -> &Self {
        self.table.clear();
        self
    }

    /// Destroy the underlying table.
    ///
    /// All other handles to it become unusable: any further call on them
    /// panics. The caller must ensure no other thread is using the table.
    pub fn destroy(self) {
        self.table.assert_live();
        let unregistered = self
            .registry
            .upgrade()
            .map(|inner| inner.destroy(self.id()))
            .unwrap_or(false);

        // Not registered: the registry is gone or lost a race to destroy it
        if !unregistered {
            self.table.destroy();
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Identity of the underlying table
    pub fn id(&self) -> TableId {
        self.table.id()
    }

    pub fn ordering(&self) -> Ordering {
        self.table.ordering()
    }

    pub fn config(&self) -> &Config {
        self.table.config()
    }

    /// Whether the underlying table has been destroyed
    pub fn is_destroyed(&self) -> bool {
        self.table.is_destroyed()
    }

    /// Whether both handles designate the same table
    pub fn same_table(&self, other: &SharedMap<K, V>) -> bool {
        Arc::ptr_eq(&self.table, &other.table)
    }

    /// Owning registry, unless it has been dropped
    pub fn registry(&self) -> Option<Registry> {
        self.registry.upgrade().map(Registry::from_inner)
    }
}

impl<K, V> Clone for SharedMap<K, V> {
    /// Copies the reference, never the entries
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            registry: Weak::clone(&self.registry),
        }
    }
}

impl<K, V> Default for SharedMap<K, V>
where
    K: TableKey,
    V: TableValue,
{
    fn default() -> Self {
        Self::new()
    }
}
