//! Builder for SharedMap
//!
//! Collects table options, the target registry and optional initial
//! contents, then creates the table in one step.

use std::marker::PhantomData;

use super::SharedMap;
use crate::config::{Concurrency, Config, Ordering};
use crate::error::Result;
use crate::registry::Registry;
use crate::table::{TableKey, TableValue};

/// Builder for SharedMap
pub struct MapBuilder<K, V> {
    config: Config,
    registry: Option<Registry>,
    _types: PhantomData<fn() -> (K, V)>,
}

impl<K, V> MapBuilder<K, V>
where
    K: TableKey,
    V: TableValue,
{
    pub(crate) fn new() -> Self {
        Self {
            config: Config::default(),
            registry: None,
            _types: PhantomData,
        }
    }

    /// Replace all table options at once
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the iteration order
    pub fn ordering(mut self, ordering: Ordering) -> Self {
        self.config.ordering = ordering;
        self
    }

    /// Shorthand for `ordering(Ordering::Ordered)`
    pub fn ordered(self) -> Self {
        self.ordering(Ordering::Ordered)
    }

    /// Set the locking granularity
    pub fn concurrency(mut self, concurrency: Concurrency) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    /// Set an explicit shard count
    pub fn shards(mut self, count: usize) -> Self {
        self.config.shards = Some(count);
        self
    }

    /// Create the table in `registry` instead of the global one
    pub fn registry(mut self, registry: &Registry) -> Self {
        self.registry = Some(registry.clone());
        self
    }

    /// Create an empty table
    pub fn build(self) -> Result<SharedMap<K, V>> {
        match &self.registry {
            Some(registry) => registry.create(&self.config),
            None => Registry::global().create(&self.config),
        }
    }

    /// Create a table holding `entries`. Later duplicates overwrite earlier ones.
    pub fn build_from<I>(self, entries: I) -> Result<SharedMap<K, V>>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = self.build()?;
        map.extend(entries);
        Ok(map)
    }

    /// Create a table holding `entries`, each passed through `transform`
    /// before insertion.
    pub fn build_from_with<I, F>(self, entries: I, mut transform: F) -> Result<SharedMap<K, V>>
    where
        I: IntoIterator<Item = (K, V)>,
        F: FnMut(K, V) -> (K, V),
    {
        let mut map = self.build()?;
        map.extend(entries.into_iter().map(|(k, v)| transform(k, v)));
        Ok(map)
    }
}
