//! Iteration protocol adapters
//!
//! `&SharedMap` iterates `(K, V)` pairs from a fresh scan; `Extend` and
//! `FromIterator` insert pairs one at a time.

use super::SharedMap;
use crate::table::{Scan, TableKey, TableValue};

impl<'a, K, V> IntoIterator for &'a SharedMap<K, V>
where
    K: TableKey,
    V: TableValue,
{
    type Item = (K, V);
    type IntoIter = Scan<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> Extend<(K, V)> for SharedMap<K, V>
where
    K: TableKey,
    V: TableValue,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, entries: I) {
        for (key, value) in entries {
            self.put(key, value);
        }
    }
}

/// Collects into a new unordered table in the global registry
impl<K, V> FromIterator<(K, V)> for SharedMap<K, V>
where
    K: TableKey,
    V: TableValue,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(entries: I) -> Self {
        let mut map = SharedMap::new();
        map.extend(entries);
        map
    }
}
