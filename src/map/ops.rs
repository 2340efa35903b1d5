//! Derived map operations
//!
//! Everything here is built from the table primitives (lookup, insert,
//! remove, scan) and carries no atomicity beyond them.

use std::borrow::Borrow;
use std::hash::Hash;

use super::SharedMap;
use crate::error::{MapError, Result};
use crate::table::{TableKey, TableValue};

impl<K, V> SharedMap<K, V>
where
    K: TableKey,
    V: TableValue,
{
    // =========================================================================
    // Reads
    // =========================================================================

    /// Value for `key`, or `default` when absent
    pub fn get<Q>(&self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Ord + ?Sized,
    {
        self.fetch(key).unwrap_or(default)
    }

    /// Value for `key`, or the result of `compute` when absent.
    ///
    /// `compute` runs at most once and its result is not inserted.
    pub fn get_or_compute<Q, F>(&self, key: &Q, compute: F) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Ord + ?Sized,
        F: FnOnce() -> V,
    {
        self.fetch(key).unwrap_or_else(compute)
    }

    /// Value for `key`, or `KeyNotFound`
    pub fn fetch_existing<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Ord + ?Sized,
    {
        self.fetch(key).ok_or(MapError::KeyNotFound)
    }

    pub fn keys(&self) -> Vec<K> {
        self.iter().map(|(k, _)| k).collect()
    }

    pub fn values(&self) -> Vec<V> {
        self.iter().map(|(_, v)| v).collect()
    }

    /// All entries, in scan order
    pub fn to_vec(&self) -> Vec<(K, V)> {
        self.iter().collect()
    }

    /// Whether both tables hold exactly the same entries.
    ///
    /// Compares full sorted snapshots, so this is O(n log n).
    pub fn equal(&self, other: &SharedMap<K, V>) -> bool
    where
        V: PartialEq,
    {
        if self.same_table(other) {
            return true;
        }
        if self.len() != other.len() {
            return false;
        }

        let mut ours = self.to_vec();
        let mut theirs = other.to_vec();
        ours.sort_by(|a, b| a.0.cmp(&b.0));
        theirs.sort_by(|a, b| a.0.cmp(&b.0));
        ours == theirs
    }

    // =========================================================================
    // Single-key writes
    // =========================================================================

    /// Insert only if `key` is absent (atomic). Returns whether it inserted.
    pub fn put_new(&self, key: K, value: V) -> bool {
        self.table.insert_new(key, value)
    }

    /// Like `put_new`, computing the value only when `key` looks absent.
    ///
    /// If another writer inserts `key` after the check, its value is kept and
    /// the computed one discarded.
    pub fn put_new_with<F>(&self, key: K, compute: F) -> bool
    where
        F: FnOnce() -> V,
    {
        if self.contains_key(&key) {
            return false;
        }
        self.table.insert_new(key, compute())
    }

    /// Apply `update` to the current value, or store `initial` if absent.
    ///
    /// Lookup and insert are separate steps: a write to `key` between them is
    /// overwritten.
    pub fn update_or_insert<F>(&self, key: K, initial: V, update: F) -> &Self
    where
        F: FnOnce(V) -> V,
    {
        let value = match self.fetch(&key) {
            Some(current) => update(current),
            None => initial,
        };
        self.put(key, value)
    }

    /// Apply `update` to the current value, or fail with `KeyNotFound`
    pub fn update_existing<F>(&self, key: K, update: F) -> Result<()>
    where
        F: FnOnce(V) -> V,
    {
        let current = self.fetch(&key).ok_or(MapError::KeyNotFound)?;
        self.put(key, update(current));
        Ok(())
    }

    /// Overwrite an existing key, or fail with `KeyNotFound`
    pub fn replace_existing(&self, key: K, value: V) -> Result<()> {
        if !self.contains_key(&key) {
            return Err(MapError::KeyNotFound);
        }
        self.put(key, value);
        Ok(())
    }

    /// Remove `key` and return its value, or `default` when absent
    pub fn pop<Q>(&self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Ord + ?Sized,
    {
        self.remove(key).unwrap_or(default)
    }

    pub fn pop_with<Q, F>(&self, key: &Q, compute: F) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Ord + ?Sized,
        F: FnOnce() -> V,
    {
        self.remove(key).unwrap_or_else(compute)
    }

    // =========================================================================
    // Multi-key operations
    // =========================================================================

    /// Copy every entry of `other` into this table, `other` winning conflicts.
    pub fn merge(&self, other: &SharedMap<K, V>) -> &Self {
        for (key, value) in other.iter() {
            self.put(key, value);
        }
        self
    }

    /// Copy every entry of `other` into this table, resolving keys present in
    /// both with `resolve(key, ours, theirs)`.
    pub fn merge_with<F>(&self, other: &SharedMap<K, V>, mut resolve: F) -> &Self
    where
        F: FnMut(&K, V, V) -> V,
    {
        for (key, theirs) in other.iter() {
            let value = match self.fetch(&key) {
                Some(ours) => resolve(&key, ours, theirs),
                None => theirs,
            };
            self.put(key, value);
        }
        self
    }

    /// Move the given keys into a new table.
    ///
    /// Returns `(included, remaining)`: `included` is a new table in the same
    /// registry holding the moved entries, `remaining` is this table (shared,
    /// not copied) with them removed. Absent keys are ignored.
    pub fn split<I>(&self, keys: I) -> (SharedMap<K, V>, SharedMap<K, V>)
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        let included = self.sibling();
        for key in keys {
            let key: &K = key.borrow();
            if let Some(value) = self.remove(key) {
                included.put(key.clone(), value);
            }
        }
        (included, self.clone())
    }

    /// New table in the same registry holding only the given keys' entries.
    /// This table is left unchanged.
    pub fn take<I>(&self, keys: I) -> SharedMap<K, V>
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        let taken = self.sibling();
        for key in keys {
            let key: &K = key.borrow();
            if let Some(value) = self.fetch(key) {
                taken.put(key.clone(), value);
            }
        }
        taken
    }

    /// Remove the given keys from this table
    pub fn drop_keys<I>(&self, keys: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        for key in keys {
            let key: &K = key.borrow();
            self.delete(key);
        }
        self
    }
}
