//! Diagnostic and serialized representations
//!
//! Both render the table identity plus a scan of its current contents. The
//! text form is for humans and is not meant to be parsed back.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::SharedMap;
use crate::table::{TableKey, TableValue};

/// `SharedMap<#3>{"a": 1, "b": 2}`
impl<K, V> fmt::Debug for SharedMap<K, V>
where
    K: TableKey + fmt::Debug,
    V: TableValue + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedMap<{}>", self.id())?;
        if self.is_destroyed() {
            return f.write_str("(destroyed)");
        }
        f.debug_map().entries(self.iter()).finish()
    }
}

/// `SharedMap<#3, 2 entries>`
impl<K, V> fmt::Display for SharedMap<K, V>
where
    K: TableKey,
    V: TableValue,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_destroyed() {
            return write!(f, "SharedMap<{}, destroyed>", self.id());
        }
        write!(f, "SharedMap<{}, {} entries>", self.id(), self.len())
    }
}

/// Serializes a snapshot of the entries as a map
impl<K, V> Serialize for SharedMap<K, V>
where
    K: TableKey + Serialize,
    V: TableValue + Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Collect first: the length must match what is written
        let entries = self.to_vec();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in &entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
