//! Registry implementation
//!
//! A map from `TableId` to type-erased tables, plus an id counter.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use super::TableId;
use crate::config::Config;
use crate::error::{MapError, Result};
use crate::map::SharedMap;
use crate::table::{Table, TableKey, TableValue};

/// Process-wide default registry
static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Arena of shared tables.
///
/// Cloning a `Registry` clones a reference to the same arena. When the last
/// clone is dropped the owning context ends and every table still registered
/// is destroyed.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

/// Shared state behind every `Registry` clone
pub(crate) struct RegistryInner {
    /// Live tables. Protected by RwLock: resolves are reads, create/destroy writes.
    tables: RwLock<HashMap<TableId, Arc<dyn ErasedTable>>>,

    /// Next id to hand out (atomic, lock-free)
    next_id: AtomicU64,
}

/// Object-safe view of a `Table<K, V>` so tables of any type share one arena
trait ErasedTable: Send + Sync {
    fn destroy(&self) -> bool;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<K, V> ErasedTable for Table<K, V>
where
    K: TableKey,
    V: TableValue,
{
    fn destroy(&self) -> bool {
        Table::destroy(self)
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                tables: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// The process-wide registry. It is never dropped, so its tables live
    /// until destroyed explicitly.
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(Registry::new)
    }

    /// Create a new empty table and return a handle to it
    ///
    /// Fails with `InvalidConfiguration` for unsupported option combinations.
    pub fn create<K, V>(&self, config: &Config) -> Result<SharedMap<K, V>>
    where
        K: TableKey,
        V: TableValue,
    {
        if let Err(e) = config.validate() {
            tracing::warn!("Rejected table configuration {:?}: {}", config, e);
            return Err(e);
        }

        Ok(self.inner.allocate(config.clone()))
    }

    /// Build another handle to an existing table
    pub fn open<K, V>(&self, id: TableId) -> Result<SharedMap<K, V>>
    where
        K: TableKey,
        V: TableValue,
    {
        let slot = self
            .inner
            .tables
            .read()
            .get(&id)
            .cloned()
            .ok_or(MapError::TableNotFound(id))?;

        let table = slot
            .into_any()
            .downcast::<Table<K, V>>()
            .map_err(|_| MapError::TypeMismatch(id))?;

        tracing::trace!("Resolved table {}", id);
        Ok(SharedMap::from_parts(table, Arc::downgrade(&self.inner)))
    }

    /// Destroy a table and release its storage.
    ///
    /// Every outstanding handle to it panics on further use, so callers must
    /// make sure no other thread is still using the table.
    pub fn destroy(&self, id: TableId) -> Result<()> {
        if self.inner.destroy(id) {
            Ok(())
        } else {
            Err(MapError::TableNotFound(id))
        }
    }

    /// Whether `id` names a live table in this registry
    pub fn contains(&self, id: TableId) -> bool {
        self.inner.tables.read().contains_key(&id)
    }

    /// Number of live tables
    pub fn table_count(&self) -> usize {
        self.inner.tables.read().len()
    }

    /// Ids of all live tables, ascending
    pub fn table_ids(&self) -> Vec<TableId> {
        let mut ids: Vec<_> = self.inner.tables.read().keys().copied().collect();
        ids.sort();
        ids
    }

    /// Whether two registries share the same arena
    pub fn same_registry(&self, other: &Registry) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn from_inner(inner: Arc<RegistryInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn inner(&self) -> &Arc<RegistryInner> {
        &self.inner
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("tables", &self.table_ids())
            .finish()
    }
}

impl RegistryInner {
    /// Register a new table built from an already validated config
    pub(crate) fn allocate<K, V>(self: &Arc<Self>, config: Config) -> SharedMap<K, V>
    where
        K: TableKey,
        V: TableValue,
    {
        let id = TableId::from_raw(self.next_id.fetch_add(1, Ordering::Relaxed));
        let table = Arc::new(Table::<K, V>::new(id, config));

        tracing::debug!(
            "Created table {} ({:?}, {:?}, {} shards)",
            id,
            table.ordering(),
            table.concurrency(),
            table.shard_count()
        );

        self.tables
            .write()
            .insert(id, Arc::clone(&table) as Arc<dyn ErasedTable>);

        SharedMap::from_parts(table, Arc::downgrade(self))
    }

    /// Unregister and destroy. Returns false if `id` was not registered.
    pub(crate) fn destroy(&self, id: TableId) -> bool {
        // Release the registry lock before clearing shards
        let removed = self.tables.write().remove(&id);
        let Some(table) = removed else {
            return false;
        };

        table.destroy();
        tracing::debug!("Destroyed table {}", id);
        true
    }
}

impl Drop for RegistryInner {
    fn drop(&mut self) {
        let tables = std::mem::take(self.tables.get_mut());
        if tables.is_empty() {
            return;
        }

        tracing::debug!("Registry dropped, destroying {} tables", tables.len());
        for table in tables.into_values() {
            table.destroy();
        }
    }
}
