//! Configuration for SharedMap tables
//!
//! Centralized configuration with sensible defaults.

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

/// Upper bound on the number of shards a single table may use
pub const MAX_SHARDS: usize = 1024;

/// Default shard count is derived from available parallelism, capped here
const DEFAULT_SHARD_CAP: usize = 64;

/// Iteration order of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ordering {
    /// No defined iteration order
    #[default]
    Unordered,

    /// Ascending key order
    Ordered,
}

/// Locking granularity of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Concurrency {
    /// One lock guards the whole table. Intended for a single owning thread
    /// or low-contention use.
    ExclusiveOwner,

    /// Entries are striped across independently locked shards
    #[default]
    SharedAccess,
}

/// Construction options for a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Layout Configuration
    // -------------------------------------------------------------------------
    /// Iteration order of scans
    pub ordering: Ordering,

    /// Locking granularity
    pub concurrency: Concurrency,

    /// Explicit shard count. `None` picks one from the concurrency mode:
    /// 1 for `ExclusiveOwner`, derived from available parallelism otherwise.
    pub shards: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ordering: Ordering::Unordered,
            concurrency: Concurrency::SharedAccess,
            shards: None,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the ordering/concurrency/shard combination is supported
    pub fn validate(&self) -> Result<()> {
        let Some(shards) = self.shards else {
            return Ok(());
        };

        if shards == 0 {
            return Err(MapError::InvalidConfiguration(
                "shard count must be at least 1".to_string(),
            ));
        }
        if !shards.is_power_of_two() {
            return Err(MapError::InvalidConfiguration(format!(
                "shard count must be a power of two, got {}",
                shards
            )));
        }
        if shards > MAX_SHARDS {
            return Err(MapError::InvalidConfiguration(format!(
                "shard count {} exceeds maximum of {}",
                shards, MAX_SHARDS
            )));
        }
        if self.concurrency == Concurrency::ExclusiveOwner && shards != 1 {
            return Err(MapError::InvalidConfiguration(format!(
                "exclusive-owner tables use a single lock, got {} shards",
                shards
            )));
        }

        Ok(())
    }

    /// Effective shard count (assumes the config has been validated)
    pub fn shard_count(&self) -> usize {
        match (self.shards, self.concurrency) {
            (Some(n), _) => n,
            (None, Concurrency::ExclusiveOwner) => 1,
            (None, Concurrency::SharedAccess) => default_shard_count(),
        }
    }
}

/// Four shards per available core, as a power of two
fn default_shard_count() -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    (cores * 4).next_power_of_two().min(DEFAULT_SHARD_CAP)
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
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

    pub fn build(self) -> Config {
        self.config
    }
}
