//! # SharedMap
//!
//! A map-like handle over a shared, concurrently accessible key-value table:
//! - Reference semantics: every handle to a table sees every mutation
//! - Table lifetime independent of handles, ended only by explicit destroy
//!   (or by dropping the owning registry)
//! - Sharded reader/writer locks: single-key operations are atomic and
//!   operations on different shards never contend
//! - Ordered (ascending key) or unordered snapshot scans
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  SharedMap<K, V> handles                     │
//! │       (clone = new reference, derived ops in map::ops)       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  fetch / put / delete / scan
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Registry                              │
//! │          (TableId → table arena, create / destroy)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!   ┌──────────┬──────────┬──────────┬──────────┐
//!   │ Shard 0  │ Shard 1  │   ...    │ Shard N  │   Table
//!   │ (RwLock) │ (RwLock) │          │ (RwLock) │
//!   └──────────┴──────────┴──────────┴──────────┘
//! ```
//!
//! This is a shared mutable store, not a persistent map: `put` on one handle
//! is observed by all others. Multi-key operations (`merge`, `split`, `take`,
//! `drop_keys`, `update_or_insert`) are sequences of single-key operations
//! and are not atomic as a whole.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod table;
pub mod registry;
pub mod map;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{MapError, Result};
pub use config::{Concurrency, Config, Ordering};
pub use map::{MapBuilder, SharedMap};
pub use registry::{Registry, TableId};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of SharedMap
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
