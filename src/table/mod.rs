//! Table Module
//!
//! The shared, concurrently accessible key-value store behind every handle.
//!
//! ## Responsibilities
//! - Atomic single-key insert, lookup and remove
//! - Lazy snapshot scans, in key order for ordered tables
//! - Approximate entry count
//! - Explicit destruction, after which any further use panics
//!
//! ## Data Structure Choice
//! Entries are striped across a power-of-two number of shards, each a
//! `HashMap` (unordered) or `BTreeMap` (ordered) behind a `parking_lot`
//! RwLock:
//! - Operations on keys in different shards never contend
//! - Same-key writers serialize on their shard's write lock
//! - Ordered scans k-way merge per-shard sorted snapshots

mod scan;
mod shard;
mod store;

use std::hash::Hash;

pub use scan::Scan;
pub use store::Table;

/// Bounds required of table keys.
///
/// Ordering is chosen at runtime, so keys carry both hashing and a total order.
pub trait TableKey: Hash + Ord + Clone + Send + Sync + 'static {}

impl<T> TableKey for T where T: Hash + Ord + Clone + Send + Sync + 'static {}

/// Bounds required of table values. Lookups return copies.
pub trait TableValue: Clone + Send + Sync + 'static {}

impl<T> TableValue for T where T: Clone + Send + Sync + 'static {}
