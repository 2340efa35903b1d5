//! Registry Module
//!
//! Owns table identities and their lifecycles.
//!
//! ## Responsibilities
//! - Allocate tables behind opaque `TableId`s
//! - Resolve an id back into a typed handle
//! - Destroy tables explicitly, or all at once when the registry is dropped
//!
//! ## Ownership
//! ```text
//!   Registry (Arc) ──owns──▶ slots: TableId → Arc<Table>
//!        ▲                                   ▲
//!        │ weak                              │ strong
//!        └────────────── SharedMap ──────────┘
//! ```
//! Handles keep the table's memory alive but not its identity: once the
//! registry destroys a table, every handle to it panics on use.

mod arena;
mod table_id;

pub use arena::Registry;
pub use table_id::TableId;

pub(crate) use arena::RegistryInner;
