//! Error types for SharedMap
//!
//! Provides a unified error type for all recoverable failures. Contract
//! violations (using a destroyed table) panic instead.

use thiserror::Error;

use crate::registry::TableId;

/// Result type alias using MapError
pub type Result<T> = std::result::Result<T, MapError>;

/// Unified error type for SharedMap operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Key not found")]
    KeyNotFound,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    // -------------------------------------------------------------------------
    // Registry Errors
    // -------------------------------------------------------------------------
    #[error("Table {0} not found in registry")]
    TableNotFound(TableId),

    #[error("Table {0} was created with different key/value types")]
    TypeMismatch(TableId),
}
