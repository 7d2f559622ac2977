//! Error types for notes operations

use thiserror::Error;

/// Input validation errors.
///
/// These are raised before any storage call is made.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Note content is required and must not be blank")]
    ContentRequired,

    #[error("No updatable fields supplied")]
    NoFields,
}

/// Storage layer errors.
///
/// A missing row is not an error at this level: lookups that can miss
/// return `Option` or `bool` instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Query failed during {operation}: {reason}")]
    QueryFailed {
        operation: &'static str,
        reason: String,
    },

    #[error("Schema statement '{statement}' failed: {reason}")]
    SchemaFailed {
        statement: &'static str,
        reason: String,
    },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
