//! Error types for kvstore.

use kvstore_core::CoreError;
use kvstore_store::DatabaseError;
use thiserror::Error;

/// Errors from either layer, for callers that want a single error type.
#[derive(Debug, Error)]
pub enum KvError {
    /// Classification, encoding, or archiving error.
    #[error("value error: {0}")]
    Core(#[from] CoreError),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Result type for kvstore operations.
pub type Result<T> = std::result::Result<T, KvError>;
