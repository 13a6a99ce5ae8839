//! Error types for kvstore core.

use thiserror::Error;

/// Errors raised while classifying keys or encoding values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The value has no document representation.
    #[error("value encoding failed: {0}")]
    ValueEncodingFailed(String),

    /// A stored document could not be parsed back.
    #[error("document decoding failed: {0}")]
    DocumentDecodingFailed(String),

    /// The key does not map to a storage kind.
    #[error("key classification unknown: {0}")]
    KeyClassificationUnknown(String),

    /// A Blob key could not be archived or unarchived.
    #[error("key archive failed: {0}")]
    KeyArchiveFailed(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
