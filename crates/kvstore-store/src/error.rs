//! Error types for the store module.

use thiserror::Error;

/// Errors raised by the database and the execution layer.
///
/// Engine-level variants carry the engine's diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatabaseError {
    /// The database file could not be created.
    #[error("failed to create database: {0}")]
    DatabaseCreationFailed(String),

    /// The database file could not be opened.
    #[error("failed to open database: {0}")]
    DatabaseOpenFailed(String),

    /// A statement could not be prepared.
    #[error("failed to prepare statement: {0}")]
    StatementPrepareFailed(String),

    /// A value could not be bound to a statement parameter.
    #[error("failed to bind value: {0}")]
    StatementBindFailed(String),

    /// Stepping a prepared statement failed.
    #[error("failed to execute prepared statement: {0}")]
    StatementStepFailed(String),

    /// A fetched column could not be read as its expected type.
    #[error("failed to decode row: {0}")]
    RowDecodingFailed(String),

    /// The coordinator holds no connection.
    #[error("database connection unavailable")]
    ConnectionUnavailable,
}

impl DatabaseError {
    /// Whether the engine reported a constraint violation.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, DatabaseError::StatementStepFailed(msg) if msg.contains("constraint failed"))
    }
}

/// Extract the engine's message from a rusqlite error.
pub(crate) fn engine_message(err: &rusqlite::Error) -> String {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(msg)) => msg.clone(),
        other => other.to_string(),
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
