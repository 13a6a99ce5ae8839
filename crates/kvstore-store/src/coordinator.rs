//! The shared database connection.
//!
//! A [`Coordinator`] is built once at application start and handed to every
//! store by `Arc`. It owns the only connection to the database file and
//! closes it when dropped.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::Connection;
use tracing::{debug, error, info};

use crate::config::{SchemaMode, StoreConfig};
use crate::error::{engine_message, DatabaseError, Result};
use crate::schema;

/// Owner of the database connection and its schema.
///
/// The connection sits behind a mutex because `rusqlite::Connection` is not
/// `Sync`. That mutex is held for one execution-layer call at a time and is
/// not a store lock: calls through different stores still interleave
/// between statements, and engine-level contention is reported, not queued.
#[derive(Debug)]
pub struct Coordinator {
    db: Option<Mutex<Connection>>,
    path: Option<PathBuf>,
    schema: SchemaMode,
    startup_error: Option<DatabaseError>,
}

impl Coordinator {
    /// Open the database described by `config`.
    ///
    /// Never fails. If any bootstrap step fails, the error is logged and
    /// kept (see [`startup_error`](Self::startup_error)), and the coordinator
    /// holds no connection. Every store call against it then fails.
    pub fn open(config: &StoreConfig) -> Self {
        match Self::try_open(config) {
            Ok(coordinator) => coordinator,
            Err(e) => {
                error!(path = %config.path().display(), error = %e, "database bootstrap failed");
                Self {
                    db: None,
                    path: Some(config.path()),
                    schema: config.schema,
                    startup_error: Some(e),
                }
            }
        }
    }

    /// Open the database described by `config`, returning the first
    /// bootstrap error.
    pub fn try_open(config: &StoreConfig) -> Result<Self> {
        let path = config.path();

        if !path.exists() {
            OpenOptions::new()
                .write(true)
                .create(true)
                .open(&path)
                .map_err(|e| {
                    DatabaseError::DatabaseCreationFailed(format!("{}: {}", path.display(), e))
                })?;
            info!(path = %path.display(), "created database file");
        }

        let conn = Connection::open(&path)
            .map_err(|e| DatabaseError::DatabaseOpenFailed(engine_message(&e)))?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .map_err(|e| DatabaseError::DatabaseOpenFailed(engine_message(&e)))?;
        schema::bootstrap(&conn, config.schema)?;

        debug!(path = %path.display(), schema = ?config.schema, "database ready");
        Ok(Self {
            db: Some(Mutex::new(conn)),
            path: Some(path),
            schema: config.schema,
            startup_error: None,
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory(schema: SchemaMode) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::DatabaseOpenFailed(engine_message(&e)))?;
        schema::bootstrap(&conn, schema)?;
        Ok(Self {
            db: Some(Mutex::new(conn)),
            path: None,
            schema,
            startup_error: None,
        })
    }

    /// Whether a connection is held.
    pub fn is_available(&self) -> bool {
        self.db.is_some()
    }

    /// The error that left this coordinator without a connection, if any.
    pub fn startup_error(&self) -> Option<&DatabaseError> {
        self.startup_error.as_ref()
    }

    /// Path of the database file. `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Primary key layout requested at open.
    pub fn schema(&self) -> SchemaMode {
        self.schema
    }

    /// Run `f` against the connection.
    ///
    /// Fails with [`DatabaseError::ConnectionUnavailable`] when no
    /// connection is held.
    pub fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let db = self.db.as_ref().ok_or(DatabaseError::ConnectionUnavailable)?;
        let conn = db.lock().map_err(|e| {
            DatabaseError::StatementStepFailed(format!("connection mutex poisoned: {}", e))
        })?;
        f(&conn)
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        if self.db.is_some() {
            debug!(path = ?self.path, "closing database");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_file_and_tables() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::in_dir(dir.path());
        let coordinator = Coordinator::open(&config);

        assert!(coordinator.is_available());
        assert!(coordinator.startup_error().is_none());
        assert!(config.path().exists());
        assert_eq!(coordinator.path(), Some(config.path().as_path()));

        let count: i64 = coordinator
            .with_connection(|conn| {
                conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE name LIKE 'KVStore_%'",
                    [],
                    |row| row.get(0),
                )
                .map_err(|e| DatabaseError::StatementStepFailed(e.to_string()))
            })
            .unwrap();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_open_degrades_on_missing_directory() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::in_dir(dir.path().join("does/not/exist"));
        let coordinator = Coordinator::open(&config);

        assert!(!coordinator.is_available());
        assert!(matches!(
            coordinator.startup_error(),
            Some(DatabaseError::DatabaseCreationFailed(_))
        ));
        let err = coordinator.with_connection(|_| Ok(())).unwrap_err();
        assert_eq!(err, DatabaseError::ConnectionUnavailable);
    }

    #[test]
    fn test_try_open_reports_error() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::in_dir(dir.path().join("missing"));
        assert!(Coordinator::try_open(&config).is_err());
    }

    #[test]
    fn test_open_rejects_non_database_file() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::in_dir(dir.path());
        std::fs::write(config.path(), b"definitely not a sqlite file, just text").unwrap();

        let coordinator = Coordinator::open(&config);
        assert!(!coordinator.is_available());
        assert!(coordinator.startup_error().is_some());
    }

    #[test]
    fn test_reopen_existing_file() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::in_dir(dir.path());
        drop(Coordinator::try_open(&config).unwrap());
        let again = Coordinator::try_open(&config).unwrap();
        assert!(again.is_available());
    }

    #[test]
    fn test_in_memory() {
        let coordinator = Coordinator::open_in_memory(SchemaMode::PerStore).unwrap();
        assert!(coordinator.is_available());
        assert_eq!(coordinator.path(), None);
        assert_eq!(coordinator.schema(), SchemaMode::PerStore);
    }
}
