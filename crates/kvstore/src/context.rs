//! The application-wide store context.
//!
//! A [`KvContext`] owns the shared [`Coordinator`] and hands out stores on
//! it. Build one at startup and pass it, or clones of it, to whatever needs
//! a store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use kvstore_store::{Coordinator, KvStore, NullKvStore, SchemaMode, SqliteKvStore, StoreConfig};

use crate::error::Result;

/// Storage backend of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// The shared SQLite database.
    #[default]
    Sqlite,
    /// Stores nothing and fails every write.
    Null,
}

/// Handle to the shared database. Cheap to clone.
#[derive(Debug, Clone)]
pub struct KvContext {
    coordinator: Arc<Coordinator>,
}

impl KvContext {
    /// Open the database described by `config`.
    ///
    /// Never fails: if the database cannot be bootstrapped, the context holds
    /// no connection and every store operation reports failure.
    pub fn open(config: &StoreConfig) -> Self {
        let coordinator = Coordinator::open(config);
        if coordinator.is_available() {
            info!(path = %config.path().display(), "store context opened");
        }
        Self {
            coordinator: Arc::new(coordinator),
        }
    }

    /// Open the database described by `config`, failing on the first
    /// bootstrap error.
    pub fn try_open(config: &StoreConfig) -> Result<Self> {
        let coordinator = Coordinator::try_open(config)?;
        Ok(Self {
            coordinator: Arc::new(coordinator),
        })
    }

    /// Open a private in-memory database.
    pub fn in_memory(schema: SchemaMode) -> Result<Self> {
        let coordinator = Coordinator::open_in_memory(schema)?;
        Ok(Self {
            coordinator: Arc::new(coordinator),
        })
    }

    /// The shared coordinator.
    pub fn coordinator(&self) -> &Arc<Coordinator> {
        &self.coordinator
    }

    /// A SQLite store named `store_name`.
    pub fn store(&self, store_name: impl Into<String>) -> SqliteKvStore {
        SqliteKvStore::new(store_name, Arc::clone(&self.coordinator))
    }

    /// A store named `store_name` on `backend`.
    pub fn create_store(&self, backend: Backend, store_name: impl Into<String>) -> Box<dyn KvStore> {
        match backend {
            Backend::Sqlite => Box::new(self.store(store_name)),
            Backend::Null => Box::new(NullKvStore::new(store_name)),
        }
    }
}
