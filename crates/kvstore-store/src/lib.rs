//! # kvstore Store
//!
//! Typed key-value persistence on one embedded SQLite file, shared by any
//! number of named logical stores.
//!
//! ## Overview
//!
//! Records are partitioned by key kind into four tables (`KVStore_Integer`,
//! `KVStore_Real`, `KVStore_Text`, `KVStore_Blob`) and by store name within
//! each table. The [`Coordinator`] owns the single connection; every
//! [`SqliteKvStore`] borrows it through an `Arc`.
//!
//! ## Key Types
//!
//! - [`KvStore`] - The store interface, shared by all backends
//! - [`SqliteKvStore`] - SQLite-backed logical store
//! - [`NullKvStore`] - No-op backend that reports failure for everything
//! - [`Coordinator`] - Owner of the database connection and its schema
//! - [`StoreConfig`] - File location, schema mode, busy timeout
//! - [`Status`] - Success/failure of a write or delete
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use kvstore_core::Value;
//! use kvstore_store::{Coordinator, KvStore, KvStoreExt, SqliteKvStore, StoreConfig};
//!
//! let coordinator = Arc::new(Coordinator::open(&StoreConfig::in_dir("/var/lib/app")));
//! let store = SqliteKvStore::new("S1", coordinator);
//!
//! let status = store.put_value("hello", 123).unwrap();
//! assert!(status.is_success());
//!
//! let record = store.get(&Value::from("hello")).unwrap();
//! assert_eq!(record.store_name, "S1");
//! ```
//!
//! ## Design Notes
//!
//! - **Key-only primary keys**: by default each table's primary key is the
//!   key alone, so equal keys of the same kind collide across stores. Use
//!   [`SchemaMode::PerStore`] for a `(key, storeName)` primary key.
//! - **Per-store locking**: each store serializes its own calls. Calls made
//!   through different stores are not serialized by this crate.
//! - **No retry on busy**: engine lock contention surfaces as a failure.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod null;
pub mod observer;
pub mod schema;
pub mod sql;
pub mod sqlite;
pub mod tables;
pub mod traits;

pub use config::{SchemaMode, StoreConfig, DEFAULT_FILE_NAME};
pub use coordinator::Coordinator;
pub use error::{DatabaseError, Result};
pub use null::NullKvStore;
pub use observer::StoreObserver;
pub use sqlite::{SqliteKvStore, DUMP_TARGET};
pub use traits::{KvStore, KvStoreExt, Status};
