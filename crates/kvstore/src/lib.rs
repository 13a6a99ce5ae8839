//! # kvstore
//!
//! Typed key-value stores on one embedded SQLite database.
//!
//! ## Overview
//!
//! Any number of named logical stores share one database file. Keys are
//! classified into a storage kind (integer, real, text, or blob) and values
//! are encoded to a JSON document before they are written.
//!
//! - **Keys**: 32-bit integers, reals, text, and structured keys (arrays,
//!   maps, archived objects) stored as CBOR bytes
//! - **Values**: scalars and non-empty arrays wrapped as `{"Key": value}`,
//!   or any [`Storable`] type's own fields
//! - **Stores**: a name that filters every query; one lock per store
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kvstore::{KvContext, KvStore, KvStoreExt, StoreConfig, Value};
//!
//! let ctx = KvContext::open(&StoreConfig::in_dir("/var/lib/app"));
//! let store = ctx.store("S1");
//!
//! assert!(store.put_value("hello", 123).unwrap().is_success());
//!
//! let record = store.get(&Value::from("hello")).unwrap();
//! assert_eq!(record.store_name, "S1");
//!
//! assert!(store.delete_all_tuples().is_success());
//! assert!(store.get_value("hello").is_none());
//! ```
//!
//! ## Re-exports
//!
//! - `kvstore::core` - Values, key classification, document encoding
//! - `kvstore::store` - Execution layer, coordinator, and stores

pub mod context;
pub mod error;

// Re-export component crates
pub use kvstore_core as core;
pub use kvstore_store as store;

// Re-export main types for convenience
pub use context::{Backend, KvContext};
pub use error::{KvError, Result};

pub use kvstore_core::{
    classify, decode, encode, Archive, Archived, CoreError, Fields, GenericRecord, KeyKind,
    MapKey, Payload, Storable, Value, DOCUMENT_KEY,
};
pub use kvstore_store::{
    Coordinator, DatabaseError, KvStore, KvStoreExt, NullKvStore, SchemaMode, SqliteKvStore,
    Status, StoreConfig, StoreObserver,
};
