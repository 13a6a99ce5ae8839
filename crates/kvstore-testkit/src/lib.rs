//! # kvstore Testkit
//!
//! Testing utilities for kvstore.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a database in a temporary directory, a recording
//!   observer, and sample application types
//! - **Generators**: Proptest strategies for keys of every kind and for
//!   encodable values
//!
//! ## Test Fixtures
//!
//! ```rust
//! use kvstore_store::{KvStore, KvStoreExt};
//! use kvstore_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let store = fixture.store("S1");
//! assert!(store.put_value(1, "one").unwrap().is_success());
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use kvstore_testkit::generators::{encodable_value, key};
//!
//! proptest! {
//!     #[test]
//!     fn put_then_get(k in key(), v in encodable_value()) {
//!         // ...
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{init_tracing, Person, RecordingObserver, SessionToken, TestFixture};
pub use generators::{blob_key, encodable_value, integer_key, key, real_key, text_key};
