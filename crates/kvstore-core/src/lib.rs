//! # kvstore Core
//!
//! Pure primitives for kvstore: dynamic values, key classification, and
//! canonical document encoding.
//!
//! This crate contains no I/O and no storage. It decides *how* a key and a
//! value will be stored; the `kvstore-store` crate does the storing.
//!
//! ## Key Types
//!
//! - [`Value`] - Tagged dynamic value used for keys and nested data
//! - [`KeyKind`] - Closed classification of a key's storage representation
//! - [`NativeKey`] - A key resolved to its storage-native form
//! - [`Payload`] - The value half of a `put`: plain data or a [`Storable`]
//! - [`TypedRecord`] / [`GenericRecord`] - Stored tuples, typed and kind-erased
//!
//! ## Encoding
//!
//! Values are stored as canonical JSON documents. Scalars and non-empty
//! arrays are wrapped as `{"Key": value}`; [`Storable`] types supply their
//! own field mapping. See the [`codec`] module.
//!
//! Blob keys (arrays, maps, archived objects) are archived to CBOR bytes.
//! See the [`archive`] module.

pub mod archive;
pub mod classify;
pub mod codec;
pub mod error;
pub mod record;
pub mod value;

pub use archive::{archive_key, rehydrate_key, unarchive_key};
pub use classify::{classify, classify_key, Classified, KeyKind, NativeKey};
pub use codec::{decode, encode, Payload, Storable, DOCUMENT_KEY};
pub use error::{CoreError, Result};
pub use record::{
    BlobRecord, GenericRecord, IntegerRecord, RealRecord, RecordKey, TextRecord, TypedRecord,
};
pub use value::{Archive, Archived, Fields, Map, MapKey, Value};
