//! The store interface.
//!
//! Every backend implements [`KvStore`]. Callers get dynamic keys in and
//! kind-erased records out; the backend classifies, encodes, and dispatches.

use std::sync::Weak;

use kvstore_core::{GenericRecord, Payload, Storable, Value};

use crate::observer::StoreObserver;

/// Outcome of a write or delete.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The operation took effect.
    Success,
    /// The operation did not take effect. Details are logged.
    Failure,
}

impl Status {
    /// Whether this is [`Status::Success`].
    pub fn is_success(self) -> bool {
        self == Status::Success
    }

    /// Whether this is [`Status::Failure`].
    pub fn is_failure(self) -> bool {
        self == Status::Failure
    }
}

impl From<bool> for Status {
    fn from(ok: bool) -> Self {
        if ok {
            Status::Success
        } else {
            Status::Failure
        }
    }
}

/// A named logical store.
///
/// All methods block the calling thread. Engine failures never escape as
/// errors: they are logged and reported as [`Status::Failure`] or as a
/// missing record.
///
/// # Design Notes
///
/// - **No upsert**: `put` on an existing key fails. Delete first to replace.
/// - **Unknown keys**: keys with no storage kind fail before any SQL is
///   issued. `put` reports them as `Ok(Status::Failure)`.
/// - **Encoding errors**: a value with no document form is the only error
///   `put` returns as `Err`.
pub trait KvStore: Send + Sync {
    /// The logical store name every query is filtered by.
    fn store_name(&self) -> &str;

    /// Register the write observer, replacing any previous one. The store
    /// does not keep it alive.
    fn set_observer(&self, observer: Weak<dyn StoreObserver>);

    /// Remove the write observer.
    fn clear_observer(&self);

    /// Insert `value` under `key`.
    fn put(&self, key: &Value, value: Payload<'_>) -> kvstore_core::Result<Status>;

    /// Fetch the record for `key`.
    ///
    /// `None` when nothing matched, when the key has no storage kind, when
    /// the engine failed, or when a Blob key does not decode to an array or
    /// a map.
    fn get(&self, key: &Value) -> Option<GenericRecord>;

    /// Delete the record for `key`. Deleting a missing record succeeds.
    fn delete_tuple(&self, key: &Value) -> Status;

    /// Delete every record of this store, in all four kind tables.
    ///
    /// The deletes are independent. A failure stops the sequence and
    /// earlier deletes stay applied.
    fn delete_all_tuples(&self) -> Status;

    /// Log the record for `key`.
    fn print_tuple(&self, key: &Value);

    /// Log every record of this store.
    fn print_all_tuples(&self);
}

/// Conveniences over [`KvStore`] taking anything convertible to a [`Value`].
pub trait KvStoreExt: KvStore {
    /// Insert a plain value.
    fn put_value(
        &self,
        key: impl Into<Value>,
        value: impl Into<Value>,
    ) -> kvstore_core::Result<Status> {
        let value = value.into();
        self.put(&key.into(), Payload::Value(&value))
    }

    /// Insert an application object under its own field mapping.
    fn put_storable<T: Storable>(
        &self,
        key: impl Into<Value>,
        value: &T,
    ) -> kvstore_core::Result<Status> {
        self.put(&key.into(), Payload::Storable(value))
    }

    /// Fetch a record.
    fn get_value(&self, key: impl Into<Value>) -> Option<GenericRecord> {
        self.get(&key.into())
    }

    /// Delete a record.
    fn delete_value(&self, key: impl Into<Value>) -> Status {
        self.delete_tuple(&key.into())
    }
}

impl<S: KvStore + ?Sized> KvStoreExt for S {}
