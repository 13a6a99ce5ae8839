//! No-op backend.

use std::sync::Weak;

use tracing::{debug, info};

use kvstore_core::{GenericRecord, Payload, Value};

use crate::observer::StoreObserver;
use crate::sqlite::DUMP_TARGET;
use crate::traits::{KvStore, Status};

/// A store that stores nothing.
///
/// Writes and deletes report [`Status::Failure`], reads find nothing, and
/// observers are never notified.
#[derive(Debug, Clone)]
pub struct NullKvStore {
    store_name: String,
}

impl NullKvStore {
    /// Create a no-op store named `store_name`.
    pub fn new(store_name: impl Into<String>) -> Self {
        Self {
            store_name: store_name.into(),
        }
    }
}

impl KvStore for NullKvStore {
    fn store_name(&self) -> &str {
        &self.store_name
    }

    fn set_observer(&self, _observer: Weak<dyn StoreObserver>) {}

    fn clear_observer(&self) {}

    fn put(&self, key: &Value, _value: Payload<'_>) -> kvstore_core::Result<Status> {
        debug!(store = %self.store_name, %key, "null store ignores put");
        Ok(Status::Failure)
    }

    fn get(&self, _key: &Value) -> Option<GenericRecord> {
        None
    }

    fn delete_tuple(&self, _key: &Value) -> Status {
        Status::Failure
    }

    fn delete_all_tuples(&self) -> Status {
        Status::Failure
    }

    fn print_tuple(&self, key: &Value) {
        info!(target: DUMP_TARGET, store = %self.store_name, %key, "null store holds no tuples");
    }

    fn print_all_tuples(&self) {
        info!(target: DUMP_TARGET, store = %self.store_name, "null store holds no tuples");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::KvStoreExt;

    #[test]
    fn test_everything_fails() {
        let store = NullKvStore::new("N");
        assert_eq!(store.store_name(), "N");
        assert!(store.put_value("k", 1).unwrap().is_failure());
        assert!(store.get_value("k").is_none());
        assert!(store.delete_value("k").is_failure());
        assert!(store.delete_all_tuples().is_failure());
        store.print_tuple(&Value::from("k"));
        store.print_all_tuples();
    }
}
