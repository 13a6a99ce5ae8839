//! SQLite-backed logical store.
//!
//! Each store is a name plus a handle to the shared [`Coordinator`]. Every
//! database-touching call takes the store's own lock first, so calls through
//! one store are serialized. Calls through different stores are not.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use bytes::Bytes;
use rusqlite::Connection;
use tracing::{debug, info, warn};

use kvstore_core::{
    encode, unarchive_key, CoreError, GenericRecord, NativeKey, Payload, TypedRecord, Value,
};

use crate::coordinator::Coordinator;
use crate::error::Result;
use crate::observer::{ObserverSlot, StoreObserver};
use crate::tables::{self, KeyColumn};
use crate::traits::{KvStore, Status};

/// Tracing target of the diagnostic dump.
pub const DUMP_TARGET: &str = "kvstore::dump";

/// A named logical store on the shared SQLite database.
#[derive(Debug)]
pub struct SqliteKvStore {
    store_name: String,
    coordinator: Arc<Coordinator>,
    lock: Mutex<()>,
    observer: ObserverSlot,
}

impl SqliteKvStore {
    /// Create a store named `store_name` on `coordinator`.
    ///
    /// Nothing is written until the first `put`; a store with no records
    /// leaves no trace in the database.
    pub fn new(store_name: impl Into<String>, coordinator: Arc<Coordinator>) -> Self {
        Self {
            store_name: store_name.into(),
            coordinator,
            lock: Mutex::new(()),
            observer: ObserverSlot::default(),
        }
    }

    /// The shared coordinator.
    pub fn coordinator(&self) -> &Arc<Coordinator> {
        &self.coordinator
    }

    /// Every record of this store across the four kind tables.
    ///
    /// Blob keys come back as whatever value they archived, including
    /// archived objects that [`get`](KvStore::get) cannot return. Blob keys
    /// that do not decode are skipped with a warning.
    pub fn all_tuples(&self) -> Result<Vec<GenericRecord>> {
        let mut records = Vec::new();
        records.extend(self.list::<i32>()?.into_iter().filter_map(TypedRecord::into_generic));
        records.extend(self.list::<f64>()?.into_iter().filter_map(TypedRecord::into_generic));
        records.extend(self.list::<String>()?.into_iter().filter_map(TypedRecord::into_generic));

        for record in self.list::<Bytes>()? {
            match unarchive_key(&record.key) {
                Ok(key) => records.push(GenericRecord {
                    key,
                    value: record.value,
                    store_name: record.store_name,
                }),
                Err(e) => warn!(
                    store = %self.store_name,
                    key = %hex::encode(&record.key),
                    error = %e,
                    "skipping undecodable blob key"
                ),
            }
        }

        Ok(records)
    }

    /// Run `f` on the connection under this store's lock.
    fn guarded<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        // A panic elsewhere under the lock leaves no state behind it
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.coordinator.with_connection(f)
    }

    fn insert<K: KeyColumn>(&self, key: K, document: String) -> Result<()> {
        let record = TypedRecord::new(key, document, self.store_name.as_str());
        self.guarded(|conn| tables::insert(conn, &record))
    }

    fn fetch<K: KeyColumn>(&self, key: K) -> Result<Option<GenericRecord>> {
        let record = self.guarded(|conn| tables::select(conn, &key, &self.store_name))?;
        Ok(record.and_then(TypedRecord::into_generic))
    }

    fn remove<K: KeyColumn>(&self, key: K) -> Result<()> {
        self.guarded(|conn| tables::delete(conn, &key, &self.store_name))
    }

    fn remove_all<K: KeyColumn>(&self) -> Result<()> {
        self.guarded(|conn| tables::delete_all::<K>(conn, &self.store_name))
    }

    fn list<K: KeyColumn>(&self) -> Result<Vec<TypedRecord<K>>> {
        self.guarded(|conn| tables::select_all::<K>(conn, &self.store_name))
    }

    fn resolve(&self, key: &Value) -> Option<NativeKey> {
        match NativeKey::resolve(key) {
            Ok(native) => {
                debug!(store = %self.store_name, kind = %native.kind(), "classified key");
                Some(native)
            }
            Err(CoreError::KeyClassificationUnknown(detail)) => {
                debug!(store = %self.store_name, %detail, "key has no storage kind");
                None
            }
            Err(e) => {
                warn!(store = %self.store_name, error = %e, "key could not be archived");
                None
            }
        }
    }
}

impl KvStore for SqliteKvStore {
    fn store_name(&self) -> &str {
        &self.store_name
    }

    fn set_observer(&self, observer: Weak<dyn StoreObserver>) {
        self.observer.set(observer);
    }

    fn clear_observer(&self) {
        self.observer.clear();
    }

    fn put(&self, key: &Value, value: Payload<'_>) -> kvstore_core::Result<Status> {
        let Some(native) = self.resolve(key) else {
            self.observer.notify_failed(self);
            return Ok(Status::Failure);
        };

        let document = encode(value)?;
        debug!(store = %self.store_name, key = %native, bytes = document.len(), "encoded value");

        let result = match &native {
            NativeKey::Integer(k) => self.insert(*k, document),
            NativeKey::Real(k) => self.insert(*k, document),
            NativeKey::Text(k) => self.insert(k.clone(), document),
            NativeKey::Blob(k) => self.insert(k.clone(), document),
        };

        match result {
            Ok(()) => {
                self.observer.notify_stored(self);
                Ok(Status::Success)
            }
            Err(e) => {
                warn!(store = %self.store_name, key = %native, error = %e, "put failed");
                self.observer.notify_failed(self);
                Ok(Status::Failure)
            }
        }
    }

    fn get(&self, key: &Value) -> Option<GenericRecord> {
        let native = self.resolve(key)?;
        let result = match &native {
            NativeKey::Integer(k) => self.fetch(*k),
            NativeKey::Real(k) => self.fetch(*k),
            NativeKey::Text(k) => self.fetch(k.clone()),
            NativeKey::Blob(k) => self.fetch(k.clone()),
        };

        result.unwrap_or_else(|e| {
            warn!(store = %self.store_name, key = %native, error = %e, "get failed");
            None
        })
    }

    fn delete_tuple(&self, key: &Value) -> Status {
        let Some(native) = self.resolve(key) else {
            return Status::Failure;
        };

        let result = match &native {
            NativeKey::Integer(k) => self.remove(*k),
            NativeKey::Real(k) => self.remove(*k),
            NativeKey::Text(k) => self.remove(k.clone()),
            NativeKey::Blob(k) => self.remove(k.clone()),
        };

        match result {
            Ok(()) => Status::Success,
            Err(e) => {
                warn!(store = %self.store_name, key = %native, error = %e, "delete failed");
                Status::Failure
            }
        }
    }

    fn delete_all_tuples(&self) -> Status {
        let result = self
            .remove_all::<i32>()
            .and_then(|()| self.remove_all::<f64>())
            .and_then(|()| self.remove_all::<String>())
            .and_then(|()| self.remove_all::<Bytes>());

        match result {
            Ok(()) => Status::Success,
            Err(e) => {
                warn!(store = %self.store_name, error = %e, "delete all failed");
                Status::Failure
            }
        }
    }

    fn print_tuple(&self, key: &Value) {
        match self.get(key) {
            Some(record) => info!(target: DUMP_TARGET, "{}", record),
            None => info!(target: DUMP_TARGET, store = %self.store_name, %key, "no tuple"),
        }
    }

    fn print_all_tuples(&self) {
        match self.all_tuples() {
            Ok(records) => {
                info!(target: DUMP_TARGET, store = %self.store_name, count = records.len(), "tuples");
                for record in &records {
                    info!(target: DUMP_TARGET, "{}", record);
                }
            }
            Err(e) => warn!(store = %self.store_name, error = %e, "listing tuples failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchemaMode;
    use kvstore_core::{Archived, DOCUMENT_KEY};

    fn store(name: &str) -> SqliteKvStore {
        let coordinator = Coordinator::open_in_memory(SchemaMode::KeyOnly).unwrap();
        SqliteKvStore::new(name, Arc::new(coordinator))
    }

    fn put(store: &SqliteKvStore, key: Value, value: Value) -> Status {
        store.put(&key, Payload::Value(&value)).unwrap()
    }

    #[test]
    fn test_put_get_text_key() {
        let store = store("S1");
        assert_eq!(put(&store, "hello".into(), 123.into()), Status::Success);

        let record = store.get(&Value::from("hello")).unwrap();
        assert_eq!(record.store_name, "S1");
        assert_eq!(record.key, Value::from("hello"));
        assert_eq!(
            record.document().unwrap().get(DOCUMENT_KEY),
            Some(&Value::Integer(123))
        );
    }

    #[test]
    fn test_put_existing_key_fails() {
        let store = store("S1");
        assert!(put(&store, 1.into(), "a".into()).is_success());
        assert!(put(&store, 1.into(), "b".into()).is_failure());
    }

    #[test]
    fn test_unknown_key() {
        let store = store("S1");
        assert!(put(&store, Value::Null, 1.into()).is_failure());
        assert!(store.get(&Value::Bool(true)).is_none());
        assert!(store.delete_tuple(&Value::from(i64::MAX)).is_failure());
    }

    #[test]
    fn test_encoding_error_propagates() {
        let store = store("S1");
        let err = store
            .put(&Value::from("k"), Payload::Value(&Value::Array(vec![])))
            .unwrap_err();
        assert!(matches!(err, CoreError::ValueEncodingFailed(_)));
        assert!(store.get(&Value::from("k")).is_none());
    }

    #[test]
    fn test_all_tuples_includes_archived_blob_keys() {
        let store = store("S1");
        let archived = Value::Archived(Archived::new("Token").field("id", 7));
        assert!(put(&store, archived.clone(), "v".into()).is_success());
        assert!(put(&store, 3.into(), "w".into()).is_success());

        // Generic read cannot rebuild an archived object key
        assert!(store.get(&archived).is_none());

        let all = store.all_tuples().unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|r| r.key == archived));
    }

    #[test]
    fn test_delete_all_tuples() {
        let store = store("S1");
        assert!(put(&store, 1.into(), 1.into()).is_success());
        assert!(put(&store, 1.5.into(), 1.into()).is_success());
        assert!(put(&store, "t".into(), 1.into()).is_success());
        assert!(put(&store, vec![1, 2].into(), 1.into()).is_success());

        assert!(store.delete_all_tuples().is_success());
        assert!(store.all_tuples().unwrap().is_empty());
    }
}
