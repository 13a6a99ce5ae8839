//! Stored tuples.
//!
//! A [`TypedRecord`] is a row of one kind table, keyed by the kind's native
//! type. A [`GenericRecord`] is the kind-erased view handed back to callers.

use std::fmt;

use bytes::Bytes;

use crate::archive::rehydrate_key;
use crate::classify::KeyKind;
use crate::codec::decode;
use crate::error::Result;
use crate::value::{Fields, Value};

/// A native key type with its own kind table.
pub trait RecordKey: Sized {
    /// The kind whose table stores this key type.
    const KIND: KeyKind;

    /// Convert back to a dynamic key for the generic read path.
    ///
    /// Returns `None` when the key has no generic form.
    fn into_value(self) -> Option<Value>;
}

impl RecordKey for i32 {
    const KIND: KeyKind = KeyKind::Integer;

    fn into_value(self) -> Option<Value> {
        Some(Value::from(self))
    }
}

impl RecordKey for f64 {
    const KIND: KeyKind = KeyKind::Real;

    fn into_value(self) -> Option<Value> {
        Some(Value::Real(self))
    }
}

impl RecordKey for String {
    const KIND: KeyKind = KeyKind::Text;

    fn into_value(self) -> Option<Value> {
        Some(Value::Text(self))
    }
}

impl RecordKey for Bytes {
    const KIND: KeyKind = KeyKind::Blob;

    fn into_value(self) -> Option<Value> {
        rehydrate_key(&self)
    }
}

/// One row of a kind table.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedRecord<K> {
    /// Native key.
    pub key: K,
    /// Canonical document text.
    pub value: String,
    /// Logical store the row belongs to.
    pub store_name: String,
}

/// Row of the Integer kind table.
pub type IntegerRecord = TypedRecord<i32>;
/// Row of the Real kind table.
pub type RealRecord = TypedRecord<f64>;
/// Row of the Text kind table.
pub type TextRecord = TypedRecord<String>;
/// Row of the Blob kind table.
pub type BlobRecord = TypedRecord<Bytes>;

impl<K: RecordKey> TypedRecord<K> {
    /// Create a record.
    pub fn new(key: K, value: impl Into<String>, store_name: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
            store_name: store_name.into(),
        }
    }

    /// The kind table this record lives in.
    pub const fn kind(&self) -> KeyKind {
        K::KIND
    }

    /// Erase the key type.
    ///
    /// Blob records whose key does not decode to an array or a map have no
    /// generic form and yield `None`.
    pub fn into_generic(self) -> Option<GenericRecord> {
        let key = self.key.into_value()?;
        Some(GenericRecord {
            key,
            value: self.value,
            store_name: self.store_name,
        })
    }
}

/// The kind-erased record returned to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericRecord {
    /// The key, as a dynamic value.
    pub key: Value,
    /// Canonical document text.
    pub value: String,
    /// Logical store the record belongs to.
    pub store_name: String,
}

impl GenericRecord {
    /// Decode the stored document.
    pub fn document(&self) -> Result<Fields> {
        decode(&self.value)
    }
}

impl fmt::Display for GenericRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} : {}", self.store_name, self.key, self.value)
    }
}
