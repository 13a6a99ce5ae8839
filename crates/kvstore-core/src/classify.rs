//! Key classification.
//!
//! Every key maps to exactly one [`KeyKind`]. The classification is computed
//! once, at the API boundary, by [`classify_key`]; downstream code works with
//! the resolved [`NativeKey`] and never re-inspects the dynamic value.

use std::fmt;

use bytes::Bytes;

use crate::archive::archive_key;
use crate::error::{CoreError, Result};
use crate::value::Value;

/// Storage kind of a key.
///
/// `Unknown` is a terminal failure kind: it has no table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Integer,
    Real,
    Text,
    Blob,
    Unknown,
}

impl KeyKind {
    /// The four kinds that have a backing table, in bootstrap order.
    pub const STORAGE: [KeyKind; 4] = [KeyKind::Integer, KeyKind::Real, KeyKind::Text, KeyKind::Blob];

    /// Whether this kind can be stored.
    pub const fn is_storable(self) -> bool {
        !matches!(self, KeyKind::Unknown)
    }

    /// Lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            KeyKind::Integer => "integer",
            KeyKind::Real => "real",
            KeyKind::Text => "text",
            KeyKind::Blob => "blob",
            KeyKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a key, borrowing from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classified<'a> {
    Integer(i32),
    Real(f64),
    Text(&'a str),
    /// Arrays, maps, and archived objects; archived before storage.
    Blob(&'a Value),
    Unknown,
}

impl Classified<'_> {
    /// The kind tag.
    pub const fn kind(&self) -> KeyKind {
        match self {
            Classified::Integer(_) => KeyKind::Integer,
            Classified::Real(_) => KeyKind::Real,
            Classified::Text(_) => KeyKind::Text,
            Classified::Blob(_) => KeyKind::Blob,
            Classified::Unknown => KeyKind::Unknown,
        }
    }
}

/// Classify a key, keeping its payload.
///
/// Rules, in order:
/// 1. Integers within 32-bit range are `Integer`.
/// 2. Reals are `Real`, whether or not they have a fractional part.
/// 3. Text is `Text`.
/// 4. Arrays, maps, and archived objects are `Blob`.
/// 5. Everything else (null, booleans, out-of-range integers) is `Unknown`.
///
/// Booleans are not numbers here: `true` is `Unknown`, not the integer 1.
pub fn classify_key(key: &Value) -> Classified<'_> {
    match key {
        Value::Integer(i) => match i32::try_from(*i) {
            Ok(i) => Classified::Integer(i),
            Err(_) => Classified::Unknown,
        },
        Value::Real(r) => Classified::Real(*r),
        Value::Text(s) => Classified::Text(s),
        Value::Array(_) | Value::Map(_) | Value::Archived(_) => Classified::Blob(key),
        Value::Null | Value::Bool(_) => Classified::Unknown,
    }
}

/// Classify a key. Total and pure.
pub fn classify(key: &Value) -> KeyKind {
    classify_key(key).kind()
}

/// A key in its storage-native form.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeKey {
    Integer(i32),
    Real(f64),
    Text(String),
    /// Archived key bytes. The bytes, not the structure, are the storage key.
    Blob(Bytes),
}

impl NativeKey {
    /// Classify and convert a key.
    ///
    /// Fails with [`CoreError::KeyClassificationUnknown`] for keys with no
    /// storage kind, and [`CoreError::KeyArchiveFailed`] if a Blob key
    /// cannot be archived.
    pub fn resolve(key: &Value) -> Result<Self> {
        match classify_key(key) {
            Classified::Integer(i) => Ok(NativeKey::Integer(i)),
            Classified::Real(r) => Ok(NativeKey::Real(r)),
            Classified::Text(s) => Ok(NativeKey::Text(s.to_string())),
            Classified::Blob(value) => archive_key(value).map(NativeKey::Blob),
            Classified::Unknown => Err(CoreError::KeyClassificationUnknown(format!(
                "{} key {}",
                key.kind_name(),
                key
            ))),
        }
    }

    /// The kind tag.
    pub const fn kind(&self) -> KeyKind {
        match self {
            NativeKey::Integer(_) => KeyKind::Integer,
            NativeKey::Real(_) => KeyKind::Real,
            NativeKey::Text(_) => KeyKind::Text,
            NativeKey::Blob(_) => KeyKind::Blob,
        }
    }
}

impl fmt::Display for NativeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeKey::Integer(i) => write!(f, "{}", i),
            NativeKey::Real(r) => write!(f, "{:?}", r),
            NativeKey::Text(s) => write!(f, "{:?}", s),
            NativeKey::Blob(b) => write!(f, "blob:{}", hex::encode(b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Archived, MapKey};
    use proptest::prelude::*;

    #[test]
    fn test_classify_scalars() {
        assert_eq!(classify(&Value::from(42)), KeyKind::Integer);
        assert_eq!(classify(&Value::from(-7i64)), KeyKind::Integer);
        assert_eq!(classify(&Value::from(4.5)), KeyKind::Real);
        assert_eq!(classify(&Value::from(2.0)), KeyKind::Real);
        assert_eq!(classify(&Value::from("hello")), KeyKind::Text);
    }

    #[test]
    fn test_classify_integer_range() {
        assert_eq!(classify(&Value::from(i64::from(i32::MAX))), KeyKind::Integer);
        assert_eq!(classify(&Value::from(i64::from(i32::MIN))), KeyKind::Integer);
        assert_eq!(classify(&Value::from(i64::from(i32::MAX) + 1)), KeyKind::Unknown);
        assert_eq!(classify(&Value::from(i64::MIN)), KeyKind::Unknown);
    }

    #[test]
    fn test_classify_blobs() {
        assert_eq!(classify(&Value::from(vec![1, 2, 3])), KeyKind::Blob);
        assert_eq!(classify(&Value::Array(vec![])), KeyKind::Blob);
        assert_eq!(classify(&Value::map([("a", 1)])), KeyKind::Blob);
        assert_eq!(classify(&Value::map([(1, "a")])), KeyKind::Blob);
        assert_eq!(classify(&Value::map([(1.5, "a")])), KeyKind::Blob);
        assert_eq!(
            classify(&Value::Archived(Archived::new("Token"))),
            KeyKind::Blob
        );
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify(&Value::Null), KeyKind::Unknown);
        assert_eq!(classify(&Value::Bool(true)), KeyKind::Unknown);
        assert!(!KeyKind::Unknown.is_storable());
    }

    #[test]
    fn test_resolve_native_keys() {
        assert_eq!(NativeKey::resolve(&Value::from(42)).unwrap(), NativeKey::Integer(42));
        assert_eq!(NativeKey::resolve(&Value::from(0.5)).unwrap(), NativeKey::Real(0.5));
        assert_eq!(
            NativeKey::resolve(&Value::from("k")).unwrap(),
            NativeKey::Text("k".into())
        );

        let blob = NativeKey::resolve(&Value::from(vec!["a", "b"])).unwrap();
        assert_eq!(blob.kind(), KeyKind::Blob);
    }

    #[test]
    fn test_resolve_unknown_fails() {
        let err = NativeKey::resolve(&Value::Null).unwrap_err();
        assert!(matches!(err, CoreError::KeyClassificationUnknown(_)));
    }

    #[test]
    fn test_blob_keys_are_stable() {
        let a = Value::map([(MapKey::from("x"), Value::from(1)), (MapKey::from(2), Value::from("y"))]);
        let b = Value::map([(MapKey::from(2), Value::from("y")), (MapKey::from("x"), Value::from(1))]);
        assert_eq!(NativeKey::resolve(&a).unwrap(), NativeKey::resolve(&b).unwrap());
    }

    fn any_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Integer),
            any::<f64>().prop_map(Value::Real),
            "[a-z]{0,8}".prop_map(Value::Text),
        ];
        leaf.prop_recursive(3, 16, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,4}".prop_map(MapKey::Text), inner, 0..4)
                    .prop_map(Value::Map),
            ]
        })
    }

    proptest! {
        #[test]
        fn classification_is_total(value in any_value()) {
            let kind = classify(&value);
            prop_assert_eq!(kind.is_storable(), NativeKey::resolve(&value).is_ok());
        }
    }
}
