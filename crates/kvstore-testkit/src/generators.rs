//! Proptest generators for property-based testing.

use proptest::prelude::*;

use kvstore_core::{MapKey, Value};

/// Generate an Integer-kind key.
pub fn integer_key() -> impl Strategy<Value = Value> {
    any::<i32>().prop_map(Value::from)
}

/// Generate a Real-kind key. Finite only: the engine stores NaN as NULL.
pub fn real_key() -> impl Strategy<Value = Value> {
    (-1.0e12f64..1.0e12).prop_map(Value::Real)
}

/// Generate a Text-kind key.
pub fn text_key() -> impl Strategy<Value = Value> {
    "[a-zA-Z0-9 _.-]{0,24}".prop_map(Value::Text)
}

/// Generate a scalar that survives both CBOR and JSON round trips.
pub fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Integer),
        (-1.0e6f64..1.0e6).prop_map(Value::Real),
        "\\PC{0,16}".prop_map(Value::Text),
    ]
}

/// Generate a Blob-kind key: a non-empty array or a small map.
pub fn blob_key() -> impl Strategy<Value = Value> {
    prop_oneof![
        prop::collection::vec(scalar(), 1..4).prop_map(Value::Array),
        prop::collection::btree_map(
            prop_oneof![
                "[a-z]{1,8}".prop_map(MapKey::Text),
                any::<i64>().prop_map(MapKey::Integer),
            ],
            scalar(),
            1..4,
        )
        .prop_map(Value::Map),
    ]
}

/// Generate a key of any storable kind.
pub fn key() -> impl Strategy<Value = Value> {
    prop_oneof![integer_key(), real_key(), text_key(), blob_key()]
}

/// Generate a value the encoder accepts: a scalar or a non-empty array.
pub fn encodable_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        3 => scalar(),
        1 => prop::collection::vec(scalar(), 1..6).prop_map(Value::Array),
    ]
}
