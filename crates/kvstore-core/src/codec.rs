//! Value encoding: application values to canonical documents.
//!
//! A document is a single JSON object. Scalars and non-empty arrays are
//! wrapped under [`DOCUMENT_KEY`]; [`Storable`] types supply their own field
//! mapping, which is used verbatim. The document text is opaque to storage.

use serde_json::Value as JsonValue;

use crate::error::{CoreError, Result};
use crate::value::{fields_to_json, Fields, Value};

/// Field name used when wrapping a plain value.
pub const DOCUMENT_KEY: &str = "Key";

/// An application type that produces its own field mapping.
pub trait Storable {
    /// The fields to store, verbatim.
    fn to_fields(&self) -> Fields;
}

/// The value half of a `put`.
#[derive(Clone, Copy)]
pub enum Payload<'a> {
    /// Plain dynamic data.
    Value(&'a Value),
    /// An application object with its own field mapping.
    Storable(&'a dyn Storable),
}

impl<'a> From<&'a Value> for Payload<'a> {
    fn from(value: &'a Value) -> Self {
        Payload::Value(value)
    }
}

impl std::fmt::Debug for Payload<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Payload::Storable(_) => f.write_str("Storable(..)"),
        }
    }
}

/// Encode a payload to its canonical document text.
///
/// Fails with [`CoreError::ValueEncodingFailed`] when the payload has no
/// representation: empty arrays, top-level maps, null, booleans, archived
/// objects, or nested content with no lossless JSON form.
pub fn encode(payload: Payload<'_>) -> Result<String> {
    let object = match payload {
        Payload::Value(value) => wrap(value)?,
        Payload::Storable(storable) => fields_to_json(&storable.to_fields())?,
    };

    serde_json::to_string_pretty(&JsonValue::Object(object))
        .map_err(|e| CoreError::ValueEncodingFailed(e.to_string()))
}

fn wrap(value: &Value) -> Result<serde_json::Map<String, JsonValue>> {
    match value {
        Value::Integer(_) | Value::Real(_) | Value::Text(_) => single(value),
        Value::Array(items) if !items.is_empty() => single(value),
        Value::Array(_) => Err(CoreError::ValueEncodingFailed(
            "empty array has no representation".to_string(),
        )),
        other => Err(CoreError::ValueEncodingFailed(format!(
            "no representation for {} value",
            other.kind_name()
        ))),
    }
}

fn single(value: &Value) -> Result<serde_json::Map<String, JsonValue>> {
    let mut object = serde_json::Map::with_capacity(1);
    object.insert(DOCUMENT_KEY.to_string(), value.to_json()?);
    Ok(object)
}

/// Decode document text back into its field mapping.
pub fn decode(text: &str) -> Result<Fields> {
    let json: JsonValue =
        serde_json::from_str(text).map_err(|e| CoreError::DocumentDecodingFailed(e.to_string()))?;

    match json {
        JsonValue::Object(object) => Ok(object
            .into_iter()
            .map(|(name, value)| (name, Value::from_json(value)))
            .collect()),
        other => Err(CoreError::DocumentDecodingFailed(format!(
            "expected an object, found {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Point {
        x: i32,
        y: i32,
    }

    impl Storable for Point {
        fn to_fields(&self) -> Fields {
            let mut fields = Fields::new();
            fields.insert("x".into(), self.x.into());
            fields.insert("y".into(), self.y.into());
            fields
        }
    }

    fn parse(text: &str) -> JsonValue {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_encode_scalars() {
        assert_eq!(parse(&encode((&Value::from(123)).into()).unwrap()), json!({"Key": 123}));
        assert_eq!(parse(&encode((&Value::from(1.5)).into()).unwrap()), json!({"Key": 1.5}));
        assert_eq!(
            parse(&encode((&Value::from("hi")).into()).unwrap()),
            json!({"Key": "hi"})
        );
    }

    #[test]
    fn test_encode_array() {
        let value = Value::from(vec![Value::from(1), Value::from("two"), Value::from(3.0)]);
        let text = encode(Payload::Value(&value)).unwrap();

        let fields = decode(&text).unwrap();
        assert_eq!(fields.get(DOCUMENT_KEY), Some(&value));
    }

    #[test]
    fn test_encode_empty_array_fails() {
        let value = Value::Array(vec![]);
        assert!(matches!(
            encode(Payload::Value(&value)),
            Err(CoreError::ValueEncodingFailed(_))
        ));
    }

    #[test]
    fn test_encode_unrepresentable() {
        for value in [
            Value::Null,
            Value::Bool(false),
            Value::map([("a", 1)]),
            Value::Archived(crate::Archived::new("Thing")),
            Value::Real(f64::NAN),
            Value::from(vec![Value::Real(f64::NEG_INFINITY)]),
        ] {
            assert!(
                matches!(encode(Payload::Value(&value)), Err(CoreError::ValueEncodingFailed(_))),
                "expected failure for {:?}",
                value
            );
        }
    }

    #[test]
    fn test_encode_storable_verbatim() {
        let point = Point { x: 3, y: -4 };
        let text = encode(Payload::Storable(&point)).unwrap();
        assert_eq!(parse(&text), json!({"x": 3, "y": -4}));
    }

    #[test]
    fn test_encode_is_pretty() {
        let text = encode((&Value::from(1)).into()).unwrap();
        assert!(text.contains('\n'));
    }

    #[test]
    fn test_real_survives_decode_exactly() {
        // Shortest form needs the exact parser to come back bit for bit
        let value = Value::Real(-944204.5077711369);
        let text = encode(Payload::Value(&value)).unwrap();
        let fields = decode(&text).unwrap();
        assert_eq!(fields.get(DOCUMENT_KEY), Some(&value));
    }

    #[test]
    fn test_decode_rejects_non_objects() {
        assert!(matches!(decode("[1]"), Err(CoreError::DocumentDecodingFailed(_))));
        assert!(matches!(decode("{"), Err(CoreError::DocumentDecodingFailed(_))));
    }
}
