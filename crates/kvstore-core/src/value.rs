//! Dynamic values: the application-facing shape of keys and stored data.
//!
//! A [`Value`] is a closed tagged variant. Keys are classified from it and
//! values are encoded from it, so every dynamic type check in the system is
//! a single exhaustive `match` over this enum.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{CoreError, Result};

/// A mapping keyed by text, integers, or reals.
pub type Map = BTreeMap<MapKey, Value>;

/// A field mapping with text keys, as produced by [`crate::Storable`].
pub type Fields = BTreeMap<String, Value>;

/// Key of a [`Value::Map`].
///
/// Maps may be keyed by strings, integers, or floats. Reals are ordered with
/// `f64::total_cmp`, so every `MapKey` has a total order and maps archive to
/// the same bytes every time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MapKey {
    Text(String),
    Integer(i64),
    Real(f64),
}

impl MapKey {
    fn rank(&self) -> u8 {
        match self {
            MapKey::Text(_) => 0,
            MapKey::Integer(_) => 1,
            MapKey::Real(_) => 2,
        }
    }
}

impl Ord for MapKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (MapKey::Text(a), MapKey::Text(b)) => a.cmp(b),
            (MapKey::Integer(a), MapKey::Integer(b)) => a.cmp(b),
            (MapKey::Real(a), MapKey::Real(b)) => a.total_cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for MapKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MapKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MapKey {}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::Text(s) => write!(f, "{:?}", s),
            MapKey::Integer(i) => write!(f, "{}", i),
            MapKey::Real(r) => write!(f, "{:?}", r),
        }
    }
}

impl From<&str> for MapKey {
    fn from(s: &str) -> Self {
        MapKey::Text(s.to_string())
    }
}

impl From<String> for MapKey {
    fn from(s: String) -> Self {
        MapKey::Text(s)
    }
}

impl From<i32> for MapKey {
    fn from(i: i32) -> Self {
        MapKey::Integer(i.into())
    }
}

impl From<i64> for MapKey {
    fn from(i: i64) -> Self {
        MapKey::Integer(i)
    }
}

impl From<f64> for MapKey {
    fn from(r: f64) -> Self {
        MapKey::Real(r)
    }
}

/// An archived object graph node.
///
/// This is what an application type produces through [`Archive`] when it
/// wants to be usable as a Blob key without being an array or a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archived {
    /// Name of the archived type.
    pub class: String,
    /// Archived fields.
    pub fields: Fields,
}

impl Archived {
    /// Create an empty archive node for `class`.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            fields: Fields::new(),
        }
    }

    /// Add a field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

/// The "can be archived to bytes" capability.
pub trait Archive {
    /// Produce the object graph node for this value.
    fn archive(&self) -> Archived;
}

/// A dynamically typed application value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    Array(Vec<Value>),
    Map(#[serde(with = "map_entries")] Map),
    Archived(Archived),
}

impl Value {
    /// Wrap an archivable object.
    pub fn archived<A: Archive + ?Sized>(object: &A) -> Self {
        Value::Archived(object.archive())
    }

    /// Build a map value from key/value pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<MapKey>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Archived(_) => "archived object",
        }
    }

    /// Get the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer if this is an integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Convert to a JSON value.
    ///
    /// Fails when no lossless JSON form exists: non-finite reals and maps
    /// with non-text keys. Archived objects become objects of their fields.
    pub fn to_json(&self) -> Result<JsonValue> {
        Ok(match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Integer(i) => JsonValue::from(*i),
            Value::Real(r) => serde_json::Number::from_f64(*r)
                .map(JsonValue::Number)
                .ok_or_else(|| {
                    CoreError::ValueEncodingFailed(format!("real {} has no JSON form", r))
                })?,
            Value::Text(s) => JsonValue::String(s.clone()),
            Value::Array(items) => JsonValue::Array(
                items
                    .iter()
                    .map(Value::to_json)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Map(map) => {
                let mut object = serde_json::Map::with_capacity(map.len());
                for (key, value) in map {
                    let MapKey::Text(name) = key else {
                        return Err(CoreError::ValueEncodingFailed(format!(
                            "map key {} is not text",
                            key
                        )));
                    };
                    object.insert(name.clone(), value.to_json()?);
                }
                JsonValue::Object(object)
            }
            Value::Archived(archived) => JsonValue::Object(fields_to_json(&archived.fields)?),
        })
    }

    /// Convert from a JSON value.
    ///
    /// JSON integers become [`Value::Integer`] when they fit in an `i64`;
    /// every other number becomes [`Value::Real`].
    pub fn from_json(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Real(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Value::Text(s),
            JsonValue::Array(items) => Value::Array(items.into_iter().map(Value::from_json).collect()),
            JsonValue::Object(object) => Value::Map(
                object
                    .into_iter()
                    .map(|(k, v)| (MapKey::Text(k), Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

/// Convert a text-keyed field mapping to a JSON object.
pub(crate) fn fields_to_json(fields: &Fields) -> Result<serde_json::Map<String, JsonValue>> {
    fields
        .iter()
        .map(|(name, value)| Ok((name.clone(), value.to_json()?)))
        .collect()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{:?}", r),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Value::Archived(archived) => {
                write!(f, "{} {{", archived.class)?;
                for (i, (name, value)) in archived.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i.into())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f32> for Value {
    fn from(r: f32) -> Self {
        Value::Real(r.into())
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Value::Real(r)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl From<Archived> for Value {
    fn from(archived: Archived) -> Self {
        Value::Archived(archived)
    }
}

/// Maps serialize as ordered `(key, value)` entry lists rather than as
/// native maps, since keys are themselves tagged variants.
mod map_entries {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{Map, MapKey, Value};

    pub fn serialize<S: Serializer>(map: &Map, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Map, D::Error> {
        let entries = Vec::<(MapKey, Value)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_map_key_total_order() {
        let mut keys = vec![
            MapKey::Real(2.5),
            MapKey::Integer(7),
            MapKey::Text("b".into()),
            MapKey::Text("a".into()),
            MapKey::Real(f64::NAN),
            MapKey::Integer(-1),
        ];
        keys.sort();
        assert_eq!(keys[0], MapKey::Text("a".into()));
        assert_eq!(keys[1], MapKey::Text("b".into()));
        assert_eq!(keys[2], MapKey::Integer(-1));
        assert_eq!(keys[3], MapKey::Integer(7));
        assert_eq!(keys[4], MapKey::Real(2.5));
        // NaN equals itself under total ordering
        assert_eq!(keys[5], MapKey::Real(f64::NAN));
    }

    #[test]
    fn test_to_json_nested() {
        let value = Value::from(vec![
            Value::from(1),
            Value::from("two"),
            Value::map([("three", 3.0)]),
        ]);
        assert_eq!(value.to_json().unwrap(), json!([1, "two", {"three": 3.0}]));
    }

    #[test]
    fn test_to_json_rejects_non_finite() {
        let err = Value::Real(f64::INFINITY).to_json().unwrap_err();
        assert!(matches!(err, CoreError::ValueEncodingFailed(_)));
    }

    #[test]
    fn test_to_json_rejects_non_text_map_keys() {
        let value = Value::map([(1, "one")]);
        assert!(matches!(
            value.to_json(),
            Err(CoreError::ValueEncodingFailed(_))
        ));
    }

    #[test]
    fn test_archived_to_json_uses_fields() {
        let value = Value::Archived(Archived::new("Point").field("x", 1).field("y", 2));
        assert_eq!(value.to_json().unwrap(), json!({"x": 1, "y": 2}));
    }

    #[test]
    fn test_from_json_distinguishes_integers_and_reals() {
        let value = Value::from_json(json!([1, 3.0, "x", null, true]));
        assert_eq!(
            value,
            Value::Array(vec![
                Value::Integer(1),
                Value::Real(3.0),
                Value::Text("x".into()),
                Value::Null,
                Value::Bool(true),
            ])
        );
    }

    #[test]
    fn test_display() {
        let value = Value::from(vec![Value::from(1), Value::from("a"), Value::from(2.0)]);
        assert_eq!(value.to_string(), r#"[1, "a", 2.0]"#);
        let map = Value::map([(1, true)]);
        assert_eq!(map.to_string(), "{1: true}");
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }
}
