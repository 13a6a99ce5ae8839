//! Blob key archiving.
//!
//! Blob keys (arrays, maps, archived objects) are stored as the CBOR encoding
//! of their [`Value`] tree. The encoding is stable: maps are ordered entry
//! lists, so equal keys always produce equal bytes, and lookups by key are
//! byte comparisons in the engine.

use bytes::Bytes;

use crate::error::{CoreError, Result};
use crate::value::Value;

/// Archive a key to bytes.
pub fn archive_key(key: &Value) -> Result<Bytes> {
    let mut buf = Vec::new();
    ciborium::into_writer(key, &mut buf)
        .map_err(|e| CoreError::KeyArchiveFailed(e.to_string()))?;
    Ok(Bytes::from(buf))
}

/// Decode archived key bytes back into a value of any shape.
pub fn unarchive_key(bytes: &[u8]) -> Result<Value> {
    ciborium::from_reader(bytes).map_err(|e| CoreError::KeyArchiveFailed(e.to_string()))
}

/// Decode archived key bytes for the generic read path.
///
/// Only arrays and maps come back. Anything else, including archived
/// objects and undecodable bytes, yields `None` and the read reports no
/// record.
pub fn rehydrate_key(bytes: &[u8]) -> Option<Value> {
    match unarchive_key(bytes) {
        Ok(value @ (Value::Array(_) | Value::Map(_))) => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Archived;

    #[test]
    fn test_archive_array_roundtrip() {
        let key = Value::from(vec![Value::from(1), Value::from("two"), Value::from(3.0)]);
        let bytes = archive_key(&key).unwrap();
        assert_eq!(unarchive_key(&bytes).unwrap(), key);
        assert_eq!(rehydrate_key(&bytes), Some(key));
    }

    #[test]
    fn test_archive_map_with_mixed_keys() {
        let key = Value::map([
            (crate::MapKey::from("name"), Value::from("x")),
            (crate::MapKey::from(7), Value::from(true)),
            (crate::MapKey::from(0.25), Value::Null),
        ]);
        let bytes = archive_key(&key).unwrap();
        assert_eq!(rehydrate_key(&bytes), Some(key));
    }

    #[test]
    fn test_rehydrate_drops_archived_objects() {
        let key = Value::Archived(Archived::new("Session").field("id", 9));
        let bytes = archive_key(&key).unwrap();

        // Decodes fine, but the generic read only returns arrays and maps
        assert_eq!(unarchive_key(&bytes).unwrap(), key);
        assert_eq!(rehydrate_key(&bytes), None);
    }

    #[test]
    fn test_rehydrate_garbage() {
        assert_eq!(rehydrate_key(&[0xff, 0x00, 0x13]), None);
        assert!(unarchive_key(&[]).is_err());
    }
}
