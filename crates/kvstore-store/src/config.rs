//! Store configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default database file name.
pub const DEFAULT_FILE_NAME: &str = "KeyValueStore.sqlite";

/// Primary key layout of the kind tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaMode {
    /// `key` alone is the primary key. Equal keys of one kind collide across
    /// logical stores.
    #[default]
    KeyOnly,
    /// `(key, storeName)` is the primary key. Logical stores are isolated.
    PerStore,
}

/// Configuration for opening the shared database.
///
/// Tables are created with `CREATE TABLE IF NOT EXISTS`, so `schema` only
/// takes effect on a fresh file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the database file. Supplied by the embedding
    /// application; defaults to the working directory.
    pub data_dir: PathBuf,
    /// Database file name inside `data_dir`.
    pub file_name: String,
    /// Primary key layout for new tables.
    pub schema: SchemaMode,
    /// Engine busy timeout. Zero means lock contention fails immediately.
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            file_name: DEFAULT_FILE_NAME.to_string(),
            schema: SchemaMode::default(),
            busy_timeout_ms: 0,
        }
    }
}

impl StoreConfig {
    /// Default configuration rooted at `data_dir`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Set the schema mode.
    pub fn with_schema(mut self, schema: SchemaMode) -> Self {
        self.schema = schema;
        self
    }

    /// Full path of the database file.
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path() {
        let config = StoreConfig::in_dir("/data/app");
        assert_eq!(config.path(), PathBuf::from("/data/app/KeyValueStore.sqlite"));
        assert_eq!(config.schema, SchemaMode::KeyOnly);
        assert_eq!(config.busy_timeout_ms, 0);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"data_dir": "/tmp/kv", "schema": "per_store"}"#).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/kv"));
        assert_eq!(config.file_name, DEFAULT_FILE_NAME);
        assert_eq!(config.schema, SchemaMode::PerStore);
    }
}
