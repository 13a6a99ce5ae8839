//! Table bootstrap.
//!
//! One table per storable key kind, created if missing. There is no
//! versioning: an existing table is left as it is, whatever its layout.

use bytes::Bytes;
use rusqlite::Connection;
use tracing::debug;

use kvstore_core::KeyKind;

use crate::config::SchemaMode;
use crate::error::Result;
use crate::sql::prepare;
use crate::tables::{KeyColumn, COLUMN_KEY, COLUMN_STORE_NAME, COLUMN_VALUE};

/// Table backing a key kind. `Unknown` has none.
pub fn table_name(kind: KeyKind) -> Option<&'static str> {
    match kind {
        KeyKind::Integer => Some(<i32 as KeyColumn>::TABLE),
        KeyKind::Real => Some(<f64 as KeyColumn>::TABLE),
        KeyKind::Text => Some(<String as KeyColumn>::TABLE),
        KeyKind::Blob => Some(<Bytes as KeyColumn>::TABLE),
        KeyKind::Unknown => None,
    }
}

/// `CREATE TABLE IF NOT EXISTS` statement for `K`'s table.
pub fn create_table_sql<K: KeyColumn>(mode: SchemaMode) -> String {
    match mode {
        SchemaMode::KeyOnly => format!(
            "CREATE TABLE IF NOT EXISTS {} ({} {} PRIMARY KEY NOT NULL, {} BLOB, {} TEXT NOT NULL)",
            K::TABLE,
            COLUMN_KEY,
            K::SQL_TYPE,
            COLUMN_VALUE,
            COLUMN_STORE_NAME
        ),
        SchemaMode::PerStore => format!(
            "CREATE TABLE IF NOT EXISTS {} ({} {} NOT NULL, {} BLOB, {} TEXT NOT NULL, PRIMARY KEY ({}, {}))",
            K::TABLE,
            COLUMN_KEY,
            K::SQL_TYPE,
            COLUMN_VALUE,
            COLUMN_STORE_NAME,
            COLUMN_KEY,
            COLUMN_STORE_NAME
        ),
    }
}

fn create_table<K: KeyColumn>(conn: &Connection, mode: SchemaMode) -> Result<()> {
    let sql = create_table_sql::<K>(mode);
    prepare(conn, &sql)?.execute()
}

/// Create the four kind tables. Idempotent.
pub fn bootstrap(conn: &Connection, mode: SchemaMode) -> Result<()> {
    create_table::<i32>(conn, mode)?;
    create_table::<f64>(conn, mode)?;
    create_table::<String>(conn, mode)?;
    create_table::<Bytes>(conn, mode)?;
    debug!(?mode, "kind tables ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap()
    }

    #[test]
    fn test_bootstrap_creates_tables() {
        let conn = Connection::open_in_memory().unwrap();
        bootstrap(&conn, SchemaMode::KeyOnly).unwrap();

        assert_eq!(
            table_names(&conn),
            vec!["KVStore_Blob", "KVStore_Integer", "KVStore_Real", "KVStore_Text"]
        );
    }

    #[test]
    fn test_bootstrap_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        bootstrap(&conn, SchemaMode::KeyOnly).unwrap();
        conn.execute(
            "INSERT INTO KVStore_Integer (key, value, storeName) VALUES (1, '{}', 'S')",
            [],
        )
        .unwrap();

        // Second run leaves existing tables and rows alone, even with another mode
        bootstrap(&conn, SchemaMode::PerStore).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM KVStore_Integer", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_table_names() {
        assert_eq!(table_name(KeyKind::Integer), Some("KVStore_Integer"));
        assert_eq!(table_name(KeyKind::Blob), Some("KVStore_Blob"));
        assert_eq!(table_name(KeyKind::Unknown), None);
        for kind in KeyKind::STORAGE {
            assert!(table_name(kind).is_some());
        }
    }

    #[test]
    fn test_create_table_sql() {
        let sql = create_table_sql::<String>(SchemaMode::KeyOnly);
        assert!(sql.contains("key TEXT PRIMARY KEY NOT NULL"));

        let sql = create_table_sql::<Bytes>(SchemaMode::PerStore);
        assert!(sql.contains("key BLOB NOT NULL"));
        assert!(sql.contains("PRIMARY KEY (key, storeName)"));
    }
}
