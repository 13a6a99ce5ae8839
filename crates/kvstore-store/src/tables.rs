//! CRUD against the four kind tables.
//!
//! Every function is generic over the native key type; the key type picks the
//! table. All queries filter by `storeName` in addition to the key.

use bytes::Bytes;
use rusqlite::types::{Type, ValueRef};
use rusqlite::{Connection, Row};

use kvstore_core::{RecordKey, TypedRecord};

use crate::error::Result;
use crate::sql::{prepare, Statement};

/// Name of the key column.
pub const COLUMN_KEY: &str = "key";
/// Name of the document column.
pub const COLUMN_VALUE: &str = "value";
/// Name of the store name column.
pub const COLUMN_STORE_NAME: &str = "storeName";

/// A native key type with a backing table.
pub trait KeyColumn: RecordKey {
    /// Table name.
    const TABLE: &'static str;
    /// Declared type of the key column.
    const SQL_TYPE: &'static str;

    /// Bind this key at `index`.
    fn bind_key(&self, stmt: &mut Statement<'_>, index: usize) -> Result<()>;

    /// Read a key from `row` at `index`.
    fn read_key(row: &Row<'_>, index: usize) -> rusqlite::Result<Self>;
}

impl KeyColumn for i32 {
    const TABLE: &'static str = "KVStore_Integer";
    const SQL_TYPE: &'static str = "INTEGER";

    fn bind_key(&self, stmt: &mut Statement<'_>, index: usize) -> Result<()> {
        stmt.bind(index, self)
    }

    fn read_key(row: &Row<'_>, index: usize) -> rusqlite::Result<Self> {
        row.get(index)
    }
}

impl KeyColumn for f64 {
    const TABLE: &'static str = "KVStore_Real";
    const SQL_TYPE: &'static str = "REAL";

    fn bind_key(&self, stmt: &mut Statement<'_>, index: usize) -> Result<()> {
        stmt.bind(index, self)
    }

    fn read_key(row: &Row<'_>, index: usize) -> rusqlite::Result<Self> {
        row.get(index)
    }
}

impl KeyColumn for String {
    const TABLE: &'static str = "KVStore_Text";
    const SQL_TYPE: &'static str = "TEXT";

    fn bind_key(&self, stmt: &mut Statement<'_>, index: usize) -> Result<()> {
        stmt.bind(index, self.as_str())
    }

    fn read_key(row: &Row<'_>, index: usize) -> rusqlite::Result<Self> {
        row.get(index)
    }
}

impl KeyColumn for Bytes {
    const TABLE: &'static str = "KVStore_Blob";
    const SQL_TYPE: &'static str = "BLOB";

    fn bind_key(&self, stmt: &mut Statement<'_>, index: usize) -> Result<()> {
        stmt.bind(index, &self[..])
    }

    fn read_key(row: &Row<'_>, index: usize) -> rusqlite::Result<Self> {
        row.get::<_, Vec<u8>>(index).map(Bytes::from)
    }
}

/// Read the document column. Documents are stored as blobs of UTF-8 text;
/// a NULL document reads as an empty object.
fn read_document(row: &Row<'_>, index: usize) -> rusqlite::Result<String> {
    let bytes = match row.get_ref(index)? {
        ValueRef::Blob(bytes) | ValueRef::Text(bytes) => bytes,
        ValueRef::Null => return Ok("{}".to_string()),
        other => {
            return Err(rusqlite::Error::InvalidColumnType(
                index,
                COLUMN_VALUE.to_string(),
                other.data_type(),
            ))
        }
    };
    String::from_utf8(bytes.to_vec())
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Blob, Box::new(e)))
}

fn read_record<K: KeyColumn>(row: &Row<'_>) -> rusqlite::Result<TypedRecord<K>> {
    Ok(TypedRecord {
        key: K::read_key(row, 0)?,
        value: read_document(row, 1)?,
        store_name: row.get(2)?,
    })
}

/// Insert a record. Fails on a primary key collision; there is no upsert.
pub fn insert<K: KeyColumn>(conn: &Connection, record: &TypedRecord<K>) -> Result<()> {
    let sql = format!(
        "INSERT INTO {} ({}, {}, {}) VALUES (?1, ?2, ?3)",
        K::TABLE,
        COLUMN_KEY,
        COLUMN_VALUE,
        COLUMN_STORE_NAME
    );
    let mut stmt = prepare(conn, &sql)?;
    record.key.bind_key(&mut stmt, 1)?;
    stmt.bind(2, record.value.as_bytes())?;
    stmt.bind(3, record.store_name.as_str())?;
    stmt.execute()
}

/// Fetch the record for `key` in `store_name`.
pub fn select<K: KeyColumn>(
    conn: &Connection,
    key: &K,
    store_name: &str,
) -> Result<Option<TypedRecord<K>>> {
    let sql = format!(
        "SELECT {}, {}, {} FROM {} WHERE {} = ?1 AND {} = ?2",
        COLUMN_KEY,
        COLUMN_VALUE,
        COLUMN_STORE_NAME,
        K::TABLE,
        COLUMN_KEY,
        COLUMN_STORE_NAME
    );
    let mut stmt = prepare(conn, &sql)?;
    key.bind_key(&mut stmt, 1)?;
    stmt.bind(2, store_name)?;
    stmt.fetch_one(read_record::<K>)
}

/// Fetch every record of `store_name`, in engine order.
pub fn select_all<K: KeyColumn>(conn: &Connection, store_name: &str) -> Result<Vec<TypedRecord<K>>> {
    let sql = format!(
        "SELECT {}, {}, {} FROM {} WHERE {} = ?1",
        COLUMN_KEY,
        COLUMN_VALUE,
        COLUMN_STORE_NAME,
        K::TABLE,
        COLUMN_STORE_NAME
    );
    let mut stmt = prepare(conn, &sql)?;
    stmt.bind(1, store_name)?;
    stmt.fetch_all(read_record::<K>)
}

/// Delete the record for `key` in `store_name`. Deleting a missing record
/// is not an error.
pub fn delete<K: KeyColumn>(conn: &Connection, key: &K, store_name: &str) -> Result<()> {
    let sql = format!(
        "DELETE FROM {} WHERE {} = ?1 AND {} = ?2",
        K::TABLE,
        COLUMN_KEY,
        COLUMN_STORE_NAME
    );
    let mut stmt = prepare(conn, &sql)?;
    key.bind_key(&mut stmt, 1)?;
    stmt.bind(2, store_name)?;
    stmt.execute()
}

/// Delete every record of `store_name` in `K`'s table.
pub fn delete_all<K: KeyColumn>(conn: &Connection, store_name: &str) -> Result<()> {
    let sql = format!("DELETE FROM {} WHERE {} = ?1", K::TABLE, COLUMN_STORE_NAME);
    let mut stmt = prepare(conn, &sql)?;
    stmt.bind(1, store_name)?;
    stmt.execute()
}
