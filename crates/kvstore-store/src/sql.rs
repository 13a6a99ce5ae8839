//! SQL execution layer.
//!
//! A thin prepare/bind/step layer over one open connection. Engine failures
//! are translated into [`DatabaseError`] at each stage, and a [`Statement`]
//! is finalized when it is dropped, on every exit path.
//!
//! Statements are never cached: `prepare` compiles a fresh statement and the
//! drop finalizes it.

use rusqlite::{Connection, Row, Rows, ToSql};
use tracing::trace;

use crate::error::{engine_message, DatabaseError, Result};

/// Outcome of one step.
pub enum Step<'r, 'stmt> {
    /// A result row is available.
    Row(&'r Row<'stmt>),
    /// The statement ran to completion.
    Done,
}

/// A prepared statement.
pub struct Statement<'conn> {
    inner: rusqlite::Statement<'conn>,
    sql: String,
}

/// Prepare a statement against `conn`.
pub fn prepare<'conn>(conn: &'conn Connection, sql: &str) -> Result<Statement<'conn>> {
    trace!(sql, "preparing statement");
    let inner = conn
        .prepare(sql)
        .map_err(|e| DatabaseError::StatementPrepareFailed(engine_message(&e)))?;
    Ok(Statement {
        inner,
        sql: sql.to_string(),
    })
}

impl<'conn> Statement<'conn> {
    /// Bind a value to a 1-based parameter position.
    ///
    /// Text and blob parameters are copied by the engine at bind time, so the
    /// source buffer only has to live for the duration of this call.
    pub fn bind<T: ToSql + ?Sized>(&mut self, index: usize, value: &T) -> Result<()> {
        self.inner.raw_bind_parameter(index, value).map_err(|e| {
            DatabaseError::StatementBindFailed(format!(
                "parameter {}: {}",
                index,
                engine_message(&e)
            ))
        })
    }

    /// Start stepping the statement.
    pub fn cursor(&mut self) -> Cursor<'_> {
        Cursor {
            rows: self.inner.raw_query(),
        }
    }

    /// Step a statement that returns no rows until it is done.
    pub fn execute(&mut self) -> Result<()> {
        let mut cursor = self.cursor();
        while let Step::Row(_) = cursor.step()? {}
        Ok(())
    }

    /// Fetch the first row, if any, and stop.
    pub fn fetch_one<T, F>(&mut self, map: F) -> Result<Option<T>>
    where
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut cursor = self.cursor();
        match cursor.step()? {
            Step::Row(row) => map(row)
                .map(Some)
                .map_err(|e| DatabaseError::RowDecodingFailed(engine_message(&e))),
            Step::Done => Ok(None),
        }
    }

    /// Fetch every row in the order the engine yields them.
    ///
    /// An empty result is an empty vector, not an error.
    pub fn fetch_all<T, F>(&mut self, mut map: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut cursor = self.cursor();
        let mut rows = Vec::new();
        while let Step::Row(row) = cursor.step()? {
            rows.push(map(row).map_err(|e| DatabaseError::RowDecodingFailed(engine_message(&e)))?);
        }
        Ok(rows)
    }

    /// The SQL text this statement was prepared from.
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl Drop for Statement<'_> {
    fn drop(&mut self) {
        trace!(sql = %self.sql, "finalizing statement");
    }
}

/// Row-by-row stepping over a running statement.
pub struct Cursor<'stmt> {
    rows: Rows<'stmt>,
}

impl<'stmt> Cursor<'stmt> {
    /// Advance one step.
    pub fn step(&mut self) -> Result<Step<'_, 'stmt>> {
        match self.rows.next() {
            Ok(Some(row)) => Ok(Step::Row(row)),
            Ok(None) => Ok(Step::Done),
            Err(e) => Err(DatabaseError::StatementStepFailed(engine_message(&e))),
        }
    }
}
