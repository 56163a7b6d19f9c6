//! SQLite engine backed by rusqlite with a bundled SQLite.
//!
//! Writes run inside an implicit transaction opened by the first `execute`
//! after a commit; `commit` closes it. Queries materialise their rows so no
//! statement borrow outlives the call.

use std::path::Path;

use rusqlite::types::{ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection, ToSql};

use super::{Engine, EngineError, RawRow, RawValue};
use crate::types::Value;

impl From<rusqlite::Error> for EngineError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(err, _)
            | rusqlite::Error::SqlInputError { error: err, .. } => {
                EngineError::with_code(e.to_string(), i64::from(err.extended_code))
            }
            _ => EngineError::new(e.to_string()),
        }
    }
}

impl From<SqlValue> for RawValue {
    fn from(v: SqlValue) -> Self {
        match v {
            SqlValue::Null => RawValue::Null,
            SqlValue::Integer(i) => RawValue::Integer(i),
            SqlValue::Real(f) => RawValue::Real(f),
            SqlValue::Text(s) => RawValue::Text(s),
            SqlValue::Blob(b) => RawValue::Blob(b),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::Integer(v) => ToSqlOutput::Owned(SqlValue::Integer(*v)),
            Value::Boolean(v) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*v))),
            Value::Real(v) => ToSqlOutput::Owned(SqlValue::Real(*v)),
            Value::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
            Value::Timestamp(v) => ToSqlOutput::Owned(SqlValue::Text(v.to_string())),
        })
    }
}

/// Engine over a single rusqlite connection.
#[derive(Debug)]
pub struct SqliteEngine {
    conn: Connection,
}

impl SqliteEngine {
    /// Opens (or creates) the database at `path`. ":memory:" opens an in-memory database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self, EngineError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Turns foreign key enforcement on or off for this connection.
    pub fn set_foreign_keys(&mut self, enabled: bool) -> Result<(), EngineError> {
        let sql = if enabled {
            "PRAGMA foreign_keys = ON"
        } else {
            "PRAGMA foreign_keys = OFF"
        };
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Returns true if a write transaction is open.
    pub fn in_transaction(&self) -> bool {
        !self.conn.is_autocommit()
    }
}

impl Engine for SqliteEngine {
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<usize, EngineError> {
        if self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN")?;
        }
        let affected = self.conn.execute(sql, params_from_iter(params.iter()))?;
        Ok(affected)
    }

    fn query(&mut self, sql: &str, params: &[Value]) -> Result<Vec<RawRow>, EngineError> {
        let mut stmt = self.conn.prepare(sql)?;
        let column_count = stmt.column_count();
        let mut rows = stmt.query(params_from_iter(params.iter()))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut raw = Vec::with_capacity(column_count);
            for index in 0..column_count {
                let value: SqlValue = row.get(index)?;
                raw.push(RawValue::from(value));
            }
            out.push(raw);
        }
        Ok(out)
    }

    fn commit(&mut self) -> Result<(), EngineError> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT")?;
        }
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), EngineError> {
        self.conn.close().map_err(|(_, e)| EngineError::from(e))
    }
}
