//! Embedded SQL engine interface and its SQLite implementation.
//!
//! The mapping layer only needs four things from an engine: run a
//! side-effecting statement, run a query returning raw rows, commit, and
//! close. Everything else (connection lifecycle details, storage format)
//! stays behind this trait.

mod sqlite;

pub use sqlite::SqliteEngine;

use thiserror::Error;

use crate::types::Value;

/// Opaque failure reported by an engine.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct EngineError {
    /// Human-readable engine message
    pub message: String,
    /// Engine-specific error code, when the engine reports one
    pub code: Option<i64>,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(message: impl Into<String>, code: i64) -> Self {
        Self {
            message: message.into(),
            code: Some(code),
        }
    }
}

/// Untyped column value as returned by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl RawValue {
    /// Storage class name, used in mismatch messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Null => "NULL",
            RawValue::Integer(_) => "INTEGER",
            RawValue::Real(_) => "REAL",
            RawValue::Text(_) => "TEXT",
            RawValue::Blob(_) => "BLOB",
        }
    }
}

/// One result row, aligned with the statement's column order.
pub type RawRow = Vec<RawValue>;

/// Statement execution boundary.
///
/// Implementations are used from behind a single lock and never see
/// concurrent calls.
pub trait Engine: Send {
    /// Executes a side-effecting statement and returns the affected row count.
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<usize, EngineError>;

    /// Runs a query and returns its rows.
    fn query(&mut self, sql: &str, params: &[Value]) -> Result<Vec<RawRow>, EngineError>;

    /// Commits pending work. A no-op when nothing is pending.
    fn commit(&mut self) -> Result<(), EngineError>;

    /// Releases the connection.
    fn close(self: Box<Self>) -> Result<(), EngineError>;
}
