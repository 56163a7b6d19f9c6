//! Mapping error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::engine::EngineError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, OrmError>;

/// Errors raised while declaring schemas, building records, or talking to the engine.
#[derive(Error, Debug)]
pub enum OrmError {
    /// Constraint is unknown or cannot be combined with the field
    #[error("Invalid constraint '{constraint}': {reason}")]
    InvalidConstraint { constraint: String, reason: String },

    /// Type arguments rejected for a scalar type
    #[error("Invalid type arguments for {scalar_type}: {reason}")]
    InvalidTypeArgs { scalar_type: String, reason: String },

    /// Name cannot be used as a SQL identifier
    #[error("Invalid identifier '{0}'")]
    InvalidIdentifier(String),

    /// Primary key the engine cannot assign was left out of an insert
    #[error("Primary key '{field}' of record '{record}' is {scalar_type} and must be inserted explicitly")]
    UnassignablePrimaryKey {
        record: String,
        field: String,
        scalar_type: String,
    },

    /// Value kind does not match the field's scalar type
    #[error("Type mismatch for field '{field}': expected {expected}, got {got}")]
    TypeMismatch {
        field: String,
        expected: String,
        got: String,
    },

    /// Timestamp components out of range or unparsable text
    #[error("Invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    /// Positional value count does not match the targeted fields
    #[error("Arity mismatch: expected {expected} values, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    /// Raw row width does not match the schema
    #[error("Row arity mismatch for table '{table}': expected {expected} columns, got {got}")]
    RowArityMismatch {
        table: String,
        expected: usize,
        got: usize,
    },

    /// Field not declared in the record schema
    #[error("Field '{field}' not found in record '{record}'")]
    FieldNotFound { record: String, field: String },

    /// Schema declares no fields
    #[error("Record '{0}' declares no fields")]
    EmptySchema(String),

    /// Field declared twice in one schema
    #[error("Field '{field}' already exists in record '{record}'")]
    DuplicateField { record: String, field: String },

    /// Composite primary keys are not supported
    #[error("Record '{record}' declares more than one primary key: {fields:?}")]
    MultiplePrimaryKeys { record: String, fields: Vec<String> },

    /// Two bindings registered for one record type
    #[error("Record type '{0}' is already bound to a table")]
    DuplicateBinding(String),

    /// No binding registered for the record type
    #[error("No table bound for record type '{0}'")]
    UnknownRecordType(String),

    /// Manager used after close
    #[error("Mapping manager is closed")]
    ManagerClosed,

    /// Statement failed inside the engine
    #[error("Engine error on table '{table}' executing `{statement}`: {source}")]
    Engine {
        table: String,
        statement: String,
        #[source]
        source: EngineError,
    },

    /// Engine connection could not be opened, committed or released
    #[error("Engine connection error for '{}': {source}", path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: EngineError,
    },
}

impl OrmError {
    /// Returns true for failures that originate in the engine.
    pub fn is_engine_error(&self) -> bool {
        matches!(self, OrmError::Engine { .. } | OrmError::Connection { .. })
    }
}
