//! Declarative mapping between typed record definitions and a relational schema.
//!
//! Provides the scalar type system, field descriptors and record schemas,
//! SQL generation for create/insert/select, row-to-record marshaling, and a
//! mapping manager that drives an embedded SQL engine.

pub mod config;
pub mod engine;
pub mod error;
pub mod manager;
pub mod table;
pub mod types;

pub use config::OrmConfig;
pub use error::{OrmError, Result};
pub use manager::{MappingManager, Records};
pub use table::{Constraint, FieldDescriptor, Record, RecordSchema, TableBinding};
pub use types::{ScalarType, Timestamp, Value};
