//! Record schemas, field descriptors, records, and table bindings.

mod binding;
mod constraint;
mod field;
mod record;
mod relation;
mod schema;
pub(crate) mod validation;

pub use binding::{InsertStatement, TableBinding};
pub use constraint::Constraint;
pub use field::FieldDescriptor;
pub use record::Record;
pub use relation::Relation;
pub use schema::{RecordSchema, RecordSchemaBuilder};

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
