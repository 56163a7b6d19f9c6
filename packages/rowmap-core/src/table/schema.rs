//! Record schema: the ordered field declarations of one record type.

use std::sync::Arc;

use indexmap::IndexMap;

use super::field::FieldDescriptor;
use super::validation;
use crate::error::OrmError;

/// Ordered mapping from field name to descriptor for one record type.
///
/// Declaration order is column order everywhere: in `CREATE TABLE`, in
/// insert column lists, and in the rows returned by `SELECT *`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    record_type: String,
    fields: IndexMap<String, FieldDescriptor>,
}

impl RecordSchema {
    /// Starts declaring a schema for `record_type`.
    pub fn builder(record_type: impl Into<String>) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            record_type: record_type.into(),
            fields: Vec::new(),
        }
    }

    /// Name of the record type this schema declares.
    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    pub fn fields(&self) -> &IndexMap<String, FieldDescriptor> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Name and descriptor of the primary key field, if one is declared.
    pub fn primary_key(&self) -> Option<(&str, &FieldDescriptor)> {
        self.fields
            .iter()
            .find(|(_, field)| field.is_primary_key())
            .map(|(name, field)| (name.as_str(), field))
    }

    /// Fields targeted by inserts and positional assignment, in declared order.
    ///
    /// Primary key fields are skipped unless `include_primary_key` is set.
    pub fn insert_fields(
        &self,
        include_primary_key: bool,
    ) -> impl Iterator<Item = (&str, &FieldDescriptor)> + '_ {
        self.fields
            .iter()
            .filter(move |(_, field)| include_primary_key || !field.is_primary_key())
            .map(|(name, field)| (name.as_str(), field))
    }

    /// Column definitions for `CREATE TABLE`, one `"<name> <definition>"` per line.
    pub fn columns_for_create(&self) -> String {
        self.fields
            .iter()
            .map(|(name, field)| format!("{} {}", name, field.render()))
            .collect::<Vec<_>>()
            .join(",\n")
    }

    /// Every column name, primary key included.
    pub fn columns_for_select(&self) -> String {
        self.fields
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Column names for an insert.
    pub fn columns_for_insert(&self, include_primary_key: bool) -> String {
        self.insert_fields(include_primary_key)
            .map(|(name, _)| name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Collects `(name, descriptor)` pairs in declaration order.
#[derive(Debug)]
pub struct RecordSchemaBuilder {
    record_type: String,
    fields: Vec<(String, FieldDescriptor)>,
}

impl RecordSchemaBuilder {
    /// Declares the next field.
    pub fn field(mut self, name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.fields.push((name.into(), descriptor));
        self
    }

    /// Finalises the schema.
    ///
    /// # Returns
    /// `Err` if a name is not a plain identifier, no field is declared, a
    /// field is declared twice, or more than one field is a primary key.
    pub fn build(self) -> Result<Arc<RecordSchema>, OrmError> {
        validation::validate_identifier(&self.record_type)?;
        validation::validate_not_empty(&self.record_type, &self.fields)?;
        validation::validate_field_names(&self.record_type, &self.fields)?;
        validation::validate_primary_key(&self.record_type, &self.fields)?;

        Ok(Arc::new(RecordSchema {
            record_type: self.record_type,
            fields: self.fields.into_iter().collect(),
        }))
    }
}
