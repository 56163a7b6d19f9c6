//! Table binding: a table name paired with a record schema.

use std::sync::Arc;

use super::record::Record;
use super::schema::RecordSchema;
use super::validation::validate_identifier;
use crate::engine::RawRow;
use crate::error::OrmError;
use crate::types::{ScalarType, Value};

/// Parameterised insert statement with its bound values.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    /// Statement text with `?` placeholders
    pub sql: String,
    /// Column list exactly as written in the statement
    pub columns: String,
    /// Values bound to the placeholders, in column order
    pub params: Vec<Value>,
}

impl InsertStatement {
    /// Statement text with the parameters substituted as SQL literals.
    ///
    /// For logs and error messages only; execution always binds `params`.
    pub fn expanded(&self) -> String {
        let mut params = self.params.iter();
        self.sql
            .split('?')
            .enumerate()
            .map(|(i, part)| {
                if i == 0 {
                    part.to_string()
                } else {
                    let literal = params.next().map(Value::sql_literal).unwrap_or_default();
                    format!("{}{}", literal, part)
                }
            })
            .collect()
    }
}

/// Generates SQL for one table and converts its rows back into records.
#[derive(Debug, Clone, PartialEq)]
pub struct TableBinding {
    table_name: String,
    schema: Arc<RecordSchema>,
}

impl TableBinding {
    /// Binds `schema` to `table_name`.
    ///
    /// # Returns
    /// `Err(OrmError::InvalidIdentifier)` if the table name is not a plain identifier.
    pub fn new(table_name: impl Into<String>, schema: Arc<RecordSchema>) -> Result<Self, OrmError> {
        let table_name = table_name.into();
        validate_identifier(&table_name)?;
        Ok(Self { table_name, schema })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// Record type served by this binding.
    pub fn record_type(&self) -> &str {
        self.schema.record_type()
    }

    /// Creates a record of this binding's type from positional values for the
    /// non-primary-key fields.
    pub fn record<I, V>(&self, values: I) -> Result<Record, OrmError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut record = Record::new(self.schema.clone());
        record.set_values(values, false)?;
        Ok(record)
    }

    pub fn create_statement(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.table_name,
            self.schema.columns_for_create()
        )
    }

    /// Builds the insert statement for `record`.
    ///
    /// When no column is left to insert (the schema only has the excluded
    /// primary key), the statement falls back to `DEFAULT VALUES`.
    ///
    /// Only an INTEGER primary key is assigned by the engine; any other key
    /// left out would be stored as NULL, so excluding it fails with
    /// `OrmError::UnassignablePrimaryKey`.
    pub fn insert_statement(
        &self,
        record: &Record,
        include_primary_key: bool,
    ) -> Result<InsertStatement, OrmError> {
        if record.schema().as_ref() != self.schema.as_ref() {
            return Err(OrmError::UnknownRecordType(record.record_type().to_string()));
        }
        if !include_primary_key {
            if let Some((name, field)) = self.schema.primary_key() {
                if field.scalar_type() != ScalarType::Integer {
                    return Err(OrmError::UnassignablePrimaryKey {
                        record: self.schema.record_type().to_string(),
                        field: name.to_string(),
                        scalar_type: field.scalar_type().to_string(),
                    });
                }
            }
        }

        let columns = self.schema.columns_for_insert(include_primary_key);
        let params = record.get_values(include_primary_key);
        let sql = if params.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", self.table_name)
        } else {
            let placeholders = vec!["?"; params.len()].join(", ");
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.table_name, columns, placeholders
            )
        };

        Ok(InsertStatement {
            sql,
            columns,
            params,
        })
    }

    pub fn select_statement(&self) -> String {
        format!("SELECT * FROM {}", self.table_name)
    }

    /// Converts one `SELECT *` row into a record.
    ///
    /// The row is matched positionally against every field, primary key
    /// included, in declared order.
    pub fn row_to_record(&self, row: RawRow) -> Result<Record, OrmError> {
        if row.len() != self.schema.len() {
            return Err(OrmError::RowArityMismatch {
                table: self.table_name.clone(),
                expected: self.schema.len(),
                got: row.len(),
            });
        }

        let mut values = Vec::with_capacity(row.len());
        for ((name, field), raw) in self.schema.fields().iter().zip(row) {
            values.push(field.decode(name, raw)?);
        }

        let mut record = Record::new(self.schema.clone());
        record.set_values(values, true)?;
        Ok(record)
    }
}
