//! Record instance: one set of values conforming to a record schema.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::schema::RecordSchema;
use crate::error::OrmError;
use crate::types::{FromValue, Value};

/// Values for one record, validated against a shared schema.
///
/// Every assignment path (construction, `set`, `set_values`) checks the
/// value kind against the field's scalar type and fails with
/// `OrmError::TypeMismatch` instead of storing a mistyped value.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: Arc<RecordSchema>,
    values: IndexMap<String, Value>,
}

impl Record {
    /// Creates a record with every field set to its default value.
    pub fn new(schema: Arc<RecordSchema>) -> Self {
        let values = schema
            .fields()
            .iter()
            .map(|(name, field)| (name.clone(), field.default_value().clone()))
            .collect();
        Self { schema, values }
    }

    /// Creates a record from named values.
    ///
    /// Fields not present in `values` keep their default value. Names the
    /// schema does not declare are ignored.
    ///
    /// # Returns
    /// `Err(OrmError::TypeMismatch)` if a value does not fit its field.
    pub fn from_values<I, K, V>(schema: Arc<RecordSchema>, values: I) -> Result<Self, OrmError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut record = Self::new(schema);
        for (name, value) in values {
            let name = name.as_ref();
            if record.schema.field(name).is_none() {
                tracing::warn!(
                    "Ignoring unknown field '{}' for record '{}'",
                    name,
                    record.schema.record_type()
                );
                continue;
            }
            record.set(name, value)?;
        }
        Ok(record)
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// Record type name, used to route the record to its table.
    pub fn record_type(&self) -> &str {
        self.schema.record_type()
    }

    /// Returns the value of a field.
    pub fn get(&self, name: &str) -> Result<&Value, OrmError> {
        self.values.get(name).ok_or_else(|| self.not_found(name))
    }

    /// Returns the value of a field converted to `T`.
    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<T, OrmError> {
        let value = self.get(name)?;
        T::from_value(value).ok_or_else(|| OrmError::TypeMismatch {
            field: name.to_string(),
            expected: T::KIND.to_string(),
            got: value.kind().to_string(),
        })
    }

    /// Assigns one field.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self, OrmError> {
        let value = value.into();
        let field = self.schema.field(name).ok_or_else(|| self.not_found(name))?;
        field.check(name, &value)?;
        self.values.insert(name.to_string(), value);
        Ok(self)
    }

    /// Field values in declared order, skipping the primary key unless requested.
    pub fn get_values(&self, include_primary_key: bool) -> Vec<Value> {
        self.schema
            .insert_fields(include_primary_key)
            .filter_map(|(name, _)| self.values.get(name).cloned())
            .collect()
    }

    /// Assigns values positionally to the targeted fields in declared order.
    ///
    /// Targets every non-primary-key field, or all fields when
    /// `include_primary_key` is set. Nothing is assigned unless every value
    /// fits.
    ///
    /// # Returns
    /// `Err(OrmError::ArityMismatch)` if the count differs from the number
    /// of targeted fields, `Err(OrmError::TypeMismatch)` if a value does not fit.
    pub fn set_values<I, V>(
        &mut self,
        values: I,
        include_primary_key: bool,
    ) -> Result<&mut Self, OrmError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let targets: Vec<(&str, _)> = self.schema.insert_fields(include_primary_key).collect();
        if targets.len() != values.len() {
            return Err(OrmError::ArityMismatch {
                expected: targets.len(),
                got: values.len(),
            });
        }

        for ((name, field), value) in targets.iter().zip(&values) {
            field.check(name, value)?;
        }

        let names: Vec<String> = targets.iter().map(|(name, _)| name.to_string()).collect();
        for (name, value) in names.into_iter().zip(values) {
            self.values.insert(name, value);
        }
        Ok(self)
    }

    fn not_found(&self, name: &str) -> OrmError {
        OrmError::FieldNotFound {
            record: self.schema.record_type().to_string(),
            field: name.to_string(),
        }
    }
}

impl fmt::Display for Record {
    /// Comma-separated non-primary-key values, for debugging.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .get_values(false)
            .iter()
            .map(ToString::to_string)
            .collect();
        f.write_str(&rendered.join(", "))
    }
}
