//! Validation helpers for schema declarations.

use std::collections::HashSet;

use super::field::FieldDescriptor;
use crate::error::OrmError;

/// Checks that `name` is a plain SQL identifier: `[A-Za-z_][A-Za-z0-9_]*`.
///
/// Names that pass never need quoting, so they can be written into
/// statement text directly.
pub(crate) fn validate_identifier(name: &str) -> Result<(), OrmError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(OrmError::InvalidIdentifier(name.to_string()))
    }
}

/// Rejects schemas without fields, which have no valid column list.
pub(crate) fn validate_not_empty(
    record: &str,
    fields: &[(String, FieldDescriptor)],
) -> Result<(), OrmError> {
    if fields.is_empty() {
        return Err(OrmError::EmptySchema(record.to_string()));
    }
    Ok(())
}

/// Validates field names: each must be an identifier and unique.
pub(crate) fn validate_field_names(
    record: &str,
    fields: &[(String, FieldDescriptor)],
) -> Result<(), OrmError> {
    let mut seen_names = HashSet::new();
    for (name, _) in fields {
        validate_identifier(name)?;
        if !seen_names.insert(name.as_str()) {
            return Err(OrmError::DuplicateField {
                record: record.to_string(),
                field: name.clone(),
            });
        }
    }
    Ok(())
}

/// Validates that at most one field carries a primary key.
pub(crate) fn validate_primary_key(
    record: &str,
    fields: &[(String, FieldDescriptor)],
) -> Result<(), OrmError> {
    let primary_keys: Vec<String> = fields
        .iter()
        .filter(|(_, field)| field.is_primary_key())
        .map(|(name, _)| name.clone())
        .collect();

    if primary_keys.len() > 1 {
        return Err(OrmError::MultiplePrimaryKeys {
            record: record.to_string(),
            fields: primary_keys,
        });
    }
    Ok(())
}
