//! Foreign key target of a column.

use std::fmt;

/// Table and column a foreign key column points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relation {
    /// Name of the target table
    pub to_table: String,
    /// Column name in target table
    pub to_field: String,
}

impl Relation {
    pub fn new(to_table: impl Into<String>, to_field: impl Into<String>) -> Self {
        Self {
            to_table: to_table.into(),
            to_field: to_field.into(),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.to_table, self.to_field)
    }
}
