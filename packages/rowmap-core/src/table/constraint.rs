//! Column constraints.

use std::fmt;
use std::str::FromStr;

use super::relation::Relation;
use crate::error::OrmError;

/// SQL column modifier attached to a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constraint {
    Nullable,
    NotNull,
    PrimaryKey,
    /// Column references another table's column
    ForeignKey(Relation),
    AutoIncrement,
}

impl Constraint {
    /// Shorthand for a foreign key constraint.
    pub fn references(to_table: impl Into<String>, to_field: impl Into<String>) -> Self {
        Constraint::ForeignKey(Relation::new(to_table, to_field))
    }

    /// SQL text rendered for this constraint in a column definition.
    pub fn keyword(&self) -> String {
        match self {
            Constraint::Nullable => "NULL".to_string(),
            Constraint::NotNull => "NOT NULL".to_string(),
            Constraint::PrimaryKey => "PRIMARY KEY".to_string(),
            Constraint::ForeignKey(relation) => format!("REFERENCES {}", relation),
            Constraint::AutoIncrement => "AUTOINCREMENT".to_string(),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keyword())
    }
}

impl FromStr for Constraint {
    type Err = OrmError;

    /// Parses a constraint keyword, case-insensitively and with any spacing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        let upper = normalized.to_ascii_uppercase();
        match upper.as_str() {
            "NULL" => return Ok(Constraint::Nullable),
            "NOT NULL" => return Ok(Constraint::NotNull),
            "PRIMARY KEY" => return Ok(Constraint::PrimaryKey),
            "AUTOINCREMENT" => return Ok(Constraint::AutoIncrement),
            _ => {}
        }

        if let Some(target) = upper
            .strip_prefix("REFERENCES ")
            .map(|_| &normalized["REFERENCES ".len()..])
        {
            if let Some((table, rest)) = target.split_once('(') {
                if let Some(column) = rest.strip_suffix(')') {
                    let (table, column) = (table.trim(), column.trim());
                    if !table.is_empty() && !column.is_empty() {
                        return Ok(Constraint::references(table, column));
                    }
                }
            }
        }

        Err(OrmError::InvalidConstraint {
            constraint: s.to_string(),
            reason: "unrecognized constraint".to_string(),
        })
    }
}
