//! Field descriptor: scalar type plus constraints for one record attribute.

use std::fmt;

use super::constraint::Constraint;
use super::validation::validate_identifier;
use crate::engine::RawValue;
use crate::error::OrmError;
use crate::types::{ScalarType, Timestamp, Value, ValueKind};

/// Column definition for one named attribute of a record.
///
/// Descriptors are built once while declaring a schema. Adding a
/// constraint consumes the descriptor and returns the extended one; the
/// constraint list keeps insertion order, which is also the order the
/// keywords appear in the column definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    scalar_type: ScalarType,
    constraints: Vec<Constraint>,
    default_value: Value,
}

impl FieldDescriptor {
    /// Creates an unconstrained field of the given type.
    ///
    /// # Returns
    /// `Err(OrmError::InvalidTypeArgs)` if the type arguments are out of range.
    pub fn new(scalar_type: ScalarType) -> Result<Self, OrmError> {
        scalar_type.validate_args()?;
        Ok(Self {
            scalar_type,
            constraints: Vec::new(),
            default_value: scalar_type.zero_value(),
        })
    }

    pub fn integer() -> Self {
        Self::unchecked(ScalarType::Integer)
    }

    pub fn text() -> Self {
        Self::unchecked(ScalarType::TEXT)
    }

    pub fn text_sized(size: u32) -> Result<Self, OrmError> {
        Self::new(ScalarType::text_sized(size)?)
    }

    pub fn boolean() -> Self {
        Self::unchecked(ScalarType::Boolean)
    }

    pub fn real() -> Self {
        Self::unchecked(ScalarType::Real)
    }

    pub fn fixed_point(precision: u32, scale: u32) -> Result<Self, OrmError> {
        Self::new(ScalarType::fixed_point(precision, scale)?)
    }

    pub fn timestamp() -> Self {
        Self::unchecked(ScalarType::Timestamp)
    }

    // Only for types without arguments.
    fn unchecked(scalar_type: ScalarType) -> Self {
        Self {
            scalar_type,
            constraints: Vec::new(),
            default_value: scalar_type.zero_value(),
        }
    }

    /// Adds a constraint and returns the extended descriptor.
    ///
    /// Adding a constraint that is already present changes nothing.
    ///
    /// # Returns
    /// `Err(OrmError::InvalidConstraint)` if the constraint conflicts with the
    /// field: NULL together with NOT NULL, AUTOINCREMENT on anything but an
    /// INTEGER PRIMARY KEY, or a second, different foreign key target.
    pub fn with(mut self, constraint: Constraint) -> Result<Self, OrmError> {
        if self.constraints.contains(&constraint) {
            return Ok(self);
        }

        let conflict = match &constraint {
            Constraint::Nullable if self.has(&Constraint::NotNull) => {
                Some("field is already NOT NULL".to_string())
            }
            Constraint::NotNull if self.has(&Constraint::Nullable) => {
                Some("field is already NULL".to_string())
            }
            Constraint::AutoIncrement if self.scalar_type != ScalarType::Integer => Some(format!(
                "AUTOINCREMENT requires INTEGER, field is {}",
                self.scalar_type
            )),
            Constraint::AutoIncrement if !self.is_primary_key() => {
                Some("AUTOINCREMENT must follow PRIMARY KEY".to_string())
            }
            Constraint::ForeignKey(relation) => {
                validate_identifier(&relation.to_table)?;
                validate_identifier(&relation.to_field)?;
                self.foreign_key()
                    .map(|existing| format!("field already references {}", existing))
            }
            _ => None,
        };

        if let Some(reason) = conflict {
            return Err(OrmError::InvalidConstraint {
                constraint: constraint.keyword(),
                reason,
            });
        }

        self.constraints.push(constraint);
        Ok(self)
    }

    /// Parses a constraint keyword and adds it.
    pub fn with_named(self, constraint: &str) -> Result<Self, OrmError> {
        let constraint = constraint.parse::<Constraint>()?;
        self.with(constraint)
    }

    pub fn scalar_type(&self) -> ScalarType {
        self.scalar_type
    }

    /// Constraints in the order they were added.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Declared type arguments, e.g. `[10, 5]` for `FIXEDPOINT(10, 5)`.
    pub fn type_args(&self) -> Vec<u32> {
        self.scalar_type.type_args()
    }

    pub fn default_value(&self) -> &Value {
        &self.default_value
    }

    fn has(&self, constraint: &Constraint) -> bool {
        self.constraints.contains(constraint)
    }

    pub fn is_primary_key(&self) -> bool {
        self.has(&Constraint::PrimaryKey)
    }

    pub fn is_nullable(&self) -> bool {
        self.has(&Constraint::Nullable)
    }

    pub fn is_auto_increment(&self) -> bool {
        self.has(&Constraint::AutoIncrement)
    }

    /// Foreign key target, if any.
    pub fn foreign_key(&self) -> Option<&super::Relation> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::ForeignKey(relation) => Some(relation),
            _ => None,
        })
    }

    /// Column definition without the name: type, arguments, constraints.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Checks that `value` can be stored in this field.
    ///
    /// NaN is rejected for real fields: the engine binds it as NULL, which
    /// would not read back.
    pub fn check(&self, field: &str, value: &Value) -> Result<(), OrmError> {
        let kind = value.kind();
        let accepted = match value {
            Value::Real(v) if v.is_nan() => false,
            _ => {
                kind == self.scalar_type.native_kind()
                    || (kind == ValueKind::Null && self.is_nullable())
            }
        };
        if accepted {
            Ok(())
        } else {
            let got = match value {
                Value::Real(v) if v.is_nan() => "NaN".to_string(),
                _ => kind.to_string(),
            };
            Err(OrmError::TypeMismatch {
                field: field.to_string(),
                expected: self.scalar_type.native_kind().to_string(),
                got,
            })
        }
    }

    /// Converts an engine value into this field's native representation.
    ///
    /// Numeric storage classes are widened where the column affinity may
    /// have changed them (integers read back for REAL columns, 0/1 for
    /// BOOLEAN); anything else is a mismatch.
    pub fn decode(&self, field: &str, raw: RawValue) -> Result<Value, OrmError> {
        let got = raw.type_name();
        let value = match (self.scalar_type, raw) {
            (_, RawValue::Null) if self.is_nullable() => Some(Value::Null),
            (ScalarType::Integer, RawValue::Integer(v)) => Some(Value::Integer(v)),
            (ScalarType::Text { .. }, RawValue::Text(v)) => Some(Value::Text(v)),
            (ScalarType::Boolean, RawValue::Integer(v)) if v == 0 || v == 1 => {
                Some(Value::Boolean(v == 1))
            }
            (ScalarType::Real | ScalarType::FixedPoint { .. }, RawValue::Real(v)) => {
                Some(Value::Real(v))
            }
            (ScalarType::Real | ScalarType::FixedPoint { .. }, RawValue::Integer(v)) => {
                Some(Value::Real(v as f64))
            }
            (ScalarType::Timestamp, RawValue::Text(v)) => {
                Some(Value::Timestamp(v.parse::<Timestamp>()?))
            }
            _ => None,
        };

        value.ok_or_else(|| OrmError::TypeMismatch {
            field: field.to_string(),
            expected: self.scalar_type.to_string(),
            got: got.to_string(),
        })
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.scalar_type)?;
        for constraint in &self.constraints {
            write!(f, " {}", constraint)?;
        }
        Ok(())
    }
}
