use std::fmt;

use super::timestamp::Timestamp;
use super::value::{Value, ValueKind};
use crate::error::OrmError;

/// Largest precision accepted for fixed-point columns.
pub const MAX_FIXED_POINT_PRECISION: u32 = 38;

/// Scalar kinds a record field can hold, each mapped to one SQL column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Integer,
    /// Text with an optional declared size
    Text {
        size: Option<u32>,
    },
    Boolean,
    Real,
    FixedPoint {
        precision: u32,
        scale: u32,
    },
    Timestamp,
}

impl ScalarType {
    /// Unsized text.
    pub const TEXT: ScalarType = ScalarType::Text { size: None };

    /// Creates a fixed-point type after checking its arguments.
    pub fn fixed_point(precision: u32, scale: u32) -> Result<Self, OrmError> {
        let scalar_type = ScalarType::FixedPoint { precision, scale };
        scalar_type.validate_args()?;
        Ok(scalar_type)
    }

    /// Creates a sized text type after checking its argument.
    pub fn text_sized(size: u32) -> Result<Self, OrmError> {
        let scalar_type = ScalarType::Text { size: Some(size) };
        scalar_type.validate_args()?;
        Ok(scalar_type)
    }

    /// SQL keyword for the column type, without arguments.
    pub fn sql_keyword(&self) -> &'static str {
        match self {
            ScalarType::Integer => "INTEGER",
            ScalarType::Text { .. } => "TEXT",
            ScalarType::Boolean => "BOOLEAN",
            ScalarType::Real => "REAL",
            ScalarType::FixedPoint { .. } => "FIXEDPOINT",
            ScalarType::Timestamp => "TIMESTAMP",
        }
    }

    /// Kind of value a field of this type stores.
    pub fn native_kind(&self) -> ValueKind {
        match self {
            ScalarType::Integer => ValueKind::Integer,
            ScalarType::Text { .. } => ValueKind::Text,
            ScalarType::Boolean => ValueKind::Boolean,
            ScalarType::Real | ScalarType::FixedPoint { .. } => ValueKind::Real,
            ScalarType::Timestamp => ValueKind::Timestamp,
        }
    }

    /// Names of the type arguments this type accepts, in declaration order.
    pub fn type_arg_names(&self) -> &'static [&'static str] {
        match self {
            ScalarType::Text { .. } => &["size"],
            ScalarType::FixedPoint { .. } => &["precision", "scale"],
            _ => &[],
        }
    }

    /// Type arguments actually declared, in declaration order.
    pub fn type_args(&self) -> Vec<u32> {
        match self {
            ScalarType::Text { size } => size.iter().copied().collect(),
            ScalarType::FixedPoint { precision, scale } => vec![*precision, *scale],
            _ => Vec::new(),
        }
    }

    /// Zero value of the native representation.
    pub fn zero_value(&self) -> Value {
        match self {
            ScalarType::Integer => Value::Integer(0),
            ScalarType::Text { .. } => Value::Text(String::new()),
            ScalarType::Boolean => Value::Boolean(false),
            ScalarType::Real | ScalarType::FixedPoint { .. } => Value::Real(0.0),
            ScalarType::Timestamp => Value::Timestamp(Timestamp::epoch()),
        }
    }

    /// Checks the declared type arguments.
    pub fn validate_args(&self) -> Result<(), OrmError> {
        let reason = match *self {
            ScalarType::Text { size: Some(0) } => Some("size must be positive".to_string()),
            ScalarType::FixedPoint { precision, .. }
                if precision == 0 || precision > MAX_FIXED_POINT_PRECISION =>
            {
                Some(format!(
                    "precision must be between 1 and {}",
                    MAX_FIXED_POINT_PRECISION
                ))
            }
            ScalarType::FixedPoint { precision, scale } if scale > precision => Some(format!(
                "scale {} exceeds precision {}",
                scale, precision
            )),
            _ => None,
        };

        match reason {
            Some(reason) => Err(OrmError::InvalidTypeArgs {
                scalar_type: self.sql_keyword().to_string(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for ScalarType {
    /// Renders the column type: keyword plus parenthesised arguments, if any.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_keyword())?;
        let args = self.type_args();
        if !args.is_empty() {
            let joined: Vec<String> = args.iter().map(u32::to_string).collect();
            write!(f, "({})", joined.join(", "))?;
        }
        Ok(())
    }
}
