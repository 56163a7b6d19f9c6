//! Scalar type system: column types, typed values, and timestamps.

mod scalar_type;
mod timestamp;
mod value;

pub use scalar_type::{ScalarType, MAX_FIXED_POINT_PRECISION};
pub use timestamp::{Timestamp, TIMESTAMP_FORMAT};
pub use value::{FromValue, Value, ValueKind};
