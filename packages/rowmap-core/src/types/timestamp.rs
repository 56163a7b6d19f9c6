use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::error::OrmError;

/// Text format used for timestamps both in SQL and in `Display`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Calendar timestamp with second resolution.
///
/// Years are limited to four digits so the text form always sorts
/// chronologically. The default value is the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Smallest accepted year
    pub const MIN_YEAR: i32 = 1000;
    /// Largest accepted year
    pub const MAX_YEAR: i32 = 9999;

    /// Creates a timestamp from its components.
    ///
    /// # Returns
    /// `Err(OrmError::InvalidTimestamp)` naming every component out of range.
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self, OrmError> {
        let mut invalid = Vec::new();
        if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) {
            invalid.push("year");
        }
        if !(1..=12).contains(&month) {
            invalid.push("month");
        }
        // Day validity is judged against a clamped year so a bad year does not hide a bad day.
        let clamped_year = year.clamp(Self::MIN_YEAR, Self::MAX_YEAR);
        if (1..=12).contains(&month) && NaiveDate::from_ymd_opt(clamped_year, month, day).is_none()
        {
            invalid.push("day");
        }
        let date = NaiveDate::from_ymd_opt(year, month, day);
        if hour > 23 {
            invalid.push("hour");
        }
        if minute > 59 {
            invalid.push("minute");
        }
        if second > 59 {
            invalid.push("second");
        }

        match date.and_then(|d| d.and_hms_opt(hour, minute, second)) {
            Some(datetime) if invalid.is_empty() => Ok(Self(datetime)),
            _ => Err(OrmError::InvalidTimestamp {
                value: format!(
                    "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                    year, month, day, hour, minute, second
                ),
                reason: format!("invalid {}", invalid.join(", ")),
            }),
        }
    }

    /// The Unix epoch, `1970-01-01 00:00:00`.
    pub fn epoch() -> Self {
        Self::default()
    }

    /// Wraps a chrono value, applying the same range checks as [`Timestamp::new`].
    pub fn from_naive(datetime: NaiveDateTime) -> Result<Self, OrmError> {
        Self::new(
            datetime.year(),
            datetime.month(),
            datetime.day(),
            datetime.hour(),
            datetime.minute(),
            datetime.second(),
        )
    }

    /// Returns the underlying chrono value.
    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = OrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT).map_err(|e| {
            OrmError::InvalidTimestamp {
                value: s.to_string(),
                reason: e.to_string(),
            }
        })?;
        Self::from_naive(parsed)
    }
}
