//! Date values accepted by the engine.

use chrono::{DateTime, FixedOffset, Utc};

use crate::error::{ProrationError, Result};

/// A value supplied where the engine expects a date.
///
/// Integers are not dates. They are accepted so that callers holding a
/// "zero date" can still build a `Proration`, which then never prorates.
#[derive(Debug, Clone, PartialEq)]
pub enum DateInput {
    Text(String),
    Instant(DateTime<FixedOffset>),
    Integer(i64),
}

impl DateInput {
    /// Resolve to an instant. `Ok(None)` means a non-date value.
    pub fn resolve(&self) -> Result<Option<DateTime<FixedOffset>>> {
        match self {
            DateInput::Text(text) => parse_date(text).map(Some),
            DateInput::Instant(instant) => Ok(Some(*instant)),
            DateInput::Integer(_) => Ok(None),
        }
    }
}

/// Parse an ISO-8601 date-time carrying an explicit UTC offset.
pub fn parse_date(input: &str) -> Result<DateTime<FixedOffset>> {
    let trimmed = input.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%z"))
        .or_else(|_| DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%z"))
        .map_err(|source| ProrationError::DateParse {
            input: input.to_string(),
            source,
        })
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        DateInput::Text(value.to_string())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        DateInput::Text(value)
    }
}

impl From<DateTime<FixedOffset>> for DateInput {
    fn from(value: DateTime<FixedOffset>) -> Self {
        DateInput::Instant(value)
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(value: DateTime<Utc>) -> Self {
        DateInput::Instant(DateTime::<FixedOffset>::from(value))
    }
}

impl From<i64> for DateInput {
    fn from(value: i64) -> Self {
        DateInput::Integer(value)
    }
}
