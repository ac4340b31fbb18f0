//! Date normalization at the input boundary.
//!
//! Employee records come from a document store that has written dates in
//! several shapes over time: plain `YYYY-MM-DD` strings, RFC 3339 timestamps,
//! epoch milliseconds, and timestamp objects with `seconds`/`nanoseconds`.
//! Everything is collapsed to a [`NaiveDate`] here, before any computation.
//! Timestamps take their UTC calendar date.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    Millis(i64),
    Timestamp {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds")]
        nanoseconds: u32,
    },
}

impl RawDate {
    fn into_date(self) -> Result<NaiveDate, String> {
        match self {
            RawDate::Text(text) => parse_date_text(&text),
            RawDate::Millis(millis) => DateTime::<Utc>::from_timestamp_millis(millis)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| format!("timestamp {} ms is out of range", millis)),
            RawDate::Timestamp {
                seconds,
                nanoseconds,
            } => DateTime::<Utc>::from_timestamp(seconds, nanoseconds)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| format!("timestamp {}s is out of range", seconds)),
        }
    }
}

/// Parses a date written either as `YYYY-MM-DD` or as an RFC 3339 timestamp.
///
/// # Example
///
/// ```
/// use payroll_engine::models::parse_date_text;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
/// assert_eq!(parse_date_text("2025-03-15").unwrap(), expected);
/// assert_eq!(parse_date_text("2025-03-15T03:00:00.000Z").unwrap(), expected);
/// assert!(parse_date_text("15/03/2025").is_err());
/// ```
pub fn parse_date_text(text: &str) -> Result<NaiveDate, String> {
    let trimmed = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| format!("unrecognised date '{}'", trimmed))
}

/// Deserializes a required date from any supported representation.
pub fn flexible_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    RawDate::deserialize(deserializer)?
        .into_date()
        .map_err(serde::de::Error::custom)
}

/// Deserializes an optional date; `null`, a missing field and an empty
/// string all become `None`.
pub fn flexible_date_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawDate>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawDate::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(raw) => raw.into_date().map(Some).map_err(serde::de::Error::custom),
    }
}
