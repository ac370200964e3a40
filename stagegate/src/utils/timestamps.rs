//! Timestamp parsing for date-comparable rule values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use thiserror::Error;

/// A UTC instant.
pub type Timestamp = DateTime<Utc>;

/// Errors that can occur during timestamp parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimestampError {
    /// The timestamp string is empty.
    #[error("Empty timestamp string")]
    EmptyString,

    /// The timestamp value is invalid.
    #[error("Invalid timestamp: {0}")]
    InvalidFormat(String),
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 4] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y", // October 5, 2023
    "%b %d, %Y", // Oct 5, 2023
];

/// Returns the current UTC time as an ISO 8601 string with microseconds.
#[must_use]
pub fn iso_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f+00:00").to_string()
}

/// Parses a timestamp string.
///
/// Supports, in order:
/// - RFC 3339 (`2024-03-15T12:00:00Z`, `2024-03-15T12:00:00+02:00`)
/// - naive ISO datetimes, read as UTC
/// - dates (`2024-03-15`, `2024/03/15`, `March 15, 2024`), at midnight UTC
/// - integer Unix timestamps in seconds or milliseconds
pub fn parse_timestamp(input: &str) -> Result<Timestamp, TimestampError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TimestampError::EmptyString);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
        }
    }

    if let Ok(n) = trimmed.parse::<i64>() {
        return parse_unix_timestamp(n);
    }

    Err(TimestampError::InvalidFormat(trimmed.to_string()))
}

/// Parses a Unix timestamp; values above 10 digits are read as milliseconds.
pub fn parse_unix_timestamp(value: i64) -> Result<Timestamp, TimestampError> {
    let parsed = if value.abs() >= 10_000_000_000 {
        Utc.timestamp_millis_opt(value).single()
    } else {
        Utc.timestamp_opt(value, 0).single()
    };
    parsed.ok_or_else(|| TimestampError::InvalidFormat(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let dt = parse_timestamp("2023-10-05T14:30:00+02:00").unwrap();
        assert_eq!(dt.hour(), 12);
        assert_eq!(dt.day(), 5);
    }

    #[test]
    fn test_parse_zulu() {
        let dt = parse_timestamp("2023-10-05T14:30:00Z").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2023, 10, 5));
    }

    #[test]
    fn test_parse_naive_and_date_only() {
        let dt = parse_timestamp("2023-10-05 08:00:00").unwrap();
        assert_eq!(dt.hour(), 8);

        let dt = parse_timestamp("2023-10-05").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (0, 0));

        let dt = parse_timestamp("October 5, 2023").unwrap();
        assert_eq!(dt.month(), 10);
    }

    #[test]
    fn test_parse_unix_seconds_and_millis() {
        assert_eq!(parse_timestamp("1696512000").unwrap().year(), 2023);
        assert_eq!(parse_timestamp("1696512000000").unwrap().year(), 2023);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_timestamp("  "), Err(TimestampError::EmptyString));
        assert!(matches!(
            parse_timestamp("next tuesday"),
            Err(TimestampError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_iso_timestamp_format() {
        let ts = iso_timestamp();
        assert!(ts.contains('T'));
        assert!(ts.ends_with("+00:00"));
    }
}
