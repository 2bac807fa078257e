//! Date coercion used by the date/time filter handler.
//!
//! The handler never parses dates itself. It asks a [`DateParser`] to turn an arbitrary
//! [`Value`] into a UTC timestamp and serializes the result with [`to_iso8601`].

use bigdecimal::ToPrimitive;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::value::Value;
pub use crate::value::to_iso8601;

/// Coerces date-like values into UTC timestamps.
pub trait DateParser: Send + Sync {
    /// Returns `None` when the value cannot be read as a date.
    fn parse(&self, value: &Value) -> Option<DateTime<Utc>>;
}

/// Default parser backed by `chrono`.
///
/// Accepts timestamps, calendar dates (midnight UTC), numbers as milliseconds since the Unix
/// epoch, and strings in RFC 3339, RFC 2822 or the common ISO-8601 forms (minute precision,
/// offsets with or without a colon). Forms without an offset are read as UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct Iso8601DateParser;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

impl Iso8601DateParser {
    fn parse_str(s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Some(dt) = OFFSET_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
            .or_else(|| DateTime::parse_from_rfc2822(s).ok())
        {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|dt| dt.and_utc())
    }
}

impl DateParser for Iso8601DateParser {
    fn parse(&self, value: &Value) -> Option<DateTime<Utc>> {
        match value {
            Value::DateTime(dt) => Some(*dt),
            Value::Date(d) => d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()),
            Value::Number(n) => n.to_i64().and_then(DateTime::from_timestamp_millis),
            Value::String(s) => Self::parse_str(s),
            Value::Null | Value::Bool(_) | Value::Uuid(_) | Value::Time(_) => None,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn iso(value: impl Into<Value>) -> Option<String> {
        Iso8601DateParser
            .parse(&value.into())
            .map(|dt| to_iso8601(&dt))
    }

    #[test]
    fn test_date_only_string_is_midnight_utc() {
        assert_eq!(iso("2024-01-01").as_deref(), Some("2024-01-01T00:00:00.000Z"));
    }

    #[test]
    fn test_rfc3339_with_offset_is_normalized() {
        assert_eq!(
            iso("2024-06-15T12:30:00+02:00").as_deref(),
            Some("2024-06-15T10:30:00.000Z")
        );
        assert_eq!(
            iso("2024-06-15T12:30:00.25Z").as_deref(),
            Some("2024-06-15T12:30:00.250Z")
        );
        assert_eq!(
            iso("2024-01-01T10:00Z").as_deref(),
            Some("2024-01-01T10:00:00.000Z")
        );
        assert_eq!(
            iso("2024-01-01T10:00+02:00").as_deref(),
            Some("2024-01-01T08:00:00.000Z")
        );
        assert_eq!(
            iso("2024-01-01T10:00:30+0200").as_deref(),
            Some("2024-01-01T08:00:30.000Z")
        );
        assert_eq!(
            iso("2024-01-01T10:00:30.5-0130").as_deref(),
            Some("2024-01-01T11:30:30.500Z")
        );
    }

    #[test]
    fn test_rfc2822() {
        assert_eq!(
            iso("Mon, 01 Jan 2024 10:00:00 +0200").as_deref(),
            Some("2024-01-01T08:00:00.000Z")
        );
        assert_eq!(
            iso("Tue, 1 Jul 2003 10:52:37 GMT").as_deref(),
            Some("2003-07-01T10:52:37.000Z")
        );
    }

    #[test]
    fn test_local_forms_read_as_utc() {
        assert_eq!(
            iso("2024-06-15T12:30:45").as_deref(),
            Some("2024-06-15T12:30:45.000Z")
        );
        assert_eq!(
            iso("2024-06-15 08:00").as_deref(),
            Some("2024-06-15T08:00:00.000Z")
        );
    }

    #[test]
    fn test_epoch_millis() {
        assert_eq!(iso(0).as_deref(), Some("1970-01-01T00:00:00.000Z"));
        assert_eq!(
            iso(1_700_000_000_123_i64).as_deref(),
            Some("2023-11-14T22:13:20.123Z")
        );
    }

    #[test]
    fn test_native_dates() {
        let d = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        assert_eq!(iso(d).as_deref(), Some("2020-02-29T00:00:00.000Z"));
    }

    #[test]
    fn test_rejects_non_dates() {
        assert_eq!(iso("not a date"), None);
        assert_eq!(iso(""), None);
        assert_eq!(iso("2024-13-01"), None);
        assert_eq!(iso(true), None);
        assert_eq!(Iso8601DateParser.parse(&Value::Null), None);
    }
}
