//! Runtime value types read out of records.
//!
//! A [`Value`] is what a [`Record`](crate::Record) hands back for a named
//! field. Records decoded from JSON carry timestamps as strings, so the
//! conversions here ([`Value::timestamp`], [`Value::number`]) parse lazily and
//! return `None` instead of failing.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Field value borrowed from a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Numeric value.
    Number(Number),
    /// Instant, in milliseconds since the Unix epoch.
    Timestamp(Timestamp),
    /// Boolean value.
    Bool(bool),
    /// Field not present, null, or not a scalar.
    None,
}

impl<'a> Value<'a> {
    /// Converts a JSON value into a field value.
    ///
    /// Arrays, objects and `null` are not scalars and map to [`Value::None`].
    pub fn from_json(value: &'a serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Number(Number::I64(i))
                } else if let Some(u) = n.as_u64() {
                    Value::Number(Number::U64(u))
                } else {
                    n.as_f64()
                        .map(|f| Value::Number(Number::F64(f)))
                        .unwrap_or(Value::None)
                }
            }
            _ => Value::None,
        }
    }

    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The searchable/displayable text of this value.
    ///
    /// Strings are borrowed; numbers, booleans and timestamps are formatted.
    pub fn text(&self) -> Option<Cow<'a, str>> {
        match self {
            Value::String(s) => Some(Cow::Borrowed(s)),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Timestamp(t) => Some(Cow::Owned(t.to_string())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            Value::None => None,
        }
    }

    /// Reads this value as a number, parsing strings.
    pub fn number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(s) => Number::parse(s),
            Value::Timestamp(t) => Some(Number::I64(t.as_millis())),
            _ => None,
        }
    }

    /// Reads this value as an instant.
    ///
    /// Strings go through [`Timestamp::parse`]; numbers are taken as epoch
    /// milliseconds. Anything else, including malformed text, yields `None`.
    pub fn timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            Value::String(s) => Timestamp::parse(s),
            Value::Number(Number::I64(n)) => Some(Timestamp(*n)),
            Value::Number(Number::U64(n)) => i64::try_from(*n).ok().map(Timestamp),
            Value::Number(Number::F64(f)) if f.is_finite() => Some(Timestamp(*f as i64)),
            _ => None,
        }
    }
}

/// Numeric value.
///
/// Integers keep their precision; mixed comparisons go through `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Parses decimal text. Non-finite floats are rejected.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(n) = text.parse::<i64>() {
            return Some(Number::I64(n));
        }
        if let Ok(n) = text.parse::<u64>() {
            return Some(Number::U64(n));
        }
        text.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Number::F64)
    }

    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed types.
    ///
    /// Returns `None` only when a NaN is involved.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F64(n) => write!(f, "{n}"),
        }
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::I64(n as i64)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::I64(n)
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Number::U64(n as u64)
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::U64(n)
    }
}

impl From<usize> for Number {
    fn from(n: usize) -> Self {
        Number::U64(n as u64)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::F64(n)
    }
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Instant in milliseconds since the Unix epoch.
///
/// Timezone-agnostic; naive inputs are read as UTC.
///
/// ```
/// use viewdeck_seeker::Timestamp;
///
/// let ts = Timestamp::parse("2024-03-01T12:00:00Z").unwrap();
/// assert_eq!(ts, Timestamp::parse("2024-03-01 12:00:00").unwrap());
/// assert!(Timestamp::parse("not a date").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Epoch, used as the sort position of unparseable timestamps.
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Midnight UTC at the start of `date`.
    pub fn start_of_day(date: NaiveDate) -> Self {
        Timestamp(date.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
    }

    /// Parses an ISO-8601 timestamp.
    ///
    /// Accepts RFC 3339 with an offset, naive date-times (read as UTC) and
    /// bare `YYYY-MM-DD` dates (UTC midnight).
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(Timestamp(dt.timestamp_millis()));
        }
        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
                return Some(Timestamp(naive.and_utc().timestamp_millis()));
            }
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .map(Timestamp::start_of_day)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::<Utc>::from_timestamp_millis(self.0) {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            None => write!(f, "{}", self.0),
        }
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_scalars() {
        let s = json!("open");
        let n = json!(42);
        let f = json!(1.5);
        let b = json!(true);
        let null = json!(null);
        let arr = json!([1, 2]);

        assert_eq!(Value::from_json(&s), Value::String("open"));
        assert_eq!(Value::from_json(&n), Value::Number(Number::I64(42)));
        assert_eq!(Value::from_json(&f), Value::Number(Number::F64(1.5)));
        assert_eq!(Value::from_json(&b), Value::Bool(true));
        assert!(Value::from_json(&null).is_none());
        assert!(Value::from_json(&arr).is_none());
    }

    #[test]
    fn text_formats_non_strings() {
        assert_eq!(Value::String("a").text().as_deref(), Some("a"));
        assert_eq!(Value::Number(Number::I64(7)).text().as_deref(), Some("7"));
        assert_eq!(Value::Bool(false).text().as_deref(), Some("false"));
        assert_eq!(Value::None.text(), None);
    }

    #[test]
    fn number_parse() {
        assert_eq!(Number::parse("12"), Some(Number::I64(12)));
        assert_eq!(Number::parse(" -3 "), Some(Number::I64(-3)));
        assert_eq!(
            Number::parse("18446744073709551615"),
            Some(Number::U64(u64::MAX))
        );
        assert_eq!(Number::parse("2.5"), Some(Number::F64(2.5)));
        assert_eq!(Number::parse("NaN"), None);
        assert_eq!(Number::parse("inf"), None);
        assert_eq!(Number::parse("twelve"), None);
    }

    #[test]
    fn number_comparisons_mixed_types() {
        assert_eq!(
            Number::I64(5).compare(Number::U64(10)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Number::I64(5).compare(Number::F64(5.0)),
            Some(Ordering::Equal)
        );
        assert_eq!(Number::F64(f64::NAN).compare(Number::F64(1.0)), None);
    }

    #[test]
    fn timestamp_parse_formats() {
        let midnight = Timestamp::parse("2024-01-05").unwrap();
        assert_eq!(midnight.as_millis(), 1_704_412_800_000);

        assert_eq!(Timestamp::parse("2024-01-05T00:00:00Z"), Some(midnight));
        assert_eq!(Timestamp::parse("2024-01-05T00:00:00.000"), Some(midnight));
        assert_eq!(Timestamp::parse("2024-01-05 00:00"), Some(midnight));
        assert_eq!(
            Timestamp::parse("2024-01-05T02:00:00+02:00"),
            Some(midnight)
        );
        assert_eq!(
            Timestamp::parse("2024-01-05T00:00:00.250Z").map(Timestamp::as_millis),
            Some(1_704_412_800_250)
        );
    }

    #[test]
    fn timestamp_parse_rejects_garbage() {
        assert_eq!(Timestamp::parse(""), None);
        assert_eq!(Timestamp::parse("   "), None);
        assert_eq!(Timestamp::parse("yesterday"), None);
        assert_eq!(Timestamp::parse("2024-13-01"), None);
        assert_eq!(Timestamp::parse("2024-02-30"), None);
    }

    #[test]
    fn value_timestamp_conversions() {
        assert_eq!(
            Value::Number(Number::I64(1000)).timestamp(),
            Some(Timestamp(1000))
        );
        assert_eq!(
            Value::String("1970-01-01T00:00:01Z").timestamp(),
            Some(Timestamp(1000))
        );
        assert_eq!(Value::String("soon").timestamp(), None);
        assert_eq!(Value::Bool(true).timestamp(), None);
        assert_eq!(Value::None.timestamp(), None);
    }

    #[test]
    fn timestamp_display() {
        assert_eq!(Timestamp(0).to_string(), "1970-01-01T00:00:00.000Z");
    }
}
