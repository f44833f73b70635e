//! SQL value types for row rendering.
//!
//! Every fetched column is converted into one [`SqlValue`] variant so that
//! rendering can switch on a closed set of tags instead of inspecting driver
//! types.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;

/// A single fetched column value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL of any column type.
    Null,

    /// Boolean value.
    Bool(bool),

    /// Integer value (smallint/int/bigint/oid).
    Int(i64),

    /// Floating point value (real/double precision).
    Float(f64),

    /// Exact numeric value (numeric/decimal).
    Decimal(Decimal),

    /// Text value. UUID and JSON columns are carried as text too.
    Text(String),

    /// Point in time, normalized to UTC.
    Timestamp(DateTime<Utc>),
}

impl SqlValue {
    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// The timestamp carried by this value, if it is one.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            SqlValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Short type tag used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Bool(_) => "bool",
            SqlValue::Int(_) => "int",
            SqlValue::Float(_) => "float",
            SqlValue::Decimal(_) => "decimal",
            SqlValue::Text(_) => "text",
            SqlValue::Timestamp(_) => "timestamp",
        }
    }

    /// Render the value for a front-matter header line.
    ///
    /// Text is double-quoted with inner double quotes backslash-escaped;
    /// everything else uses the plain [`Display`](fmt::Display) form.
    #[must_use]
    pub fn header_value(&self) -> String {
        match self {
            SqlValue::Text(s) => format!("\"{}\"", s.replace('"', "\\\"")),
            other => other.to_string(),
        }
    }
}

/// Plain rendering, used for file names, content bodies and non-text header
/// values.
impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("null"),
            SqlValue::Bool(v) => write!(f, "{}", v),
            SqlValue::Int(v) => write!(f, "{}", v),
            SqlValue::Float(v) => write!(f, "{}", v),
            SqlValue::Decimal(v) => write!(f, "{}", v),
            SqlValue::Text(v) => f.write_str(v),
            SqlValue::Timestamp(v) => f.write_str(&v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}

/// One fetched row, aligned with the column mapping.
pub type Row = Vec<SqlValue>;

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i16> for SqlValue {
    fn from(v: i16) -> Self {
        SqlValue::Int(v.into())
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v.into())
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<u32> for SqlValue {
    fn from(v: u32) -> Self {
        SqlValue::Int(v.into())
    }
}

/// Widening keeps the `real` value's shortest decimal form, so `0.1f32`
/// renders as `0.1` rather than `0.10000000149011612`.
impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        SqlValue::Float(v.to_string().parse().unwrap_or_else(|_| v.into()))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Decimal(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(v)
    }
}

/// Timestamps without time zone are taken to be UTC.
impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::Timestamp(v.and_utc())
    }
}

/// Dates become midnight UTC of that day.
impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Timestamp(v.and_time(chrono::NaiveTime::MIN).and_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn test_header_value_quotes_text() {
        assert_eq!(SqlValue::from("Hello World!").header_value(), "\"Hello World!\"");
    }

    #[test]
    fn test_header_value_escapes_double_quotes() {
        let v = SqlValue::from(r#"The "best" post"#);
        assert_eq!(v.header_value(), r#""The \"best\" post""#);
    }

    #[test]
    fn test_header_value_leaves_non_text_unquoted() {
        assert_eq!(SqlValue::Int(42).header_value(), "42");
        assert_eq!(SqlValue::Float(1.5).header_value(), "1.5");
        assert_eq!(SqlValue::Bool(true).header_value(), "true");
        assert_eq!(
            SqlValue::Decimal(Decimal::from_str("12.50").unwrap()).header_value(),
            "12.50"
        );
    }

    #[test]
    fn test_timestamp_renders_rfc3339_utc() {
        let ts = Utc.with_ymd_and_hms(2021, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(SqlValue::Timestamp(ts).to_string(), "2021-05-01T00:00:00Z");

        let with_millis = ts + chrono::Duration::milliseconds(250);
        assert_eq!(
            SqlValue::Timestamp(with_millis).to_string(),
            "2021-05-01T00:00:00.250Z"
        );
    }

    #[test]
    fn test_real_renders_shortest_form() {
        assert_eq!(SqlValue::from(0.1f32).header_value(), "0.1");
        assert_eq!(SqlValue::from(2.5f32).to_string(), "2.5");
        assert_eq!(SqlValue::from(-1e-7f32).to_string(), "-0.0000001");
        assert_eq!(SqlValue::from(f32::INFINITY).to_string(), "inf");
    }

    #[test]
    fn test_display_text_is_unquoted() {
        assert_eq!(SqlValue::from(r#"say "hi""#).to_string(), r#"say "hi""#);
    }

    #[test]
    fn test_naive_values_normalize_to_utc() {
        let date = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        let expected = Utc.with_ymd_and_hms(2020, 2, 29, 0, 0, 0).unwrap();
        assert_eq!(SqlValue::from(date), SqlValue::Timestamp(expected));

        let naive = date.and_hms_opt(13, 30, 0).unwrap();
        assert_eq!(
            SqlValue::from(naive).as_timestamp(),
            Some(Utc.with_ymd_and_hms(2020, 2, 29, 13, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_option_conversion() {
        assert!(SqlValue::from(None::<i32>).is_null());
        assert_eq!(SqlValue::from(Some(7i32)), SqlValue::Int(7));
        assert!(!SqlValue::Int(0).is_null());
    }

    #[test]
    fn test_type_name() {
        assert_eq!(SqlValue::Null.type_name(), "null");
        assert_eq!(SqlValue::from("x").type_name(), "text");
    }
}
