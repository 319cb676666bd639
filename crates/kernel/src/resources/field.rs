//! Field descriptors and typed filter values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Date formats accepted in query strings, tried in order.
///
/// `DD-MM-YYYY` is the format used by the sample data set; ISO dates are
/// accepted as well so that values echoed back by the API can be reused.
const DATE_FORMATS: &[&str] = &["%d-%m-%Y", "%Y-%m-%d"];

/// Date-time formats accepted in addition to RFC 3339.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Declared type of a resource field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Integer,
    Decimal,
    Text,
    Date,
    DateTime,
    Boolean,
}

impl FieldType {
    /// Coerce a raw query-string value into a typed value.
    ///
    /// Returns `None` when the value does not parse as this type.
    pub fn coerce(self, raw: &str) -> Option<FieldValue> {
        let trimmed = raw.trim();
        match self {
            FieldType::Integer => trimmed.parse().ok().map(FieldValue::Integer),
            FieldType::Decimal => trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(FieldValue::Decimal),
            FieldType::Text => Some(FieldValue::Text(raw.to_string())),
            FieldType::Date => parse_date(trimmed).map(FieldValue::Date),
            FieldType::DateTime => parse_datetime(trimmed).map(FieldValue::DateTime),
            FieldType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "1" => Some(FieldValue::Boolean(true)),
                "false" | "0" => Some(FieldValue::Boolean(false)),
                _ => None,
            },
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        // A bare date means midnight, so `created[gte]=01-01-2020` works.
        .or_else(|| parse_date(raw).map(|d| d.and_time(NaiveTime::MIN)))
}

/// A declared field of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Column name, also the name used in query parameters.
    pub name: &'static str,

    /// Declared type, drives the default coercion.
    pub field_type: FieldType,

    /// Hidden fields (credentials) are never selected, filtered or sorted.
    pub hidden: bool,
}

impl FieldDef {
    /// A visible field.
    pub const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            hidden: false,
        }
    }

    /// A field that exists in storage but is never exposed through listings.
    pub const fn hidden(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            hidden: true,
        }
    }
}

/// A coerced value ready to be compared against a column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Decimal(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Boolean(bool),
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn integer_coercion() {
        assert_eq!(
            FieldType::Integer.coerce("42"),
            Some(FieldValue::Integer(42))
        );
        assert_eq!(
            FieldType::Integer.coerce(" 7 "),
            Some(FieldValue::Integer(7))
        );
        assert_eq!(FieldType::Integer.coerce("4.2"), None);
        assert_eq!(FieldType::Integer.coerce("abc"), None);
    }

    #[test]
    fn decimal_rejects_non_finite() {
        assert_eq!(
            FieldType::Decimal.coerce("1200.50"),
            Some(FieldValue::Decimal(1200.5))
        );
        assert_eq!(FieldType::Decimal.coerce("NaN"), None);
        assert_eq!(FieldType::Decimal.coerce("inf"), None);
    }

    #[test]
    fn text_keeps_raw_value() {
        assert_eq!(
            FieldType::Text.coerce(" Kowalski "),
            Some(FieldValue::Text(" Kowalski ".to_string()))
        );
    }

    #[test]
    fn date_accepts_both_formats() {
        let expected = NaiveDate::from_ymd_opt(2020, 10, 26).unwrap();
        assert_eq!(
            FieldType::Date.coerce("26-10-2020"),
            Some(FieldValue::Date(expected))
        );
        assert_eq!(
            FieldType::Date.coerce("2020-10-26"),
            Some(FieldValue::Date(expected))
        );
        assert_eq!(FieldType::Date.coerce("2020/10/26"), None);
        assert_eq!(FieldType::Date.coerce("31-02-2020"), None);
    }

    #[test]
    fn datetime_formats() {
        let midnight = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            FieldType::DateTime.coerce("01-01-2020"),
            Some(FieldValue::DateTime(midnight))
        );
        assert_eq!(
            FieldType::DateTime.coerce("2020-01-01 00:00:00"),
            Some(FieldValue::DateTime(midnight))
        );
        assert_eq!(
            FieldType::DateTime.coerce("2020-01-01T01:00:00+01:00"),
            Some(FieldValue::DateTime(midnight))
        );
        assert_eq!(FieldType::DateTime.coerce("yesterday"), None);
    }

    #[test]
    fn boolean_coercion() {
        assert_eq!(
            FieldType::Boolean.coerce("TRUE"),
            Some(FieldValue::Boolean(true))
        );
        assert_eq!(
            FieldType::Boolean.coerce("0"),
            Some(FieldValue::Boolean(false))
        );
        assert_eq!(FieldType::Boolean.coerce("yes"), None);
    }
}
