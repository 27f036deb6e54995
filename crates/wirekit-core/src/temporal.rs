//! # Temporal Conversions — ISO-8601 Strings and Epoch Timestamps
//!
//! Two independent, non-interchangeable codecs for date-times:
//!
//! - [`DateTimeIsoConv`] encodes `DateTime<FixedOffset>` as an ISO-8601
//!   string. Output is RFC 3339 with `Z` for UTC and the shortest
//!   fractional-second precision that is exact. Input may carry any
//!   offset; an offset-less timestamp is interpreted as UTC.
//! - [`DateTimeTimestampConv`] encodes `DateTime<Utc>` as floating-point
//!   seconds since the Unix epoch, at microsecond precision.
//!
//! The ISO schema carries [`ISO_DATETIME_PATTERN`]: date, time, optional
//! fractional seconds and an optional `Z`/offset suffix.

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, Utc};

use crate::conversion::Conversion;
use crate::error::ConversionError;
use crate::value::{Json, JsonKind};

/// Validation pattern for ISO-8601 date-time strings.
pub const ISO_DATETIME_PATTERN: &str = r"^(-?(?:[1-9][0-9]*)?[0-9]{4})-(1[0-2]|0[1-9])-(3[01]|0[1-9]|[12][0-9])T(2[0-3]|[01][0-9]):([0-5][0-9]):([0-5][0-9])(\.[0-9]+)?(Z|[+-](?:2[0-3]|[01][0-9]):[0-5][0-9])?$";

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// `DateTime<FixedOffset>` ⇄ ISO-8601 string.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeIsoConv;

/// Shorthand for [`DateTimeIsoConv`].
pub fn datetime_iso_format_conv() -> DateTimeIsoConv {
    DateTimeIsoConv
}

impl Conversion for DateTimeIsoConv {
    type Value = DateTime<FixedOffset>;

    fn to_json(&self, value: &DateTime<FixedOffset>) -> Result<Json, ConversionError> {
        Ok(Json::String(
            value.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        ))
    }

    fn from_json(&self, json: &Json) -> Result<DateTime<FixedOffset>, ConversionError> {
        let s = json
            .as_str()
            .ok_or_else(|| ConversionError::type_mismatch(JsonKind::String, json))?;
        parse_iso(s)
    }

    fn schema(&self) -> Json {
        serde_json::json!({
            "type": "string",
            "pattern": ISO_DATETIME_PATTERN,
        })
    }
}

/// Parse an RFC 3339 timestamp, falling back to an offset-less one (UTC).
fn parse_iso(s: &str) -> Result<DateTime<FixedOffset>, ConversionError> {
    if !within_pattern(s) {
        return Err(ConversionError::Invalid {
            message: format!("invalid ISO-8601 date-time {s:?}: expected {ISO_DATETIME_PATTERN}"),
        });
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }
    NaiveDateTime::parse_from_str(s, NAIVE_FORMAT)
        .map(|naive| naive.and_utc().fixed_offset())
        .map_err(|e| ConversionError::Invalid {
            message: format!("invalid ISO-8601 date-time {s:?}: {e}"),
        })
}

/// Rejects what chrono tolerates but [`ISO_DATETIME_PATTERN`] does not:
/// a space or lowercase `t` separator, a lowercase `z` and leap second `60`.
fn within_pattern(s: &str) -> bool {
    if !s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'-' | b'+' | b':' | b'.' | b'T' | b'Z'))
    {
        return false;
    }
    // Seconds sit at `Thh:mm:ss`.
    match s.find('T') {
        Some(t) => s.as_bytes().get(t + 7).is_some_and(|b| *b != b'6'),
        None => false,
    }
}

/// `DateTime<Utc>` ⇄ floating-point epoch seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeTimestampConv;

/// Shorthand for [`DateTimeTimestampConv`].
pub fn datetime_timestamp_conv() -> DateTimeTimestampConv {
    DateTimeTimestampConv
}

impl Conversion for DateTimeTimestampConv {
    type Value = DateTime<Utc>;

    fn to_json(&self, value: &DateTime<Utc>) -> Result<Json, ConversionError> {
        let secs = value.timestamp_micros() as f64 / MICROS_PER_SECOND;
        serde_json::Number::from_f64(secs)
            .map(Json::Number)
            .ok_or_else(|| ConversionError::TypeMismatch {
                expected: JsonKind::Number.to_string(),
                found: value.to_string(),
            })
    }

    fn from_json(&self, json: &Json) -> Result<DateTime<Utc>, ConversionError> {
        let secs = json
            .as_f64()
            .ok_or_else(|| ConversionError::type_mismatch(JsonKind::Number, json))?;
        from_epoch_seconds(secs).ok_or_else(|| ConversionError::Invalid {
            message: format!("epoch timestamp {secs} is out of range"),
        })
    }

    fn schema(&self) -> Json {
        JsonKind::Number.schema()
    }
}

fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
    let micros = (secs * MICROS_PER_SECOND).round();
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return None;
    }
    let micros = micros as i64;
    let whole = micros.div_euclid(1_000_000);
    let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
    DateTime::from_timestamp(whole, nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use serde_json::json;

    #[test]
    fn test_iso_utc_uses_z_suffix() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap().fixed_offset();
        assert_eq!(
            datetime_iso_format_conv().to_json(&dt).unwrap(),
            json!("2026-01-15T12:00:00Z")
        );
    }

    #[test]
    fn test_iso_roundtrip_keeps_offset_and_fraction() {
        let conv = datetime_iso_format_conv();
        let parsed = conv.from_json(&json!("2026-01-15T17:00:00.123456+05:00")).unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 5 * 3600);
        assert_eq!(parsed.nanosecond(), 123_456_000);
        assert_eq!(
            conv.to_json(&parsed).unwrap(),
            json!("2026-01-15T17:00:00.123456+05:00")
        );
        assert_eq!(conv.from_json(&conv.to_json(&parsed).unwrap()).unwrap(), parsed);
    }

    #[test]
    fn test_iso_naive_input_is_utc() {
        let parsed = datetime_iso_format_conv()
            .from_json(&json!("2021-09-29T10:30:51.500"))
            .unwrap();
        let expected = Utc.with_ymd_and_hms(2021, 9, 29, 10, 30, 51).unwrap()
            + chrono::Duration::milliseconds(500);
        assert_eq!(parsed, expected.fixed_offset());
    }

    #[test]
    fn test_iso_rejects_garbage() {
        let conv = datetime_iso_format_conv();
        assert!(matches!(
            conv.from_json(&json!("not-a-date")).unwrap_err(),
            ConversionError::Invalid { .. }
        ));
        assert!(matches!(
            conv.from_json(&json!(1632911451)).unwrap_err(),
            ConversionError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_iso_input_outside_schema_pattern_is_rejected() {
        let conv = datetime_iso_format_conv();
        for input in [
            "2021-09-29 10:30:51Z",
            "2021-09-29t10:30:51Z",
            "2021-09-29T10:30:51z",
            "2021-09-29T23:59:60Z",
            "2021-09-29",
        ] {
            let err = conv.from_json(&json!(input)).unwrap_err();
            assert!(
                matches!(err, ConversionError::Invalid { .. }),
                "{input} should be rejected"
            );
        }
        assert!(conv.from_json(&json!("2021-09-29T10:30:51Z")).is_ok());
        assert!(conv.from_json(&json!("2021-09-29T10:30:51-03:30")).is_ok());
    }

    #[test]
    fn test_iso_schema_pattern() {
        let schema = datetime_iso_format_conv().schema();
        assert_eq!(schema["type"], "string");
        assert_eq!(schema["pattern"], ISO_DATETIME_PATTERN);
    }

    #[test]
    fn test_timestamp_roundtrip() {
        let conv = datetime_timestamp_conv();
        let dt = Utc.with_ymd_and_hms(2021, 9, 29, 10, 30, 51).unwrap()
            + chrono::Duration::microseconds(250_000);
        let json = conv.to_json(&dt).unwrap();
        assert_eq!(json, json!(1632911451.25));
        assert_eq!(conv.from_json(&json).unwrap(), dt);
    }

    #[test]
    fn test_timestamp_accepts_integer_seconds() {
        let dt = datetime_timestamp_conv().from_json(&json!(0)).unwrap();
        assert_eq!(dt.timestamp(), 0);
        assert_eq!(dt.nanosecond(), 0);
    }

    #[test]
    fn test_timestamp_before_epoch() {
        let dt = datetime_timestamp_conv().from_json(&json!(-1.5)).unwrap();
        assert_eq!(dt.timestamp(), -2);
        assert_eq!(dt.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_timestamp_rejects_string_and_out_of_range() {
        let conv = datetime_timestamp_conv();
        assert!(conv.from_json(&json!("1632911451")).is_err());
        assert!(conv.from_json(&json!(1e300)).is_err());
        assert_eq!(conv.schema(), json!({"type": "number"}));
    }
}
