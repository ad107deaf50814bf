//! Cache document codec.
//!
//! Values are stored as plain JSON. Timestamps are written as ISO-8601
//! strings and, on read, any string that looks like an ISO-8601 date-time is
//! parsed back into [`Value::DateTime`]. Parsing is best effort: a string that
//! matches the pattern but does not parse stays a string.

use chrono::{DateTime, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::CodecError;
use crate::value::Value;

lazy_static! {
    /// `YYYY-MM-DD[T ]HH:MM:SS[.frac][Z|±HH[:]MM]`
    static ref ISO_8601: Regex = Regex::new(
        r"^[0-9]{4}-[0-9]{2}-[0-9]{2}[T ][0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]+)?(Z|z|[+-][0-9]{2}:?[0-9]{2})?$"
    )
    .unwrap();
}

/// Encode a value as a JSON cache document.
pub fn encode(value: &Value) -> Result<String, CodecError> {
    Ok(serde_json::to_string(value)?)
}

/// Decode a JSON cache document, reviving timestamps.
pub fn decode(document: &str) -> Result<Value, CodecError> {
    let raw: serde_json::Value = serde_json::from_str(document)?;
    Ok(revive(raw))
}

/// Bring a live provider value into the shape [`decode`] yields for it, so a
/// response is identical whether it came from the provider or the cache.
pub fn normalize(value: Value) -> Value {
    match value {
        Value::String(s) => match parse_datetime(&s) {
            Some(dt) => Value::DateTime(dt),
            None => Value::String(s),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        Value::Object(map) => {
            Value::Object(map.into_iter().map(|(k, v)| (k, normalize(v))).collect())
        }
        other => other,
    }
}

fn revive(raw: serde_json::Value) -> Value {
    match raw {
        serde_json::Value::String(s) => match parse_datetime(&s) {
            Some(dt) => Value::DateTime(dt),
            None => Value::String(s),
        },
        serde_json::Value::Array(items) => Value::Array(items.into_iter().map(revive).collect()),
        serde_json::Value::Object(map) => {
            Value::Object(map.into_iter().map(|(k, v)| (k, revive(v))).collect())
        }
        other => Value::from(other),
    }
}

/// Parse an ISO-8601 date-time string. Strings without an offset are UTC.
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if !ISO_8601.is_match(s) {
        return None;
    }
    // Normalise the date/time separator so the RFC 3339 parser accepts it.
    let mut normalized = s.to_string();
    normalized.replace_range(10..11, "T");

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_encode_writes_iso_strings() {
        let dt = Utc.with_ymd_and_hms(2023, 11, 5, 8, 0, 0).unwrap();
        let mut map = crate::value::Map::new();
        map.insert("CreateDate".to_string(), Value::from(dt));
        let doc = encode(&Value::Object(map)).unwrap();
        assert_eq!(doc, r#"{"CreateDate":"2023-11-05T08:00:00Z"}"#);
    }

    #[test]
    fn test_decode_revives_nested_timestamps() {
        let doc = r#"{"Users":[{"UserName":"alice","CreateDate":"2020-01-02T03:04:05+00:00"}]}"#;
        let v = decode(doc).unwrap();
        let user = &v.get("Users").and_then(Value::as_array).unwrap()[0];
        assert_eq!(
            user.get("CreateDate").and_then(Value::as_datetime),
            Some(&Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap())
        );
        assert_eq!(user.get("UserName"), Some(&Value::from("alice")));
    }

    #[test]
    fn test_parse_datetime_variants() {
        let expected = Utc.with_ymd_and_hms(2021, 6, 7, 10, 0, 0).unwrap();
        assert_eq!(parse_datetime("2021-06-07T10:00:00Z"), Some(expected));
        assert_eq!(parse_datetime("2021-06-07 10:00:00"), Some(expected));
        assert_eq!(parse_datetime("2021-06-07T12:00:00+0200"), Some(expected));
        assert_eq!(parse_datetime("2021-06-07T12:00:00+02:00"), Some(expected));
        assert!(parse_datetime("2021-06-07T10:00:00.250Z").is_some());
    }

    #[test]
    fn test_parse_failures_leave_strings_alone() {
        // Matches the shape, but month 13 does not exist.
        let v = decode(r#"{"when":"2021-13-07T10:00:00Z","id":"i-0abc"}"#).unwrap();
        assert_eq!(v.get("when"), Some(&Value::from("2021-13-07T10:00:00Z")));
        assert_eq!(v.get("id"), Some(&Value::from("i-0abc")));
        assert_eq!(parse_datetime("2021-06-07"), None);
    }

    #[test]
    fn test_non_ascii_digits_are_not_timestamps() {
        // U+0661 ARABIC-INDIC DIGIT ONE is a Unicode digit but not an ASCII one.
        let tag = "2024-01-0\u{0661}T00:00:00Z";
        assert_eq!(parse_datetime(tag), None);
        let v = decode("{\"Tag\":\"2024-01-0\u{0661}T00:00:00Z\"}").unwrap();
        assert_eq!(v.get("Tag"), Some(&Value::from(tag)));
    }

    #[test]
    fn test_normalize_matches_decode() {
        let live = Value::from(json!({
            "Users": [{"CreateDate": "2019-05-01T10:00:00Z", "UserName": "ops"}],
            "Count": 1
        }));
        let stored = decode(&encode(&live).unwrap()).unwrap();
        assert_eq!(normalize(live), stored);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode("{not json"), Err(CodecError::Json(_))));
    }

    #[test]
    fn test_primitives_roundtrip() {
        let v = Value::from(json!({"n": 3, "f": 1.5, "b": false, "z": null}));
        assert_eq!(decode(&encode(&v).unwrap()).unwrap(), v);
    }
}
