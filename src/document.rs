use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde::Serialize;

use crate::error::HookError;
use crate::record::{Entry, FieldValue, Fields, ERROR_KEY};

/// Wire document written to the index, one per entry.
#[derive(Debug, Serialize)]
pub struct Document<'a> {
    pub host: &'a str,
    #[serde(rename = "@timestamp")]
    pub timestamp: String,
    pub message: &'a str,
    pub data: &'a Fields,
    pub level: String,
}

impl Document<'_> {
    /// Encode as a JSON body.
    pub fn to_vec(&self) -> Result<Vec<u8>, HookError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Build the wire document for `entry`.
///
/// The only side effect is on `entry.data`: an error stored under
/// [`ERROR_KEY`] is replaced by its message. Anything else under that key is
/// left as is. The level is not checked against the accepted set.
pub fn build_document<'a>(entry: &'a mut Entry, host: &'a str) -> Document<'a> {
    normalize_error(&mut entry.data);
    let entry: &'a Entry = entry;

    Document {
        host,
        timestamp: format_timestamp(&entry.time),
        message: &entry.message,
        data: &entry.data,
        level: entry.level.to_uppercase(),
    }
}

fn normalize_error(data: &mut Fields) {
    if let Some(value) = data.get_mut(ERROR_KEY) {
        if let FieldValue::Error(err) = value {
            let message = err.to_string();
            *value = FieldValue::from(message);
        }
    }
}

/// RFC 3339 in UTC with up to nanosecond precision. Trailing zeros of the
/// fraction are dropped, and the fraction is omitted when zero.
pub fn format_timestamp(time: &DateTime<FixedOffset>) -> String {
    let utc = time.with_timezone(&Utc);
    let mut out = utc.format("%Y-%m-%dT%H:%M:%S").to_string();

    // chrono encodes leap seconds as nanos >= 1e9
    let nanos = utc.nanosecond() % 1_000_000_000;
    if nanos > 0 {
        let fraction = format!("{:09}", nanos);
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out.push('Z');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CapturedError;
    use chrono::TimeZone;
    use serde_json::json;
    use std::io;

    fn entry_at(time: DateTime<FixedOffset>, level: &str) -> Entry {
        Entry::new(time, level, "disk almost full")
    }

    fn utc_time(nanos: u32) -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(2024, 3, 9, 17, 45, 12)
            .unwrap()
            .with_nanosecond(nanos)
            .unwrap()
            .fixed_offset()
    }

    #[test]
    fn error_under_reserved_key_becomes_its_message() {
        let mut entry = entry_at(utc_time(0), "error").with_field(
            ERROR_KEY,
            FieldValue::error(io::Error::new(io::ErrorKind::Other, "connection reset")),
        );

        let doc = build_document(&mut entry, "web-1");
        assert_eq!(doc.data[ERROR_KEY], FieldValue::from("connection reset"));
        drop(doc);

        // normalized in place
        assert_eq!(entry.data[ERROR_KEY], FieldValue::from("connection reset"));
    }

    #[test]
    fn non_error_under_reserved_key_passes_through() {
        let mut entry = entry_at(utc_time(0), "error")
            .with_field(ERROR_KEY, json!({"code": 17, "retry": false}));

        let doc = build_document(&mut entry, "web-1");
        assert_eq!(
            doc.data[ERROR_KEY].as_value(),
            Some(&json!({"code": 17, "retry": false}))
        );
    }

    #[test]
    fn errors_under_other_keys_are_not_rewritten() {
        let cause = FieldValue::error(CapturedError::capture(&io::Error::new(
            io::ErrorKind::Other,
            "upstream",
        )));
        let mut entry = entry_at(utc_time(0), "error").with_field("cause", cause.clone());

        let doc = build_document(&mut entry, "web-1");
        assert_eq!(doc.data["cause"], cause);
    }

    #[test]
    fn level_is_upper_cased() {
        for (input, expected) in [("warning", "WARNING"), ("info", "INFO"), ("Debug", "DEBUG")] {
            let mut entry = entry_at(utc_time(0), input);
            assert_eq!(build_document(&mut entry, "h").level, expected);
        }
    }

    #[test]
    fn timestamp_is_normalized_to_utc() {
        let offset = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let local = offset.with_ymd_and_hms(2024, 3, 9, 23, 15, 12).unwrap();
        let local = local.with_nanosecond(123_456_789).unwrap();

        assert_eq!(format_timestamp(&local), "2024-03-09T17:45:12.123456789Z");
    }

    #[test]
    fn timestamp_round_trips_without_precision_loss() {
        let west = FixedOffset::west_opt(8 * 3600).unwrap();
        for nanos in [0, 1, 500_000_000, 120_000, 999_999_999] {
            let time = utc_time(nanos).with_timezone(&west);
            let text = format_timestamp(&time);
            let parsed = DateTime::parse_from_rfc3339(&text).unwrap();
            assert_eq!(parsed, time);
            assert!(text.ends_with('Z'));
        }
    }

    #[test]
    fn fraction_trims_trailing_zeros() {
        assert_eq!(format_timestamp(&utc_time(0)), "2024-03-09T17:45:12Z");
        assert_eq!(format_timestamp(&utc_time(500_000_000)), "2024-03-09T17:45:12.5Z");
        assert_eq!(format_timestamp(&utc_time(120_000)), "2024-03-09T17:45:12.00012Z");
    }

    #[test]
    fn document_has_the_wire_shape() {
        let mut entry = entry_at(utc_time(0), "warn").with_field("disk", "/dev/sda1");
        let doc = build_document(&mut entry, "db-2");
        let value: serde_json::Value = serde_json::from_slice(&doc.to_vec().unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "host": "db-2",
                "@timestamp": "2024-03-09T17:45:12Z",
                "message": "disk almost full",
                "data": {"disk": "/dev/sda1"},
                "level": "WARN",
            })
        );
    }

    #[test]
    fn unencodable_payload_fails_to_serialize() {
        let mut entry = entry_at(utc_time(0), "info").with_field("ratio", f64::INFINITY);
        let doc = build_document(&mut entry, "h");
        assert!(matches!(doc.to_vec(), Err(HookError::Serialization(_))));
    }
}
