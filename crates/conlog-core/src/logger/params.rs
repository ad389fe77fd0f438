//! Record assembly: timestamps, parameter lists and single-string fallback

use chrono::{DateTime, Local, TimeZone};
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use serde_json::{json, Value};

use crate::registry::Level;

/// Emitted instead of a serialized record when serialization fails
pub const STRINGIFY_FALLBACK: &str =
    "Failed to stringify. Debugging in this environment is not recommended";

/// `MM/DD/YYYY HH:MM:SS.mmm`
pub(crate) fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%m/%d/%Y %H:%M:%S%.3f").to_string()
}

pub(crate) fn current_timestamp() -> String {
    format_timestamp(&Local::now())
}

/// Convert any serializable value into a payload entry
///
/// Values that fail to serialize become the fallback notice rather than an
/// error.
pub fn to_payload_value<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|_| Value::String(STRINGIFY_FALLBACK.to_string()))
}

/// JSON text of a value, or the fallback notice
pub(crate) fn stringify_or_fallback<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| STRINGIFY_FALLBACK.to_string())
}

/// Arguments exactly as the caller passed them, serialized as one JSON array
/// `[level, category, ...payload]`
pub(crate) struct RawArgs<'a> {
    pub level: &'a str,
    pub category: &'a str,
    pub payload: &'a [Value],
}

impl Serialize for RawArgs<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.payload.len() + 2))?;
        seq.serialize_element(self.level)?;
        seq.serialize_element(self.category)?;
        for value in self.payload {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

/// One record on its way to a variadic sink method. Never retained.
#[derive(Debug, Clone)]
pub(crate) struct LogRecord<'a> {
    pub level: Level,
    pub category: &'a str,
    pub payload: Vec<Value>,
    pub timestamp: String,
    pub stack: Option<Vec<String>>,
}

impl LogRecord<'_> {
    /// `"<timestamp> - "`, `"[level]"`, `"[category]"`, payload...,
    /// then `{"stacktrace": [...]}` when a stack was captured
    pub fn into_params(self) -> Vec<Value> {
        let mut params = Vec::with_capacity(self.payload.len() + 4);
        params.push(Value::String(format!("{} - ", self.timestamp)));
        params.push(Value::String(format!("[{}]", self.level)));
        params.push(Value::String(format!("[{}]", self.category)));
        params.extend(self.payload);
        if let Some(frames) = self.stack {
            params.push(json!({ "stacktrace": frames }));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use serde::ser::Error as _;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("cycle detected"))
        }
    }

    #[test]
    fn test_format_timestamp_pads_fields() {
        let naive = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_milli_opt(4, 5, 6, 9)
            .unwrap();
        let at = Utc.from_utc_datetime(&naive);
        assert_eq!(format_timestamp(&at), "03/07/2024 04:05:06.009");
    }

    #[test]
    fn test_current_timestamp_shape() {
        let ts = current_timestamp();
        assert_eq!(ts.len(), 23);
        for (i, c) in ts.chars().enumerate() {
            match i {
                2 | 5 => assert_eq!(c, '/'),
                10 => assert_eq!(c, ' '),
                13 | 16 => assert_eq!(c, ':'),
                19 => assert_eq!(c, '.'),
                _ => assert!(c.is_ascii_digit(), "unexpected {:?} at {} in {}", c, i, ts),
            }
        }
    }

    #[test]
    fn test_record_into_params() {
        let record = LogRecord {
            level: Level::Error,
            category: "net",
            payload: vec![json!("connection failed"), json!(42)],
            timestamp: "01/02/2024 03:04:05.006".to_string(),
            stack: Some(vec!["app::main".to_string()]),
        };
        let params = record.into_params();
        assert_eq!(
            params,
            vec![
                json!("01/02/2024 03:04:05.006 - "),
                json!("[error]"),
                json!("[net]"),
                json!("connection failed"),
                json!(42),
                json!({"stacktrace": ["app::main"]}),
            ]
        );
    }

    #[test]
    fn test_record_without_stack() {
        let record = LogRecord {
            level: Level::Info,
            category: "db",
            payload: vec![],
            timestamp: "01/02/2024 03:04:05.006".to_string(),
            stack: None,
        };
        assert_eq!(record.into_params().len(), 3);
    }

    #[test]
    fn test_raw_args_serialization() {
        let payload = vec![json!("connection failed"), json!(42)];
        let raw = RawArgs { level: "error", category: "net", payload: &payload };
        assert_eq!(stringify_or_fallback(&raw), r#"["error","net","connection failed",42]"#);
    }

    #[test]
    fn test_stringify_failure_uses_fallback() {
        assert_eq!(stringify_or_fallback(&Unserializable), STRINGIFY_FALLBACK);
        assert_eq!(to_payload_value(&Unserializable), json!(STRINGIFY_FALLBACK));
    }

    #[test]
    fn test_to_payload_value() {
        assert_eq!(to_payload_value("text"), json!("text"));
        assert_eq!(to_payload_value(&vec![1, 2]), json!([1, 2]));
    }
}
