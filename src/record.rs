use chrono::{DateTime, FixedOffset};
use serde::ser::{Error as _, Serialize, Serializer};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Reserved data key holding the error attached to an entry.
pub const ERROR_KEY: &str = "error";

/// Structured payload of an entry. Keys are unique, order is irrelevant.
pub type Fields = BTreeMap<String, FieldValue>;

/// A single log event as handed to the hook.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Event time in whatever offset the producer used.
    pub time: DateTime<FixedOffset>,
    /// Severity name, e.g. `"warning"` or `"ERROR"`.
    pub level: String,
    pub message: String,
    pub data: Fields,
}

impl Entry {
    pub fn new(
        time: DateTime<FixedOffset>,
        level: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Entry {
            time,
            level: level.into(),
            message: message.into(),
            data: Fields::new(),
        }
    }

    /// Builder-style helper to attach a payload value.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// Value stored under a payload key.
#[derive(Clone)]
pub enum FieldValue {
    Value(serde_json::Value),
    /// Kept apart from `Value` because JSON cannot carry NaN or infinities;
    /// such floats fail serialization instead of being silently nulled.
    Float(f64),
    Error(Arc<dyn Error + Send + Sync>),
}

impl FieldValue {
    pub fn error<E>(err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        FieldValue::Error(Arc::new(err))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FieldValue::Error(_))
    }

    /// Returns the JSON value if this is a plain value.
    pub fn as_value(&self) -> Option<&serde_json::Value> {
        match self {
            FieldValue::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Value(v) => fmt::Debug::fmt(v, f),
            FieldValue::Float(x) => fmt::Debug::fmt(x, f),
            FieldValue::Error(e) => write!(f, "Error({})", e),
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Value(a), FieldValue::Value(b)) => a == b,
            (FieldValue::Float(a), FieldValue::Float(b)) => a == b,
            (FieldValue::Error(a), FieldValue::Error(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Value(v) => v.serialize(serializer),
            FieldValue::Float(x) if x.is_finite() => serializer.serialize_f64(*x),
            FieldValue::Float(x) => Err(S::Error::custom(format!(
                "float value {} cannot be represented in JSON",
                x
            ))),
            FieldValue::Error(e) => serializer.collect_str(e),
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(v: serde_json::Value) -> Self {
        FieldValue::Value(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Value(serde_json::Value::String(v.to_string()))
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Value(serde_json::Value::String(v))
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Value(v.into())
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        FieldValue::Value(v.into())
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Value(v.into())
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

/// Owned snapshot of an error that was only available by reference, as
/// `tracing` hands errors to visitors.
#[derive(Debug, Clone)]
pub struct CapturedError {
    message: String,
}

impl CapturedError {
    pub fn capture(err: &(dyn Error + 'static)) -> Self {
        CapturedError {
            message: err.to_string(),
        }
    }
}

impl fmt::Display for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for CapturedError {}
