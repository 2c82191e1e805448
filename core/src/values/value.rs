use chrono::{DateTime, Utc};
use core::fmt;

use super::format::{format_minimal, render_date};
use crate::types::ValueKind;

/// A scalar value tagged with its kind.
///
/// Every kind has exactly one missing representation: NaN for the numeric kinds and
/// `None` for the others. Missing is a value, not an error.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(f64),
    Double(f64),
    Boolean(Option<bool>),
    String(Option<String>),
    Date(Option<DateTime<Utc>>),
}

impl Value {
    pub fn integer(value: f64) -> Self {
        Value::Integer(value)
    }

    pub fn double(value: f64) -> Self {
        Value::Double(value)
    }

    pub fn boolean(value: bool) -> Self {
        Value::Boolean(Some(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Value::String(Some(value.into()))
    }

    pub fn date(value: DateTime<Utc>) -> Self {
        Value::Date(Some(value))
    }

    /// Builds a numeric value of the given numeric kind.
    pub fn number(kind: ValueKind, value: f64) -> Self {
        match kind {
            ValueKind::Integer => Value::Integer(value),
            _ => Value::Double(value),
        }
    }

    /// The canonical missing value of a kind.
    pub fn missing(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Integer => Value::Integer(f64::NAN),
            ValueKind::Double => Value::Double(f64::NAN),
            ValueKind::Boolean => Value::Boolean(None),
            ValueKind::String => Value::String(None),
            ValueKind::Date => Value::Date(None),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Double(_) => ValueKind::Double,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::String(_) => ValueKind::String,
            Value::Date(_) => ValueKind::Date,
        }
    }

    pub fn is_missing(&self) -> bool {
        match self {
            Value::Integer(v) | Value::Double(v) => v.is_nan(),
            Value::Boolean(v) => v.is_none(),
            Value::String(v) => v.is_none(),
            Value::Date(v) => v.is_none(),
        }
    }

    /// The numeric payload, or `None` for non-numeric kinds. May be NaN.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(v) | Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// The numeric payload with NaN standing in for anything non-numeric.
    pub fn to_number(&self) -> f64 {
        self.as_number().unwrap_or(f64::NAN)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => *v,
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => v.as_deref(),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Date(v) => *v,
            _ => None,
        }
    }

    /// Implicit string rendering, `None` when missing.
    pub fn render(&self) -> Option<String> {
        match self {
            Value::Integer(v) | Value::Double(v) => format_minimal(*v),
            Value::Boolean(v) => v.map(|b| b.to_string()),
            Value::String(v) => v.clone(),
            Value::Date(v) => v.as_ref().map(render_date),
        }
    }

    /// Converts to another kind where a lossless or rendering conversion exists.
    ///
    /// Same kinds and `Integer`/`Double` convert freely, anything converts to `String`, and a
    /// missing value converts to the missing value of the target. Returns `None` otherwise.
    pub fn coerce(self, kind: ValueKind) -> Option<Value> {
        if self.kind() == kind {
            return Some(self);
        }
        if self.is_missing() {
            return Some(Value::missing(kind));
        }
        match (self, kind) {
            (Value::Integer(v) | Value::Double(v), ValueKind::Integer | ValueKind::Double) => {
                Some(Value::number(kind, v))
            }
            (value, ValueKind::String) => Some(Value::String(value.render())),
            _ => None,
        }
    }
}

/// Bit-level equality: two NaNs of the same kind are equal. This is structural identity
/// for tests and caching, not the formula language's `==` operator.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) | (Value::Double(a), Value::Double(b)) => {
                a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
            }
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Some(text) => f.write_str(&text),
            None => f.write_str("?"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::string(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::string(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::date(value)
    }
}
