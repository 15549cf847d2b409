//! Literal operands embedded in rule conditions.

use crate::error::{SchemaError, SchemaResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The right-hand side of a simple condition.
///
/// The wire format carries no type tag: the shape is recovered by trying,
/// in order, bool, int, string, `[int]` and `[string]`. The first shape
/// that fits wins, so `[]` decodes as an empty `IntList`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Bool(bool),
    Int(i64),
    String(String),
    IntList(Vec<i64>),
    StringList(Vec<String>),
}

impl ConditionValue {
    /// Decode an operand from a generic JSON value by structural trial.
    pub fn from_json(raw: &Value) -> SchemaResult<Self> {
        if let Some(b) = raw.as_bool() {
            return Ok(Self::Bool(b));
        }
        if let Some(n) = as_integer(raw) {
            return Ok(Self::Int(n));
        }
        if let Some(s) = raw.as_str() {
            return Ok(Self::String(s.to_string()));
        }
        if let Some(items) = raw.as_array() {
            let ints: Option<Vec<i64>> = items.iter().map(as_integer).collect();
            if let Some(ints) = ints {
                return Ok(Self::IntList(ints));
            }
            let strings: Option<Vec<String>> = items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect();
            if let Some(strings) = strings {
                return Ok(Self::StringList(strings));
            }
        }
        Err(SchemaError::InvalidConditionValue(raw.to_string()))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int_list(&self) -> Option<&[i64]> {
        match self {
            Self::IntList(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str_list(&self) -> Option<&[String]> {
        match self {
            Self::StringList(v) => Some(v),
            _ => None,
        }
    }
}

/// An integer, or a float with no fractional part that fits in `i64`.
fn as_integer(raw: &Value) -> Option<i64> {
    if let Some(n) = raw.as_i64() {
        return Some(n);
    }
    let f = raw.as_f64()?;
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
}

impl<'de> Deserialize<'de> for ConditionValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::from_json(&raw).map_err(serde::de::Error::custom)
    }
}

impl From<i64> for ConditionValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ConditionValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<bool> for ConditionValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ConditionValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Vec<i64>> for ConditionValue {
    fn from(v: Vec<i64>) -> Self {
        Self::IntList(v)
    }
}

impl From<Vec<String>> for ConditionValue {
    fn from(v: Vec<String>) -> Self {
        Self::StringList(v)
    }
}
