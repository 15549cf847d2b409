//! Comparison operators for simple conditions.
//!
//! Every comparison is type-homogeneous: a context value and a rule operand
//! of different shapes never satisfy any operator.

use crate::context::ContextValue;
use crate::error::SchemaError;
use crate::value::ConditionValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Inclusive range, operand is a two-element `[int]`
    Between,
    /// Membership in a same-typed list
    In,
}

impl ComparisonOperator {
    pub const ALL: [ComparisonOperator; 8] = [
        Self::Eq,
        Self::Neq,
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
        Self::Between,
        Self::In,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Between => "between",
            Self::In => "in",
        }
    }

    /// Apply the operator to a present context value and a rule operand.
    pub fn apply(&self, actual: &ContextValue, expected: &ConditionValue) -> bool {
        match self {
            Self::Eq => equals(actual, expected),
            Self::Neq => !equals(actual, expected),
            Self::Gt => compare_ints(actual, expected, |a, b| a > b),
            Self::Gte => compare_ints(actual, expected, |a, b| a >= b),
            Self::Lt => compare_ints(actual, expected, |a, b| a < b),
            Self::Lte => compare_ints(actual, expected, |a, b| a <= b),
            Self::Between => between(actual, expected),
            Self::In => contains(actual, expected),
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonOperator {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownOperator(s.to_string()))
    }
}

fn equals(actual: &ContextValue, expected: &ConditionValue) -> bool {
    match (actual, expected) {
        (ContextValue::Int(a), ConditionValue::Int(b)) => a == b,
        (ContextValue::String(a), ConditionValue::String(b)) => a == b,
        (ContextValue::Bool(a), ConditionValue::Bool(b)) => a == b,
        _ => false,
    }
}

fn compare_ints(
    actual: &ContextValue,
    expected: &ConditionValue,
    cmp: impl Fn(i64, i64) -> bool,
) -> bool {
    match (actual, expected) {
        (ContextValue::Int(a), ConditionValue::Int(b)) => cmp(*a, *b),
        _ => false,
    }
}

fn between(actual: &ContextValue, expected: &ConditionValue) -> bool {
    match (actual, expected) {
        (ContextValue::Int(a), ConditionValue::IntList(range)) => match range.as_slice() {
            [low, high] => low <= a && a <= high,
            _ => false,
        },
        _ => false,
    }
}

fn contains(actual: &ContextValue, expected: &ConditionValue) -> bool {
    match (actual, expected) {
        (ContextValue::Int(a), ConditionValue::IntList(list)) => list.contains(a),
        (ContextValue::String(a), ConditionValue::StringList(list)) => list.contains(a),
        _ => false,
    }
}
