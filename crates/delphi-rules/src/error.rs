//! Error types for rule set loading.

use thiserror::Error;

/// Failure to decode or validate a rule set definition.
///
/// Only raised while a rule set is being loaded. Evaluation itself never
/// fails: no-match, empty fallback and fully dropped messages are all
/// ordinary outcomes.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The payload is not valid JSON or is missing required fields
    #[error("Malformed rule set: {0}")]
    Json(#[from] serde_json::Error),

    /// A condition is not one of the `and` / `or` / simple shapes
    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    /// A condition operand matches none of the accepted value shapes
    #[error("Invalid condition value: expected int, string, bool, [int] or [string], got {0}")]
    InvalidConditionValue(String),

    #[error("Unknown condition type: {0}")]
    UnknownConditionType(String),

    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Duplicate rule id: {0}")]
    DuplicateRuleId(String),

    /// Wraps an error raised while converting a specific rule
    #[error("Rule '{rule_id}': {source}")]
    Rule {
        rule_id: String,
        #[source]
        source: Box<SchemaError>,
    },
}

impl SchemaError {
    /// Short machine-readable code for logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Json(_) => "MALFORMED_JSON",
            Self::InvalidCondition(_) => "INVALID_CONDITION",
            Self::InvalidConditionValue(_) => "INVALID_CONDITION_VALUE",
            Self::UnknownConditionType(_) => "UNKNOWN_CONDITION_TYPE",
            Self::UnknownOperator(_) => "UNKNOWN_OPERATOR",
            Self::DuplicateRuleId(_) => "DUPLICATE_RULE_ID",
            Self::Rule { source, .. } => source.error_code(),
        }
    }

    /// Attach the id of the rule being converted.
    pub fn in_rule(self, rule_id: impl Into<String>) -> Self {
        Self::Rule {
            rule_id: rule_id.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias using SchemaError
pub type SchemaResult<T> = Result<T, SchemaError>;
