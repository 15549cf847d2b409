//! Rule set definition and loader.
//!
//! The JSON document is first decoded into raw serde types and then
//! converted into typed [`Rule`]s, so conversion errors can name the rule
//! they come from.
//!
//! ```json
//! {
//!   "version": 2,
//!   "fallbackPoolId": "general",
//!   "rules": [
//!     {
//!       "id": "general",
//!       "priority": 0,
//!       "condition": { "type": "always", "operator": "eq", "value": true },
//!       "messages": [["Let's pull a shot."]]
//!     }
//!   ]
//! }
//! ```

use crate::condition::Condition;
use crate::error::{SchemaError, SchemaResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// One candidate message: ordered template lines.
pub type Message = Vec<String>;

/// A prioritized mapping from condition to candidate messages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub id: String,
    pub priority: i64,
    pub condition: Condition,
    pub messages: Vec<Message>,
}

impl Rule {
    pub fn new(id: impl Into<String>, priority: i64, condition: Condition) -> Self {
        Self {
            id: id.into(),
            priority,
            condition,
            messages: Vec::new(),
        }
    }

    /// Add a candidate message.
    pub fn with_message<S: Into<String>>(mut self, lines: impl IntoIterator<Item = S>) -> Self {
        self.messages.push(lines.into_iter().map(Into::into).collect());
        self
    }

    /// A rule without messages can never be selected.
    pub fn is_selectable(&self) -> bool {
        !self.messages.is_empty()
    }
}

/// Parsed, immutable rule set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSchema {
    pub version: i64,
    pub fallback_pool_id: String,
    /// Documentation only; never consulted during evaluation
    pub condition_types: BTreeMap<String, String>,
    /// Documentation only; never consulted during evaluation
    pub operators: Vec<String>,
    pub rules: Vec<Rule>,
}

impl RuleSchema {
    pub fn new(version: i64, fallback_pool_id: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            version,
            fallback_pool_id: fallback_pool_id.into(),
            condition_types: BTreeMap::new(),
            operators: Vec::new(),
            rules,
        }
    }

    /// Decode a rule set from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> SchemaResult<Self> {
        let raw: RawSchema = serde_json::from_slice(bytes)?;
        raw.try_into()
    }

    pub fn from_json_str(json: &str) -> SchemaResult<Self> {
        Self::from_slice(json.as_bytes())
    }

    /// Rules ordered by descending priority; equal priorities keep
    /// definition order.
    pub fn rules_sorted_by_priority_descending(&self) -> Vec<Rule> {
        let mut rules = self.rules.clone();
        // sort_by is stable
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        rules
    }

    /// Messages of the rule named by `fallback_pool_id`, or empty.
    pub fn fallback_messages(&self) -> Vec<Message> {
        self.rules
            .iter()
            .find(|rule| rule.id == self.fallback_pool_id)
            .map(|rule| rule.messages.clone())
            .unwrap_or_default()
    }
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchema {
    version: i64,
    fallback_pool_id: String,
    #[serde(default)]
    condition_types: BTreeMap<String, String>,
    #[serde(default)]
    operators: Vec<String>,
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    id: String,
    priority: i64,
    condition: Value,
    messages: Vec<RawMessage>,
}

/// A message is either a list of lines or one newline-separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMessage {
    Lines(Vec<String>),
    Text(String),
}

impl From<RawMessage> for Message {
    fn from(raw: RawMessage) -> Self {
        match raw {
            RawMessage::Lines(lines) => lines,
            RawMessage::Text(text) => text.split('\n').map(str::to_string).collect(),
        }
    }
}

impl TryFrom<RawRule> for Rule {
    type Error = SchemaError;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        let condition = Condition::from_json(&raw.condition).map_err(|e| e.in_rule(&raw.id))?;
        Ok(Rule {
            id: raw.id,
            priority: raw.priority,
            condition,
            messages: raw.messages.into_iter().map(Message::from).collect(),
        })
    }
}

impl TryFrom<RawSchema> for RuleSchema {
    type Error = SchemaError;

    fn try_from(raw: RawSchema) -> Result<Self, Self::Error> {
        let mut seen = HashSet::new();
        for rule in &raw.rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(SchemaError::DuplicateRuleId(rule.id.clone()));
            }
        }

        let rules = raw
            .rules
            .into_iter()
            .map(Rule::try_from)
            .collect::<SchemaResult<Vec<_>>>()?;

        if !rules.iter().any(|rule| rule.id == raw.fallback_pool_id) {
            tracing::warn!(
                fallback_pool_id = %raw.fallback_pool_id,
                "Fallback pool id matches no rule; fallback pool is empty"
            );
        }

        Ok(RuleSchema {
            version: raw.version,
            fallback_pool_id: raw.fallback_pool_id,
            condition_types: raw.condition_types,
            operators: raw.operators,
            rules,
        })
    }
}
