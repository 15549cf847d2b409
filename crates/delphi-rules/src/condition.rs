//! Condition grammar: simple predicates plus `and` / `or` composition.
//!
//! On the wire a condition is one of
//!
//! ```json
//! { "and": [ <condition>, ... ] }
//! { "or":  [ <condition>, ... ] }
//! { "type": "shot_count", "operator": "gte", "value": 10 }
//! ```
//!
//! The shapes are tried in that order. There is no `not` node; negation is
//! expressed with `neq`.

use crate::context::MessageContext;
use crate::error::{SchemaError, SchemaResult};
use crate::operators::ComparisonOperator;
use crate::specification::{all_of, any_of, Specification};
use crate::value::ConditionValue;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Named signal a simple condition reads from the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    ShotCount,
    DaysSinceLastShot,
    StreakDays,
    LastShotRating,
    ConsecutiveBadShots,
    FirstDialedIn,
    Hour,
    DayOfWeek,
    Month,
    Always,
    BeanCount,
    UniqueBeansUsed,
    GrindSettingsUsed,
    RecentlyUnlockedAchievement,
    ClosestAchievementProgressPercent,
    RetroactiveUnlockCount,
}

impl ConditionType {
    pub const ALL: [ConditionType; 16] = [
        Self::ShotCount,
        Self::DaysSinceLastShot,
        Self::StreakDays,
        Self::LastShotRating,
        Self::ConsecutiveBadShots,
        Self::FirstDialedIn,
        Self::Hour,
        Self::DayOfWeek,
        Self::Month,
        Self::Always,
        Self::BeanCount,
        Self::UniqueBeansUsed,
        Self::GrindSettingsUsed,
        Self::RecentlyUnlockedAchievement,
        Self::ClosestAchievementProgressPercent,
        Self::RetroactiveUnlockCount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShotCount => "shot_count",
            Self::DaysSinceLastShot => "days_since_last_shot",
            Self::StreakDays => "streak_days",
            Self::LastShotRating => "last_shot_rating",
            Self::ConsecutiveBadShots => "consecutive_bad_shots",
            Self::FirstDialedIn => "first_dialed_in",
            Self::Hour => "hour",
            Self::DayOfWeek => "day_of_week",
            Self::Month => "month",
            Self::Always => "always",
            Self::BeanCount => "bean_count",
            Self::UniqueBeansUsed => "unique_beans_used",
            Self::GrindSettingsUsed => "grind_settings_used",
            Self::RecentlyUnlockedAchievement => "recently_unlocked_achievement",
            Self::ClosestAchievementProgressPercent => "closest_achievement_progress_percent",
            Self::RetroactiveUnlockCount => "retroactive_unlock_count",
        }
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownConditionType(s.to_string()))
    }
}

/// Leaf predicate: compare one context signal against a literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimpleCondition {
    #[serde(rename = "type")]
    pub condition_type: ConditionType,
    pub operator: ComparisonOperator,
    pub value: ConditionValue,
}

impl SimpleCondition {
    pub fn new(
        condition_type: ConditionType,
        operator: ComparisonOperator,
        value: impl Into<ConditionValue>,
    ) -> Self {
        Self {
            condition_type,
            operator,
            value: value.into(),
        }
    }

    fn from_map(map: &Map<String, Value>) -> SchemaResult<Self> {
        let condition_type: ConditionType = required_str(map, "type")?.parse()?;
        let operator: ComparisonOperator = required_str(map, "operator")?.parse()?;
        let value = map
            .get("value")
            .ok_or_else(|| SchemaError::InvalidCondition("missing field `value`".to_string()))
            .and_then(ConditionValue::from_json)?;

        Ok(Self {
            condition_type,
            operator,
            value,
        })
    }
}

fn required_str<'a>(map: &'a Map<String, Value>, key: &str) -> SchemaResult<&'a str> {
    match map.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(SchemaError::InvalidCondition(format!(
            "field `{key}` must be a string, got {other}"
        ))),
        None => Err(SchemaError::InvalidCondition(format!("missing field `{key}`"))),
    }
}

impl Specification<MessageContext> for SimpleCondition {
    /// An absent signal never satisfies a condition, whatever the operator.
    fn is_satisfied_by(&self, ctx: &MessageContext) -> bool {
        match ctx.value(self.condition_type) {
            Some(actual) => self.operator.apply(&actual, &self.value),
            None => false,
        }
    }
}

/// Recursive predicate tree attached to a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Simple(SimpleCondition),
    And(Vec<Condition>),
    Or(Vec<Condition>),
}

impl Condition {
    pub fn simple(
        condition_type: ConditionType,
        operator: ComparisonOperator,
        value: impl Into<ConditionValue>,
    ) -> Self {
        Condition::Simple(SimpleCondition::new(condition_type, operator, value))
    }

    pub fn and(conditions: Vec<Condition>) -> Self {
        Condition::And(conditions)
    }

    pub fn or(conditions: Vec<Condition>) -> Self {
        Condition::Or(conditions)
    }

    /// Condition that holds for every context.
    pub fn always() -> Self {
        Self::simple(ConditionType::Always, ComparisonOperator::Eq, true)
    }

    /// Parse a condition tree from generic JSON.
    pub fn from_json(raw: &Value) -> SchemaResult<Self> {
        let Some(map) = raw.as_object() else {
            return Err(SchemaError::InvalidCondition(format!(
                "expected an object, got {raw}"
            )));
        };

        if let Some(children) = map.get("and").and_then(Value::as_array) {
            return Self::parse_children(children).map(Condition::And);
        }
        if let Some(children) = map.get("or").and_then(Value::as_array) {
            return Self::parse_children(children).map(Condition::Or);
        }
        SimpleCondition::from_map(map).map(Condition::Simple)
    }

    fn parse_children(children: &[Value]) -> SchemaResult<Vec<Condition>> {
        children.iter().map(Self::from_json).collect()
    }
}

impl Specification<MessageContext> for Condition {
    fn is_satisfied_by(&self, ctx: &MessageContext) -> bool {
        match self {
            Condition::Simple(simple) => simple.is_satisfied_by(ctx),
            Condition::And(children) => all_of(children, ctx),
            Condition::Or(children) => any_of(children, ctx),
        }
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Condition::Simple(simple) => simple.serialize(serializer),
            Condition::And(children) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("and", children)?;
                map.end()
            }
            Condition::Or(children) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("or", children)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::from_json(&raw).map_err(serde::de::Error::custom)
    }
}
