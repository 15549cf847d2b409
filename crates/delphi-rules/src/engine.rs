//! Message selection.
//!
//! [`MessageEngine`] walks the rules in priority order, takes the first
//! selectable rule whose condition holds, picks one of its messages and
//! runs the template step over it.

use crate::condition::Condition;
use crate::context::MessageContext;
use crate::error::SchemaResult;
use crate::picker::{MessagePicker, ThreadRngPicker};
use crate::schema::{Message, Rule, RuleSchema};
use crate::specification::Specification;
use crate::template::TemplateProcessor;
use std::fmt;
use std::sync::Arc;

/// Line returned when neither a rule nor the fallback pool has a message.
pub const DEFAULT_MESSAGE: &str = "Let's pull a shot.";

/// Id of the single rule in [`MessageEngine::builtin`].
pub const BUILTIN_POOL_ID: &str = "general";

/// Immutable evaluator over one parsed rule set.
///
/// Holds no mutable state besides whatever the picker keeps, so a single
/// instance can be shared across threads behind an `Arc`.
#[derive(Clone)]
pub struct MessageEngine {
    rules: Vec<Rule>,
    fallback_messages: Vec<Message>,
    picker: Arc<dyn MessagePicker>,
}

impl fmt::Debug for MessageEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageEngine")
            .field("rules", &self.rules.len())
            .field("fallback_messages", &self.fallback_messages.len())
            .finish()
    }
}

impl MessageEngine {
    pub fn from_schema(schema: &RuleSchema) -> Self {
        Self {
            rules: schema.rules_sorted_by_priority_descending(),
            fallback_messages: schema.fallback_messages(),
            picker: Arc::new(ThreadRngPicker),
        }
    }

    /// Parse a rule set and build an engine from it.
    pub fn from_slice(bytes: &[u8]) -> SchemaResult<Self> {
        let schema = RuleSchema::from_slice(bytes)?;
        tracing::debug!(
            version = schema.version,
            rules = schema.rules.len(),
            "Loaded message rule set"
        );
        Ok(Self::from_schema(&schema))
    }

    /// Minimal engine: one always-true rule with the default message.
    pub fn builtin() -> Self {
        let rule =
            Rule::new(BUILTIN_POOL_ID, 0, Condition::always()).with_message([DEFAULT_MESSAGE]);
        Self::from_schema(&RuleSchema::new(2, BUILTIN_POOL_ID, vec![rule]))
    }

    /// Replace the random source used to pick among candidate messages.
    pub fn with_picker(mut self, picker: Arc<dyn MessagePicker>) -> Self {
        self.picker = picker;
        self
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn fallback_messages(&self) -> &[Message] {
        &self.fallback_messages
    }

    /// First rule, in priority order, that has messages and whose condition holds.
    pub fn matching_rule(&self, ctx: &MessageContext) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|rule| rule.is_selectable() && rule.condition.is_satisfied_by(ctx))
    }

    /// Select a message for `ctx` and resolve its placeholders.
    ///
    /// May return an empty list when every line of the chosen message
    /// referenced a missing value.
    pub fn get_message(&self, ctx: &MessageContext) -> Vec<String> {
        let pool = match self.matching_rule(ctx) {
            Some(rule) => {
                tracing::debug!(rule_id = %rule.id, priority = rule.priority, "Rule matched");
                rule.messages.as_slice()
            }
            None => {
                tracing::debug!(
                    candidates = self.fallback_messages.len(),
                    "No rule matched, using fallback pool"
                );
                self.fallback_messages.as_slice()
            }
        };

        let processor = TemplateProcessor::new(ctx);
        match self.choose(pool) {
            Some(message) => processor.process(message),
            None => processor.process(&[DEFAULT_MESSAGE]),
        }
    }

    fn choose<'a>(&self, pool: &'a [Message]) -> Option<&'a Message> {
        if pool.is_empty() {
            return None;
        }
        // Clamp picks from a misbehaving picker
        let index = self.picker.pick(pool.len()).min(pool.len() - 1);
        pool.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::{FirstPicker, MockMessagePicker, SeededPicker};

    fn engine(json: &str) -> MessageEngine {
        MessageEngine::from_slice(json.as_bytes())
            .unwrap()
            .with_picker(Arc::new(FirstPicker))
    }

    fn schema_with(rules: &str) -> String {
        format!(
            r#"{{
                "version": 2,
                "fallbackPoolId": "general",
                "conditionTypes": {{}},
                "operators": [],
                "rules": [{rules}]
            }}"#
        )
    }

    const GENERAL: &str = r#"{
        "id": "general",
        "priority": 0,
        "condition": {"type": "always", "operator": "eq", "value": true},
        "messages": [["Fallback"]]
    }"#;

    #[test]
    fn test_single_always_rule() {
        let json = schema_with(
            r#"{"id": "general", "priority": 0,
                "condition": {"type": "always", "operator": "eq", "value": true},
                "messages": [["Hello"]]}"#,
        );
        assert_eq!(engine(&json).get_message(&MessageContext::new()), vec!["Hello"]);
    }

    #[test]
    fn test_returns_fallback_when_no_match() {
        let json = schema_with(&format!(
            r#"{{"id": "never", "priority": 100,
                "condition": {{"type": "shot_count", "operator": "eq", "value": 999}},
                "messages": [["Never shown"]]}}, {GENERAL}"#
        ));
        assert_eq!(
            engine(&json).get_message(&MessageContext::new()),
            vec!["Fallback"]
        );
    }

    #[test]
    fn test_higher_priority_wins() {
        let json = schema_with(
            r#"{"id": "low", "priority": 10,
                "condition": {"type": "always", "operator": "eq", "value": true},
                "messages": [["Low priority"]]},
               {"id": "high", "priority": 100,
                "condition": {"type": "always", "operator": "eq", "value": true},
                "messages": [["High priority"]]}"#,
        );
        let engine = engine(&json);
        for _ in 0..5 {
            assert_eq!(
                engine.get_message(&MessageContext::new()),
                vec!["High priority"]
            );
        }
    }

    #[test]
    fn test_equal_priority_keeps_definition_order() {
        let json = schema_with(
            r#"{"id": "first", "priority": 10,
                "condition": {"type": "always", "operator": "eq", "value": true},
                "messages": [["First"]]},
               {"id": "second", "priority": 10,
                "condition": {"type": "always", "operator": "eq", "value": true},
                "messages": [["Second"]]}"#,
        );
        let engine = engine(&json);
        assert_eq!(
            engine.matching_rule(&MessageContext::new()).map(|r| r.id.as_str()),
            Some("first")
        );
    }

    #[test]
    fn test_skips_rules_with_empty_messages() {
        let json = schema_with(&format!(
            r#"{{"id": "empty", "priority": 100,
                "condition": {{"type": "always", "operator": "eq", "value": true}},
                "messages": []}}, {GENERAL}"#
        ));
        assert_eq!(
            engine(&json).get_message(&MessageContext::new()),
            vec!["Fallback"]
        );
    }

    #[test]
    fn test_and_requires_all() {
        let json = schema_with(&format!(
            r#"{{"id": "both", "priority": 100,
                "condition": {{"and": [
                    {{"type": "shot_count", "operator": "eq", "value": 5}},
                    {{"type": "streak_days", "operator": "eq", "value": 3}}
                ]}},
                "messages": [["Both match"]]}}, {GENERAL}"#
        ));
        let engine = engine(&json);

        let matching = MessageContext::new().with_shot_count(5).with_streak_days(3);
        assert_eq!(engine.get_message(&matching), vec!["Both match"]);

        let partial = MessageContext::new().with_shot_count(5).with_streak_days(0);
        assert_eq!(engine.get_message(&partial), vec!["Fallback"]);
    }

    #[test]
    fn test_or_requires_any() {
        let json = schema_with(&format!(
            r#"{{"id": "either", "priority": 100,
                "condition": {{"or": [
                    {{"type": "shot_count", "operator": "eq", "value": 5}},
                    {{"type": "streak_days", "operator": "eq", "value": 3}}
                ]}},
                "messages": [["Either match"]]}}, {GENERAL}"#
        ));
        let engine = engine(&json);

        let ctx = |shots, streak| {
            MessageContext::new()
                .with_shot_count(shots)
                .with_streak_days(streak)
        };
        assert_eq!(engine.get_message(&ctx(5, 0)), vec!["Either match"]);
        assert_eq!(engine.get_message(&ctx(0, 3)), vec!["Either match"]);
        assert_eq!(engine.get_message(&ctx(0, 0)), vec!["Fallback"]);
    }

    #[test]
    fn test_absent_signal_falls_back() {
        let json = schema_with(&format!(
            r#"{{"id": "welcome_back", "priority": 100,
                "condition": {{"type": "days_since_last_shot", "operator": "gte", "value": 7}},
                "messages": [["Welcome back."]]}}, {GENERAL}"#
        ));
        let engine = engine(&json);

        assert_eq!(engine.get_message(&MessageContext::new()), vec!["Fallback"]);
        assert_eq!(
            engine.get_message(&MessageContext::new().with_days_since_last_shot(9)),
            vec!["Welcome back."]
        );
    }

    #[test]
    fn test_between_bounds() {
        let json = schema_with(&format!(
            r#"{{"id": "range", "priority": 100,
                "condition": {{"type": "shot_count", "operator": "between", "value": [5, 10]}},
                "messages": [["In range"]]}}, {GENERAL}"#
        ));
        let engine = engine(&json);

        let cases = [
            (4, "Fallback"),
            (5, "In range"),
            (7, "In range"),
            (10, "In range"),
            (11, "Fallback"),
        ];
        for (shots, expected) in cases {
            assert_eq!(
                engine.get_message(&MessageContext::new().with_shot_count(shots)),
                vec![expected],
                "shot_count = {shots}"
            );
        }
    }

    #[test]
    fn test_in_membership() {
        let json = schema_with(&format!(
            r#"{{"id": "odd_days", "priority": 100,
                "condition": {{"type": "day_of_week", "operator": "in", "value": [1, 3, 5]}},
                "messages": [["Odd day"]]}}, {GENERAL}"#
        ));
        let engine = engine(&json);

        assert_eq!(
            engine.get_message(&MessageContext::new().with_day_of_week(3)),
            vec!["Odd day"]
        );
        assert_eq!(
            engine.get_message(&MessageContext::new().with_day_of_week(2)),
            vec!["Fallback"]
        );
    }

    #[test]
    fn test_template_lines_dropped_individually() {
        let json = schema_with(
            r#"{"id": "general", "priority": 0,
                "condition": {"type": "always", "operator": "eq", "value": true},
                "messages": [["Line 1.", "{{bean.roastAge}}", "Line 3."]]}"#,
        );
        assert_eq!(
            engine(&json).get_message(&MessageContext::new()),
            vec!["Line 1.", "Line 3."]
        );
    }

    #[test]
    fn test_all_lines_dropped_yields_empty() {
        let json = schema_with(
            r#"{"id": "general", "priority": 0,
                "condition": {"type": "always", "operator": "eq", "value": true},
                "messages": [["{{bean.displayName}} - {{bean.roastAge}}"]]}"#,
        );
        let ctx = MessageContext::new().with_active_bean_display_name("Test Bean");
        assert!(engine(&json).get_message(&ctx).is_empty());
    }

    #[test]
    fn test_empty_fallback_pool_uses_default() {
        let json = r#"{
            "version": 2,
            "fallbackPoolId": "missing",
            "rules": [{"id": "never", "priority": 1,
                "condition": {"type": "shot_count", "operator": "eq", "value": 999},
                "messages": [["Never shown"]]}]
        }"#;
        assert_eq!(
            engine(json).get_message(&MessageContext::new()),
            vec![DEFAULT_MESSAGE]
        );
    }

    #[test]
    fn test_nested_and_or() {
        let json = schema_with(&format!(
            r#"{{"id": "weekend_regular", "priority": 100,
                "condition": {{"and": [
                    {{"type": "shot_count", "operator": "gte", "value": 10}},
                    {{"or": [
                        {{"type": "day_of_week", "operator": "eq", "value": 6}},
                        {{"type": "day_of_week", "operator": "eq", "value": 7}}
                    ]}}
                ]}},
                "messages": [["Weekend shots hit different."]]}}, {GENERAL}"#
        ));
        let engine = engine(&json);

        let saturday = MessageContext::new().with_shot_count(12).with_day_of_week(6);
        let monday = MessageContext::new().with_shot_count(12).with_day_of_week(1);
        assert_eq!(engine.get_message(&saturday), vec!["Weekend shots hit different."]);
        assert_eq!(engine.get_message(&monday), vec!["Fallback"]);
    }

    #[test]
    fn test_picker_selects_message() {
        let json = schema_with(
            r#"{"id": "general", "priority": 0,
                "condition": {"type": "always", "operator": "eq", "value": true},
                "messages": [["A"], ["B"], ["C"]]}"#,
        );

        let mut picker = MockMessagePicker::new();
        picker.expect_pick().withf(|len| *len == 3).times(1).return_const(2usize);

        let engine = MessageEngine::from_slice(json.as_bytes())
            .unwrap()
            .with_picker(Arc::new(picker));
        assert_eq!(engine.get_message(&MessageContext::new()), vec!["C"]);
    }

    #[test]
    fn test_out_of_range_pick_is_clamped() {
        let json = schema_with(GENERAL);
        let mut picker = MockMessagePicker::new();
        picker.expect_pick().return_const(7usize);

        let engine = MessageEngine::from_slice(json.as_bytes())
            .unwrap()
            .with_picker(Arc::new(picker));
        assert_eq!(engine.get_message(&MessageContext::new()), vec!["Fallback"]);
    }

    #[test]
    fn test_deterministic_with_seeded_picker() {
        let json = schema_with(
            r#"{"id": "general", "priority": 0,
                "condition": {"type": "always", "operator": "eq", "value": true},
                "messages": [["A"], ["B"], ["C"], ["D"]]}"#,
        );
        let run = || {
            let engine = MessageEngine::from_slice(json.as_bytes())
                .unwrap()
                .with_picker(Arc::new(SeededPicker::new(7)));
            (0..10)
                .map(|_| engine.get_message(&MessageContext::new()))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_builtin_engine() {
        let engine = MessageEngine::builtin();
        assert_eq!(engine.rules().len(), 1);
        assert_eq!(
            engine.get_message(&MessageContext::new().with_shot_count(42)),
            vec![DEFAULT_MESSAGE]
        );
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MessageEngine>();
    }
}
