//! Placeholder substitution for message lines.
//!
//! Substitution is literal and per line: a line is emitted only if every
//! placeholder it mentions has a value, otherwise the whole line is dropped.

use crate::context::MessageContext;

/// A fixed-vocabulary token that can appear in a message line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    BeanDisplayName,
    BeanRoastAge,
    BeanRoastLevel,
    ShotCount,
    StreakDays,
}

impl Placeholder {
    pub const ALL: [Placeholder; 5] = [
        Self::BeanDisplayName,
        Self::BeanRoastAge,
        Self::BeanRoastLevel,
        Self::ShotCount,
        Self::StreakDays,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Self::BeanDisplayName => "{{bean.displayName}}",
            Self::BeanRoastAge => "{{bean.roastAge}}",
            Self::BeanRoastLevel => "{{bean.roastLevel}}",
            Self::ShotCount => "{{shotCount}}",
            Self::StreakDays => "{{streakDays}}",
        }
    }

    pub fn resolve(&self, ctx: &MessageContext) -> Option<String> {
        match self {
            Self::BeanDisplayName => ctx.active_bean_display_name.clone(),
            Self::BeanRoastAge => ctx.active_bean_roast_age.clone(),
            Self::BeanRoastLevel => ctx.active_bean_roast_level.clone(),
            Self::ShotCount => Some(ctx.shot_count.to_string()),
            Self::StreakDays => Some(ctx.streak_days.to_string()),
        }
    }
}

/// Resolves placeholders for one context.
#[derive(Debug, Clone)]
pub struct TemplateProcessor {
    values: Vec<(&'static str, Option<String>)>,
}

impl TemplateProcessor {
    pub fn new(ctx: &MessageContext) -> Self {
        let values = Placeholder::ALL
            .iter()
            .map(|p| (p.token(), p.resolve(ctx)))
            .collect();
        Self { values }
    }

    /// Substitute every line, dropping the ones with an unresolved placeholder.
    pub fn process<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        lines
            .iter()
            .filter_map(|line| self.process_line(line.as_ref()))
            .collect()
    }

    /// Returns `None` if the line references a placeholder with no value.
    pub fn process_line(&self, line: &str) -> Option<String> {
        let mut result = line.to_string();
        for (token, value) in &self.values {
            if !line.contains(token) {
                continue;
            }
            result = result.replace(token, value.as_deref()?);
        }
        Some(result)
    }
}

/// Convenience wrapper: build a processor for `ctx` and run it over `lines`.
pub fn process<S: AsRef<str>>(lines: &[S], ctx: &MessageContext) -> Vec<String> {
    TemplateProcessor::new(ctx).process(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines_pass_through() {
        let lines = ["Let's pull a shot.", "Grinder warm."];
        assert_eq!(process(&lines, &MessageContext::new()), lines);
    }

    #[test]
    fn test_substitutes_display_name() {
        let ctx = MessageContext::new().with_active_bean_display_name("Ethiopian Yirgacheffe");
        assert_eq!(
            process(&["{{bean.displayName}} loaded."], &ctx),
            vec!["Ethiopian Yirgacheffe loaded."]
        );
    }

    #[test]
    fn test_multiple_placeholders_on_one_line() {
        let ctx = MessageContext::new()
            .with_active_bean_display_name("Test Bean")
            .with_active_bean_roast_level("Dark roast.");
        assert_eq!(
            process(&["{{bean.displayName}} - {{bean.roastLevel}}"], &ctx),
            vec!["Test Bean - Dark roast."]
        );
    }

    #[test]
    fn test_repeated_placeholder_replaced_everywhere() {
        let ctx = MessageContext::new().with_shot_count(3);
        assert_eq!(
            process(&["{{shotCount}} of {{shotCount}}"], &ctx),
            vec!["3 of 3"]
        );
    }

    #[test]
    fn test_integer_placeholders_always_resolve() {
        let ctx = MessageContext::new().with_shot_count(100).with_streak_days(7);
        assert_eq!(
            process(&["Shot {{shotCount}}.", "{{streakDays}} day streak."], &ctx),
            vec!["Shot 100.", "7 day streak."]
        );
    }

    #[test]
    fn test_drops_only_the_line_with_missing_value() {
        let lines = ["Line 1.", "{{bean.roastAge}}", "Line 3."];
        assert_eq!(
            process(&lines, &MessageContext::new()),
            vec!["Line 1.", "Line 3."]
        );
    }

    #[test]
    fn test_no_partial_substitution() {
        let ctx = MessageContext::new().with_active_bean_display_name("Test Bean");
        let out = process(&["{{bean.displayName}} - {{bean.roastAge}}"], &ctx);
        assert!(out.is_empty());
    }

    #[test]
    fn test_unknown_tokens_are_left_alone() {
        assert_eq!(
            process(&["{{bean.origin}}"], &MessageContext::new()),
            vec!["{{bean.origin}}"]
        );
    }
}
