//! Context types for condition evaluation.
//!
//! A [`MessageContext`] is a flat, read-only snapshot of the signals the
//! engine reasons over. It is built by the caller once per request; the
//! engine never mutates it.

use crate::condition::ConditionType;
use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

/// A signal value as reported by the context.
///
/// Lists never appear here; they are only used as rule-side operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextValue {
    Int(i64),
    String(String),
    Bool(bool),
}

/// Snapshot of shot history, active bean and calendar facts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageContext {
    pub shot_count: i64,
    /// `None` when no shot has been logged yet
    pub days_since_last_shot: Option<i64>,
    pub streak_days: i64,
    pub last_shot_rating: Option<String>,
    pub consecutive_bad_shots: i64,
    pub is_first_dialed_in: bool,

    pub bean_count: i64,
    pub active_bean_display_name: Option<String>,
    pub active_bean_roast_age: Option<String>,
    pub active_bean_roast_level: Option<String>,

    /// Hour of day, 0-23
    pub hour: i64,
    /// ISO weekday, 1 = Monday .. 7 = Sunday
    pub day_of_week: i64,
    /// Month, 1-12
    pub month: i64,

    pub unique_beans_used: i64,
    pub grind_settings_used: i64,
    pub recently_unlocked_achievement: Option<String>,
    pub closest_achievement_progress_percent: Option<i64>,
    pub retroactive_unlock_count: i64,
}

impl MessageContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the signal a condition type refers to.
    ///
    /// Returns `None` when the signal does not apply to the current state,
    /// which makes every condition on it unsatisfied.
    pub fn value(&self, condition_type: ConditionType) -> Option<ContextValue> {
        match condition_type {
            ConditionType::ShotCount => Some(ContextValue::Int(self.shot_count)),
            ConditionType::DaysSinceLastShot => self.days_since_last_shot.map(ContextValue::Int),
            ConditionType::StreakDays => Some(ContextValue::Int(self.streak_days)),
            ConditionType::LastShotRating => {
                self.last_shot_rating.clone().map(ContextValue::String)
            }
            ConditionType::ConsecutiveBadShots => {
                Some(ContextValue::Int(self.consecutive_bad_shots))
            }
            ConditionType::FirstDialedIn => Some(ContextValue::Bool(self.is_first_dialed_in)),
            ConditionType::Hour => Some(ContextValue::Int(self.hour)),
            ConditionType::DayOfWeek => Some(ContextValue::Int(self.day_of_week)),
            ConditionType::Month => Some(ContextValue::Int(self.month)),
            ConditionType::Always => Some(ContextValue::Bool(true)),
            ConditionType::BeanCount => Some(ContextValue::Int(self.bean_count)),
            ConditionType::UniqueBeansUsed => Some(ContextValue::Int(self.unique_beans_used)),
            ConditionType::GrindSettingsUsed => Some(ContextValue::Int(self.grind_settings_used)),
            ConditionType::RecentlyUnlockedAchievement => self
                .recently_unlocked_achievement
                .clone()
                .map(ContextValue::String),
            ConditionType::ClosestAchievementProgressPercent => self
                .closest_achievement_progress_percent
                .map(ContextValue::Int),
            ConditionType::RetroactiveUnlockCount => {
                Some(ContextValue::Int(self.retroactive_unlock_count))
            }
        }
    }

    /// Stamp hour, ISO weekday and month from a timestamp.
    pub fn at<T: Datelike + Timelike>(mut self, now: &T) -> Self {
        self.hour = i64::from(now.hour());
        self.day_of_week = i64::from(now.weekday().number_from_monday());
        self.month = i64::from(now.month());
        self
    }

    pub fn with_shot_count(mut self, count: i64) -> Self {
        self.shot_count = count;
        self
    }

    pub fn with_days_since_last_shot(mut self, days: i64) -> Self {
        self.days_since_last_shot = Some(days);
        self
    }

    pub fn with_streak_days(mut self, days: i64) -> Self {
        self.streak_days = days;
        self
    }

    pub fn with_last_shot_rating(mut self, rating: impl Into<String>) -> Self {
        self.last_shot_rating = Some(rating.into());
        self
    }

    pub fn with_consecutive_bad_shots(mut self, count: i64) -> Self {
        self.consecutive_bad_shots = count;
        self
    }

    pub fn with_first_dialed_in(mut self, first: bool) -> Self {
        self.is_first_dialed_in = first;
        self
    }

    pub fn with_bean_count(mut self, count: i64) -> Self {
        self.bean_count = count;
        self
    }

    pub fn with_active_bean_display_name(mut self, name: impl Into<String>) -> Self {
        self.active_bean_display_name = Some(name.into());
        self
    }

    pub fn with_active_bean_roast_age(mut self, age: impl Into<String>) -> Self {
        self.active_bean_roast_age = Some(age.into());
        self
    }

    pub fn with_active_bean_roast_level(mut self, level: impl Into<String>) -> Self {
        self.active_bean_roast_level = Some(level.into());
        self
    }

    pub fn with_hour(mut self, hour: i64) -> Self {
        self.hour = hour;
        self
    }

    pub fn with_day_of_week(mut self, day: i64) -> Self {
        self.day_of_week = day;
        self
    }

    pub fn with_month(mut self, month: i64) -> Self {
        self.month = month;
        self
    }

    pub fn with_unique_beans_used(mut self, count: i64) -> Self {
        self.unique_beans_used = count;
        self
    }

    pub fn with_grind_settings_used(mut self, count: i64) -> Self {
        self.grind_settings_used = count;
        self
    }

    pub fn with_recently_unlocked_achievement(mut self, id: impl Into<String>) -> Self {
        self.recently_unlocked_achievement = Some(id.into());
        self
    }

    pub fn with_closest_achievement_progress_percent(mut self, percent: i64) -> Self {
        self.closest_achievement_progress_percent = Some(percent);
        self
    }

    pub fn with_retroactive_unlock_count(mut self, count: i64) -> Self {
        self.retroactive_unlock_count = count;
        self
    }
}
