//! Timer settings shared by the timer core, the config file and the CLI.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::timer::TimerMode;

/// What the daily goal is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DailyGoalType {
    Blocks,
    Hours,
}

/// User-editable timer configuration.
///
/// Durations are minutes. They are signed so that a hand-edited config
/// with a zero or negative value still loads; the timer treats such a
/// segment as already elapsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSettings {
    #[serde(default = "default_study_duration")]
    pub study_duration: i64,
    #[serde(default = "default_short_break_duration")]
    pub short_break_duration: i64,
    #[serde(default = "default_long_break_duration")]
    pub long_break_duration: i64,
    /// Study blocks per super-block; a long break closes each super-block.
    #[serde(default = "default_cycles_per_super_block")]
    pub cycles_per_super_block: i64,
    #[serde(default = "default_daily_goal_type")]
    pub daily_goal_type: DailyGoalType,
    #[serde(default = "default_daily_goal_value")]
    pub daily_goal_value: f64,
    #[serde(default = "default_true")]
    pub enable_notifications: bool,
    #[serde(default)]
    pub strict_mode: bool,
}

fn default_study_duration() -> i64 {
    60
}
fn default_short_break_duration() -> i64 {
    10
}
fn default_long_break_duration() -> i64 {
    30
}
fn default_cycles_per_super_block() -> i64 {
    4
}
fn default_daily_goal_type() -> DailyGoalType {
    DailyGoalType::Blocks
}
fn default_daily_goal_value() -> f64 {
    8.0
}
fn default_true() -> bool {
    true
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            study_duration: default_study_duration(),
            short_break_duration: default_short_break_duration(),
            long_break_duration: default_long_break_duration(),
            cycles_per_super_block: default_cycles_per_super_block(),
            daily_goal_type: default_daily_goal_type(),
            daily_goal_value: default_daily_goal_value(),
            enable_notifications: true,
            strict_mode: false,
        }
    }
}

impl TimerSettings {
    /// Configured minutes for `mode`, as stored.
    pub fn duration_min(&self, mode: TimerMode) -> i64 {
        match mode {
            TimerMode::Study => self.study_duration,
            TimerMode::ShortBreak => self.short_break_duration,
            TimerMode::LongBreak => self.long_break_duration,
        }
    }

    /// Configured length of `mode` in seconds. Non-positive durations map to 0.
    pub fn duration_secs(&self, mode: TimerMode) -> u64 {
        let min = self.duration_min(mode).max(0) as u64;
        min.saturating_mul(60)
    }

    /// Break that follows the study block which brought the count to
    /// `cycles_completed`.
    ///
    /// A non-positive `cycles_per_super_block` disables long breaks.
    pub fn break_after(&self, cycles_completed: u32) -> TimerMode {
        if self.cycles_per_super_block <= 0 {
            return TimerMode::ShortBreak;
        }
        if cycles_completed as i64 % self.cycles_per_super_block == 0 {
            TimerMode::LongBreak
        } else {
            TimerMode::ShortBreak
        }
    }

    /// Check the invariants a valid configuration must satisfy.
    ///
    /// # Errors
    /// Returns the first violated field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let positive = [
            ("study_duration", self.study_duration),
            ("short_break_duration", self.short_break_duration),
            ("long_break_duration", self.long_break_duration),
            ("cycles_per_super_block", self.cycles_per_super_block),
        ];
        for (field, value) in positive {
            if value <= 0 {
                return Err(ValidationError::NotPositive {
                    field: field.to_string(),
                    value: value.to_string(),
                });
            }
        }
        if !(self.daily_goal_value > 0.0) {
            return Err(ValidationError::NotPositive {
                field: "daily_goal_value".to_string(),
                value: self.daily_goal_value.to_string(),
            });
        }
        Ok(())
    }
}
