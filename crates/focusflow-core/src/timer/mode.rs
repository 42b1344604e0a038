use serde::{Deserialize, Serialize};

/// Which interval the timer is counting down.
///
/// Doubles as the `type` of a logged [`StudySession`](crate::StudySession).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Study,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub fn is_break(&self) -> bool {
        !matches!(self, TimerMode::Study)
    }

    /// Human-readable title, e.g. "Short Break".
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Study => "Study",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Study => "study",
            TimerMode::ShortBreak => "short_break",
            TimerMode::LongBreak => "long_break",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "study" => Some(TimerMode::Study),
            "short_break" => Some(TimerMode::ShortBreak),
            "long_break" => Some(TimerMode::LongBreak),
            _ => None,
        }
    }
}

impl std::fmt::Display for TimerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
