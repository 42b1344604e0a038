//! Logged study and break sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timer::TimerMode;

/// One terminated timer segment. Immutable once appended to the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub duration_minutes: u32,
    #[serde(rename = "type")]
    pub session_type: TimerMode,
    /// True only when the segment ran its full length.
    pub completed: bool,
    #[serde(default)]
    pub topic: Option<String>,
}

impl StudySession {
    /// Build a log entry for a segment that ran `elapsed_secs` seconds.
    pub fn new(
        session_type: TimerMode,
        elapsed_secs: u64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        completed: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            start_time,
            end_time: Some(end_time),
            duration_minutes: round_minutes(elapsed_secs),
            session_type,
            completed,
            topic: None,
        }
    }

    pub fn is_completed_study(&self) -> bool {
        self.completed && self.session_type == TimerMode::Study
    }
}

/// Seconds to whole minutes, halves rounding up.
pub fn round_minutes(secs: u64) -> u32 {
    let min = secs.saturating_add(30) / 60;
    u32::try_from(min).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_nearest_minute() {
        assert_eq!(round_minutes(0), 0);
        assert_eq!(round_minutes(29), 0);
        assert_eq!(round_minutes(30), 1);
        assert_eq!(round_minutes(120), 2);
        assert_eq!(round_minutes(149), 2);
        assert_eq!(round_minutes(150), 3);
    }

    #[test]
    fn json_uses_type_key() {
        let now = Utc::now();
        let s = StudySession::new(TimerMode::LongBreak, 900, now, now, true);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["type"], "long_break");
        assert_eq!(json["duration_minutes"], 15);
        assert!(json["topic"].is_null());
    }

    #[test]
    fn ids_are_unique() {
        let now = Utc::now();
        let a = StudySession::new(TimerMode::Study, 60, now, now, false);
        let b = StudySession::new(TimerMode::Study, 60, now, now, false);
        assert_ne!(a.id, b.id);
    }
}
