use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::breaks::BreakActivity;
use crate::session::StudySession;
use crate::timer::TimerMode;

/// Every state change of the timer produces an Event.
/// Front ends render them; `logged` carries the session entry the change
/// appended to the log, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        time_left_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        time_left_secs: u64,
        logged: Option<StudySession>,
        at: DateTime<Utc>,
    },
    /// A segment ran down to zero.
    SessionCompleted {
        mode: TimerMode,
        next_mode: TimerMode,
        logged: Option<StudySession>,
        /// Streak after the update; `None` when the mode was a break or
        /// the streak store failed.
        streak: Option<u32>,
        cycles_completed: u32,
        break_activity: Option<BreakActivity>,
        at: DateTime<Utc>,
    },
    TimerSkipped {
        from_mode: TimerMode,
        to_mode: TimerMode,
        logged: Option<StudySession>,
        auto_started: bool,
        at: DateTime<Utc>,
    },
    TimerReset {
        logged: Option<StudySession>,
        at: DateTime<Utc>,
    },
    /// Settings changed while paused; the countdown was re-armed.
    SettingsApplied {
        mode: TimerMode,
        time_left_secs: u64,
        at: DateTime<Utc>,
    },
    PatternInterrupt {
        suggestion: String,
        logged: Option<StudySession>,
        at: DateTime<Utc>,
    },
    TwoMinuteRule {
        logged: Option<StudySession>,
        time_left_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: TimerMode,
        is_active: bool,
        time_left_secs: u64,
        total_secs: u64,
        progress_pct: f64,
        cycles_completed: u32,
        block_label: String,
        current_break_activity: Option<BreakActivity>,
        interstitial_pending: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The session entry this event appended, if any.
    pub fn logged(&self) -> Option<&StudySession> {
        match self {
            Event::TimerPaused { logged, .. }
            | Event::SessionCompleted { logged, .. }
            | Event::TimerSkipped { logged, .. }
            | Event::TimerReset { logged, .. }
            | Event::PatternInterrupt { logged, .. }
            | Event::TwoMinuteRule { logged, .. } => logged.as_ref(),
            _ => None,
        }
    }
}
