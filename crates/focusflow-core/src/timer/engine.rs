//! Study timer state machine.
//!
//! The engine owns the transient countdown and never sleeps: the caller
//! invokes `tick()` once per second while the timer is active (see
//! [`TimerDriver`](super::TimerDriver)).
//!
//! ## Mode Transitions
//!
//! ```text
//! Study -> ShortBreak -> Study -> ... -> Study -> LongBreak -> Study
//!          (every `cycles_per_super_block`-th study block ends in LongBreak)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(settings, TimerPorts::in_memory());
//! engine.start();
//! // Once per second:
//! engine.tick(); // Returns Some(Event::SessionCompleted) when the segment ends
//! ```
//!
//! Log, streak, catalog and notification writes are best-effort: failures
//! are reported through `tracing` and the countdown carries on.

use chrono::{DateTime, Utc};

use super::interventions::{INTERVENTIONS, TWO_MINUTE_SECS};
use super::TimerMode;
use crate::breaks::BreakActivity;
use crate::error::TimerError;
use crate::events::Event;
use crate::notify::{session_ended_message, Notifier, NullNotifier};
use crate::random::{choose, PcgRandom, RandomSource};
use crate::session::StudySession;
use crate::settings::TimerSettings;
use crate::storage::{
    BreakActivityCatalog, MemoryCatalog, MemorySessionLog, MemoryStreak, SessionLog, StreakStore,
};

/// Collaborators the engine writes to and samples from.
pub struct TimerPorts {
    pub session_log: Box<dyn SessionLog>,
    pub streak: Box<dyn StreakStore>,
    pub catalog: Box<dyn BreakActivityCatalog>,
    pub notifier: Box<dyn Notifier>,
    pub rng: Box<dyn RandomSource>,
}

impl TimerPorts {
    /// Fresh in-memory stores, a silent notifier and an entropy-seeded rng.
    pub fn in_memory() -> Self {
        Self {
            session_log: Box::new(MemorySessionLog::new()),
            streak: Box::new(MemoryStreak::default()),
            catalog: Box::new(MemoryCatalog::default()),
            notifier: Box::new(NullNotifier),
            rng: Box::new(PcgRandom::from_entropy()),
        }
    }
}

pub struct TimerEngine {
    settings: TimerSettings,
    ports: TimerPorts,
    play_sound: bool,
    mode: TimerMode,
    is_active: bool,
    /// Seconds remaining in the current segment.
    time_left: u64,
    /// Seconds the current segment was armed with.
    segment_total: u64,
    session_start: Option<DateTime<Utc>>,
    cycles_completed: u32,
    current_break_activity: Option<BreakActivity>,
    interstitial_pending: bool,
}

impl TimerEngine {
    /// Create an engine in its initial state: paused study block with the
    /// full configured duration.
    pub fn new(settings: TimerSettings, ports: TimerPorts) -> Self {
        let segment_total = settings.duration_secs(TimerMode::Study);
        Self {
            settings,
            ports,
            play_sound: true,
            mode: TimerMode::Study,
            is_active: false,
            time_left: segment_total,
            segment_total,
            session_start: None,
            cycles_completed: 0,
            current_break_activity: None,
            interstitial_pending: false,
        }
    }

    /// Whether session-ended notifications ask for an audible cue.
    pub fn with_sound(mut self, play_sound: bool) -> Self {
        self.play_sound = play_sound;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn time_left(&self) -> u64 {
        self.time_left
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn cycles_completed(&self) -> u32 {
        self.cycles_completed
    }

    pub fn current_break_activity(&self) -> Option<&BreakActivity> {
        self.current_break_activity.as_ref()
    }

    pub fn session_start(&self) -> Option<DateTime<Utc>> {
        self.session_start
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn interstitial_pending(&self) -> bool {
        self.interstitial_pending
    }

    /// Current streak, 0 if the store cannot be read.
    pub fn streak(&self) -> u32 {
        self.ports.streak.read().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to read streak");
            0
        })
    }

    pub fn total_secs(&self) -> u64 {
        self.segment_total
    }

    /// 0.0 .. 100.0 progress within the current segment.
    pub fn progress_pct(&self) -> f64 {
        if self.segment_total == 0 {
            return 0.0;
        }
        let elapsed = self.segment_total.saturating_sub(self.time_left);
        (elapsed as f64 / self.segment_total as f64 * 100.0).min(100.0)
    }

    /// "Block 2 of 4", or "Super-Block 1 - Block 3 of 4" once a full
    /// super-block is behind.
    pub fn block_label(&self) -> String {
        let per = self.settings.cycles_per_super_block;
        let done = self.cycles_completed as i64;
        if per <= 0 {
            return format!("Block {}", done + 1);
        }
        if done >= per {
            format!(
                "Super-Block {} - Block {} of {}",
                done / per,
                done % per + 1,
                per
            )
        } else {
            format!("Block {} of {}", done + 1, per)
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.mode,
            is_active: self.is_active,
            time_left_secs: self.time_left,
            total_secs: self.segment_total,
            progress_pct: self.progress_pct(),
            cycles_completed: self.cycles_completed,
            block_label: self.block_label(),
            current_break_activity: self.current_break_activity.clone(),
            interstitial_pending: self.interstitial_pending,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Resume the countdown. Opens a new session unless one is in progress.
    ///
    /// No-op while running or while the post-session interstitial is up.
    pub fn start(&mut self) -> Option<Event> {
        if self.is_active || self.interstitial_pending {
            return None;
        }
        self.is_active = true;
        if self.session_start.is_none() {
            self.session_start = Some(Utc::now());
        }
        tracing::debug!(mode = %self.mode, time_left = self.time_left, "timer started");
        Some(Event::TimerStarted {
            mode: self.mode,
            time_left_secs: self.time_left,
            at: Utc::now(),
        })
    }

    /// Stop the countdown and log the running segment as incomplete.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_active || self.interstitial_pending {
            return None;
        }
        self.is_active = false;
        let logged = self.log_interrupted();
        tracing::debug!(mode = %self.mode, time_left = self.time_left, "timer paused");
        Some(Event::TimerPaused {
            mode: self.mode,
            time_left_secs: self.time_left,
            logged,
            at: Utc::now(),
        })
    }

    pub fn toggle(&mut self) -> Option<Event> {
        if self.is_active {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Call once per second. Returns `Some(Event::SessionCompleted)` when
    /// the segment runs out.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_active {
            return None;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            return Some(self.complete());
        }
        None
    }

    /// Jump to the next mode, logging the current segment once as
    /// incomplete. A running timer keeps running into the next segment.
    ///
    /// # Errors
    /// [`TimerError::StrictModeSkip`] when strict mode is on and a study
    /// block is running; nothing changes in that case.
    pub fn skip(&mut self) -> Result<Event, TimerError> {
        if self.settings.strict_mode && self.mode == TimerMode::Study && self.is_active {
            tracing::info!("skip rejected by strict mode");
            return Err(TimerError::StrictModeSkip);
        }
        let was_active = self.is_active;
        let from_mode = self.mode;
        let logged = self.log_interrupted();
        self.is_active = false;
        self.interstitial_pending = false;
        let to_mode = self.advance(false).0;
        if was_active {
            self.is_active = true;
            self.session_start = Some(Utc::now());
        }
        tracing::debug!(from = %from_mode, to = %to_mode, "timer skipped");
        Ok(Event::TimerSkipped {
            from_mode,
            to_mode,
            logged,
            auto_started: was_active,
            at: Utc::now(),
        })
    }

    /// Back to a paused first study block; clears cycles and the streak.
    pub fn reset(&mut self) -> Event {
        let logged = self.log_interrupted();
        self.is_active = false;
        self.interstitial_pending = false;
        self.cycles_completed = 0;
        self.current_break_activity = None;
        self.arm(TimerMode::Study);
        if let Err(e) = self.ports.streak.write(0) {
            tracing::warn!(error = %e, "failed to reset streak");
        }
        tracing::debug!("timer reset");
        Event::TimerReset {
            logged,
            at: Utc::now(),
        }
    }

    /// Adopt new settings. A paused countdown is re-armed with the new
    /// duration for the current mode; a running one is left alone.
    pub fn on_settings_changed(&mut self, settings: TimerSettings) -> Option<Event> {
        self.settings = settings;
        if self.is_active {
            return None;
        }
        self.arm(self.mode);
        Some(Event::SettingsApplied {
            mode: self.mode,
            time_left_secs: self.time_left,
            at: Utc::now(),
        })
    }

    /// Suggest a micro-exercise; a running timer is paused and its segment
    /// logged as incomplete.
    pub fn pattern_interrupt(&mut self) -> Event {
        let suggestion = choose(self.ports.rng.as_mut(), &INTERVENTIONS[..])
            .copied()
            .unwrap_or(INTERVENTIONS[0])
            .to_string();
        let logged = if self.is_active {
            self.is_active = false;
            self.log_interrupted()
        } else {
            None
        };
        Event::PatternInterrupt {
            suggestion,
            logged,
            at: Utc::now(),
        }
    }

    /// Start a two-minute study segment right away, abandoning the current one.
    pub fn two_minute_rule(&mut self) -> Event {
        let logged = self.log_interrupted();
        self.mode = TimerMode::Study;
        self.segment_total = TWO_MINUTE_SECS;
        self.time_left = TWO_MINUTE_SECS;
        self.current_break_activity = None;
        self.interstitial_pending = false;
        self.session_start = Some(Utc::now());
        self.is_active = true;
        Event::TwoMinuteRule {
            logged,
            time_left_secs: self.time_left,
            at: Utc::now(),
        }
    }

    /// Close the post-session interstitial. Returns whether one was open.
    pub fn dismiss_interstitial(&mut self) -> bool {
        std::mem::replace(&mut self.interstitial_pending, false)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> Event {
        self.is_active = false;
        let mode = self.mode;
        let logged = self.session_start.take().map(|start| {
            let total = self.segment_total;
            self.append_log(mode, total, start, true)
        });

        if self.settings.enable_notifications {
            let (title, message) = session_ended_message(mode);
            self.ports.notifier.notify(&title, message, self.play_sound);
        }
        self.interstitial_pending = true;

        let (next_mode, streak) = self.advance(true);
        tracing::info!(mode = %mode, next = %next_mode, cycles = self.cycles_completed, "session completed");
        Event::SessionCompleted {
            mode,
            next_mode,
            logged,
            streak,
            cycles_completed: self.cycles_completed,
            break_activity: self.current_break_activity.clone(),
            at: Utc::now(),
        }
    }

    /// Move to the mode after the current one. Study blocks bump the cycle
    /// count; the streak only when `credit_streak` is set.
    fn advance(&mut self, credit_streak: bool) -> (TimerMode, Option<u32>) {
        if self.mode != TimerMode::Study {
            self.current_break_activity = None;
            self.arm(TimerMode::Study);
            return (TimerMode::Study, None);
        }

        let streak = if credit_streak {
            self.bump_streak()
        } else {
            None
        };
        self.cycles_completed = self.cycles_completed.saturating_add(1);
        let next = self.settings.break_after(self.cycles_completed);
        self.arm(next);
        self.current_break_activity = self.sample_break_activity();
        (next, streak)
    }

    fn arm(&mut self, mode: TimerMode) {
        self.mode = mode;
        self.segment_total = self.settings.duration_secs(mode);
        self.time_left = self.segment_total;
    }

    fn bump_streak(&mut self) -> Option<u32> {
        let current = match self.ports.streak.read() {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read streak; not updating it");
                return None;
            }
        };
        let next = current.saturating_add(1);
        match self.ports.streak.write(next) {
            Ok(()) => Some(next),
            Err(e) => {
                tracing::warn!(error = %e, "failed to write streak");
                None
            }
        }
    }

    fn sample_break_activity(&mut self) -> Option<BreakActivity> {
        let activities = match self.ports.catalog.activities() {
            Ok(a) => a,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read break activities");
                return None;
            }
        };
        choose(self.ports.rng.as_mut(), &activities).cloned()
    }

    /// Close the in-progress session, if any, as incomplete.
    fn log_interrupted(&mut self) -> Option<StudySession> {
        let start = self.session_start.take()?;
        let elapsed = self.segment_total.saturating_sub(self.time_left);
        Some(self.append_log(self.mode, elapsed, start, false))
    }

    fn append_log(
        &mut self,
        mode: TimerMode,
        elapsed_secs: u64,
        start: DateTime<Utc>,
        completed: bool,
    ) -> StudySession {
        let session = StudySession::new(mode, elapsed_secs, start, Utc::now(), completed);
        if let Err(e) = self.ports.session_log.append(&session) {
            tracing::warn!(error = %e, session_id = %session.id, "failed to append session");
        }
        session
    }
}

/// Seconds as `MM:SS`.
pub fn format_time(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
