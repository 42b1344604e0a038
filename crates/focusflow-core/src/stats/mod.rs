//! Statistics over the session log.
//!
//! Only completed study sessions count towards any figure here. Days are
//! bucketed in the time zone of the reference timestamp passed in, so the
//! CLI hands in `Local::now()` and tests can pin `Utc`.

mod dashboard;
mod streaks;

pub use dashboard::{daily_focus_minutes, goal_progress, DashboardStats, DayFocus, GoalProgress};
pub use streaks::{day_streaks, milestone_progress_pct, next_milestone, DayStreaks, MILESTONES};
