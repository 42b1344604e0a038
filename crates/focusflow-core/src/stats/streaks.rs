use chrono::{DateTime, Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::session::StudySession;

/// Block-streak milestones, in order.
pub const MILESTONES: [u32; 4] = [3, 7, 14, 30];

/// Runs of consecutive calendar days with at least one completed study block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStreaks {
    /// Run ending today, or yesterday if nothing is logged today yet.
    pub current_days: u32,
    pub longest_days: u32,
}

pub fn day_streaks<Tz: TimeZone>(sessions: &[StudySession], now: &DateTime<Tz>) -> DayStreaks {
    let tz = now.timezone();
    let days: BTreeSet<NaiveDate> = sessions
        .iter()
        .filter(|s| s.is_completed_study())
        .map(|s| s.start_time.with_timezone(&tz).date_naive())
        .collect();

    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;
    for &day in &days {
        run = match prev {
            Some(p) if p.succ_opt() == Some(day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }

    let today = now.date_naive();
    let anchor = if days.contains(&today) {
        Some(today)
    } else {
        today
            .checked_sub_signed(Duration::days(1))
            .filter(|y| days.contains(y))
    };
    let mut current = 0;
    let mut cursor = anchor;
    while let Some(day) = cursor.filter(|d| days.contains(d)) {
        current += 1;
        cursor = day.pred_opt();
    }

    DayStreaks {
        current_days: current,
        longest_days: longest,
    }
}

/// Smallest milestone above `streak`; `None` once all are reached.
pub fn next_milestone(streak: u32) -> Option<u32> {
    MILESTONES.iter().copied().find(|&m| streak < m)
}

/// 0.0 .. 100.0 towards the next milestone; 100 when none is left.
pub fn milestone_progress_pct(streak: u32) -> f64 {
    match next_milestone(streak) {
        Some(m) => f64::from(streak) / f64::from(m) * 100.0,
        None => 100.0,
    }
}
