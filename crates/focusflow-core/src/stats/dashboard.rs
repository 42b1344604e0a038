use chrono::{DateTime, Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::session::StudySession;
use crate::settings::{DailyGoalType, TimerSettings};

/// Today and last-seven-days totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub study_minutes_today: u64,
    pub completed_blocks_today: u64,
    pub weekly_study_minutes: u64,
    pub weekly_completed_blocks: u64,
}

impl DashboardStats {
    pub fn aggregate<Tz: TimeZone>(sessions: &[StudySession], now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let week_ago = now.clone() - Duration::days(7);

        let mut stats = Self::default();
        for s in sessions.iter().filter(|s| s.is_completed_study()) {
            let local = s.start_time.with_timezone(&tz);
            if local.date_naive() == today {
                stats.study_minutes_today += u64::from(s.duration_minutes);
                stats.completed_blocks_today += 1;
            }
            if local >= week_ago {
                stats.weekly_study_minutes += u64::from(s.duration_minutes);
                stats.weekly_completed_blocks += 1;
            }
        }
        stats
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayFocus {
    pub date: NaiveDate,
    pub minutes: u64,
}

/// Study minutes per day for the `days` days ending today, oldest first.
/// Days without sessions are present with 0 minutes.
pub fn daily_focus_minutes<Tz: TimeZone>(
    sessions: &[StudySession],
    now: &DateTime<Tz>,
    days: u32,
) -> Vec<DayFocus> {
    let tz = now.timezone();
    let today = now.date_naive();
    let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for s in sessions.iter().filter(|s| s.is_completed_study()) {
        let date = s.start_time.with_timezone(&tz).date_naive();
        *per_day.entry(date).or_default() += u64::from(s.duration_minutes);
    }

    (0..days)
        .rev()
        .filter_map(|back| today.checked_sub_signed(Duration::days(i64::from(back))))
        .map(|date| DayFocus {
            date,
            minutes: per_day.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// Progress towards today's goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal_type: DailyGoalType,
    pub goal_value: f64,
    /// Blocks, or hours, achieved today.
    pub achieved: f64,
    /// 0.0 .. 100.0
    pub percent: f64,
}

pub fn goal_progress(settings: &TimerSettings, stats: &DashboardStats) -> GoalProgress {
    let achieved = match settings.daily_goal_type {
        DailyGoalType::Blocks => stats.completed_blocks_today as f64,
        DailyGoalType::Hours => stats.study_minutes_today as f64 / 60.0,
    };
    let percent = if settings.daily_goal_value > 0.0 {
        (achieved / settings.daily_goal_value * 100.0).min(100.0)
    } else {
        0.0
    };
    GoalProgress {
        goal_type: settings.daily_goal_type,
        goal_value: settings.daily_goal_value,
        achieved,
        percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerMode;
    use chrono::{TimeZone, Utc};

    fn session(mode: TimerMode, minutes: u64, completed: bool, days_ago: i64) -> StudySession {
        let start = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap() - Duration::days(days_ago);
        StudySession::new(mode, minutes * 60, start, start, completed)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 18, 0, 0).unwrap()
    }

    #[test]
    fn aggregate_counts_completed_study_only() {
        let log = vec![
            session(TimerMode::Study, 25, true, 0),
            session(TimerMode::Study, 10, false, 0),
            session(TimerMode::ShortBreak, 5, true, 0),
            session(TimerMode::Study, 25, true, 3),
            session(TimerMode::Study, 25, true, 9),
        ];
        let stats = DashboardStats::aggregate(&log, &now());
        assert_eq!(stats.completed_blocks_today, 1);
        assert_eq!(stats.study_minutes_today, 25);
        assert_eq!(stats.weekly_completed_blocks, 2);
        assert_eq!(stats.weekly_study_minutes, 50);
    }

    #[test]
    fn daily_minutes_fill_gaps() {
        let log = vec![
            session(TimerMode::Study, 25, true, 0),
            session(TimerMode::Study, 30, true, 0),
            session(TimerMode::Study, 45, true, 2),
        ];
        let days = daily_focus_minutes(&log, &now(), 3);
        let minutes: Vec<_> = days.iter().map(|d| d.minutes).collect();
        assert_eq!(minutes, vec![45, 0, 55]);
        assert_eq!(days[2].date, now().date_naive());
    }

    #[test]
    fn goal_progress_in_blocks_and_hours() {
        let stats = DashboardStats {
            study_minutes_today: 90,
            completed_blocks_today: 2,
            ..DashboardStats::default()
        };
        let blocks = TimerSettings {
            daily_goal_value: 8.0,
            ..TimerSettings::default()
        };
        assert_eq!(goal_progress(&blocks, &stats).percent, 25.0);

        let hours = TimerSettings {
            daily_goal_type: DailyGoalType::Hours,
            daily_goal_value: 1.0,
            ..TimerSettings::default()
        };
        let p = goal_progress(&hours, &stats);
        assert_eq!(p.achieved, 1.5);
        assert_eq!(p.percent, 100.0);
    }
}
