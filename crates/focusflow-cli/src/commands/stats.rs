use chrono::Local;
use clap::Subcommand;
use focusflow_core::stats::{
    daily_focus_minutes, day_streaks, goal_progress, milestone_progress_pct, next_milestone,
    DashboardStats, DayFocus, DayStreaks,
};
use focusflow_core::storage::{SessionLog, StreakStore};
use focusflow_core::{Config, Database};
use serde::Serialize;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's and this week's totals
    Today,
    /// Study minutes per day
    Week {
        /// Number of days, ending today
        #[arg(long, default_value = "7")]
        days: u32,
    },
    /// Progress towards the daily goal
    Goal,
    /// Block streak and day streaks
    Streaks,
}

#[derive(Serialize)]
struct StreakReport {
    blocks: u32,
    next_milestone: Option<u32>,
    milestone_progress_pct: f64,
    #[serde(flatten)]
    days: DayStreaks,
}

#[derive(Serialize)]
struct WeekReport {
    days: Vec<DayFocus>,
    total_minutes: u64,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let sessions = db.list()?;
    let now = Local::now();

    match action {
        StatsAction::Today => {
            let stats = DashboardStats::aggregate(&sessions, &now);
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Week { days } => {
            let days = daily_focus_minutes(&sessions, &now, days);
            let total_minutes = days.iter().map(|d| d.minutes).sum();
            let report = WeekReport {
                days,
                total_minutes,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        StatsAction::Goal => {
            let config = Config::load()?;
            let stats = DashboardStats::aggregate(&sessions, &now);
            let progress = goal_progress(&config.timer, &stats);
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        StatsAction::Streaks => {
            let blocks = StreakStore::read(&db)?;
            let report = StreakReport {
                blocks,
                next_milestone: next_milestone(blocks),
                milestone_progress_pct: milestone_progress_pct(blocks),
                days: day_streaks(&sessions, &now),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
