mod config;
pub mod database;
pub mod memory;
mod traits;

pub use config::{Config, ConfigStore, NotificationsConfig};
pub use database::Database;
pub use memory::{MemoryCatalog, MemorySessionLog, MemoryStreak};
pub use traits::{BreakActivityCatalog, SessionLog, SettingsStore, StreakStore};

use std::path::PathBuf;

/// Returns the directory holding `config.toml` and `focusflow.db`.
///
/// `FOCUSFLOW_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/focusflow[-dev]/`, where the `-dev` suffix is selected by
/// `FOCUSFLOW_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("FOCUSFLOW_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUSFLOW_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusflow-dev")
            } else {
                base_dir.join("focusflow")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
