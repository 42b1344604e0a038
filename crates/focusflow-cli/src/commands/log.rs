use clap::Subcommand;
use focusflow_core::Database;

#[derive(Subcommand)]
pub enum LogAction {
    /// List logged sessions, oldest first
    List {
        /// Only the newest N entries
        #[arg(long)]
        limit: Option<usize>,
    },
}

pub fn run(action: LogAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    match action {
        LogAction::List { limit } => {
            let sessions = match limit {
                Some(n) => db.recent_sessions(n)?,
                None => db.sessions()?,
            };
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
    }
    Ok(())
}
