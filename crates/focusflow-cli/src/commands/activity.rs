use clap::Subcommand;
use focusflow_core::storage::BreakActivityCatalog;
use focusflow_core::{BreakActivity, Database};

#[derive(Subcommand)]
pub enum ActivityAction {
    /// Add a break activity
    Add {
        /// Activity name
        name: String,
        /// Category (e.g. "Quick Exercise")
        #[arg(long)]
        category: Option<String>,
        /// Link to open during the break
        #[arg(long)]
        url: Option<String>,
    },
    /// Remove a break activity by ID
    Remove {
        /// Activity ID
        id: String,
    },
    /// List break activities
    List,
}

pub fn run(action: ActivityAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    match action {
        ActivityAction::Add {
            name,
            category,
            url,
        } => {
            let activity = BreakActivity::new(&name, category, url)?;
            db.add(&activity)?;
            println!("{}", serde_json::to_string_pretty(&activity)?);
        }
        ActivityAction::Remove { id } => {
            if !db.remove(&id)? {
                return Err(format!("activity not found: {id}").into());
            }
            println!("removed {id}");
        }
        ActivityAction::List => {
            let activities = db.activities()?;
            println!("{}", serde_json::to_string_pretty(&activities)?);
        }
    }
    Ok(())
}
