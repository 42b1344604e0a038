use clap::Subcommand;
use focusflow_core::storage::StreakStore;
use focusflow_core::Database;

#[derive(Subcommand)]
pub enum StreakAction {
    /// Print the number of completed study blocks in the current streak
    Show,
    /// Set the streak back to zero
    Reset,
}

pub fn run(action: StreakAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    match action {
        StreakAction::Show => {
            let streak = StreakStore::read(&db)?;
            println!("{}", serde_json::json!({ "streak": streak }));
        }
        StreakAction::Reset => {
            StreakStore::write(&db, 0)?;
            println!("streak reset");
        }
    }
    Ok(())
}
