use clap::Subcommand;
use pomotally_core::{today, DailySessionRecord, SessionStore};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's completed sessions
    Today,
    /// Every recorded day, oldest first
    History,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SessionStore::open_default()?;

    match action {
        StatsAction::Today => {
            let record = DailySessionRecord {
                date: today(),
                count: store.count_for(today())?,
            };
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        StatsAction::History => {
            let records = store.all_records()?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }
    Ok(())
}
