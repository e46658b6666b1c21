use clap::Subcommand;
use pomotally_core::SessionStore;

#[derive(Subcommand)]
pub enum ExportAction {
    /// Rewrite the spreadsheet artifact from the primary store
    Rebuild,
    /// Show artifact paths and whether they exist
    Status,
}

pub fn run(action: ExportAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SessionStore::open_default()?;

    match action {
        ExportAction::Rebuild => {
            let rows = store.rebuild_export()?;
            println!("rebuilt {rows} rows");
        }
        ExportAction::Status => {
            for path in [store.db_path(), store.export_path(), store.summary_path()] {
                let state = if path.exists() { "present" } else { "missing" };
                println!("{} ({state})", path.display());
            }
            println!("{} days recorded", store.all_records()?.len());
        }
    }
    Ok(())
}
