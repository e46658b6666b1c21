//! Shared helpers for CLI commands.

use std::fs::OpenOptions;
use std::io::Write;

/// Append a failure to `error.log` in the data directory, one
/// `<timestamp> - <error>` line per entry. Best effort: a failure to
/// log must never mask the error being logged.
pub fn log_error(err: &dyn std::error::Error) {
    let Ok(dir) = pomotally_core::storage::data_dir() else {
        return;
    };
    let line = format!("{} - {err}\n", chrono::Utc::now().to_rfc3339());
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("error.log"))
    {
        let _ = file.write_all(line.as_bytes());
    }
}
