mod config;
mod export;
mod store;

pub use config::{Config, HabitConfig, IntervalsConfig, NotificationsConfig};
pub use store::{today, DailySessionRecord, SessionStore};

use std::path::PathBuf;

/// Returns `~/.config/pomotally[-dev]/` based on POMOTALLY_ENV.
///
/// Set POMOTALLY_ENV=dev to use the development data directory, or
/// POMOTALLY_DATA_DIR to pin an explicit path (tests, portable
/// installs).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    if let Ok(dir) = std::env::var("POMOTALLY_DATA_DIR") {
        let dir = PathBuf::from(dir);
        std::fs::create_dir_all(&dir)?;
        return Ok(dir);
    }

    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMOTALLY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomotally-dev")
    } else {
        base_dir.join("pomotally")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
