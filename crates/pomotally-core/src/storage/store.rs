//! SQLite-backed daily session counters.
//!
//! The `daily_sessions` table (one row per calendar day) is the single
//! source of truth. Every successful counter update also refreshes the
//! derived artifacts next to the database: a spreadsheet-style CSV of
//! all days, a one-line daily summary, and a per-day marker file.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{Local, NaiveDate};
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

use super::export::{self, ExportRow};

pub const DB_FILE: &str = "pomotally.db";
pub const EXPORT_FILE: &str = "session-history.csv";
pub const SUMMARY_FILE: &str = "daily-sessions.txt";

/// The local calendar date completed sessions are attributed to.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// One day's durable counter state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySessionRecord {
    pub date: NaiveDate,
    pub count: u32,
}

/// Durable store for completed-session counts.
///
/// Shared freely across threads; the connection mutex serializes all
/// access, which makes it the single-writer queue for counter updates.
/// A second lock serializes the export read-modify-write cycle, which
/// spans file reads and writes the connection lock cannot cover.
pub struct SessionStore {
    conn: Mutex<Connection>,
    export_lock: Mutex<()>,
    dir: PathBuf,
}

impl SessionStore {
    /// Open the store at `<data_dir>/sessions/`.
    ///
    /// Creates the directory, database file and schema if they don't
    /// exist. Failure here is fatal to the application.
    pub fn open_default() -> Result<Self, StoreError> {
        let base = super::data_dir().map_err(|e| StoreError::Init {
            path: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config"),
            source: Box::new(e),
        })?;
        Self::open_at(&base.join("sessions"))
    }

    /// Open the store rooted at an explicit directory.
    pub fn open_at(dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(dir).map_err(|e| StoreError::Init {
            path: dir.to_path_buf(),
            source: Box::new(e),
        })?;
        let db_path = dir.join(DB_FILE);
        let conn = Connection::open(&db_path).map_err(|e| StoreError::Init {
            path: db_path.clone(),
            source: Box::new(e),
        })?;
        let store = Self {
            conn: Mutex::new(conn),
            export_lock: Mutex::new(()),
            dir: dir.to_path_buf(),
        };
        store.migrate().map_err(|e| StoreError::Init {
            path: db_path,
            source: Box::new(e),
        })?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.lock_conn().execute_batch(
            "CREATE TABLE IF NOT EXISTS daily_sessions (
                date  TEXT PRIMARY KEY,
                count INTEGER NOT NULL DEFAULT 0
            );",
        )
    }

    // A poisoned lock still guards a usable connection; recover the
    // guard instead of wedging every later counter operation.
    fn lock_conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Lock ordering: export before connection, never the reverse.
    fn lock_export(&self) -> MutexGuard<'_, ()> {
        self.export_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // ── Paths ────────────────────────────────────────────────────────

    pub fn session_dir(&self) -> &Path {
        &self.dir
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.join(DB_FILE)
    }

    pub fn export_path(&self) -> PathBuf {
        self.dir.join(EXPORT_FILE)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(SUMMARY_FILE)
    }

    // ── Counter operations ───────────────────────────────────────────

    /// Increment the durable counter for `date` and return the updated
    /// count. Refreshes the derived artifacts afterwards; artifact
    /// trouble is logged and swallowed, so the counter update alone
    /// decides success.
    ///
    /// The upsert and the read-back run under one connection guard, so
    /// concurrent callers each observe their own increment.
    pub fn record_completion(&self, date: NaiveDate) -> Result<u32, StoreError> {
        let key = date_key(date);
        let count = {
            let conn = self.lock_conn();
            conn.execute(
                "INSERT INTO daily_sessions (date, count) VALUES (?1, 1)
                 ON CONFLICT(date) DO UPDATE SET count = count + 1",
                params![key],
            )
            .map_err(StoreError::Write)?;
            conn.query_row(
                "SELECT count FROM daily_sessions WHERE date = ?1",
                params![key],
                |row| row.get::<_, u32>(0),
            )
            .map_err(StoreError::Read)?
        };
        if let Err(e) = self.sync_export(date) {
            tracing::warn!("export refresh failed after recording {key}: {e}");
        }
        Ok(count)
    }

    /// Current count for `date`; zero when the day has no row yet.
    pub fn count_for(&self, date: NaiveDate) -> Result<u32, StoreError> {
        let conn = self.lock_conn();
        let result = conn.query_row(
            "SELECT count FROM daily_sessions WHERE date = ?1",
            params![date_key(date)],
            |row| row.get::<_, u32>(0),
        );
        match result {
            Ok(count) => Ok(count),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(e) => Err(StoreError::Read(e)),
        }
    }

    /// All recorded days in ascending date order.
    pub fn all_records(&self) -> Result<Vec<DailySessionRecord>, StoreError> {
        let conn = self.lock_conn();
        let mut stmt = conn
            .prepare("SELECT date, count FROM daily_sessions ORDER BY date")
            .map_err(StoreError::Read)?;
        let rows = stmt
            .query_map([], |row| {
                let raw: String = row.get(0)?;
                let date = raw.parse::<NaiveDate>().map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
                })?;
                Ok(DailySessionRecord {
                    date,
                    count: row.get(1)?,
                })
            })
            .map_err(StoreError::Read)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(StoreError::Read)?);
        }
        Ok(records)
    }

    // ── Export operations ────────────────────────────────────────────

    /// Refresh every derived artifact for `date` from the primary
    /// store: locate the day's CSV row, update or append, rewrite
    /// sorted by calendar date. A date the primary table has never
    /// recorded adds no row. An unreadable artifact is rebuilt from
    /// the primary table instead of failing the operation. Idempotent:
    /// repeated calls with an unchanged counter produce identical
    /// artifacts.
    ///
    /// The count is read under the export guard, so overlapping calls
    /// apply in some serial order and the last one to run writes the
    /// latest committed count.
    pub fn sync_export(&self, date: NaiveDate) -> Result<(), StoreError> {
        let _guard = self.lock_export();
        let count = self.count_for(date)?;
        let csv_path = self.export_path();
        let mut rows = match export::load_rows(&csv_path) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("export artifact unreadable ({e}); rebuilding from primary store");
                self.export_rows()?
            }
        };
        match rows.iter_mut().find(|row| row.date == date) {
            Some(row) => row.count = count,
            None if count > 0 => rows.push(ExportRow { date, count }),
            // No primary row and no artifact row: nothing to mirror.
            None => {}
        }
        export::write_rows(&csv_path, rows)?;
        export::write_summary(&self.summary_path(), date, count)?;
        export::write_marker(&self.dir, date, count)?;
        Ok(())
    }

    /// Discard the artifact's current contents and replay the primary
    /// table into it. Returns the number of rows written.
    pub fn rebuild_export(&self) -> Result<usize, StoreError> {
        let _guard = self.lock_export();
        let rows = self.export_rows()?;
        let written = rows.len();
        export::write_rows(&self.export_path(), rows)?;
        Ok(written)
    }

    fn export_rows(&self) -> Result<Vec<ExportRow>, StoreError> {
        Ok(self
            .all_records()?
            .into_iter()
            .map(|record| ExportRow {
                date: record.date,
                count: record.count,
            })
            .collect())
    }
}
