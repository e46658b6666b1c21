//! Denormalized export artifacts.
//!
//! The primary store stays authoritative; everything in here is a
//! derived view that can be regenerated from it at any time. Export
//! rows carry display-formatted `DD-MM-YYYY` dates, so ordering always
//! goes through the parsed calendar date - sorting the formatted
//! strings directly would put `01-02-2025` before `02-01-2025`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::ExportError;

/// Display date format used in the spreadsheet-style export.
const DISPLAY_FORMAT: &str = "%d-%m-%Y";
const HEADER: [&str; 2] = ["Date", "Sessions"];

/// One row of the export artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub date: NaiveDate,
    pub count: u32,
}

pub(crate) fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

pub(crate) fn parse_display_date(s: &str) -> Result<NaiveDate, ExportError> {
    NaiveDate::parse_from_str(s, DISPLAY_FORMAT)
        .map_err(|e| ExportError::MalformedRow(format!("bad date '{s}': {e}")))
}

/// Read all rows from an existing artifact. A missing file is an empty
/// artifact, not an error.
pub(crate) fn load_rows(path: &Path) -> Result<Vec<ExportRow>, ExportError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let date_field = record
            .get(0)
            .ok_or_else(|| ExportError::MalformedRow("missing date column".into()))?;
        let count_field = record
            .get(1)
            .ok_or_else(|| ExportError::MalformedRow("missing count column".into()))?;
        let date = parse_display_date(date_field)?;
        let count = count_field
            .trim()
            .parse::<u32>()
            .map_err(|e| ExportError::MalformedRow(format!("bad count '{count_field}': {e}")))?;
        rows.push(ExportRow { date, count });
    }
    Ok(rows)
}

/// Replace the artifact with the given rows, sorted by calendar date.
///
/// Writes a sibling temp file and renames it over the target, so a
/// crash mid-write never leaves a torn artifact behind.
pub(crate) fn write_rows(path: &Path, mut rows: Vec<ExportRow>) -> Result<(), ExportError> {
    rows.sort_by_key(|row| row.date);
    let tmp_path = path.with_extension("tmp");
    {
        let mut writer = csv::Writer::from_path(&tmp_path)?;
        writer.write_record(HEADER)?;
        for row in &rows {
            writer.write_record(&[display_date(row.date), row.count.to_string()])?;
        }
        writer.flush()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// `daily-sessions.txt`: one-line summary of the given day's total.
pub(crate) fn write_summary(path: &Path, date: NaiveDate, count: u32) -> Result<(), ExportError> {
    fs::write(path, format!("{}: {}", date.format("%Y-%m-%d"), count))?;
    Ok(())
}

/// `pomo_<date>.txt`: per-day marker holding that day's count, for
/// scripts that watch the session directory.
pub(crate) fn marker_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("pomo_{}.txt", date.format("%Y-%m-%d")))
}

pub(crate) fn write_marker(dir: &Path, date: NaiveDate, count: u32) -> Result<(), ExportError> {
    fs::write(marker_path(dir, date), count.to_string())?;
    Ok(())
}
