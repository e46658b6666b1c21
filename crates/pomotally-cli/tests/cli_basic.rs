//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. Each
//! test points `POMOTALLY_DATA_DIR` at its own temp directory, so
//! nothing touches the real home directory and tests stay independent.

use std::path::Path;
use std::process::Command;

/// Run a CLI command against `data_dir` and return output.
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "pomotally-cli", "--"])
        .args(args)
        .env("POMOTALLY_DATA_DIR", data_dir)
        .output()
        .expect("failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_config_list_shows_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("\"focus_secs\": 1500"));
    assert!(stdout.contains("\"break_secs\": 300"));
}

#[test]
fn test_config_set_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["config", "set", "intervals.focus_secs", "10"]);
    assert_eq!(code, 0);
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "intervals.focus_secs"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "10");
}

#[test]
fn test_config_get_unknown_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "no.such.key"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_config_reset_restores_defaults() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["config", "set", "intervals.break_secs", "7"]);
    let (_, _, code) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "intervals.break_secs"]);
    assert_eq!(stdout.trim(), "300");
}

#[test]
fn test_stats_today_starts_at_zero() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["stats", "today"]);
    assert_eq!(code, 0);
    let record: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(record["count"], 0);
}

#[test]
fn test_stats_history_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["stats", "history"]);
    assert_eq!(code, 0);
    let records: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(records, serde_json::json!([]));
}

#[test]
fn test_export_rebuild_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["export", "rebuild"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("rebuilt 0 rows"));
}

#[test]
fn test_export_status_lists_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["export", "status"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("pomotally.db (present)"));
    assert!(stdout.contains("session-history.csv (missing)"));
    assert!(stdout.contains("0 days recorded"));
}
