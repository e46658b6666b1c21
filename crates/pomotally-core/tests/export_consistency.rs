//! Integration tests for counter durability and export consistency.
//!
//! These exercise the persistence layer end to end: sequential and
//! concurrent counter updates, and the derived CSV artifact staying in
//! step with the primary store.

use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use proptest::prelude::*;

use pomotally_core::SessionStore;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Parsed view of the export artifact: (calendar date, count) per row.
fn read_artifact(store: &SessionStore) -> Vec<(NaiveDate, u32)> {
    let text = std::fs::read_to_string(store.export_path()).unwrap();
    text.lines()
        .skip(1) // header
        .map(|line| {
            let (date_field, count_field) = line.split_once(',').unwrap();
            (
                NaiveDate::parse_from_str(date_field, "%d-%m-%Y").unwrap(),
                count_field.parse::<u32>().unwrap(),
            )
        })
        .collect()
}

#[test]
fn test_sequential_increments_accumulate() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::open_at(dir.path()).unwrap();
    let day = date(2025, 5, 20);
    for expected in 1..=10 {
        assert_eq!(store.record_completion(day).unwrap(), expected);
        assert_eq!(store.count_for(day).unwrap(), expected);
    }
}

#[test]
fn test_concurrent_increments_lose_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SessionStore::open_at(dir.path()).unwrap());
    let day = date(2025, 5, 20);

    let threads = 8;
    let per_thread = 5;
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..per_thread {
                    store.record_completion(day).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let total = threads * per_thread;
    assert_eq!(store.count_for(day).unwrap(), total);

    // The last export to run observed the final count.
    let rows = read_artifact(&store);
    assert_eq!(rows, vec![(day, total)]);
}

#[test]
fn test_export_sorted_one_row_per_date() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::open_at(dir.path()).unwrap();

    // Deliberately unsorted, with dates whose display strings sort
    // differently from their calendar order.
    let feb1 = date(2025, 2, 1);
    let jan2 = date(2025, 1, 2);
    let dec31 = date(2024, 12, 31);
    store.record_completion(feb1).unwrap();
    store.record_completion(jan2).unwrap();
    store.record_completion(jan2).unwrap();
    store.record_completion(dec31).unwrap();
    store.record_completion(feb1).unwrap();

    let rows = read_artifact(&store);
    assert_eq!(rows, vec![(dec31, 1), (jan2, 2), (feb1, 2)]);
}

#[test]
fn test_sync_export_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::open_at(dir.path()).unwrap();
    let day = date(2025, 5, 20);
    store.record_completion(day).unwrap();
    store.record_completion(date(2025, 5, 21)).unwrap();

    store.sync_export(day).unwrap();
    let first = std::fs::read_to_string(store.export_path()).unwrap();
    store.sync_export(day).unwrap();
    let second = std::fs::read_to_string(store.export_path()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_rebuild_matches_incremental_export() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::open_at(dir.path()).unwrap();
    for day in [date(2025, 3, 1), date(2025, 1, 15), date(2025, 2, 28)] {
        store.record_completion(day).unwrap();
        store.record_completion(day).unwrap();
    }
    let incremental = std::fs::read_to_string(store.export_path()).unwrap();

    std::fs::remove_file(store.export_path()).unwrap();
    store.rebuild_export().unwrap();
    let rebuilt = std::fs::read_to_string(store.export_path()).unwrap();
    assert_eq!(incremental, rebuilt);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Whatever mix of dates and counts gets recorded, the artifact
    /// holds exactly one row per date, in calendar order, with counts
    /// matching the primary store.
    #[test]
    fn test_artifact_tracks_primary(
        days in prop::collection::btree_map(0u32..3650, 1u32..4, 1..20),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open_at(dir.path()).unwrap();
        let base = date(2020, 1, 1);

        for (&offset, &count) in &days {
            let day = base + chrono::Duration::days(i64::from(offset));
            for _ in 0..count {
                store.record_completion(day).unwrap();
            }
        }

        let rows = read_artifact(&store);
        prop_assert_eq!(rows.len(), days.len());
        for window in rows.windows(2) {
            prop_assert!(window[0].0 < window[1].0);
        }
        for (day, count) in rows {
            let offset = u32::try_from((day - base).num_days()).unwrap();
            prop_assert_eq!(count, days[&offset]);
            prop_assert_eq!(store.count_for(day).unwrap(), count);
        }
    }
}
