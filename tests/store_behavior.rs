//! Behavior tests for the per-symbol series cache.
//!
//! These verify HOW the store merges, persists, and recovers, focusing on
//! the outcomes the acquisition path depends on.

use std::fs;

use crosswatch_store::{SeriesStore, StoreConfig};
use crosswatch_tests::{series, symbol};
use tempfile::tempdir;

fn open_store(root: &std::path::Path) -> SeriesStore {
    SeriesStore::open(StoreConfig {
        root: root.to_path_buf(),
    })
    .expect("store open")
}

// =============================================================================
// Merge semantics
// =============================================================================

#[test]
fn when_the_same_batch_is_merged_twice_the_series_is_unchanged() {
    // Given: a cached series and an incoming refresh batch
    let cached = series(&[("2024-01-02", 10.0), ("2024-01-03", 10.5)]);
    let incoming = series(&[("2024-01-03", 10.7), ("2024-01-04", 11.0)]);

    // When: the batch is merged once, and then merged again
    let once = SeriesStore::merge(cached.clone(), incoming.clone());
    let twice = SeriesStore::merge(once.clone(), incoming);

    // Then: re-merging the same data changes nothing
    assert_eq!(once, twice);
}

#[test]
fn when_dates_conflict_the_incoming_bar_wins() {
    // Given: the provider corrected yesterday's close after hours
    let cached = series(&[("2024-01-02", 10.0), ("2024-01-03", 10.5)]);
    let incoming = series(&[("2024-01-03", 10.9)]);

    // When: the refresh batch is merged
    let merged = SeriesStore::merge(cached, incoming);

    // Then: the corrected bar replaces the cached one
    assert_eq!(merged.len(), 2);
    assert_eq!(merged.last().expect("last bar").close, 10.9);
}

#[test]
fn merged_series_is_strictly_ascending_with_no_duplicates() {
    // Given: overlapping, unordered inputs
    let cached = series(&[("2024-01-05", 12.0), ("2024-01-02", 10.0)]);
    let incoming = series(&[("2024-01-04", 11.0), ("2024-01-02", 10.2)]);

    // When: merged
    let merged = SeriesStore::merge(cached, incoming);

    // Then: dates come out strictly ascending, one bar per date
    let dates: Vec<String> = merged.bars().iter().map(|b| b.date.to_string()).collect();
    assert_eq!(dates, ["2024-01-02", "2024-01-04", "2024-01-05"]);
    assert_eq!(merged.bars()[0].close, 10.2);
}

// =============================================================================
// Persistence and recovery
// =============================================================================

#[test]
fn when_a_saved_series_is_reloaded_it_matches() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(temp.path());
    let sym = symbol("PETR4.SA");

    let saved = series(&[("2024-01-02", 36.5), ("2024-01-03", 36.9)]);
    store.save(&sym, &saved).expect("save should succeed");

    assert_eq!(store.load(&sym), saved);
}

#[test]
fn when_the_cache_file_is_corrupt_load_degrades_to_empty() {
    // Given: a cache file containing garbage
    let temp = tempdir().expect("tempdir");
    let store = open_store(temp.path());
    let sym = symbol("VALE3.SA");
    fs::write(store.path_for(&sym), "not json at all {{{").expect("write fixture");

    // When: the series is loaded
    let loaded = store.load(&sym);

    // Then: the caller sees an empty series (full refetch path), no panic
    assert!(loaded.is_empty());
}

#[test]
fn when_the_schema_version_is_unknown_load_degrades_to_empty() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(temp.path());
    let sym = symbol("ITUB4.SA");

    let body = r#"{"schema_version":99,"symbol":"ITUB4.SA","bars":[]}"#;
    fs::write(store.path_for(&sym), body).expect("write fixture");

    assert!(store.load(&sym).is_empty());
}

#[test]
fn stores_for_different_symbols_never_collide() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(temp.path());

    let first = symbol("PETR4.SA");
    let second = symbol("PETR3.SA");
    store
        .save(&first, &series(&[("2024-01-02", 36.5)]))
        .expect("save first");
    store
        .save(&second, &series(&[("2024-01-02", 33.1)]))
        .expect("save second");

    assert_eq!(store.load(&first).bars()[0].close, 36.5);
    assert_eq!(store.load(&second).bars()[0].close, 33.1);
}

#[test]
fn overwriting_a_symbol_keeps_the_latest_series() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(temp.path());
    let sym = symbol("WEGE3.SA");

    store
        .save(&sym, &series(&[("2024-01-02", 35.0)]))
        .expect("first save");
    let extended = SeriesStore::merge(store.load(&sym), series(&[("2024-01-03", 35.4)]));
    store.save(&sym, &extended).expect("second save");

    assert_eq!(store.load(&sym).len(), 2);
}
