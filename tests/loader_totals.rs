//! Bulk Loader Tests
//!
//! Properties:
//! - N valid rows followed by M invalid rows reports inserted N, dropped M
//! - Totals and stored order do not depend on the batch size
//! - Loaded records survive reopening the on-disk store
//! - Missing sources fail explicitly
//! - Malformed CSV records are dropped and the run continues
//! - Short records reach the admission gate instead of being dropped

use evstats::loader::{BulkLoader, LoaderErrorCode};
use evstats::storage::{FileStore, MemoryStore, VehicleStore};
use evstats::vehicle::fields;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

const HEADER: &str = "VIN (1-10),County,State,Make,Model,Model Year,Electric Vehicle Type,Electric Range,Clean Alternative Fuel Vehicle (CAFV) Eligibility";

fn valid_line(i: usize) -> String {
    format!(
        "VIN{:05},King,WA,Tesla,Model {},{},Battery Electric Vehicle (BEV),{},Clean Alternative Fuel Vehicle Eligible",
        i,
        i % 3,
        2015 + (i % 8),
        100 + i
    )
}

fn invalid_lines() -> Vec<String> {
    vec![
        ",King,WA,Tesla,Model 3,2020,,200,".to_string(),
        "VINX,King,WA,,Model 3,2020,,200,".to_string(),
        "VINY,King,WA,Tesla,,2020,,200,".to_string(),
        "VINZ,King,WA,Tesla,Model 3,unknown,,200,".to_string(),
        "VINW,King,WA,Tesla".to_string(),
    ]
}

fn write_csv(dir: &Path, valid: usize) -> PathBuf {
    let mut lines = vec![HEADER.to_string()];
    lines.extend((0..valid).map(valid_line));
    lines.extend(invalid_lines());

    let path = dir.join("ev.csv");
    fs::write(&path, lines.join("\n")).unwrap();
    path
}

// =============================================================================
// TOTALS
// =============================================================================

#[test]
fn test_totals_independent_of_batch_size() {
    let temp_dir = TempDir::new().unwrap();
    let csv = write_csv(temp_dir.path(), 25);
    let invalid = invalid_lines().len() as u64;

    let mut reference = None;
    for batch_size in [1, 4, 25, 2000] {
        let mut store = MemoryStore::new();
        let summary = BulkLoader::new(&mut store)
            .with_batch_size(batch_size)
            .load_path(&csv)
            .unwrap();

        assert_eq!(summary.inserted, 25, "batch size {}", batch_size);
        assert_eq!(summary.dropped, invalid, "batch size {}", batch_size);
        assert_eq!(
            summary.batches,
            (25 + batch_size as u64 - 1) / batch_size as u64
        );

        let stored = store.find(&[]).unwrap();
        match &reference {
            None => reference = Some(stored),
            Some(expected) => assert_eq!(&stored, expected),
        }
    }
}

#[test]
fn test_loaded_values_are_normalized() {
    let temp_dir = TempDir::new().unwrap();
    let csv = write_csv(temp_dir.path(), 1);

    let mut store = MemoryStore::new();
    BulkLoader::new(&mut store).load_path(&csv).unwrap();

    let doc = &store.find(&[]).unwrap()[0];
    assert_eq!(doc["vin"], "VIN00000");
    assert_eq!(doc["county"], "KING");
    assert_eq!(doc["make"], "TESLA");
    assert_eq!(doc["model"], "MODEL 0");
    assert_eq!(doc["model_year"], 2015);
    assert_eq!(doc["vehicle_type"], "BATTERY ELECTRIC VEHICLE (BEV)");
    assert_eq!(doc["electric_range"], 100);
    assert_eq!(doc["cafv_eligible"], true);
}

// =============================================================================
// PERSISTENCE
// =============================================================================

#[test]
fn test_file_store_survives_reopen_with_indexes() {
    let temp_dir = TempDir::new().unwrap();
    let csv = write_csv(temp_dir.path(), 10);
    let data_dir = temp_dir.path().join("store");

    {
        let mut store = FileStore::open(&data_dir).unwrap();
        let summary = BulkLoader::new(&mut store)
            .with_batch_size(3)
            .load_path(&csv)
            .unwrap();
        assert_eq!(summary.batches, 4);
    }

    let store = FileStore::open(&data_dir).unwrap();
    assert_eq!(store.len(), 10);

    let mut indexed = store.indexed_fields();
    indexed.sort();
    let mut expected: Vec<String> = fields::INDEXED.iter().map(|f| f.to_string()).collect();
    expected.sort();
    assert_eq!(indexed, expected);
}

#[test]
fn test_second_load_appends() {
    let temp_dir = TempDir::new().unwrap();
    let csv = write_csv(temp_dir.path(), 5);
    let data_dir = temp_dir.path().join("store");

    for _ in 0..2 {
        let mut store = FileStore::open(&data_dir).unwrap();
        BulkLoader::new(&mut store).load_path(&csv).unwrap();
    }

    assert_eq!(FileStore::open(&data_dir).unwrap().len(), 10);
}

// =============================================================================
// SOURCE FAILURES
// =============================================================================

#[test]
fn test_missing_source_fails_without_writing() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = MemoryStore::new();

    let err = BulkLoader::new(&mut store)
        .load_path(&temp_dir.path().join("absent.csv"))
        .unwrap_err();

    assert_eq!(err.code(), LoaderErrorCode::EvLoadSourceNotFound);
    assert_eq!(err.persisted(), 0);
    assert!(store.is_empty());
}

#[test]
fn test_header_only_source_loads_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.csv");
    fs::write(&path, format!("{}\n", HEADER)).unwrap();

    let mut store = MemoryStore::new();
    let summary = BulkLoader::new(&mut store).load_path(&path).unwrap();
    assert_eq!((summary.inserted, summary.dropped, summary.batches), (0, 0, 0));
}

// =============================================================================
// MALFORMED RECORDS
// =============================================================================

#[test]
fn test_malformed_records_are_dropped_and_loading_continues() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mixed.csv");

    let mut bytes = format!("{}\n{}\n", HEADER, valid_line(0)).into_bytes();
    bytes.extend_from_slice(b"VINBAD,King,WA,\xff\xfeTesla,Model 3,2020,,200,\n");
    bytes.extend_from_slice(b"VINV,King,WA,Tesla\n");
    bytes.extend_from_slice(format!("{}\n", valid_line(1)).as_bytes());
    fs::write(&path, bytes).unwrap();

    let mut store = MemoryStore::new();
    let summary = BulkLoader::new(&mut store)
        .with_batch_size(1)
        .load_path(&path)
        .unwrap();

    assert_eq!((summary.inserted, summary.dropped), (2, 2));
    let vins: Vec<String> = store
        .find(&[])
        .unwrap()
        .iter()
        .map(|d| d["vin"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(vins, vec!["VIN00000", "VIN00001"]);
}

#[test]
fn test_short_record_with_admission_fields_is_loaded() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("short.csv");
    fs::write(
        &path,
        format!("{}\nVINS,King,WA,Nissan,Leaf,2013\n", HEADER),
    )
    .unwrap();

    let mut store = MemoryStore::new();
    let summary = BulkLoader::new(&mut store).load_path(&path).unwrap();
    assert_eq!((summary.inserted, summary.dropped), (1, 0));

    let doc = &store.find(&[]).unwrap()[0];
    assert_eq!(doc["make"], "NISSAN");
    assert!(doc["electric_range"].is_null());
    assert_eq!(doc["cafv_eligible"], false);
}
