#![allow(dead_code)]

use std::{fs, path::PathBuf, sync::Mutex};

use chrono::{DateTime, TimeZone, Utc};
use expense_analytics::TransactionRecord;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Writes `contents` to `name` inside a fresh temp directory.
pub fn write_fixture(name: &str, contents: &str) -> PathBuf {
    let path = temp_base().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .expect("valid timestamp")
}

pub fn expense(id: &str, category: &str, amount: f64, at: DateTime<Utc>) -> TransactionRecord {
    TransactionRecord::new(id, format!("{category} {id}"), category, amount, at)
}

/// A spread of records across early 2024, including a few malformed ones.
pub fn sample_records() -> Vec<TransactionRecord> {
    let mut records = vec![
        expense("jan-rent", "Housing", 1200.0, utc(2024, 1, 1, 9, 0)),
        expense("jan-food", "Food", 85.5, utc(2024, 1, 14, 19, 30)),
        expense("feb-rent", "Housing", 1200.0, utc(2024, 2, 1, 9, 0)),
        expense("feb-food", "Food", 40.25, utc(2024, 2, 10, 12, 15)),
        expense("feb-cab", "Travel", 18.0, utc(2024, 2, 29, 23, 59)),
        expense("mar-food", "Food", 64.0, utc(2024, 3, 3, 8, 0)),
        expense("mar-gym", "Health", 30.0, utc(2024, 3, 3, 18, 45)),
        expense("mar-cab", "Travel", 22.75, utc(2024, 3, 4, 7, 10)),
    ];
    let mut no_category = expense("broken-1", "Food", 10.0, utc(2024, 3, 3, 9, 0));
    no_category.category = None;
    let mut no_amount = expense("broken-2", "Food", 10.0, utc(2024, 3, 3, 9, 0));
    no_amount.amount = None;
    records.push(no_category);
    records.push(no_amount);
    records
}
