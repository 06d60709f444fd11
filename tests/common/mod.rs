#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::{TimeZone, Utc};
use once_cell::sync::Lazy;
use spendbook::{
    spendbook_core::{ExpenseStore, FixedClock},
    spendbook_domain::{Category, ExpenseDraft},
    spendbook_storage_json::JsonFileStorage,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh directory that outlives the calling test.
pub fn test_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Store over `<dir>/expenses.json` with the clock frozen at 2025-03-15 12:00 UTC.
pub fn file_store(dir: &std::path::Path) -> ExpenseStore {
    let storage = JsonFileStorage::in_dir(dir).expect("open json storage");
    let now = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
    ExpenseStore::with_clock(Box::new(storage), Box::new(FixedClock(now)))
}

pub fn draft(amount: f64, category: Category, description: &str, day: u32) -> ExpenseDraft {
    let date = Utc.with_ymd_and_hms(2025, 3, day, 9, 0, 0).unwrap();
    ExpenseDraft::new(amount, category, description, date)
}
