//! Tests for utility functions

use chrono::{TimeZone, Utc};
use emwos_allocator::util::{log_file_name, now_ms};

#[test]
fn test_now_ms_is_after_2020() {
    assert!(now_ms() > 1_577_836_800_000);
}

#[test]
fn test_log_file_name() {
    let started = Utc.with_ymd_and_hms(2025, 3, 25, 23, 59, 1).unwrap();
    let name = log_file_name(started);
    assert!(name.starts_with("server_2025-03-25T23-59-01"));
    assert!(name.ends_with(".log"));
    assert!(!name.contains(':'));
}
