// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use pointspend::domain::{LedgerEntry, Points};
use tempfile::TempDir;

/// The reference ledger: three payers, one negative adjustment, rows out of order.
pub const SAMPLE_LEDGER: &str = "\
payer,points,timestamp
DANNON,1000,2020-11-02T14:00:00Z
UNILEVER,200,2020-10-31T11:00:00Z
DANNON,-200,2020-10-31T15:00:00Z
MILLER COORS,10000,2020-11-01T14:00:00Z
DANNON,300,2020-10-31T10:00:00Z
";

/// Helper to write a ledger CSV into a temporary directory
pub fn write_ledger(contents: &str) -> Result<(PathBuf, TempDir)> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("ledger.csv");
    fs::write(&path, contents)?;
    Ok((path, temp_dir))
}

/// Helper to parse a date string into DateTime<Utc>
pub fn parse_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

/// Shorthand for an entry granted on the given day
pub fn grant(payer: &str, points: Points, date: &str) -> LedgerEntry {
    LedgerEntry::new(payer, points, parse_date(date))
}
