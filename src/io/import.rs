use std::io::Read;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use csv::StringRecord;

use crate::application::AppError;
use crate::domain::{parse_points, LedgerEntry};

const PAYER: &str = "payer";
const POINTS: &str = "points";
const TIMESTAMP: &str = "timestamp";

/// Column positions resolved from the header row.
/// Columns may appear in any order and extra columns are ignored.
#[derive(Debug, Clone, Copy)]
struct Columns {
    payer: usize,
    points: usize,
    timestamp: usize,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, AppError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| AppError::MalformedLedger {
                    line: 1,
                    field: Some(name.to_string()),
                    message: format!("missing required column '{}'", name),
                })
        };

        Ok(Self {
            payer: find(PAYER)?,
            points: find(POINTS)?,
            timestamp: find(TIMESTAMP)?,
        })
    }
}

/// Read ledger entries from CSV with a `payer,points,timestamp` header.
///
/// Rows keep their file order; sorting is left to the spend engine so that
/// equal timestamps stay in the order they were written. The first bad row
/// aborts the load.
pub fn read_ledger_csv<R: Read>(reader: R) -> Result<Vec<LedgerEntry>, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(|e| AppError::MalformedLedger {
        line: 1,
        field: None,
        message: format!("CSV parse error: {}", e),
    })?;
    let columns = Columns::from_headers(headers)?;

    let mut entries = Vec::new();
    for (line_num, result) in csv_reader.records().enumerate() {
        let line = line_num + 2; // +2 for header and 0-indexing

        let record = result.map_err(|e| AppError::MalformedLedger {
            line,
            field: None,
            message: format!("CSV parse error: {}", e),
        })?;

        entries.push(parse_record(&record, columns, line)?);
    }

    tracing::info!(entries = entries.len(), "loaded ledger");
    Ok(entries)
}

fn parse_record(record: &StringRecord, columns: Columns, line: usize) -> Result<LedgerEntry, AppError> {
    let malformed = |field: &str, message: String| AppError::MalformedLedger {
        line,
        field: Some(field.to_string()),
        message,
    };

    let payer = record.get(columns.payer).unwrap_or("");
    if payer.is_empty() {
        return Err(malformed(PAYER, "payer is empty".to_string()));
    }

    let points_str = record.get(columns.points).unwrap_or("");
    let points = parse_points(points_str)
        .map_err(|e| malformed(POINTS, format!("Invalid points: {}", e)))?;

    let timestamp_str = record.get(columns.timestamp).unwrap_or("");
    let timestamp = parse_timestamp(timestamp_str)
        .map_err(|e| malformed(TIMESTAMP, format!("Invalid timestamp: {}", e)))?;

    Ok(LedgerEntry::new(payer, points, timestamp))
}

/// Parse a ledger timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    // Try RFC3339 first
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }

    // Try YYYY-MM-DD format
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    anyhow::bail!("unrecognised timestamp format '{}'", s)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const LEDGER: &str = "\
payer,points,timestamp
DANNON,1000,2020-11-02T14:00:00Z
UNILEVER,200,2020-10-31T11:00:00Z
DANNON,-200,2020-10-31T15:00:00Z
MILLER COORS,10000,2020-11-01T14:00:00Z
DANNON,300,2020-10-31T10:00:00Z
";

    #[test]
    fn test_read_ledger_keeps_file_order() {
        let entries = read_ledger_csv(LEDGER.as_bytes()).unwrap();

        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].payer, "DANNON");
        assert_eq!(entries[0].points, 1000);
        assert_eq!(
            entries[0].timestamp,
            Utc.with_ymd_and_hms(2020, 11, 2, 14, 0, 0).unwrap()
        );
        assert_eq!(entries[2].points, -200);
        assert_eq!(entries[3].payer, "MILLER COORS");
    }

    #[test]
    fn test_read_ledger_any_column_order_and_whitespace() {
        let csv = "timestamp, payer ,points,note\n2020-11-02, A , 5 ,hello\n";

        let entries = read_ledger_csv(csv.as_bytes()).unwrap();

        assert_eq!(entries, vec![LedgerEntry::new(
            "A",
            5,
            Utc.with_ymd_and_hms(2020, 11, 2, 0, 0, 0).unwrap()
        )]);
    }

    #[test]
    fn test_read_ledger_header_only() {
        let entries = read_ledger_csv("payer,points,timestamp\n".as_bytes()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_missing_column() {
        let err = read_ledger_csv("payer,timestamp\nA,2020-11-02\n".as_bytes()).unwrap_err();
        match err {
            AppError::MalformedLedger { line, field, .. } => {
                assert_eq!(line, 1);
                assert_eq!(field.as_deref(), Some("points"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_points_reports_line() {
        let csv = "payer,points,timestamp\nA,5,2020-11-02\nB,lots,2020-11-03\n";
        let err = read_ledger_csv(csv.as_bytes()).unwrap_err();
        match err {
            AppError::MalformedLedger { line, field, .. } => {
                assert_eq!(line, 3);
                assert_eq!(field.as_deref(), Some("points"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_timestamp() {
        let csv = "payer,points,timestamp\nA,5,yesterday\n";
        let err = read_ledger_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            AppError::MalformedLedger { line: 2, ref field, .. } if field.as_deref() == Some("timestamp")
        ));
    }

    #[test]
    fn test_empty_payer() {
        let csv = "payer,points,timestamp\n,5,2020-11-02\n";
        let err = read_ledger_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::MalformedLedger { line: 2, .. }));
    }

    #[test]
    fn test_ragged_row_is_malformed() {
        let csv = "payer,points,timestamp\nA,5\n";
        let err = read_ledger_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::MalformedLedger { line: 2, field: None, .. }));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2020, 11, 2, 14, 0, 0).unwrap();

        assert_eq!(parse_timestamp("2020-11-02T14:00:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2020-11-02T15:00:00+01:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2020-11-02T14:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2020-11-02 14:00:00").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2020-11-02").unwrap(),
            Utc.with_ymd_and_hms(2020, 11, 2, 0, 0, 0).unwrap()
        );
        assert!(parse_timestamp("02/11/2020").is_err());
    }
}
