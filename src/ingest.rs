use std::path::Path;

use rusqlite::Connection;

use crate::carrier::Carrier;
use crate::db;
use crate::error::{CommishError, Result};
use crate::normalizer::normalize;
use crate::sheet::open_sheet;
use crate::stats::{summarize, FileStats};

#[derive(Debug)]
pub struct IngestResult {
    pub carrier: Carrier,
    pub inserted: usize,
    pub stats: Option<FileStats>,
    pub duplicate_file: bool,
}

/// Process one report file to completion: resolve the carrier, normalize,
/// and persist. All-or-nothing per file; a rejected or failed file leaves
/// the database untouched.
pub fn ingest_file(
    conn: &mut Connection,
    file_path: &Path,
    carrier_code: Option<&str>,
) -> Result<IngestResult> {
    // Carrier flag is checked before any file work so an unsupported code
    // fails fast with the list of supported ones.
    let forced = carrier_code.map(Carrier::from_code).transpose()?;

    let sheet = open_sheet(file_path)?;

    let carrier = match forced {
        Some(c) => c,
        None => Carrier::detect(&sheet.headers)
            .ok_or_else(|| CommishError::DetectionFailed(file_path.display().to_string()))?,
    };

    let checksum = db::compute_checksum(file_path)?;
    if db::is_duplicate_import(conn, &checksum)? {
        return Ok(IngestResult {
            carrier,
            inserted: 0,
            stats: None,
            duplicate_file: true,
        });
    }

    let table = normalize(&sheet, carrier);
    let stats = summarize(&table);

    let file_name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("report")
        .to_string();
    let inserted = db::insert_table(conn, &table, &stats, &file_name, &checksum)?;

    Ok(IngestResult {
        carrier,
        inserted,
        stats: Some(stats),
        duplicate_file: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn write_oscar_csv(dir: &Path, name: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let content = "\
Commission type,Payee name,Payee type,Payee NPN,Member ID,Subscriber name,State,Lives,Effective Date,Commission,Commission month,Block Reason,Unnamed: 12
New,AGENCY LLC,Agency,12345,M-001,JANE DOE,FL,2,01/01/2025,34.50,2025-01,,ana
Renewal,AGENCY LLC,Agency,12345,M-002,JOHN ROE,FL,1,06/15/2024,17.25,2025-01,,luis
";
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_ingest_detects_and_inserts() {
        let (dir, mut conn) = test_db();
        let path = write_oscar_csv(dir.path(), "oscar-jan.csv");
        let result = ingest_file(&mut conn, &path, None).unwrap();
        assert_eq!(result.carrier, Carrier::Oscar);
        assert_eq!(result.inserted, 2);
        assert!(!result.duplicate_file);
        let stats = result.stats.unwrap();
        assert_eq!(stats.total_records, 2);
        assert!((stats.total_amount - 51.75).abs() < 1e-9);
        assert_eq!(stats.unique_members, 2);

        let count: i64 = conn
            .query_row("SELECT count(*) FROM commission_reports WHERE carrier_name = 'OSCAR'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_ingest_skips_duplicate_file() {
        let (dir, mut conn) = test_db();
        let path = write_oscar_csv(dir.path(), "oscar-jan.csv");
        ingest_file(&mut conn, &path, None).unwrap();
        let second = ingest_file(&mut conn, &path, None).unwrap();
        assert!(second.duplicate_file);
        assert_eq!(second.inserted, 0);
        let count: i64 = conn
            .query_row("SELECT count(*) FROM commission_reports", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_ingest_rejects_unsupported_carrier_before_reading() {
        let (_dir, mut conn) = test_db();
        let err = ingest_file(&mut conn, Path::new("/nonexistent.csv"), Some("CIGNA")).unwrap_err();
        assert!(matches!(err, CommishError::UnsupportedCarrier(_, _)));
    }

    #[test]
    fn test_ingest_fails_on_undetectable_file() {
        let (dir, mut conn) = test_db();
        let path = dir.path().join("random.csv");
        std::fs::write(&path, "A,B,C\n1,2,3\n").unwrap();
        let err = ingest_file(&mut conn, &path, None).unwrap_err();
        assert!(matches!(err, CommishError::DetectionFailed(_)));
        let count: i64 = conn
            .query_row("SELECT count(*) FROM commission_reports", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_ingest_with_forced_carrier() {
        let (dir, mut conn) = test_db();
        // Headers overlap Molina below threshold; forcing the carrier still works
        let path = dir.path().join("partial.csv");
        std::fs::write(&path, "Policy,Amount\nP-9,12.00\n").unwrap();
        let result = ingest_file(&mut conn, &path, Some("molina")).unwrap();
        assert_eq!(result.carrier, Carrier::Molina);
        assert_eq!(result.inserted, 1);
    }

    #[test]
    fn test_ingest_rejects_empty_file() {
        let (dir, mut conn) = test_db();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "").unwrap();
        let err = ingest_file(&mut conn, &path, Some("OSCAR")).unwrap_err();
        assert!(matches!(err, CommishError::EmptyFile(_)));
    }
}
