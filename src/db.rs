use std::path::Path;

use rusqlite::Connection;
use sha2::{Digest, Sha256};

use crate::carrier::Carrier;
use crate::error::Result;
use crate::normalizer::NormalizedTable;
use crate::stats::FileStats;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS carriers (
    id INTEGER PRIMARY KEY,
    name TEXT UNIQUE NOT NULL,
    code TEXT UNIQUE NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS imports (
    id INTEGER PRIMARY KEY,
    filename TEXT NOT NULL,
    carrier_name TEXT NOT NULL,
    import_date TEXT DEFAULT (datetime('now')),
    record_count INTEGER,
    date_range_start TEXT,
    date_range_end TEXT,
    checksum TEXT
);

CREATE TABLE IF NOT EXISTS commission_reports (
    id INTEGER PRIMARY KEY,

    carrier_name TEXT NOT NULL,
    upload_date TEXT DEFAULT (datetime('now')),
    report_file_name TEXT,

    payment_date TEXT,
    statement_date TEXT,

    payee_name TEXT,
    payee_npn TEXT,
    payee_type TEXT,

    policy_number TEXT,
    member_id TEXT,
    insured_name TEXT,
    effective_date TEXT,

    transaction_type TEXT,
    payout_type TEXT,
    commission_type TEXT,
    amount REAL,
    member_count INTEGER,
    lives INTEGER,

    writing_agent TEXT,
    writing_agent_number TEXT,

    assigned_agent_name TEXT,

    state TEXT,
    product TEXT,
    new_to_medicare INTEGER,
    carrier_transaction_type TEXT,
    block_reason TEXT,
    commission_month TEXT,
    generated_from TEXT,

    created_at TEXT DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_carrier ON commission_reports(carrier_name);
CREATE INDEX IF NOT EXISTS idx_payment_date ON commission_reports(payment_date);
CREATE INDEX IF NOT EXISTS idx_assigned_agent ON commission_reports(assigned_agent_name);
CREATE INDEX IF NOT EXISTS idx_policy ON commission_reports(policy_number);
CREATE INDEX IF NOT EXISTS idx_transaction_type ON commission_reports(transaction_type);
CREATE INDEX IF NOT EXISTS idx_upload_date ON commission_reports(upload_date);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    for carrier in Carrier::ALL {
        conn.execute(
            "INSERT OR IGNORE INTO carriers (name, code) VALUES (?1, ?2)",
            rusqlite::params![carrier.display_name(), carrier.code()],
        )?;
    }
    Ok(())
}

pub fn compute_checksum(file_path: &Path) -> Result<String> {
    let data = std::fs::read(file_path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

pub fn is_duplicate_import(conn: &Connection, checksum: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM imports WHERE checksum = ?1")?;
    Ok(stmt.exists([checksum])?)
}

/// Insert every row of a normalized table plus carrier/file metadata, and
/// record the import batch, inside one transaction. A failure anywhere rolls
/// the whole file back.
pub fn insert_table(
    conn: &mut Connection,
    table: &NormalizedTable,
    stats: &FileStats,
    file_name: &str,
    checksum: &str,
) -> Result<usize> {
    let tx = conn.transaction()?;

    let mut columns: Vec<&str> = vec!["carrier_name", "report_file_name"];
    columns.extend(table.columns.iter().map(|f| f.column()));
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO commission_reports ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    );

    {
        let carrier_code = table.carrier.code();
        let mut stmt = tx.prepare_cached(&sql)?;
        for row in &table.rows {
            let mut params: Vec<&dyn rusqlite::types::ToSql> =
                vec![&carrier_code, &file_name];
            params.extend(row.iter().map(|v| v as &dyn rusqlite::types::ToSql));
            stmt.execute(params.as_slice())?;
        }
    }

    let (start, end) = match &stats.date_range {
        Some((s, e)) => (Some(s.as_str()), Some(e.as_str())),
        None => (None, None),
    };
    tx.execute(
        "INSERT INTO imports (filename, carrier_name, record_count, date_range_start, date_range_end, checksum) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![file_name, table.carrier.code(), table.len() as i64, start, end, checksum],
    )?;

    tx.commit()?;
    Ok(table.len())
}

/// Bulk wipe: every commission row and import record. Returns the number of
/// commission rows removed.
pub fn wipe(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT count(*) FROM commission_reports", [], |r| r.get(0))?;
    conn.execute("DELETE FROM commission_reports", [])?;
    conn.execute("DELETE FROM imports", [])?;
    Ok(count as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize;
    use crate::sheet::{Cell, RawSheet};
    use crate::stats::summarize;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn sample_table() -> NormalizedTable {
        let sheet = RawSheet {
            headers: vec![
                "Payment Date".into(),
                "Policy".into(),
                "Amount".into(),
                "NewToMedicare".into(),
            ],
            rows: vec![
                vec![text("01/15/2025"), text("P-1"), text("100.00"), text("Yes")],
                vec![text("01/20/2025"), text("P-2"), text("bad"), text("maybe")],
            ],
        };
        normalize(&sheet, Carrier::Molina)
    }

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for expected in &["carriers", "imports", "commission_reports"] {
            assert!(tables.contains(&expected.to_string()), "missing table: {expected}");
        }
    }

    #[test]
    fn test_init_db_is_idempotent_and_seeds_carriers() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
        let count: i64 = conn.query_row("SELECT count(*) FROM carriers", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_insert_table_persists_rows_and_metadata() {
        let (_dir, mut conn) = test_db();
        let table = sample_table();
        let stats = summarize(&table);
        let inserted = insert_table(&mut conn, &table, &stats, "jan.csv", "abc123").unwrap();
        assert_eq!(inserted, 2);

        let (carrier, file, amount): (String, String, Option<f64>) = conn
            .query_row(
                "SELECT carrier_name, report_file_name, amount FROM commission_reports \
                 WHERE policy_number = 'P-1'",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(carrier, "MOLINA");
        assert_eq!(file, "jan.csv");
        assert_eq!(amount, Some(100.0));

        // Unparseable amount landed as NULL, not zero
        let amount2: Option<f64> = conn
            .query_row(
                "SELECT amount FROM commission_reports WHERE policy_number = 'P-2'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(amount2, None);

        // Boolean stored as 0/1 integer
        let ntm: Option<i64> = conn
            .query_row(
                "SELECT new_to_medicare FROM commission_reports WHERE policy_number = 'P-1'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(ntm, Some(1));
    }

    #[test]
    fn test_insert_table_records_import_batch() {
        let (_dir, mut conn) = test_db();
        let table = sample_table();
        let stats = summarize(&table);
        insert_table(&mut conn, &table, &stats, "jan.csv", "abc123").unwrap();

        let (count, start, end): (i64, Option<String>, Option<String>) = conn
            .query_row(
                "SELECT record_count, date_range_start, date_range_end FROM imports",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(start.as_deref(), Some("2025-01-15"));
        assert_eq!(end.as_deref(), Some("2025-01-20"));
        assert!(is_duplicate_import(&conn, "abc123").unwrap());
        assert!(!is_duplicate_import(&conn, "other").unwrap());
    }

    #[test]
    fn test_wipe_removes_everything() {
        let (_dir, mut conn) = test_db();
        let table = sample_table();
        let stats = summarize(&table);
        insert_table(&mut conn, &table, &stats, "jan.csv", "abc123").unwrap();

        let removed = wipe(&conn).unwrap();
        assert_eq!(removed, 2);
        let rows: i64 = conn
            .query_row("SELECT count(*) FROM commission_reports", [], |r| r.get(0))
            .unwrap();
        let imports: i64 = conn.query_row("SELECT count(*) FROM imports", [], |r| r.get(0)).unwrap();
        assert_eq!(rows, 0);
        assert_eq!(imports, 0);
        // Same file can be ingested again after a wipe
        assert!(!is_duplicate_import(&conn, "abc123").unwrap());
    }

    #[test]
    fn test_compute_checksum_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.csv");
        std::fs::write(&path, "Policy,Amount\nP-1,10\n").unwrap();
        let a = compute_checksum(&path).unwrap();
        let b = compute_checksum(&path).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }
}
