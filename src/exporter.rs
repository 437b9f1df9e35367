use std::path::Path;

use rusqlite::types::Value as SqlValue;
use rusqlite::Connection;

use crate::error::Result;

/// Export columns: carrier plus every canonical field, in schema order.
pub const EXPORT_COLUMNS: &[&str] = &[
    "carrier_name",
    "payment_date",
    "statement_date",
    "payee_name",
    "payee_npn",
    "payee_type",
    "policy_number",
    "member_id",
    "insured_name",
    "effective_date",
    "transaction_type",
    "payout_type",
    "commission_type",
    "amount",
    "member_count",
    "lives",
    "writing_agent",
    "writing_agent_number",
    "assigned_agent_name",
    "state",
    "product",
    "new_to_medicare",
    "carrier_transaction_type",
    "block_reason",
    "commission_month",
    "generated_from",
];

fn render(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => String::new(),
        SqlValue::Integer(i) => i.to_string(),
        SqlValue::Real(f) => format!("{f}"),
        SqlValue::Text(s) => s.clone(),
        SqlValue::Blob(_) => String::new(),
    }
}

/// Re-serialize stored rows to CSV, optionally filtered by carrier code.
/// Values are written back exactly as stored; nulls become empty fields.
pub fn export_csv(conn: &Connection, out_path: &Path, carrier: Option<&str>) -> Result<usize> {
    let where_clause = if carrier.is_some() {
        "WHERE carrier_name = ?1 "
    } else {
        ""
    };
    let sql = format!(
        "SELECT {} FROM commission_reports {}ORDER BY id",
        EXPORT_COLUMNS.join(", "),
        where_clause
    );

    let mut stmt = conn.prepare(&sql)?;
    let code = carrier.map(|c| c.to_uppercase());
    let mut rows = match &code {
        Some(c) => stmt.query([c])?,
        None => stmt.query([])?,
    };

    let mut wtr = csv::Writer::from_path(out_path)?;
    wtr.write_record(EXPORT_COLUMNS)?;
    let mut written = 0usize;
    while let Some(row) = rows.next()? {
        let mut record = Vec::with_capacity(EXPORT_COLUMNS.len());
        for i in 0..EXPORT_COLUMNS.len() {
            let value: SqlValue = row.get(i)?;
            record.push(render(&value));
        }
        wtr.write_record(&record)?;
        written += 1;
    }
    wtr.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::Carrier;
    use crate::db::{compute_checksum, get_connection, init_db, insert_table};
    use crate::normalizer::normalize;
    use crate::sheet::open_sheet;
    use crate::stats::summarize;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn ingest_fixture(conn: &mut Connection, dir: &Path) {
        let src = dir.join("molina.csv");
        std::fs::write(
            &src,
            "Payment Date,Policy,Insured,Transaction Type,Amount,NewToMedicare\n\
             01/15/2025,P-100,JANE DOE,Renewal,125.50,Yes\n\
             01/20/2025,P-101,JOHN ROE,Override,30,No\n",
        )
        .unwrap();
        let sheet = open_sheet(&src).unwrap();
        let table = normalize(&sheet, Carrier::Molina);
        let stats = summarize(&table);
        let checksum = compute_checksum(&src).unwrap();
        insert_table(conn, &table, &stats, "molina.csv", &checksum).unwrap();
    }

    fn read_export(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        let headers = rdr.headers().unwrap().iter().map(|h| h.to_string()).collect();
        let rows = rdr
            .records()
            .map(|r| r.unwrap().iter().map(|f| f.to_string()).collect())
            .collect();
        (headers, rows)
    }

    #[test]
    fn test_export_writes_all_rows() {
        let (dir, mut conn) = test_db();
        ingest_fixture(&mut conn, dir.path());
        let out = dir.path().join("export.csv");
        let written = export_csv(&conn, &out, None).unwrap();
        assert_eq!(written, 2);
        let (headers, rows) = read_export(&out);
        assert_eq!(headers.len(), EXPORT_COLUMNS.len());
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_export_roundtrips_canonical_fields() {
        let (dir, mut conn) = test_db();
        ingest_fixture(&mut conn, dir.path());
        let out = dir.path().join("export.csv");
        export_csv(&conn, &out, None).unwrap();
        let (headers, rows) = read_export(&out);

        let col = |name: &str| headers.iter().position(|h| h == name).unwrap();
        assert_eq!(rows[0][col("carrier_name")], "MOLINA");
        assert_eq!(rows[0][col("payment_date")], "2025-01-15");
        assert_eq!(rows[0][col("policy_number")], "P-100");
        assert_eq!(rows[0][col("insured_name")], "JANE DOE");
        assert_eq!(rows[0][col("amount")], "125.5");
        assert_eq!(rows[0][col("new_to_medicare")], "1");
        assert_eq!(rows[1][col("new_to_medicare")], "0");
        // Columns absent from the source are empty, not fabricated
        assert_eq!(rows[0][col("member_id")], "");

        // Re-reading the export preserves every canonical value
        let reread = open_sheet(&out).unwrap();
        assert_eq!(reread.rows.len(), 2);
        let idx = reread.header_index("policy_number").unwrap();
        assert_eq!(
            reread.rows[1][idx],
            crate::sheet::Cell::Text("P-101".to_string())
        );
    }

    #[test]
    fn test_export_carrier_filter() {
        let (dir, mut conn) = test_db();
        ingest_fixture(&mut conn, dir.path());
        let out = dir.path().join("oscar.csv");
        let written = export_csv(&conn, &out, Some("oscar")).unwrap();
        assert_eq!(written, 0);
        let written = export_csv(&conn, &out, Some("molina")).unwrap();
        assert_eq!(written, 2);
    }

    #[test]
    fn test_export_empty_store() {
        let (dir, conn) = test_db();
        let out = dir.path().join("export.csv");
        let written = export_csv(&conn, &out, None).unwrap();
        assert_eq!(written, 0);
        assert!(out.exists());
    }
}
