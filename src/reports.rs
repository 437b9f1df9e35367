use rusqlite::Connection;

use crate::error::Result;

// ---------------------------------------------------------------------------
// Overall summary
// ---------------------------------------------------------------------------

pub struct GroupTotal {
    pub name: String,
    pub count: i64,
    pub total: f64,
}

pub struct Summary {
    pub total_records: i64,
    pub total_amount: f64,
    pub by_carrier: Vec<GroupTotal>,
    pub by_type: Vec<GroupTotal>,
    pub by_agent: Vec<GroupTotal>,
}

pub fn get_summary(conn: &Connection) -> Result<Summary> {
    let total_records: i64 =
        conn.query_row("SELECT count(*) FROM commission_reports", [], |r| r.get(0))?;
    let total_amount: f64 = conn.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM commission_reports",
        [],
        |r| r.get(0),
    )?;

    let by_carrier = group_totals(
        conn,
        "SELECT carrier_name, COUNT(*), COALESCE(SUM(amount), 0) \
         FROM commission_reports GROUP BY carrier_name ORDER BY 3 DESC",
    )?;
    let by_type = group_totals(
        conn,
        "SELECT transaction_type, COUNT(*), COALESCE(SUM(amount), 0) \
         FROM commission_reports WHERE transaction_type IS NOT NULL \
         GROUP BY transaction_type ORDER BY 3 DESC",
    )?;
    let by_agent = group_totals(
        conn,
        "SELECT assigned_agent_name, COUNT(*), COALESCE(SUM(amount), 0) \
         FROM commission_reports WHERE assigned_agent_name IS NOT NULL \
         GROUP BY assigned_agent_name ORDER BY 3 DESC",
    )?;

    Ok(Summary {
        total_records,
        total_amount,
        by_carrier,
        by_type,
        by_agent,
    })
}

fn group_totals(conn: &Connection, sql: &str) -> Result<Vec<GroupTotal>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| {
        Ok(GroupTotal {
            name: row.get(0)?,
            count: row.get(1)?,
            total: row.get(2)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

// ---------------------------------------------------------------------------
// Record listing with filters
// ---------------------------------------------------------------------------

pub struct RecordRow {
    pub id: i64,
    pub carrier: String,
    pub payment_date: Option<String>,
    pub policy_number: Option<String>,
    pub insured_name: Option<String>,
    pub transaction_type: Option<String>,
    pub assigned_agent: Option<String>,
    pub amount: Option<f64>,
}

pub fn get_records(
    conn: &Connection,
    carrier: Option<&str>,
    agent: Option<&str>,
    limit: Option<usize>,
) -> Result<Vec<RecordRow>> {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<String> = Vec::new();
    if let Some(c) = carrier {
        params.push(c.to_uppercase());
        clauses.push(format!("carrier_name = ?{}", params.len()));
    }
    if let Some(a) = agent {
        params.push(a.to_string());
        clauses.push(format!("assigned_agent_name = ?{}", params.len()));
    }
    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };
    let limit_clause = match limit {
        Some(n) => format!(" LIMIT {n}"),
        None => String::new(),
    };

    let sql = format!(
        "SELECT id, carrier_name, payment_date, policy_number, insured_name, \
         transaction_type, assigned_agent_name, amount \
         FROM commission_reports {where_clause} \
         ORDER BY upload_date DESC, id DESC{limit_clause}"
    );
    let mut stmt = conn.prepare(&sql)?;
    let param_values: Vec<&dyn rusqlite::types::ToSql> = params
        .iter()
        .map(|p| p as &dyn rusqlite::types::ToSql)
        .collect();
    let rows = stmt.query_map(param_values.as_slice(), |row| {
        Ok(RecordRow {
            id: row.get(0)?,
            carrier: row.get(1)?,
            payment_date: row.get(2)?,
            policy_number: row.get(3)?,
            insured_name: row.get(4)?,
            transaction_type: row.get(5)?,
            assigned_agent: row.get(6)?,
            amount: row.get(7)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}
