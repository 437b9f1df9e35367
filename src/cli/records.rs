use comfy_table::Table;

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::reports::get_records;
use crate::settings::db_path;

pub fn run(carrier: Option<&str>, agent: Option<&str>, limit: usize) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let rows = get_records(&conn, carrier, agent, Some(limit))?;

    if rows.is_empty() {
        println!("No records match.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ID", "Carrier", "Payment Date", "Policy", "Insured", "Type", "Agent", "Amount",
    ]);
    for row in &rows {
        table.add_row(vec![
            row.id.to_string(),
            row.carrier.clone(),
            row.payment_date.clone().unwrap_or_default(),
            row.policy_number.clone().unwrap_or_default(),
            row.insured_name.clone().unwrap_or_default(),
            row.transaction_type.clone().unwrap_or_default(),
            row.assigned_agent.clone().unwrap_or_default(),
            row.amount.map(money).unwrap_or_default(),
        ]);
    }
    println!("{table}");
    println!("{} records shown", rows.len());
    Ok(())
}
