use colored::Colorize;
use comfy_table::Table;

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::reports::{get_summary, GroupTotal};
use crate::settings::db_path;

fn group_table(title: &str, name_header: &str, groups: &[GroupTotal]) {
    if groups.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![name_header, "Count", "Total"]);
    for g in groups {
        table.add_row(vec![g.name.clone(), g.count.to_string(), money(g.total)]);
    }
    println!("\n{title}\n{table}");
}

pub fn summary() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let summary = get_summary(&conn)?;

    println!("{}", "Commission Summary".bold());
    println!("Records: {}", summary.total_records);
    println!("Total:   {}", money(summary.total_amount));
    group_table("By Carrier", "Carrier", &summary.by_carrier);
    Ok(())
}

pub fn types() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let summary = get_summary(&conn)?;
    group_table("By Transaction Type", "Transaction Type", &summary.by_type);
    if summary.by_type.is_empty() {
        println!("No typed records stored.");
    }
    Ok(())
}

pub fn agents() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let summary = get_summary(&conn)?;
    group_table("By Assigned Agent", "Agent", &summary.by_agent);
    if summary.by_agent.is_empty() {
        println!("No records with an assigned agent.");
    }
    Ok(())
}
