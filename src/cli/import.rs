use std::path::PathBuf;

use colored::Colorize;
use comfy_table::Table;

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::ingest::ingest_file;
use crate::settings::db_path;

pub fn run(file: &str, carrier: Option<&str>) -> Result<()> {
    let file_path = PathBuf::from(file);
    let mut conn = get_connection(&db_path())?;

    let result = ingest_file(&mut conn, &file_path, carrier)?;

    if result.duplicate_file {
        println!("This file has already been imported (duplicate checksum).");
        return Ok(());
    }

    println!(
        "{} {} records imported from {}",
        "OK".green().bold(),
        result.inserted,
        result.carrier
    );

    if let Some(stats) = result.stats {
        let mut table = Table::new();
        table.set_header(vec!["Metric", "Value"]);
        table.add_row(vec!["Records".to_string(), stats.total_records.to_string()]);
        table.add_row(vec!["Total amount".to_string(), money(stats.total_amount)]);
        table.add_row(vec!["Average amount".to_string(), money(stats.avg_amount)]);
        table.add_row(vec!["Unique policies".to_string(), stats.unique_policies.to_string()]);
        table.add_row(vec!["Unique members".to_string(), stats.unique_members.to_string()]);
        if let Some((start, end)) = &stats.date_range {
            table.add_row(vec!["Payment dates".to_string(), format!("{start} to {end}")]);
        }
        println!("{table}");

        if !stats.by_transaction_type.is_empty() {
            let mut ttable = Table::new();
            ttable.set_header(vec!["Transaction Type", "Count"]);
            for (name, count) in &stats.by_transaction_type {
                ttable.add_row(vec![name.clone(), count.to_string()]);
            }
            println!("{ttable}");
        }
    }

    Ok(())
}
