use std::path::PathBuf;

use crate::db::get_connection;
use crate::error::Result;
use crate::exporter::export_csv;
use crate::settings::db_path;

pub fn run(output: &str, carrier: Option<&str>) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let out_path = PathBuf::from(output);
    let written = export_csv(&conn, &out_path, carrier)?;
    println!("{written} records exported to {}", out_path.display());
    Ok(())
}
