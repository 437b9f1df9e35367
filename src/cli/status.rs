use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::format_bytes;
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = std::path::PathBuf::from(&settings.data_dir);
    let db_path = data_dir.join("commish.db");

    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());

    if db_path.exists() {
        let size = std::fs::metadata(&db_path)?.len();
        println!("DB size:    {}", format_bytes(size));

        let conn = get_connection(&db_path)?;
        let records: i64 =
            conn.query_row("SELECT count(*) FROM commission_reports", [], |r| r.get(0))?;
        let imports: i64 = conn.query_row("SELECT count(*) FROM imports", [], |r| r.get(0))?;
        let carriers: i64 = conn.query_row(
            "SELECT count(DISTINCT carrier_name) FROM commission_reports",
            [],
            |r| r.get(0),
        )?;

        println!();
        println!("Records:         {records}");
        println!("Imported files:  {imports}");
        println!("Carriers seen:   {carriers}");
    } else {
        println!();
        println!("Database not found. Run `commish init` to set up.");
    }

    Ok(())
}
