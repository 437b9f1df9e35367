use crate::db::{get_connection, wipe};
use crate::error::Result;
use crate::settings::db_path;

pub fn run(yes: bool) -> Result<()> {
    if !yes {
        println!("This deletes every stored record. Re-run with --yes to confirm.");
        return Ok(());
    }
    let conn = get_connection(&db_path())?;
    let removed = wipe(&conn)?;
    println!("{removed} records deleted");
    Ok(())
}
