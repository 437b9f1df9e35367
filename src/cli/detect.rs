use std::path::PathBuf;

use crate::carrier::Carrier;
use crate::error::Result;
use crate::sheet::open_sheet;

pub fn run(file: &str) -> Result<()> {
    let sheet = open_sheet(&PathBuf::from(file))?;
    match Carrier::detect(&sheet.headers) {
        Some(carrier) => println!("{} ({})", carrier.code(), carrier.display_name()),
        None => println!("unknown (no carrier matches at least half of its expected headers)"),
    }
    Ok(())
}
