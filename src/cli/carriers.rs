use comfy_table::Table;

use crate::carrier::Carrier;
use crate::error::Result;

pub fn run(show_headers: bool) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Code", "Name", "Expected Headers"]);
    for carrier in Carrier::ALL {
        table.add_row(vec![
            carrier.code().to_string(),
            carrier.display_name().to_string(),
            carrier.mapping().len().to_string(),
        ]);
    }
    println!("{table}");

    if show_headers {
        for carrier in Carrier::ALL {
            println!("\n{}:", carrier.code());
            for (raw, field) in carrier.mapping() {
                println!("  {raw} -> {}", field.column());
            }
        }
    }
    Ok(())
}
