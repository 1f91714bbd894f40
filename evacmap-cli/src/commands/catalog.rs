use anyhow::Result;
use std::path::PathBuf;

use super::load_catalog;

pub fn run(catalog: Option<PathBuf>) -> Result<()> {
    let catalog = load_catalog(catalog)?;

    println!("Shelter catalog");
    println!("  records:      {}", catalog.len());
    println!("  invalid rows: {}", catalog.invalid_row_count());

    if catalog.invalid_row_count() > 0 {
        println!("\nDropped rows:");
        for raw in catalog.invalid_rows() {
            if raw.is_empty() {
                println!("  <unreadable row>");
            } else {
                println!("  {}", raw.join(","));
            }
        }
    }

    Ok(())
}
