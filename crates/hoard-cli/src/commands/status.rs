//! `hoard status`

use hoard_store::{KeyFamily, StoreConfig};

pub fn execute(config: &StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(config)?;
    store.health_check()?;
    let version = store.schema_version()?;
    let census = store.census()?;
    store.close();

    println!("Database: {}", config.db_path.display());
    println!("Schema version: {}", version);
    println!();
    for family in KeyFamily::ALL {
        println!("  {:<16} {}", family.name(), census.count(family));
    }
    if census.unknown > 0 {
        println!("  {:<16} {}", "unrecognised", census.unknown);
    }
    println!();
    println!("Total keys: {}", census.total());
    Ok(())
}
