//! `hoard migrate`

use hoard_store::migrations::CURRENT_VERSION;
use hoard_store::StoreConfig;

/// Opening the store runs every pending migration; report where it ended up
pub fn execute(config: &StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(config)?;
    let version = store.schema_version()?;
    store.close();

    println!("Schema version: {} (latest {})", version, CURRENT_VERSION);
    Ok(())
}
