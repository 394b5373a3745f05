//! Subcommand implementations

pub mod migrate;
pub mod status;
pub mod users;

use hoard_store::{Store, StoreConfig};

/// Open the store for a one-shot command
///
/// Periodic collection is pointless for a process that exits right away,
/// so the maintenance task is left off.
fn open_store(config: &StoreConfig) -> hoard_store::Result<Store> {
    let config = StoreConfig {
        gc_interval_secs: 0,
        ..config.clone()
    };
    Store::open(&config)
}
