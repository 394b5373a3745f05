//! Schema migration framework
//!
//! Provides:
//! - A registry of versioned whole-store transforms
//! - A runner that applies pending transforms in order, once each
//! - The persisted 8-byte big-endian schema version marker

mod registry;
mod runner;
mod v1_rename_price;
mod v2_module_categories;
mod version;

pub use registry::{all, Migration};
pub use runner::run_all;
pub use version::{read_version, write_version};

/// Highest version in the built-in registry
pub const CURRENT_VERSION: u64 = v2_module_categories::VERSION;
