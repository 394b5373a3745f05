//! Persisted domain records
//!
//! Every record serializes to a camelCase JSON document; field names are
//! part of the on-disk format and must not change without a migration.

mod category;
mod contract;
mod purchase;
mod settings;
mod user;
mod vehicle;

pub use category::Category;
pub use contract::{BillingInterval, Contract};
pub use purchase::Purchase;
pub use settings::{ReminderFrequency, UserSettings};
pub use user::User;
pub use vehicle::{CostEntry, CostType, Vehicle};

/// Module name under which contract categories live
pub const MODULE_CONTRACTS: &str = "contracts";

/// Module name under which purchase categories live
pub const MODULE_PURCHASES: &str = "purchases";
