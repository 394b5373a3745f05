//! hoard core - shared facilities and domain records
//!
//! This crate provides:
//! - The structured error facility (`HxError`, `HxErrorKind`, `HoardError`)
//! - The tracing-based logging facility and its operation macros
//! - Serde records for every persisted entity kind

pub mod errors;
pub mod logging_facility;
pub mod model;

// Re-export commonly used types
pub use errors::{HoardError, HxError, HxErrorKind};
pub use hoard_core_types::schema;
pub use model::{
    BillingInterval, Category, Contract, CostEntry, CostType, Purchase, ReminderFrequency, User,
    UserSettings, Vehicle,
};
