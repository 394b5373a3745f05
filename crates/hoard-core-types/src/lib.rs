//! Leaf types for the hoard error and logging facilities
//!
//! Kept dependency-light so both facilities, and the store, can share the
//! redaction wrapper and the log vocabulary without a cycle.

pub mod schema;
pub mod sensitive;

pub use sensitive::Sensitive;
