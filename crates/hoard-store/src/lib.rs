//! hoard store - persistence layer over an ordered key-value engine
//!
//! Provides:
//! - `KvEngine`: ordered transactional key-value storage on SQLite
//! - The key codec mapping every entity and index to one byte-string key
//! - `Store`: per-user entity repository with category indexes and cascades
//! - The schema migration runner and its built-in registry
//! - A background maintenance task reclaiming free pages

pub mod config;
mod db;
pub mod errors;
pub mod keys;
pub mod kv;
pub mod maintenance;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use config::{LogFormat, StoreConfig};
pub use errors::Result;
pub use keys::{Key, KeyFamily, UserScope};
pub use kv::KvEngine;
pub use repo::{Census, Store};
