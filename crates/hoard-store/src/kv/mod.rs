//! Ordered transactional key-value engine
//!
//! One `kv` table keyed by BLOB, which SQLite compares with `memcmp`, so
//! range scans come back in byte-lexicographic order. Code above this
//! module only sees the engine handle and its two transaction types.

mod engine;
mod txn;

pub use engine::KvEngine;
pub use txn::{prefix_upper_bound, KvRead, ReadTxn, WriteTxn};
