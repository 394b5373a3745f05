//! Schema version marker

use crate::errors::Result;
use crate::keys::SCHEMA_VERSION_KEY;
use crate::kv::{KvRead, WriteTxn};
use hoard_core::errors::HoardError;

/// Read the persisted schema version; an absent marker means version 0
///
/// # Errors
///
/// `Persistence` if the marker is present but not exactly 8 bytes.
pub fn read_version<R: KvRead>(txn: &R) -> Result<u64> {
    let Some(bytes) = txn.get(SCHEMA_VERSION_KEY)? else {
        return Ok(0);
    };
    let raw: [u8; 8] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| HoardError::SchemaVersionCorrupt { len: bytes.len() })?;
    Ok(u64::from_be_bytes(raw))
}

/// Persist `version` as the schema version marker
pub fn write_version(txn: &mut WriteTxn<'_>, version: u64) -> Result<()> {
    txn.set(SCHEMA_VERSION_KEY, &version.to_be_bytes())
}
