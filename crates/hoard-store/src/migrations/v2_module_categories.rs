//! v2: module-scoped categories
//!
//! Categories used to live at `u/{userId}/cat/{id}`. Every such key moves
//! to `u/{userId}/mod/contracts/cat/{id}` with its value unchanged.

use crate::errors::Result;
use crate::keys::{Key, USER_SCOPED_PREFIX};
use crate::kv::{KvRead, WriteTxn};
use hoard_core::model::MODULE_CONTRACTS;

pub(super) const VERSION: u64 = 2;
pub(super) const DESCRIPTION: &str =
    "move category keys from u/{userId}/cat/ to u/{userId}/mod/contracts/cat/";

pub(super) fn run(txn: &mut WriteTxn<'_>) -> Result<()> {
    let mut moves = Vec::new();
    for (key, value) in txn.scan_prefix(USER_SCOPED_PREFIX)? {
        if let Some(Key::LegacyCategory {
            user_id,
            category_id,
        }) = Key::parse(&key)
        {
            let new_key = Key::Category {
                user_id,
                module: MODULE_CONTRACTS,
                category_id,
            }
            .encode()?;
            moves.push((key.clone(), new_key, value));
        }
    }

    for (old_key, new_key, value) in &moves {
        txn.set(new_key, value)?;
        txn.delete(old_key)?;
    }
    tracing::debug!(moved = moves.len(), "legacy category keys moved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::KvEngine;

    #[test]
    fn test_only_legacy_layout_moves() {
        let engine = KvEngine::open_in_memory().unwrap();
        engine
            .update(|txn| {
                txn.set(b"u/alice/cat/c1", b"{\"name\":\"Insurance\"}")?;
                txn.set(b"u/alice/mod/purchases/cat/c2", b"{}")?;
                // A contract whose id happens to be "cat" is not a category
                txn.set(b"u/alice/con/cat", b"{}")
            })
            .unwrap();

        engine.update(run).unwrap();

        let keys = engine.view(|txn| txn.scan_keys(b"u/alice/")).unwrap();
        assert_eq!(
            keys,
            vec![
                b"u/alice/con/cat".to_vec(),
                b"u/alice/mod/contracts/cat/c1".to_vec(),
                b"u/alice/mod/purchases/cat/c2".to_vec(),
            ]
        );
        let moved = engine
            .view(|txn| txn.get(b"u/alice/mod/contracts/cat/c1"))
            .unwrap();
        assert_eq!(moved, Some(b"{\"name\":\"Insurance\"}".to_vec()));
    }
}
