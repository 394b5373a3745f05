//! Secondary index maintenance
//!
//! An index entry is an empty-valued key `u/{userId}/idx/{tag}/{parent}/{child}`.
//! Nothing outside the repository can reach these keys; every link or
//! unlink happens inside the same write transaction as the primary record
//! it describes.

use crate::errors::Result;
use crate::keys::{IndexKind, UserScope};
use crate::kv::{KvRead, WriteTxn};
use hoard_core::model::{Category, Contract, Purchase};
use std::marker::PhantomData;
use uuid::Uuid;

/// A typed parent → child relation backed by an ordered key range
pub(super) struct Relation<P, C> {
    kind: IndexKind,
    _types: PhantomData<fn(P) -> C>,
}

/// Category → contracts
pub(super) const CATEGORY_CONTRACTS: Relation<Category, Contract> =
    Relation::new(IndexKind::CategoryContracts);

/// Category → purchases
pub(super) const CATEGORY_PURCHASES: Relation<Category, Purchase> =
    Relation::new(IndexKind::CategoryPurchases);

impl<P, C> Relation<P, C> {
    const fn new(kind: IndexKind) -> Self {
        Self {
            kind,
            _types: PhantomData,
        }
    }

    pub(super) fn link(
        &self,
        txn: &mut WriteTxn<'_>,
        scope: &UserScope,
        parent: &Uuid,
        child: &Uuid,
    ) -> Result<()> {
        txn.set(&scope.index(self.kind, parent, child), &[])
    }

    pub(super) fn unlink(
        &self,
        txn: &mut WriteTxn<'_>,
        scope: &UserScope,
        parent: &Uuid,
        child: &Uuid,
    ) -> Result<()> {
        txn.delete(&scope.index(self.kind, parent, child))
    }

    /// Move `child` from `old_parent` to `new_parent`; no-op if unchanged
    pub(super) fn relink(
        &self,
        txn: &mut WriteTxn<'_>,
        scope: &UserScope,
        old_parent: &Uuid,
        new_parent: &Uuid,
        child: &Uuid,
    ) -> Result<()> {
        if old_parent == new_parent {
            return Ok(());
        }
        self.unlink(txn, scope, old_parent, child)?;
        self.link(txn, scope, new_parent, child)
    }

    /// Child ids recorded under `parent`, in key order
    ///
    /// The id is the key suffix after the parent prefix. Entries whose suffix
    /// is not a UUID cannot name a record and are skipped.
    pub(super) fn children<R: KvRead>(
        &self,
        txn: &R,
        scope: &UserScope,
        parent: &Uuid,
    ) -> Result<Vec<Uuid>> {
        let prefix = scope.index_prefix(self.kind, parent);
        let mut children = Vec::new();
        for key in txn.scan_keys(&prefix)? {
            let suffix = &key[prefix.len()..];
            match std::str::from_utf8(suffix).ok().and_then(|s| s.parse().ok()) {
                Some(id) => children.push(id),
                None => tracing::debug!(
                    index = self.kind.tag(),
                    key = %String::from_utf8_lossy(&key),
                    "skipping unparsable index entry"
                ),
            }
        }
        Ok(children)
    }
}
