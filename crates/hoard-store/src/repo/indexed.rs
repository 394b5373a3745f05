//! Mutations of records that carry a category index entry
//!
//! Each helper changes the primary record and its index entry together,
//! inside the caller's write transaction.

use super::index::Relation;
use super::records::{self, Categorized};
use crate::errors::Result;
use crate::keys::UserScope;
use crate::kv::{KvRead, WriteTxn};
use hoard_core::model::Category;
use uuid::Uuid;

pub(super) fn insert<T: Categorized>(
    txn: &mut WriteTxn<'_>,
    scope: &UserScope,
    relation: &Relation<Category, T>,
    key: &[u8],
    record: &T,
) -> Result<()> {
    records::insert_new(txn, key, record)?;
    relation.link(txn, scope, &record.category_id(), &record.id())
}

/// Overwrite the record, moving its index entry if the category changed
pub(super) fn replace<T: Categorized>(
    txn: &mut WriteTxn<'_>,
    scope: &UserScope,
    relation: &Relation<Category, T>,
    key: &[u8],
    record: &T,
) -> Result<()> {
    let old = records::overwrite_existing(txn, key, record)?;
    relation.relink(
        txn,
        scope,
        &old.category_id(),
        &record.category_id(),
        &record.id(),
    )
}

/// Delete the record and the index entry recorded for its category
pub(super) fn remove<T: Categorized>(
    txn: &mut WriteTxn<'_>,
    scope: &UserScope,
    relation: &Relation<Category, T>,
    key: &[u8],
    id: &Uuid,
) -> Result<()> {
    let old: T = records::remove_existing(txn, key, id)?;
    relation.unlink(txn, scope, &old.category_id(), id)
}

/// Records indexed under `category_id`, resolved through the index
pub(super) fn list_by_category<T, R, K>(
    txn: &R,
    scope: &UserScope,
    relation: &Relation<Category, T>,
    category_id: &Uuid,
    key_of: K,
) -> Result<Vec<T>>
where
    T: Categorized,
    R: KvRead,
    K: Fn(&Uuid) -> Vec<u8>,
{
    let ids = relation.children(txn, scope, category_id)?;
    records::resolve(txn, ids, key_of)
}

/// Delete every record indexed under `category_id` plus its index entry
///
/// Ids are collected in full before the first delete. Returns how many
/// records were removed.
pub(super) fn purge_category<T, K>(
    txn: &mut WriteTxn<'_>,
    scope: &UserScope,
    relation: &Relation<Category, T>,
    category_id: &Uuid,
    key_of: K,
) -> Result<usize>
where
    T: Categorized,
    K: Fn(&Uuid) -> Vec<u8>,
{
    let ids = relation.children(&*txn, scope, category_id)?;
    for id in &ids {
        txn.delete(&key_of(id))?;
        relation.unlink(txn, scope, category_id, id)?;
    }
    Ok(ids.len())
}
