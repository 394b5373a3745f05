//! Typed record access shared by every entity kind

use crate::errors::{already_exists, not_found, serialization, Result};
use crate::keys::{Key, KeyFamily};
use crate::kv::{KvRead, WriteTxn};
use hoard_core::model::{Category, Contract, CostEntry, Purchase, User, Vehicle};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

/// A JSON document stored under a single primary key
pub(crate) trait Record: Serialize + DeserializeOwned {
    /// Entity name used in error messages
    const KIND: &'static str;

    /// Key family the primary key belongs to
    const FAMILY: KeyFamily;

    fn id(&self) -> Uuid;
}

/// A record indexed under its owning category
pub(crate) trait Categorized: Record {
    fn category_id(&self) -> Uuid;
}

macro_rules! impl_record {
    ($ty:ty, $kind:literal, $family:expr) => {
        impl Record for $ty {
            const KIND: &'static str = $kind;
            const FAMILY: KeyFamily = $family;

            fn id(&self) -> Uuid {
                self.id
            }
        }
    };
}

impl_record!(User, "user", KeyFamily::User);
impl_record!(Category, "category", KeyFamily::Category);
impl_record!(Contract, "contract", KeyFamily::Contract);
impl_record!(Purchase, "purchase", KeyFamily::Purchase);
impl_record!(Vehicle, "vehicle", KeyFamily::Vehicle);
impl_record!(CostEntry, "cost entry", KeyFamily::CostEntry);

impl Categorized for Contract {
    fn category_id(&self) -> Uuid {
        self.category_id
    }
}

impl Categorized for Purchase {
    fn category_id(&self) -> Uuid {
        self.category_id
    }
}

pub(crate) fn decode<T: DeserializeOwned>(key: &[u8], bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| serialization(key, e))
}

pub(crate) fn encode<T: Serialize>(key: &[u8], value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| serialization(key, e))
}

pub(crate) fn read_optional<T: DeserializeOwned, R: KvRead>(
    txn: &R,
    key: &[u8],
) -> Result<Option<T>> {
    txn.get(key)?
        .map(|bytes| decode(key, &bytes))
        .transpose()
}

/// Read the record at `key`, or `NotFound` naming `id`
pub(crate) fn read<T: Record, R: KvRead>(txn: &R, key: &[u8], id: &Uuid) -> Result<T> {
    read_optional(txn, key)?.ok_or_else(|| not_found(T::KIND, id))
}

/// Write a record whose primary key must not exist yet
pub(crate) fn insert_new<T: Record>(txn: &mut WriteTxn<'_>, key: &[u8], record: &T) -> Result<()> {
    if txn.contains(key)? {
        return Err(already_exists(T::KIND, record.id()));
    }
    txn.set(key, &encode(key, record)?)
}

/// Overwrite an existing record and return the value it replaced
pub(crate) fn overwrite_existing<T: Record>(
    txn: &mut WriteTxn<'_>,
    key: &[u8],
    record: &T,
) -> Result<T> {
    let old: T = read(&*txn, key, &record.id())?;
    txn.set(key, &encode(key, record)?)?;
    Ok(old)
}

/// Delete an existing record and return it
pub(crate) fn remove_existing<T: Record>(
    txn: &mut WriteTxn<'_>,
    key: &[u8],
    id: &Uuid,
) -> Result<T> {
    let old: T = read(&*txn, key, id)?;
    txn.delete(key)?;
    Ok(old)
}

/// Every record of `T`'s family under `prefix`
///
/// Keys under the prefix that parse as another family (cost entries under
/// a vehicle prefix, for instance) are not part of the listing.
pub(crate) fn list<T: Record, R: KvRead>(txn: &R, prefix: &[u8]) -> Result<Vec<T>> {
    txn.scan_prefix(prefix)?
        .into_iter()
        .filter(|(key, _)| Key::parse(key).map(|k| k.family()) == Some(T::FAMILY))
        .map(|(key, value)| decode(&key, &value))
        .collect()
}

/// Resolve child ids to records, skipping ids whose record is gone
pub(crate) fn resolve<T: Record, R: KvRead>(
    txn: &R,
    ids: Vec<Uuid>,
    key_of: impl Fn(&Uuid) -> Vec<u8>,
) -> Result<Vec<T>> {
    let mut records = Vec::with_capacity(ids.len());
    for id in ids {
        let key = key_of(&id);
        match read_optional(txn, &key)? {
            Some(record) => records.push(record),
            None => tracing::debug!(
                entity = T::KIND,
                entity_id = %id,
                "skipping stale index entry"
            ),
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::KvEngine;
    use hoard_core::errors::HxErrorKind;

    #[test]
    fn test_insert_new_refuses_existing_key() {
        let engine = KvEngine::open_in_memory().unwrap();
        let vehicle = Vehicle::new("Golf");
        let key = b"u/alice/veh/x".to_vec();

        engine
            .update(|txn| insert_new(txn, &key, &vehicle))
            .unwrap();
        let err = engine
            .update(|txn| insert_new(txn, &key, &vehicle))
            .unwrap_err();
        assert_eq!(err.kind(), HxErrorKind::Conflict);
    }

    #[test]
    fn test_overwrite_missing_is_not_found() {
        let engine = KvEngine::open_in_memory().unwrap();
        let vehicle = Vehicle::new("Golf");
        let err = engine
            .update(|txn| overwrite_existing(txn, b"u/alice/veh/x", &vehicle))
            .unwrap_err();
        assert_eq!(err.kind(), HxErrorKind::NotFound);
    }

    #[test]
    fn test_corrupt_document_is_serialization_error() {
        let engine = KvEngine::open_in_memory().unwrap();
        engine
            .update(|txn| txn.set(b"u/alice/veh/x", b"{not json"))
            .unwrap();
        let err = engine
            .view(|txn| read::<Vehicle, _>(txn, b"u/alice/veh/x", &Uuid::nil()))
            .unwrap_err();
        assert_eq!(err.kind(), HxErrorKind::Serialization);
        assert_eq!(err.key(), Some("u/alice/veh/x"));
    }
}
