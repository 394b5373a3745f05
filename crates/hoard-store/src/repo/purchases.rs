//! Purchases, indexed by category

use super::index::CATEGORY_PURCHASES;
use super::store::Store;
use super::{indexed, records};
use crate::errors::Result;
use crate::keys::UserScope;
use hoard_core::model::Purchase;
use uuid::Uuid;

impl Store {
    pub fn list_purchases(&self, user_id: &str) -> Result<Vec<Purchase>> {
        self.observed("list_purchases", user_id, || {
            let scope = UserScope::new(user_id)?;
            self.engine
                .view(|txn| records::list(txn, &scope.purchases_prefix()))
        })
    }

    /// Purchases whose category is `category_id`
    ///
    /// Index entries pointing at a purchase that no longer exists are
    /// skipped.
    pub fn list_purchases_by_category(
        &self,
        user_id: &str,
        category_id: &Uuid,
    ) -> Result<Vec<Purchase>> {
        self.observed("list_purchases_by_category", user_id, || {
            let scope = UserScope::new(user_id)?;
            self.engine.view(|txn| {
                indexed::list_by_category(txn, &scope, &CATEGORY_PURCHASES, category_id, |id| {
                    scope.purchase(id)
                })
            })
        })
    }

    pub fn get_purchase(&self, user_id: &str, id: &Uuid) -> Result<Purchase> {
        self.observed("get_purchase", user_id, || {
            let scope = UserScope::new(user_id)?;
            self.engine
                .view(|txn| records::read(txn, &scope.purchase(id), id))
        })
    }

    pub fn create_purchase(&self, user_id: &str, purchase: &Purchase) -> Result<()> {
        self.observed("create_purchase", user_id, || {
            let scope = UserScope::new(user_id)?;
            let key = scope.purchase(&purchase.id);
            self.engine.update(|txn| {
                indexed::insert(txn, &scope, &CATEGORY_PURCHASES, &key, purchase)
            })
        })
    }

    /// Overwrite a purchase; a changed `category_id` moves its index entry
    pub fn update_purchase(&self, user_id: &str, purchase: &Purchase) -> Result<()> {
        self.observed("update_purchase", user_id, || {
            let scope = UserScope::new(user_id)?;
            let key = scope.purchase(&purchase.id);
            self.engine.update(|txn| {
                indexed::replace(txn, &scope, &CATEGORY_PURCHASES, &key, purchase)
            })
        })
    }

    pub fn delete_purchase(&self, user_id: &str, id: &Uuid) -> Result<()> {
        self.observed("delete_purchase", user_id, || {
            let scope = UserScope::new(user_id)?;
            let key = scope.purchase(id);
            self.engine.update(|txn| {
                indexed::remove::<Purchase>(txn, &scope, &CATEGORY_PURCHASES, &key, id)
            })
        })
    }
}
