//! Module-scoped categories and cascade deletion

use super::index::{CATEGORY_CONTRACTS, CATEGORY_PURCHASES};
use super::store::Store;
use super::{indexed, records};
use crate::errors::Result;
use crate::keys::UserScope;
use hoard_core::model::Category;
use uuid::Uuid;

impl Store {
    pub fn list_categories(&self, user_id: &str, module: &str) -> Result<Vec<Category>> {
        self.observed("list_categories", user_id, || {
            let scope = UserScope::new(user_id)?.module(module)?;
            self.engine
                .view(|txn| records::list(txn, &scope.categories_prefix()))
        })
    }

    pub fn get_category(&self, user_id: &str, module: &str, id: &Uuid) -> Result<Category> {
        self.observed("get_category", user_id, || {
            let scope = UserScope::new(user_id)?.module(module)?;
            self.engine
                .view(|txn| records::read(txn, &scope.category(id), id))
        })
    }

    pub fn create_category(&self, user_id: &str, module: &str, category: &Category) -> Result<()> {
        self.observed("create_category", user_id, || {
            let scope = UserScope::new(user_id)?.module(module)?;
            let key = scope.category(&category.id);
            self.engine
                .update(|txn| records::insert_new(txn, &key, category))
        })
    }

    pub fn update_category(&self, user_id: &str, module: &str, category: &Category) -> Result<()> {
        self.observed("update_category", user_id, || {
            let scope = UserScope::new(user_id)?.module(module)?;
            let key = scope.category(&category.id);
            self.engine
                .update(|txn| records::overwrite_existing(txn, &key, category).map(|_| ()))
        })
    }

    /// Delete a category together with every contract and purchase
    /// indexed under it
    ///
    /// Either the category, its children and all their index entries are
    /// removed, or nothing is.
    ///
    /// # Errors
    ///
    /// `NotFound` if the category does not exist in this module.
    pub fn delete_category(&self, user_id: &str, module: &str, id: &Uuid) -> Result<()> {
        self.observed("delete_category", user_id, || {
            let module_scope = UserScope::new(user_id)?.module(module)?;
            let scope = module_scope.user();

            let (contracts, purchases) = self.engine.update(|txn| {
                records::remove_existing::<Category>(txn, &module_scope.category(id), id)?;
                let contracts =
                    indexed::purge_category(txn, scope, &CATEGORY_CONTRACTS, id, |c| {
                        scope.contract(c)
                    })?;
                let purchases =
                    indexed::purge_category(txn, scope, &CATEGORY_PURCHASES, id, |p| {
                        scope.purchase(p)
                    })?;
                Ok((contracts, purchases))
            })?;

            tracing::debug!(
                category_id = %id,
                contracts,
                purchases,
                "category cascade complete"
            );
            Ok(())
        })
    }
}
