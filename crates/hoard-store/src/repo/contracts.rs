//! Contracts, indexed by category

use super::index::CATEGORY_CONTRACTS;
use super::store::Store;
use super::{indexed, records};
use crate::errors::Result;
use crate::keys::UserScope;
use hoard_core::model::Contract;
use uuid::Uuid;

impl Store {
    pub fn list_contracts(&self, user_id: &str) -> Result<Vec<Contract>> {
        self.observed("list_contracts", user_id, || {
            let scope = UserScope::new(user_id)?;
            self.engine
                .view(|txn| records::list(txn, &scope.contracts_prefix()))
        })
    }

    /// Contracts whose category is `category_id`
    ///
    /// Index entries pointing at a contract that no longer exists are
    /// skipped.
    pub fn list_contracts_by_category(
        &self,
        user_id: &str,
        category_id: &Uuid,
    ) -> Result<Vec<Contract>> {
        self.observed("list_contracts_by_category", user_id, || {
            let scope = UserScope::new(user_id)?;
            self.engine.view(|txn| {
                indexed::list_by_category(txn, &scope, &CATEGORY_CONTRACTS, category_id, |id| {
                    scope.contract(id)
                })
            })
        })
    }

    pub fn get_contract(&self, user_id: &str, id: &Uuid) -> Result<Contract> {
        self.observed("get_contract", user_id, || {
            let scope = UserScope::new(user_id)?;
            self.engine
                .view(|txn| records::read(txn, &scope.contract(id), id))
        })
    }

    pub fn create_contract(&self, user_id: &str, contract: &Contract) -> Result<()> {
        self.observed("create_contract", user_id, || {
            let scope = UserScope::new(user_id)?;
            let key = scope.contract(&contract.id);
            self.engine.update(|txn| {
                indexed::insert(txn, &scope, &CATEGORY_CONTRACTS, &key, contract)
            })
        })
    }

    /// Overwrite a contract; a changed `category_id` moves its index entry
    pub fn update_contract(&self, user_id: &str, contract: &Contract) -> Result<()> {
        self.observed("update_contract", user_id, || {
            let scope = UserScope::new(user_id)?;
            let key = scope.contract(&contract.id);
            self.engine.update(|txn| {
                indexed::replace(txn, &scope, &CATEGORY_CONTRACTS, &key, contract)
            })
        })
    }

    pub fn delete_contract(&self, user_id: &str, id: &Uuid) -> Result<()> {
        self.observed("delete_contract", user_id, || {
            let scope = UserScope::new(user_id)?;
            let key = scope.contract(id);
            self.engine.update(|txn| {
                indexed::remove::<Contract>(txn, &scope, &CATEGORY_CONTRACTS, &key, id)
            })
        })
    }
}
