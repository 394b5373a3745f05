//! Vehicles and their cost entries
//!
//! Cost entries live under their vehicle's key range, so they are found by
//! a direct prefix scan and need no secondary index.

use super::records;
use super::store::Store;
use crate::errors::{not_found, Result};
use crate::keys::UserScope;
use crate::kv::KvRead;
use hoard_core::model::{CostEntry, Vehicle};
use uuid::Uuid;

impl Store {
    /// Vehicles of `user_id`; cost entries under the same prefix are excluded
    pub fn list_vehicles(&self, user_id: &str) -> Result<Vec<Vehicle>> {
        self.observed("list_vehicles", user_id, || {
            let scope = UserScope::new(user_id)?;
            self.engine
                .view(|txn| records::list(txn, &scope.vehicles_prefix()))
        })
    }

    pub fn get_vehicle(&self, user_id: &str, id: &Uuid) -> Result<Vehicle> {
        self.observed("get_vehicle", user_id, || {
            let scope = UserScope::new(user_id)?;
            self.engine
                .view(|txn| records::read(txn, &scope.vehicle(id), id))
        })
    }

    pub fn create_vehicle(&self, user_id: &str, vehicle: &Vehicle) -> Result<()> {
        self.observed("create_vehicle", user_id, || {
            let scope = UserScope::new(user_id)?;
            let key = scope.vehicle(&vehicle.id);
            self.engine
                .update(|txn| records::insert_new(txn, &key, vehicle))
        })
    }

    pub fn update_vehicle(&self, user_id: &str, vehicle: &Vehicle) -> Result<()> {
        self.observed("update_vehicle", user_id, || {
            let scope = UserScope::new(user_id)?;
            let key = scope.vehicle(&vehicle.id);
            self.engine
                .update(|txn| records::overwrite_existing(txn, &key, vehicle).map(|_| ()))
        })
    }

    /// Delete a vehicle and all of its cost entries
    pub fn delete_vehicle(&self, user_id: &str, id: &Uuid) -> Result<()> {
        self.observed("delete_vehicle", user_id, || {
            let scope = UserScope::new(user_id)?;
            let removed = self.engine.update(|txn| {
                records::remove_existing::<Vehicle>(txn, &scope.vehicle(id), id)?;
                let costs = txn.scan_keys(&scope.cost_entries_prefix(id))?;
                for key in &costs {
                    txn.delete(key)?;
                }
                Ok(costs.len())
            })?;
            tracing::debug!(vehicle_id = %id, cost_entries = removed, "vehicle cascade complete");
            Ok(())
        })
    }

    pub fn list_cost_entries(&self, user_id: &str, vehicle_id: &Uuid) -> Result<Vec<CostEntry>> {
        self.observed("list_cost_entries", user_id, || {
            let scope = UserScope::new(user_id)?;
            self.engine
                .view(|txn| records::list(txn, &scope.cost_entries_prefix(vehicle_id)))
        })
    }

    pub fn get_cost_entry(
        &self,
        user_id: &str,
        vehicle_id: &Uuid,
        id: &Uuid,
    ) -> Result<CostEntry> {
        self.observed("get_cost_entry", user_id, || {
            let scope = UserScope::new(user_id)?;
            self.engine
                .view(|txn| records::read(txn, &scope.cost_entry(vehicle_id, id), id))
        })
    }

    /// Book a cost entry against `entry.vehicle_id`
    ///
    /// # Errors
    ///
    /// `NotFound` if the vehicle does not exist; `Conflict` if the entry
    /// id is already used under that vehicle.
    pub fn create_cost_entry(&self, user_id: &str, entry: &CostEntry) -> Result<()> {
        self.observed("create_cost_entry", user_id, || {
            let scope = UserScope::new(user_id)?;
            let vehicle_key = scope.vehicle(&entry.vehicle_id);
            let key = scope.cost_entry(&entry.vehicle_id, &entry.id);
            self.engine.update(|txn| {
                if !txn.contains(&vehicle_key)? {
                    return Err(not_found("vehicle", entry.vehicle_id));
                }
                records::insert_new(txn, &key, entry)
            })
        })
    }

    /// Overwrite a cost entry in place
    ///
    /// The entry is addressed by `(entry.vehicle_id, entry.id)`; changing
    /// `vehicle_id` does not move an existing entry.
    pub fn update_cost_entry(&self, user_id: &str, entry: &CostEntry) -> Result<()> {
        self.observed("update_cost_entry", user_id, || {
            let scope = UserScope::new(user_id)?;
            let key = scope.cost_entry(&entry.vehicle_id, &entry.id);
            self.engine
                .update(|txn| records::overwrite_existing(txn, &key, entry).map(|_| ()))
        })
    }

    pub fn delete_cost_entry(&self, user_id: &str, vehicle_id: &Uuid, id: &Uuid) -> Result<()> {
        self.observed("delete_cost_entry", user_id, || {
            let scope = UserScope::new(user_id)?;
            let key = scope.cost_entry(vehicle_id, id);
            self.engine
                .update(|txn| records::remove_existing::<CostEntry>(txn, &key, id).map(|_| ()))
        })
    }
}
