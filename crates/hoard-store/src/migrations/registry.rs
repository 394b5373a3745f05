//! Migration registry

use super::{v1_rename_price, v2_module_categories};
use crate::errors::Result;
use crate::kv::WriteTxn;
use std::fmt;

type Transform = Box<dyn Fn(&mut WriteTxn<'_>) -> Result<()> + Send + Sync>;

/// One versioned whole-store transform
///
/// The transform runs inside the same write transaction that records its
/// version, so it either lands completely together with the new marker or
/// not at all.
pub struct Migration {
    pub version: u64,
    pub description: String,
    transform: Transform,
}

impl Migration {
    pub fn new<F>(version: u64, description: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&mut WriteTxn<'_>) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            version,
            description: description.into(),
            transform: Box::new(transform),
        }
    }

    pub(crate) fn apply(&self, txn: &mut WriteTxn<'_>) -> Result<()> {
        (self.transform)(txn)
    }
}

impl fmt::Debug for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migration")
            .field("version", &self.version)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Every built-in migration, in ascending version order
pub fn all() -> Vec<Migration> {
    vec![
        Migration::new(
            v1_rename_price::VERSION,
            v1_rename_price::DESCRIPTION,
            v1_rename_price::run,
        ),
        Migration::new(
            v2_module_categories::VERSION,
            v2_module_categories::DESCRIPTION,
            v2_module_categories::run,
        ),
    ]
}
