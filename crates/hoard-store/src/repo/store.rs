//! Store lifecycle and cross-cutting helpers

use crate::config::StoreConfig;
use crate::errors::Result;
use crate::keys::{Key, KeyFamily};
use crate::kv::{KvEngine, KvRead};
use crate::maintenance::MaintenanceTask;
use crate::migrations::{self, Migration};
use hoard_core::{log_op_end, log_op_error, log_op_start};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Handle to an opened, fully migrated store
///
/// Safe to share across threads (`&Store` is `Sync`). Dropping the store
/// stops the maintenance task; [`close`](Store::close) does so explicitly.
pub struct Store {
    pub(super) engine: Arc<KvEngine>,
    maintenance: Option<MaintenanceTask>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("maintenance", &self.maintenance.is_some())
            .finish_non_exhaustive()
    }
}

/// Number of keys per family
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Census {
    pub families: BTreeMap<KeyFamily, u64>,

    /// Keys that do not parse as any known family
    pub unknown: u64,
}

impl Census {
    pub fn count(&self, family: KeyFamily) -> u64 {
        self.families.get(&family).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.families.values().sum::<u64>() + self.unknown
    }
}

impl Store {
    /// Open the store described by `config`
    ///
    /// Runs every pending built-in migration before returning and starts
    /// the maintenance task unless `gc_interval_secs` is 0.
    ///
    /// # Errors
    ///
    /// Any engine failure while opening, or a `Migration` error. A store
    /// whose migrations failed is never returned.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        tracing::info!(db_path = %config.db_path.display(), "opening store");
        let engine = KvEngine::open(&config.db_path)?;
        Self::open_with(engine, &migrations::all(), config.gc_interval())
    }

    /// Open a private in-memory store with no maintenance task
    pub fn open_in_memory() -> Result<Self> {
        Self::open_with(KvEngine::open_in_memory()?, &migrations::all(), None)
    }

    /// Migrate `engine` with `migrations` and wrap it
    pub fn open_with(
        engine: KvEngine,
        migrations: &[Migration],
        gc_interval: Option<Duration>,
    ) -> Result<Self> {
        let engine = Arc::new(engine);
        migrations::run_all(&engine, migrations)?;

        let maintenance = gc_interval
            .map(|interval| MaintenanceTask::spawn(Arc::clone(&engine), interval))
            .transpose()?;

        Ok(Self {
            engine,
            maintenance,
        })
    }

    /// Raw engine access, for tooling and tests
    pub fn engine(&self) -> &KvEngine {
        &self.engine
    }

    /// Stop background maintenance and release the engine
    pub fn close(mut self) {
        if let Some(task) = self.maintenance.take() {
            task.shutdown();
        }
        tracing::info!("store closed");
    }

    pub fn schema_version(&self) -> Result<u64> {
        self.engine.view(|txn| migrations::read_version(txn))
    }

    pub fn health_check(&self) -> Result<()> {
        self.engine.health_check()
    }

    /// Count every key in the store by family
    pub fn census(&self) -> Result<Census> {
        self.observed("census", "", || {
            let keys = self.engine.view(|txn| txn.scan_keys(b""))?;
            let mut census = Census::default();
            for key in &keys {
                match Key::parse(key) {
                    Some(parsed) => *census.families.entry(parsed.family()).or_insert(0) += 1,
                    None => census.unknown += 1,
                }
            }
            Ok(census)
        })
    }

    /// Run one repository operation with lifecycle logging
    ///
    /// `NotFound` and `Conflict` end the operation normally; anything else
    /// is logged as a failure.
    pub(super) fn observed<T, F>(&self, op: &'static str, user_id: &str, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        log_op_start!(op, user_id = user_id);
        let start = Instant::now();

        let result = f();
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => {
                log_op_end!(op, duration_ms = duration_ms, user_id = user_id);
            }
            Err(e) if e.is_expected() => {
                log_op_end!(
                    op,
                    duration_ms = duration_ms,
                    user_id = user_id,
                    outcome = e.code()
                );
            }
            Err(e) => {
                log_op_error!(op, e.clone(), duration_ms = duration_ms, user_id = user_id);
            }
        }
        result
    }
}
