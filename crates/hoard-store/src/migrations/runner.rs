//! Migration runner
//!
//! Applies pending migrations in ascending order, each exactly once

use super::registry::Migration;
use super::version::{read_version, write_version};
use crate::errors::{migration_error, Result};
use crate::kv::KvEngine;
use hoard_core::errors::HoardError;
use hoard_core::{log_op_end, log_op_error, log_op_start};
use std::time::Instant;

/// Bring the store up to the newest version in `migrations`
///
/// Reads the schema version marker, then runs every migration whose
/// version is greater, in order. Each transform and its marker update share
/// one write transaction. On the first failure the runner stops and the
/// marker stays at the last migration that committed.
///
/// Returns the schema version after the run.
///
/// # Errors
///
/// `Migration` if the registry is not strictly ascending or a transform
/// fails; `Persistence` if the stored marker is corrupt.
pub fn run_all(engine: &KvEngine, migrations: &[Migration]) -> Result<u64> {
    log_op_start!("run_migrations", available = migrations.len());
    let start = Instant::now();

    let result = run_pending(engine, migrations);
    match &result {
        Ok(version) => {
            log_op_end!(
                "run_migrations",
                duration_ms = start.elapsed().as_millis() as u64,
                schema_version = *version
            );
        }
        Err(e) => {
            log_op_error!(
                "run_migrations",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
        }
    }
    result
}

fn run_pending(engine: &KvEngine, migrations: &[Migration]) -> Result<u64> {
    check_order(migrations)?;

    let mut current = engine.view(|txn| read_version(txn))?;
    tracing::info!(
        schema_version = current,
        available = migrations.len(),
        "migration check"
    );

    for migration in migrations {
        if migration.version <= current {
            continue;
        }
        let start = Instant::now();
        tracing::info!(
            migration_version = migration.version,
            description = %migration.description,
            "applying migration"
        );

        engine
            .update(|txn| {
                migration.apply(txn)?;
                write_version(txn, migration.version)
            })
            .map_err(|e| migration_error(migration.version, &migration.description, &e))?;

        current = migration.version;
        tracing::info!(
            migration_version = migration.version,
            duration_ms = start.elapsed().as_millis() as u64,
            "migration applied"
        );
    }

    Ok(current)
}

fn check_order(migrations: &[Migration]) -> Result<()> {
    let mut previous = 0;
    for migration in migrations {
        if migration.version <= previous {
            return Err(HoardError::MigrationOrder {
                version: migration.version,
                previous,
            }
            .into());
        }
        previous = migration.version;
    }
    Ok(())
}
