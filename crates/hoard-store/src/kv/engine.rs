//! The shared engine handle

use super::txn::{KvRead, ReadTxn, WriteTxn};
use crate::db;
use crate::errors::{from_rusqlite, Result};
use parking_lot::Mutex;
use rusqlite::{Connection, TransactionBehavior};
use std::path::Path;

/// Ordered transactional key-value engine
///
/// One SQLite connection behind a mutex. Every call to [`view`] or
/// [`update`] runs inside its own transaction, so callers never see a
/// half-applied multi-key write.
///
/// The mutex serializes all transactions issued through one handle, reads
/// included. Within a process, writers therefore queue on the lock instead
/// of failing, and `Concurrency` errors only arise when another process
/// holds the database file.
///
/// [`view`]: KvEngine::view
/// [`update`]: KvEngine::update
pub struct KvEngine {
    conn: Mutex<Connection>,
}

impl KvEngine {
    /// Open (or create) the engine at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            conn: Mutex::new(db::open(path)?),
        })
    }

    /// Open a private in-memory engine
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Mutex::new(db::open_in_memory()?),
        })
    }

    /// Run `f` inside a read-only transaction
    pub fn view<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&ReadTxn<'_>) -> Result<T>,
    {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Deferred)
            .map_err(from_rusqlite)?;
        let txn = ReadTxn { tx };
        let value = f(&txn)?;
        txn.tx.commit().map_err(from_rusqlite)?;
        Ok(value)
    }

    /// Run `f` inside a read-write transaction
    ///
    /// The transaction commits only when `f` returns `Ok`. On `Err` every
    /// write made through the handle is rolled back and the error is
    /// returned unchanged.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut WriteTxn<'_>) -> Result<T>,
    {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(from_rusqlite)?;
        let mut txn = WriteTxn { tx };
        let value = f(&mut txn)?;
        txn.tx.commit().map_err(from_rusqlite)?;
        Ok(value)
    }

    /// Reclaim space left behind by deleted records
    ///
    /// Checkpoints the WAL into the main file and then runs an incremental
    /// vacuum until the freelist is drained. Returns the number of pages
    /// released.
    pub fn collect_garbage(&self) -> Result<u64> {
        let conn = self.conn.lock();
        let before = freelist_count(&conn)?;

        conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))
            .map_err(from_rusqlite)?;

        // incremental_vacuum frees one page per step
        let mut stmt = conn
            .prepare("PRAGMA incremental_vacuum")
            .map_err(from_rusqlite)?;
        let mut rows = stmt.query([]).map_err(from_rusqlite)?;
        while rows.next().map_err(from_rusqlite)?.is_some() {}
        drop(rows);
        drop(stmt);

        let after = freelist_count(&conn)?;
        Ok(before.saturating_sub(after))
    }

    /// Verify the engine answers a trivial read
    pub fn health_check(&self) -> Result<()> {
        self.view(|txn| txn.get(b"").map(|_| ()))
    }
}

fn freelist_count(conn: &Connection) -> Result<u64> {
    conn.query_row("PRAGMA freelist_count", [], |row| row.get::<_, i64>(0))
        .map(|pages| pages.max(0) as u64)
        .map_err(from_rusqlite)
}
