//! Transaction handles over the `kv` table

use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OptionalExtension, Row, ToSql, Transaction};

/// Read access shared by both transaction kinds
///
/// Scans materialize their results before returning, so no iterator is
/// ever alive while the same transaction mutates the range.
pub trait KvRead {
    /// Point lookup
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Ascending `(key, value)` pairs whose key starts with `prefix`
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>>;

    /// Ascending keys that start with `prefix`, without loading values
    fn scan_keys(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>>;

    fn contains(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// The smallest byte string greater than every string with `prefix`
///
/// Returns `None` when no such bound exists (empty prefix or all `0xff`),
/// in which case the scan is unbounded above.
pub fn prefix_upper_bound(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}

fn get_in(conn: &Connection, key: &[u8]) -> Result<Option<Vec<u8>>> {
    conn.prepare_cached("SELECT value FROM kv WHERE key = ?1")
        .map_err(from_rusqlite)?
        .query_row([key], |row| row.get(0))
        .optional()
        .map_err(from_rusqlite)
}

fn scan_in<T, F>(conn: &Connection, prefix: &[u8], columns: &str, map: F) -> Result<Vec<T>>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let end = prefix_upper_bound(prefix);
    let (sql, params): (String, Vec<&dyn ToSql>) = match &end {
        Some(end) => (
            format!(
                "SELECT {} FROM kv WHERE key >= ?1 AND key < ?2 ORDER BY key ASC",
                columns
            ),
            vec![&prefix as &dyn ToSql, end as &dyn ToSql],
        ),
        None => (
            format!("SELECT {} FROM kv WHERE key >= ?1 ORDER BY key ASC", columns),
            vec![&prefix as &dyn ToSql],
        ),
    };

    let mut stmt = conn.prepare_cached(&sql).map_err(from_rusqlite)?;
    let rows = stmt
        .query_map(params.as_slice(), map)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}

fn scan_pairs(conn: &Connection, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
    scan_in(conn, prefix, "key, value", |row| Ok((row.get(0)?, row.get(1)?)))
}

fn scan_key_column(conn: &Connection, prefix: &[u8]) -> Result<Vec<Vec<u8>>> {
    scan_in(conn, prefix, "key", |row| row.get(0))
}

/// A read-only transaction
pub struct ReadTxn<'c> {
    pub(super) tx: Transaction<'c>,
}

impl KvRead for ReadTxn<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        get_in(&self.tx, key)
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        scan_pairs(&self.tx, prefix)
    }

    fn scan_keys(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>> {
        scan_key_column(&self.tx, prefix)
    }
}

/// A read-write transaction
///
/// Writes become visible to other transactions only when the enclosing
/// `KvEngine::update` closure returns `Ok`.
pub struct WriteTxn<'c> {
    pub(super) tx: Transaction<'c>,
}

impl WriteTxn<'_> {
    /// Insert or overwrite `key`
    pub fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.tx
            .prepare_cached(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            )
            .map_err(from_rusqlite)?
            .execute(rusqlite::params![key, value])
            .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Remove `key`; removing an absent key is a no-op
    pub fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.tx
            .prepare_cached("DELETE FROM kv WHERE key = ?1")
            .map_err(from_rusqlite)?
            .execute([key])
            .map_err(from_rusqlite)?;
        Ok(())
    }
}

impl KvRead for WriteTxn<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        get_in(&self.tx, key)
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        scan_pairs(&self.tx, prefix)
    }

    fn scan_keys(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>> {
        scan_key_column(&self.tx, prefix)
    }
}
