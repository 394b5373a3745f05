//! Error handling for hoard-store
//!
//! Wraps hoard-core HxError with store-specific helpers

use hoard_core::errors::{HoardError, HxError, HxErrorKind};
use rusqlite::ErrorCode;

/// Result type alias using HxError
pub type Result<T> = std::result::Result<T, HxError>;

/// Create a database error from rusqlite::Error
///
/// A busy or locked database means another writer holds the engine; that is
/// reported as `Concurrency` so callers can decide whether to retry.
pub fn from_rusqlite(err: rusqlite::Error) -> HxError {
    let kind = match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if matches!(
                failure.code,
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ) =>
        {
            HxErrorKind::Concurrency
        }
        _ => HxErrorKind::Persistence,
    };
    HxError::new(kind)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a not-found error for an entity kind
pub fn not_found(entity: &'static str, id: impl ToString) -> HxError {
    HoardError::EntityNotFound {
        entity,
        id: id.to_string(),
    }
    .into()
}

/// Create a conflict error for a primary key that already exists
pub fn already_exists(entity: &'static str, id: impl ToString) -> HxError {
    HoardError::AlreadyExists {
        entity,
        id: id.to_string(),
    }
    .into()
}

/// Create a serialization error for the record stored under `key`
pub fn serialization(key: &[u8], err: serde_json::Error) -> HxError {
    HxError::from(err).with_key(key)
}

/// Create a migration error
pub fn migration_error(version: u64, description: &str, reason: &HxError) -> HxError {
    HoardError::MigrationFailed {
        version,
        description: description.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

/// Create a configuration error
pub fn config_error(reason: impl Into<String>) -> HxError {
    HxError::new(HxErrorKind::Config)
        .with_op("config")
        .with_message(reason)
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> HxError {
    HxError::new(HxErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_maps_to_concurrency() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        assert_eq!(from_rusqlite(err).kind(), HxErrorKind::Concurrency);
    }

    #[test]
    fn test_other_sqlite_errors_are_persistence() {
        let err = rusqlite::Error::QueryReturnedNoRows;
        assert_eq!(from_rusqlite(err).kind(), HxErrorKind::Persistence);
    }
}
