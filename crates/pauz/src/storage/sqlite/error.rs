//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` to `RepositoryError` for the write paths and
//! to `SourceError` for count and preview queries.

use pauz_core::sources::SourceError;
use pauz_core::storage::RepositoryError;

pub const SOURCE_NAME: &str = "relational";

/// Maps a tokio_rusqlite error with a known ID to a RepositoryError.
///
/// - `SQLITE_CONSTRAINT_PRIMARYKEY`/`UNIQUE` → `AlreadyExists`
/// - `QueryReturnedNoRows` → `NotFound`
/// - Closed or unopenable connection → `ConnectionFailed`
/// - All other errors → `QueryFailed`
pub fn map_tokio_rusqlite_error_with_id(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    let id = id.into();
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(sqlite_err, _))
            if sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepositoryError::AlreadyExists { entity_type, id }
        }
        tokio_rusqlite::Error::Rusqlite(rusqlite::Error::QueryReturnedNoRows) => {
            RepositoryError::NotFound { entity_type, id }
        }
        _ if is_connection_error(&err) => RepositoryError::ConnectionFailed(err.to_string()),
        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

/// Maps a failed count or preview query.
///
/// Every failure is reported as unavailability: a failed query never turns
/// into a count of zero.
pub fn map_source_error(err: tokio_rusqlite::Error) -> SourceError {
    let reason = if is_connection_error(&err) {
        format!("connection lost: {err}")
    } else {
        format!("query failed: {err}")
    };
    SourceError::unavailable(SOURCE_NAME, reason)
}

fn is_connection_error(err: &tokio_rusqlite::Error) -> bool {
    match err {
        tokio_rusqlite::Error::ConnectionClosed | tokio_rusqlite::Error::Close(_) => true,
        tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(sqlite_err, _)) => {
            matches!(
                sqlite_err.code,
                rusqlite::ErrorCode::CannotOpen
                    | rusqlite::ErrorCode::DatabaseBusy
                    | rusqlite::ErrorCode::DatabaseLocked
            )
        }
        _ => false,
    }
}
