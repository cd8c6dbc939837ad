//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define find/insert/update/delete contracts the services depend on.
//! - Isolate SQLite query details from capacity and orchestration logic.
//!
//! # Invariants
//! - Repository writes enforce model `validate()` before persistence.
//! - Repository APIs return semantic errors (`*NotFound`, `Conflict`) in
//!   addition to DB transport errors.
//! - Lock contention (`SQLITE_BUSY`/`SQLITE_LOCKED`) is always `Conflict`.

use crate::db::DbError;
use crate::model::bag::{BagId, BagValidationError};
use crate::model::cuboid::{CuboidId, CuboidValidationError};
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod bag_repo;
pub mod cuboid_repo;
mod schema;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by bag and cuboid persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Bag failed model validation before write.
    InvalidBag(BagValidationError),
    /// Cuboid failed model validation before write.
    InvalidCuboid(CuboidValidationError),
    Db(DbError),
    BagNotFound(BagId),
    CuboidNotFound(CuboidId),
    /// Another writer held the database lock past the busy timeout.
    Conflict(rusqlite::Error),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBag(err) => write!(f, "{err}"),
            Self::InvalidCuboid(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::BagNotFound(id) => write!(f, "bag not found: {id}"),
            Self::CuboidNotFound(id) => write!(f, "cuboid not found: {id}"),
            Self::Conflict(err) => write!(f, "concurrent write conflict: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidBag(err) => Some(err),
            Self::InvalidCuboid(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Conflict(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BagValidationError> for RepoError {
    fn from(value: BagValidationError) -> Self {
        Self::InvalidBag(value)
    }
}

impl From<CuboidValidationError> for RepoError {
    fn from(value: CuboidValidationError) -> Self {
        Self::InvalidCuboid(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => Self::from(err),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match value.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => Self::Conflict(value),
            _ => Self::Db(DbError::Sqlite(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RepoError;
    use rusqlite::ffi;

    #[test]
    fn busy_and_locked_errors_map_to_conflict() {
        for code in [ffi::SQLITE_BUSY, ffi::SQLITE_LOCKED] {
            let err = rusqlite::Error::SqliteFailure(ffi::Error::new(code), None);
            assert!(matches!(RepoError::from(err), RepoError::Conflict(_)));
        }
    }

    #[test]
    fn other_sqlite_errors_stay_db_errors() {
        let err = rusqlite::Error::SqliteFailure(ffi::Error::new(ffi::SQLITE_CONSTRAINT), None);
        assert!(matches!(RepoError::from(err), RepoError::Db(_)));
    }
}
