//! Translation of Diesel and pool failures into repository errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::ProfileRepositoryError;

use super::pool::PoolError;

/// Map pool checkout and build failures to connection errors.
pub(crate) fn map_pool_error(error: PoolError) -> ProfileRepositoryError {
    ProfileRepositoryError::connection(error.message())
}

/// Map Diesel failures to repository errors.
///
/// Database details are logged at debug level only; the returned message is
/// generic so it can travel to clients without leaking SQL.
pub(crate) fn map_diesel_error(error: DieselError) -> ProfileRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => ProfileRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => ProfileRepositoryError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ProfileRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            ProfileRepositoryError::query("unique constraint violated")
        }
        DieselError::DeserializationError(_) => {
            ProfileRepositoryError::query("failed to decode database row")
        }
        _ => ProfileRepositoryError::query("database error"),
    }
}
