use sea_orm::{DbErr, SqlErr};
use tracing::error;

use crate::domain::cluster::entities::ClusterError;

pub mod postgres;
pub mod schema;
pub mod transaction;

/// Maps a storage failure on `resource` to the domain taxonomy. Constraint
/// violations are caller errors, everything else is a storage fault.
pub(crate) fn map_db_error(resource: &'static str, e: DbErr) -> ClusterError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => {
            ClusterError::Validation(format!("{resource} already exists: {message}"))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
            ClusterError::Validation(format!("{resource} references a missing record: {message}"))
        }
        _ => match e {
            DbErr::RecordNotFound(key) => ClusterError::not_found(resource, key),
            DbErr::ConnectionAcquire(e) => ClusterError::ServiceUnavailable(e.to_string()),
            DbErr::Conn(e) => ClusterError::ServiceUnavailable(e.to_string()),
            other => {
                error!("Storage error on {}: {}", resource, other);
                ClusterError::Storage(other.to_string())
            }
        },
    }
}
