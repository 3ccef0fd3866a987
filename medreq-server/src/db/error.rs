//! Database error type

use medreq_core::{StoreError, ValidationError};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// A stored enum column holds a value outside its closed set
    #[error("corrupt row: {0}")]
    Decode(#[from] ValidationError),
}

impl From<DbError> for StoreError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Sqlx(sqlx::Error::Database(db))
                if db.is_unique_violation() || db.is_foreign_key_violation() =>
            {
                StoreError::Conflict(db.message().to_owned())
            }
            other => StoreError::Backend(other.to_string()),
        }
    }
}
