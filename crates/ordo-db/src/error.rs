//! # Persistence Errors
//!
//! What the order and detail repositories can fail with.
//!
//! ```text
//! sqlx::Error ──From──► DbError ──From──► ApiError (ordo-api)
//!                         │
//!                         ├── NotFound ........... 404
//!                         ├── AmountOutOfRange ... 400
//!                         └── everything else .... 500, logged
//! ```

use thiserror::Error;

/// Failure of a repository call.
#[derive(Debug, Error)]
pub enum DbError {
    /// No row with the requested id.
    ///
    /// ## When This Occurs
    /// - Updating or deleting an order id that doesn't exist
    /// - Deleting an order detail id that doesn't exist
    /// - Adding a detail to an order that doesn't exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A row referenced a missing parent.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK / NOT NULL constraint violation.
    ///
    /// Validation should catch these first; reaching one means a caller
    /// bypassed the validation layer.
    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    /// A write would push an order total past `ordo_core::MAX_AMOUNT`.
    ///
    /// Nothing was written.
    #[error("Amount out of range: {0}")]
    AmountOutOfRange(String),

    /// Opening or reaching the database failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Applying the embedded schema failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected a statement for another reason.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Timed out waiting for a pooled connection.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Anything sqlx reports that fits nowhere else.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// `NotFound` for `entity` with `id`.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// True for [`DbError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }
}

/// SQLite reports constraint failures only through the message text, so
/// database errors are classified by matching on it.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("CHECK constraint failed")
                    || msg.contains("NOT NULL constraint failed")
                {
                    DbError::ConstraintViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Shorthand used by every repository method.
pub type DbResult<T> = Result<T, DbError>;
