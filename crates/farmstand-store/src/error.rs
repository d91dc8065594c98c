//! # Store Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sqlx::Error / MigrateError / serde_json::Error                         │
//! │       │                                                                 │
//! │       ▼  From impls below                                               │
//! │  StoreError                                                             │
//! │       │                                                                 │
//! │       ▼  From<StoreError> for ClientError                               │
//! │  ClientError::Storage  (logged, rarely surfaced to the user)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Local persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to open the database.
    #[error("Storage connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution failed.
    #[error("Storage query failed: {0}")]
    QueryFailed(String),

    /// Migration failed.
    ///
    /// ## When This Occurs
    /// - Migration file modified after being applied (checksum mismatch)
    /// - Database file from a newer client version
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A stored value could not be encoded or decoded.
    ///
    /// Usually a snapshot written by an older client with a different shape.
    #[error("Stored value for '{key}' is unreadable: {message}")]
    Corrupt { key: String, message: String },

    /// JSON encoding failed while writing.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// All pool connections are busy.
    #[error("Storage pool exhausted")]
    PoolExhausted,

    #[error("Internal storage error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => StoreError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,
            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("Pool is closed".to_string()),
            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
