use thiserror::Error;

/// Errors that can occur when reading or writing the durable cart entry.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The stored value is not a valid JSON document.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing store refused the request.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for cart store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
