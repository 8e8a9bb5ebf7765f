//! Database-specific error types and conversions.

use portico_core::error::PorticoError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Stored row could not be decoded: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Cryptography error: {0}")]
    Crypto(String),
}

impl From<DbError> for PorticoError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => PorticoError::NotFound { entity, id },
            DbError::Crypto(msg) => PorticoError::Crypto(msg),
            other => PorticoError::Database(other.to_string()),
        }
    }
}
