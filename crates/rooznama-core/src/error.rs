//! Error types module
//!
//! All errors raised by the publishing pipeline are unified under the
//! `AppError` enum: database, storage, image-processing, SEO-provider, and
//! input errors.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx`
//! feature so that pure-logic consumers can build without a database driver.

use std::io;

use crate::models::Language;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Postgres error code for unique constraint violations.
pub const PG_UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    /// A concurrent writer won the `(lang, slug)` uniqueness race. The caller
    /// re-allocates the slug and retries the insert.
    #[error("Slug already taken: {slug} ({lang})")]
    SlugConflict { lang: Language, slug: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("SEO provider error: {0}")]
    SeoProvider(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the error is worth retrying from the top of the failed stage.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::SlugConflict { .. })
    }
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

#[cfg(feature = "sqlx")]
impl AppError {
    /// True when the underlying database error is a unique constraint
    /// violation (Postgres 23505).
    pub fn is_unique_violation(err: &SqlxError) -> bool {
        matches!(
            err,
            SqlxError::Database(db) if db.code().as_deref() == Some(PG_UNIQUE_VIOLATION)
        )
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_conflict_is_retryable() {
        let err = AppError::SlugConflict {
            lang: Language::Fa,
            slug: "some-slug".to_string(),
        };
        assert!(err.is_retryable());
        assert!(err.to_string().contains("some-slug"));
    }

    #[test]
    fn test_storage_error_not_retryable() {
        let err = AppError::Storage("disk full".to_string());
        assert!(!err.is_retryable());
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_pool_closed_is_not_unique_violation() {
        assert!(!AppError::is_unique_violation(&sqlx::Error::PoolClosed));
    }
}
