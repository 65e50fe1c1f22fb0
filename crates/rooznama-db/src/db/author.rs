use async_trait::async_trait;
use sqlx::PgPool;

use rooznama_core::store::{AuthorDirectory, AuthorRecord};
use rooznama_core::AppError;

/// Account lookups backing the author fallback chain.
#[derive(Clone)]
pub struct AuthorRepository {
    pool: PgPool,
}

impl AuthorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorDirectory for AuthorRepository {
    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    async fn find_active(&self, id: i64) -> Result<Option<AuthorRecord>, AppError> {
        let row: Option<(i64, Option<String>)> = sqlx::query_as(
            r#"
            SELECT id, name FROM users
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, name)| AuthorRecord { id, name }))
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    async fn first_active_admin(&self) -> Result<Option<AuthorRecord>, AppError> {
        let row: Option<(i64, Option<String>)> = sqlx::query_as(
            r#"
            SELECT u.id, u.name FROM users u
            JOIN user_roles ur ON ur.user_id = u.id
            JOIN roles r ON r.id = ur.role_id
            WHERE u.is_active = TRUE AND r.name = 'Admin'
            ORDER BY u.id ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, name)| AuthorRecord { id, name }))
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    async fn first_active(&self) -> Result<Option<AuthorRecord>, AppError> {
        let row: Option<(i64, Option<String>)> = sqlx::query_as(
            r#"
            SELECT id, name FROM users
            WHERE is_active = TRUE
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, name)| AuthorRecord { id, name }))
    }
}
