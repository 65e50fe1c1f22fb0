use async_trait::async_trait;
use sqlx::{PgPool, Postgres};

use rooznama_core::models::Language;
use rooznama_core::store::{ContentStore, DeletionRecord, NewContent, ShortLinkTarget};
use rooznama_core::AppError;

use super::transaction::TransactionGuard;

/// Content repository
///
/// Owns the content, translation, and SEO profile tables. Publication writes
/// all three in one transaction so that a translation without its SEO
/// profile is never observable.
#[derive(Clone)]
pub struct ContentRepository {
    pool: PgPool,
}

impl ContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for ContentRepository {
    #[tracing::instrument(skip(self), fields(db.table = "content_translations", db.operation = "select"))]
    async fn slug_exists(&self, lang: Language, slug: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar::<Postgres, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM content_translations
                WHERE lang = $1 AND slug = $2
            )
            "#,
        )
        .bind(lang)
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    #[tracing::instrument(
        skip(self, new),
        fields(
            db.table = "content",
            db.operation = "insert",
            lang = %new.translation.lang,
            slug = %new.translation.slug
        )
    )]
    async fn insert_published(&self, new: NewContent) -> Result<i64, AppError> {
        let mut tx = TransactionGuard::begin(&self.pool)
            .await
            .map_err(AppError::from)?;

        let content_id: i64 = sqlx::query_scalar::<Postgres, i64>(
            r#"
            INSERT INTO content (status, is_featured, image, author_id, view_count)
            VALUES ($1, $2, $3, $4, 0)
            RETURNING id
            "#,
        )
        .bind(new.status)
        .bind(new.is_featured)
        .bind(&new.image)
        .bind(new.author_id)
        .fetch_one(&mut **tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO content_categories (content_id, category_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(content_id)
        .bind(new.category_id)
        .execute(&mut **tx)
        .await?;

        let t = &new.translation;
        let translation_id: i64 = sqlx::query_scalar::<Postgres, i64>(
            r#"
            INSERT INTO content_translations (content_id, lang, slug, title, content, excerpt)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(content_id)
        .bind(t.lang)
        .bind(&t.slug)
        .bind(&t.title)
        .bind(&t.content)
        .bind(&t.excerpt)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e) {
                // A concurrent publisher won the (lang, slug) partition
                // between probe and insert. Retryable by the caller.
                AppError::SlugConflict {
                    lang: t.lang,
                    slug: t.slug.clone(),
                }
            } else {
                AppError::from(e)
            }
        })?;

        let seo = &t.seo;
        sqlx::query(
            r#"
            INSERT INTO seo_profiles (
                translation_id,
                meta_title, meta_description, meta_keywords,
                og_title, og_description, og_image, og_type, og_url, og_site_name,
                twitter_title, twitter_description, twitter_image, twitter_card,
                canonical_url, robots, structured_data,
                article_published_time, article_modified_time, locale
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            "#,
        )
        .bind(translation_id)
        .bind(&seo.meta_title)
        .bind(&seo.meta_description)
        .bind(&seo.meta_keywords)
        .bind(&seo.og_title)
        .bind(&seo.og_description)
        .bind(&seo.og_image)
        .bind(&seo.og_type)
        .bind(&seo.og_url)
        .bind(&seo.og_site_name)
        .bind(&seo.twitter_title)
        .bind(&seo.twitter_description)
        .bind(&seo.twitter_image)
        .bind(&seo.twitter_card)
        .bind(&seo.canonical_url)
        .bind(&seo.robots)
        .bind(&seo.structured_data)
        .bind(seo.article_published_time)
        .bind(seo.article_modified_time)
        .bind(&seo.locale)
        .execute(&mut **tx)
        .await?;

        tx.commit().await.map_err(AppError::from)?;

        tracing::info!(content_id, "Content persisted");

        Ok(content_id)
    }

    #[tracing::instrument(skip(self), fields(db.table = "content", db.operation = "update"))]
    async fn set_short_link(&self, id: i64, code: &str, url: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE content
            SET code = $2, short_link = $3, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(code)
        .bind(url)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Content {} not found", id)));
        }

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "content", db.operation = "select"))]
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLinkTarget>, AppError> {
        let row: Option<(i64, Language, String, String)> = sqlx::query_as(
            r#"
            SELECT c.id, t.lang, t.slug, t.title
            FROM content c
            JOIN content_translations t ON t.content_id = c.id
            WHERE c.code = $1
            ORDER BY t.id ASC
            LIMIT 1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(content_id, lang, slug, title)| ShortLinkTarget {
            content_id,
            lang,
            slug,
            title,
        }))
    }

    #[tracing::instrument(skip(self), fields(db.table = "content", db.operation = "select"))]
    async fn ids_missing_short_link(&self, limit: i64) -> Result<Vec<i64>, AppError> {
        let ids: Vec<i64> = sqlx::query_scalar::<Postgres, i64>(
            r#"
            SELECT id FROM content
            WHERE code IS NULL OR code = ''
            ORDER BY id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    #[tracing::instrument(skip(self), fields(db.table = "content", db.operation = "select"))]
    async fn load_for_deletion(&self, id: i64) -> Result<Option<DeletionRecord>, AppError> {
        let image: Option<String> = sqlx::query_scalar::<Postgres, String>(
            r#"SELECT image FROM content WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(image) = image else {
            return Ok(None);
        };

        let bodies: Vec<String> = sqlx::query_scalar::<Postgres, String>(
            r#"SELECT content FROM content_translations WHERE content_id = $1"#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(DeletionRecord {
            id,
            image: if image.is_empty() { None } else { Some(image) },
            bodies,
        }))
    }

    #[tracing::instrument(skip(self), fields(db.table = "content", db.operation = "delete"))]
    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query(r#"DELETE FROM content WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Content {} not found", id)));
        }

        tracing::info!(content_id = id, "Content deleted (translations and SEO cascade)");

        Ok(())
    }
}
