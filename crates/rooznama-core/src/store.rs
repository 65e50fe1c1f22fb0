//! Store traits
//!
//! The relational store is an external collaborator; the pipeline talks to it
//! through these traits. `rooznama-db` provides the Postgres implementation;
//! tests use in-memory fakes.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{ContentStatus, Language, SeoProfile};

/// Everything persisted for a newly published item: the content row, its
/// translation, and the translation's SEO profile, written atomically.
#[derive(Debug, Clone)]
pub struct NewContent {
    pub status: ContentStatus,
    pub is_featured: bool,
    /// Local media path or external URL; empty when no image survived
    /// processing.
    pub image: String,
    pub author_id: Option<i64>,
    pub category_id: i64,
    pub translation: NewTranslation,
}

#[derive(Debug, Clone)]
pub struct NewTranslation {
    pub lang: Language,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub seo: SeoProfile,
}

/// What deletion needs to discover file ownership: the primary image plus
/// every translation body to scan for embedded media references.
#[derive(Debug, Clone)]
pub struct DeletionRecord {
    pub id: i64,
    pub image: Option<String>,
    pub bodies: Vec<String>,
}

/// Resolution target of a short-link code.
#[derive(Debug, Clone)]
pub struct ShortLinkTarget {
    pub content_id: i64,
    pub lang: Language,
    pub slug: String,
    pub title: String,
}

/// Relational store operations used by the publishing pipeline.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Probe the `(lang, slug)` uniqueness partition. The probe and the
    /// subsequent insert are not atomic; `insert_published` reports the race
    /// as `AppError::SlugConflict`.
    async fn slug_exists(&self, lang: Language, slug: &str) -> Result<bool, AppError>;

    /// Atomically insert the content row, its translation, and the SEO
    /// profile. Returns the new content id. A `(lang, slug)` unique
    /// violation surfaces as `AppError::SlugConflict`; nothing is written in
    /// that case. If the caller is cancelled mid-write the transaction rolls
    /// back, so no partial record becomes visible.
    async fn insert_published(&self, new: NewContent) -> Result<i64, AppError>;

    /// Record the minted short link on the content row.
    async fn set_short_link(&self, id: i64, code: &str, url: &str) -> Result<(), AppError>;

    /// Resolve a short-link code back to its content.
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLinkTarget>, AppError>;

    /// Content ids that predate the short-link feature, oldest first.
    async fn ids_missing_short_link(&self, limit: i64) -> Result<Vec<i64>, AppError>;

    /// Load the record and its translation bodies ahead of deletion.
    /// `None` when the record does not exist.
    async fn load_for_deletion(&self, id: i64) -> Result<Option<DeletionRecord>, AppError>;

    /// Delete the content row; translations and SEO profiles cascade.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

/// Account record as seen by the author resolver.
#[derive(Debug, Clone)]
pub struct AuthorRecord {
    pub id: i64,
    pub name: Option<String>,
}

/// Account lookups backing the author fallback chain. Implementations never
/// create accounts; every lookup may legitimately find nothing.
#[async_trait]
pub trait AuthorDirectory: Send + Sync {
    /// The account, if it exists and is active.
    async fn find_active(&self, id: i64) -> Result<Option<AuthorRecord>, AppError>;

    /// First active account holding an administrative role, by id ascending.
    async fn first_active_admin(&self) -> Result<Option<AuthorRecord>, AppError>;

    /// First active account of any kind, by id ascending.
    async fn first_active(&self) -> Result<Option<AuthorRecord>, AppError>;
}
