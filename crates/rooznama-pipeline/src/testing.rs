//! In-memory test doubles for the store traits.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use rooznama_core::models::{ContentStatus, Language, SeoProfile};
use rooznama_core::store::{
    AuthorDirectory, AuthorRecord, ContentStore, DeletionRecord, NewContent, NewTranslation,
    ShortLinkTarget,
};
use rooznama_core::AppError;

#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub id: i64,
    pub image: String,
    pub author_id: Option<i64>,
    pub category_id: i64,
    pub lang: Language,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub seo: SeoProfile,
    pub code: Option<String>,
    pub short_link: Option<String>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    records: Vec<StoredRecord>,
}

/// In-memory `ContentStore` honoring the `(lang, slug)` uniqueness
/// invariant. `fail_inserts` forces the persistence stage to fail without
/// writing anything, for atomicity tests.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
    fail_inserts: AtomicBool,
    conflict_inserts: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Make the next `n` inserts report a slug conflict, as if a concurrent
    /// publisher had just won the partition.
    pub fn conflict_next_inserts(&self, n: usize) {
        self.conflict_inserts.store(n, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<StoredRecord> {
        self.inner.lock().unwrap().records.clone()
    }

    pub fn record_count(&self) -> usize {
        self.inner.lock().unwrap().records.len()
    }
}

#[async_trait]
impl ContentStore for InMemoryStore {
    async fn slug_exists(&self, lang: Language, slug: &str) -> Result<bool, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .records
            .iter()
            .any(|r| r.lang == lang && r.slug == slug))
    }

    async fn insert_published(&self, new: NewContent) -> Result<i64, AppError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Internal("forced persistence failure".to_string()));
        }

        let t = &new.translation;

        if self
            .conflict_inserts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(AppError::SlugConflict {
                lang: t.lang,
                slug: t.slug.clone(),
            });
        }

        let mut inner = self.inner.lock().unwrap();
        if inner
            .records
            .iter()
            .any(|r| r.lang == t.lang && r.slug == t.slug)
        {
            return Err(AppError::SlugConflict {
                lang: t.lang,
                slug: t.slug.clone(),
            });
        }

        inner.next_id += 1;
        let id = inner.next_id;
        let record = StoredRecord {
            id,
            image: new.image,
            author_id: new.author_id,
            category_id: new.category_id,
            lang: t.lang,
            slug: t.slug.clone(),
            title: t.title.clone(),
            content: t.content.clone(),
            excerpt: t.excerpt.clone(),
            seo: t.seo.clone(),
            code: None,
            short_link: None,
        };
        inner.records.push(record);

        Ok(id)
    }

    async fn set_short_link(&self, id: i64, code: &str, url: &str) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        let record = inner
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Content {} not found", id)))?;
        record.code = Some(code.to_string());
        record.short_link = Some(url.to_string());
        Ok(())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLinkTarget>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .records
            .iter()
            .find(|r| r.code.as_deref() == Some(code))
            .map(|r| ShortLinkTarget {
                content_id: r.id,
                lang: r.lang,
                slug: r.slug.clone(),
                title: r.title.clone(),
            }))
    }

    async fn ids_missing_short_link(&self, limit: i64) -> Result<Vec<i64>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .records
            .iter()
            .filter(|r| r.code.as_deref().unwrap_or("").is_empty())
            .map(|r| r.id)
            .take(limit as usize)
            .collect())
    }

    async fn load_for_deletion(&self, id: i64) -> Result<Option<DeletionRecord>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.records.iter().find(|r| r.id == id).map(|r| {
            DeletionRecord {
                id: r.id,
                image: if r.image.is_empty() {
                    None
                } else {
                    Some(r.image.clone())
                },
                bodies: vec![r.content.clone()],
            }
        }))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.records.len();
        inner.records.retain(|r| r.id != id);
        if inner.records.len() == before {
            return Err(AppError::NotFound(format!("Content {} not found", id)));
        }
        Ok(())
    }
}

/// Fixed-roster `AuthorDirectory`; `failing()` makes every lookup error.
#[derive(Default)]
pub struct StaticAuthors {
    users: Vec<(i64, bool, bool)>,
    fail: bool,
}

impl StaticAuthors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            users: Vec::new(),
            fail: true,
        }
    }

    pub fn with_user(mut self, id: i64, active: bool, admin: bool) -> Self {
        self.users.push((id, active, admin));
        self
    }

    fn check(&self) -> Result<(), AppError> {
        if self.fail {
            Err(AppError::Internal("directory unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AuthorDirectory for StaticAuthors {
    async fn find_active(&self, id: i64) -> Result<Option<AuthorRecord>, AppError> {
        self.check()?;
        Ok(self
            .users
            .iter()
            .find(|(uid, active, _)| *uid == id && *active)
            .map(|(id, _, _)| AuthorRecord {
                id: *id,
                name: None,
            }))
    }

    async fn first_active_admin(&self) -> Result<Option<AuthorRecord>, AppError> {
        self.check()?;
        Ok(self
            .users
            .iter()
            .filter(|(_, active, admin)| *active && *admin)
            .min_by_key(|(id, _, _)| *id)
            .map(|(id, _, _)| AuthorRecord {
                id: *id,
                name: None,
            }))
    }

    async fn first_active(&self) -> Result<Option<AuthorRecord>, AppError> {
        self.check()?;
        Ok(self
            .users
            .iter()
            .filter(|(_, active, _)| *active)
            .min_by_key(|(id, _, _)| *id)
            .map(|(id, _, _)| AuthorRecord {
                id: *id,
                name: None,
            }))
    }
}

/// An empty SEO profile for seeding records.
pub fn empty_seo() -> SeoProfile {
    SeoProfile {
        meta_title: String::new(),
        meta_description: String::new(),
        meta_keywords: String::new(),
        og_title: None,
        og_description: None,
        og_image: None,
        og_type: None,
        og_url: None,
        og_site_name: None,
        twitter_title: None,
        twitter_description: None,
        twitter_image: None,
        twitter_card: None,
        canonical_url: None,
        robots: "index, follow".to_string(),
        structured_data: None,
        article_published_time: None,
        article_modified_time: None,
        locale: "en_US".to_string(),
    }
}

/// Seed a bare record and return its id.
pub async fn seed_content(store: &InMemoryStore, lang: Language, slug: &str) -> i64 {
    store
        .insert_published(NewContent {
            status: ContentStatus::Published,
            is_featured: false,
            image: String::new(),
            author_id: None,
            category_id: 1,
            translation: NewTranslation {
                lang,
                slug: slug.to_string(),
                title: slug.to_string(),
                content: String::new(),
                excerpt: String::new(),
                seo: empty_seo(),
            },
        })
        .await
        .unwrap()
}
