//! Slug Allocator
//!
//! Derives the base slug from the title and probes the language partition
//! for a free value: the base itself, then `-1`, `-2`, … After a bounded
//! number of attempts it appends a high-resolution timestamp instead, which
//! guarantees termination without unbounded looping.
//!
//! The allocator never writes; the probe-then-insert pair is not atomic, so
//! the storage layer's `(lang, slug)` constraint is the real invariant and
//! the publisher retries allocation when an insert reports a conflict.

use std::time::{SystemTime, UNIX_EPOCH};

use rooznama_core::models::Language;
use rooznama_core::store::ContentStore;
use rooznama_core::{slug, AppError};

/// Suffix probes before falling back to the timestamp escape.
const MAX_SUFFIX_ATTEMPTS: u32 = 100;

pub struct SlugAllocator<'a> {
    store: &'a dyn ContentStore,
}

impl<'a> SlugAllocator<'a> {
    pub fn new(store: &'a dyn ContentStore) -> Self {
        Self { store }
    }

    /// Allocate a free slug for the title within the language partition.
    pub async fn allocate(&self, title: &str, lang: Language) -> Result<String, AppError> {
        let base = slug::base_slug(title).ok_or_else(|| {
            AppError::InvalidInput("Cannot derive a slug from an empty title".to_string())
        })?;
        self.allocate_from_base(&base, lang).await
    }

    /// Probe loop over an already-normalized base slug.
    pub async fn allocate_from_base(
        &self,
        base: &str,
        lang: Language,
    ) -> Result<String, AppError> {
        let mut candidate = base.to_string();
        let mut counter: u32 = 1;

        loop {
            if !self.store.slug_exists(lang, &candidate).await? {
                return Ok(candidate);
            }

            if counter > MAX_SUFFIX_ATTEMPTS {
                let timestamp = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_nanos();
                let escaped = format!("{}-{}", base, timestamp);
                tracing::warn!(
                    base = %base,
                    slug = %escaped,
                    "Suffix probing exhausted, escaping with timestamp"
                );
                return Ok(escaped);
            }

            candidate = format!("{}-{}", base, counter);
            counter += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryStore;
    use rooznama_core::models::ContentStatus;
    use rooznama_core::store::{NewContent, NewTranslation};
    use std::sync::Arc;

    async fn insert_slug(store: &InMemoryStore, lang: Language, slug: &str) {
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
                    title: "t".to_string(),
                    content: "c".to_string(),
                    excerpt: String::new(),
                    seo: crate::testing::empty_seo(),
                },
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_base_slug_used_when_free() {
        let store = Arc::new(InMemoryStore::new());
        let allocator = SlugAllocator::new(store.as_ref());

        let slug = allocator
            .allocate("اخبار بورس امروز", Language::Fa)
            .await
            .unwrap();
        assert_eq!(slug, "اخبار-بورس-امروز");
    }

    #[tokio::test]
    async fn test_suffix_appended_on_collision() {
        let store = Arc::new(InMemoryStore::new());
        insert_slug(&store, Language::Fa, "اخبار-بورس-امروز").await;

        let allocator = SlugAllocator::new(store.as_ref());
        let slug = allocator
            .allocate("اخبار بورس امروز", Language::Fa)
            .await
            .unwrap();
        assert_eq!(slug, "اخبار-بورس-امروز-1");
    }

    #[tokio::test]
    async fn test_same_base_distinct_slugs() {
        let store = Arc::new(InMemoryStore::new());
        insert_slug(&store, Language::En, "markets-rally").await;
        insert_slug(&store, Language::En, "markets-rally-1").await;

        let allocator = SlugAllocator::new(store.as_ref());
        let slug = allocator.allocate("Markets Rally!", Language::En).await.unwrap();
        assert_eq!(slug, "markets-rally-2");
    }

    #[tokio::test]
    async fn test_language_partitions_are_independent() {
        let store = Arc::new(InMemoryStore::new());
        insert_slug(&store, Language::Fa, "tehran").await;

        let allocator = SlugAllocator::new(store.as_ref());
        let slug = allocator.allocate("Tehran", Language::En).await.unwrap();
        assert_eq!(slug, "tehran");
    }

    #[tokio::test]
    async fn test_timestamp_escape_terminates() {
        let store = Arc::new(InMemoryStore::new());
        insert_slug(&store, Language::En, "busy").await;
        for i in 1..=100 {
            insert_slug(&store, Language::En, &format!("busy-{}", i)).await;
        }

        let allocator = SlugAllocator::new(store.as_ref());
        let slug = allocator.allocate("Busy", Language::En).await.unwrap();
        assert!(slug.starts_with("busy-"));
        // Past the incremental range: the numeric tail is a timestamp
        let tail = slug.trim_start_matches("busy-");
        assert!(tail.parse::<u128>().unwrap() > 100);
    }

    #[tokio::test]
    async fn test_empty_title_is_invalid() {
        let store = Arc::new(InMemoryStore::new());
        let allocator = SlugAllocator::new(store.as_ref());
        let err = allocator.allocate("<h1></h1>", Language::En).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
