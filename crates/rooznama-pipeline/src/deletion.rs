//! Deletion & Orphan Cleanup
//!
//! Removes a content record and every locally-stored media file it owns.
//! Ownership is discovered at delete time: the primary image plus every
//! media reference inside the translation bodies. The database delete is
//! authoritative; file cleanup is best-effort and idempotent (a missing
//! file is success, other I/O errors are logged warnings and never roll
//! the record back).

use std::sync::Arc;

use rooznama_core::store::ContentStore;
use rooznama_storage::{paths, Storage};

use crate::media_refs::{extract_local_media, normalize_primary_image};

pub struct ContentDeleter {
    store: Arc<dyn ContentStore>,
    storage: Arc<dyn Storage>,
    site_base: String,
}

impl ContentDeleter {
    pub fn new(
        store: Arc<dyn ContentStore>,
        storage: Arc<dyn Storage>,
        site_url: impl Into<String>,
    ) -> Self {
        let site_url: String = site_url.into();
        Self {
            store,
            storage,
            site_base: site_url.trim_end_matches('/').to_string(),
        }
    }

    /// Delete a content record and its media files. Returns `false` when the
    /// record does not exist or the database delete fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, content_id: i64) -> bool {
        let record = match self.store.load_for_deletion(content_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::warn!(content_id, "Content not found, nothing to delete");
                return false;
            }
            Err(e) => {
                tracing::error!(content_id, error = %e, "Failed to load content for deletion");
                return false;
            }
        };

        let mut files: Vec<String> = Vec::new();

        if let Some(ref image) = record.image {
            match normalize_primary_image(image, &self.site_base) {
                Some(path) => {
                    tracing::debug!(path = %path, "Collected primary image for deletion");
                    files.push(path);
                }
                None => {
                    tracing::debug!(image = %image, "Primary image is external, leaving in place");
                }
            }
        }

        for body in &record.bodies {
            for path in extract_local_media(body) {
                if !files.contains(&path) {
                    files.push(path);
                }
            }
        }

        // The relational record's removal is authoritative: delete it first,
        // then clean files best-effort.
        if let Err(e) = self.store.delete(content_id).await {
            tracing::error!(content_id, error = %e, "Database delete failed");
            return false;
        }

        let mut removed = 0usize;
        for path in &files {
            let Some(key) = paths::web_path_to_key(path) else {
                continue;
            };
            match self.storage.delete(&key).await {
                Ok(()) => removed += 1,
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "Failed to delete media file");
                }
            }
        }

        tracing::info!(
            content_id,
            collected = files.len(),
            removed,
            "Content deleted"
        );

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{empty_seo, InMemoryStore};
    use rooznama_core::models::{ContentStatus, Language};
    use rooznama_core::store::{NewContent, NewTranslation};
    use rooznama_storage::LocalStorage;
    use tempfile::tempdir;

    async fn seed(
        store: &InMemoryStore,
        image: &str,
        body: &str,
    ) -> i64 {
        store
            .insert_published(NewContent {
                status: ContentStatus::Published,
                is_featured: false,
                image: image.to_string(),
                author_id: None,
                category_id: 1,
                translation: NewTranslation {
                    lang: Language::Fa,
                    slug: format!("slug-{}", store.record_count()),
                    title: "t".to_string(),
                    content: body.to_string(),
                    excerpt: String::new(),
                    seo: empty_seo(),
                },
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_deletion_is_total() {
        let dir = tempdir().unwrap();
        let storage = Arc::new(LocalStorage::new(dir.path()).await.unwrap());
        let store = Arc::new(InMemoryStore::new());

        // Primary image + two distinct body files
        for key in [
            "images/blog-images/primary.jpg",
            "images/blog-images/inline1.jpg",
            "uploads/clips/inline2.mp4",
        ] {
            storage.upload(key, b"x".to_vec()).await.unwrap();
        }

        let body = r#"
            <img src="/images/blog-images/inline1.jpg">
            <img src="/images/blog-images/inline1.jpg">
            <video src="/uploads/clips/inline2.mp4"></video>
            <img src="https://cdn.elsewhere.com/images/external.jpg">
        "#;
        let id = seed(&store, "/images/blog-images/primary.jpg", body).await;

        let deleter = ContentDeleter::new(store.clone(), storage.clone(), "https://news.example.com");
        assert!(deleter.delete(id).await);

        assert_eq!(store.record_count(), 0);
        for key in [
            "images/blog-images/primary.jpg",
            "images/blog-images/inline1.jpg",
            "uploads/clips/inline2.mp4",
        ] {
            assert!(!storage.exists(key).await.unwrap(), "{} should be gone", key);
        }
    }

    #[tokio::test]
    async fn test_absolute_own_host_primary_image_removed() {
        let dir = tempdir().unwrap();
        let storage = Arc::new(LocalStorage::new(dir.path()).await.unwrap());
        let store = Arc::new(InMemoryStore::new());

        storage
            .upload("images/blog-images/abs.jpg", b"x".to_vec())
            .await
            .unwrap();

        let id = seed(
            &store,
            "https://news.example.com/images/blog-images/abs.jpg",
            "<p>no media</p>",
        )
        .await;

        let deleter = ContentDeleter::new(store, storage.clone(), "https://news.example.com");
        assert!(deleter.delete(id).await);
        assert!(!storage.exists("images/blog-images/abs.jpg").await.unwrap());
    }

    #[tokio::test]
    async fn test_external_primary_image_left_alone() {
        let dir = tempdir().unwrap();
        let storage = Arc::new(LocalStorage::new(dir.path()).await.unwrap());
        let store = Arc::new(InMemoryStore::new());

        let id = seed(&store, "https://cdn.elsewhere.com/pic.jpg", "<p></p>").await;

        let deleter = ContentDeleter::new(store.clone(), storage, "https://news.example.com");
        assert!(deleter.delete(id).await);
        assert_eq!(store.record_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_files_do_not_fail_deletion() {
        let dir = tempdir().unwrap();
        let storage = Arc::new(LocalStorage::new(dir.path()).await.unwrap());
        let store = Arc::new(InMemoryStore::new());

        // Files never created: cleanup of already-gone files is success
        let id = seed(
            &store,
            "/images/blog-images/never-existed.jpg",
            r#"<img src="/images/blog-images/also-gone.jpg">"#,
        )
        .await;

        let deleter = ContentDeleter::new(store.clone(), storage, "https://news.example.com");
        assert!(deleter.delete(id).await);
        assert_eq!(store.record_count(), 0);
    }

    #[tokio::test]
    async fn test_deleting_missing_record_returns_false() {
        let dir = tempdir().unwrap();
        let storage = Arc::new(LocalStorage::new(dir.path()).await.unwrap());
        let store = Arc::new(InMemoryStore::new());

        let deleter = ContentDeleter::new(store, storage, "https://news.example.com");
        assert!(!deleter.delete(999).await);
    }
}
