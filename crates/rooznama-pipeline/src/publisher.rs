//! Content Assembler
//!
//! Orchestrates one publication: slug allocation → media resolution → SEO
//! generation → atomic persistence → short-link minting. Media, SEO, and
//! short-link failures degrade in place; only a persistence failure aborts.
//! The entry point never returns an error — failures are reported through
//! `PublishOutcome { success: false, error }`, so publication is observable
//! as fully succeeded or fully failed and nothing in between.

use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use rooznama_core::models::{ContentStatus, PublishOutcome, PublishRequest};
use rooznama_core::store::{AuthorDirectory, ContentStore, NewContent, NewTranslation};
use rooznama_core::models::Language;
use rooznama_core::{AppError, ImageConfig};
use rooznama_processing::{ImageProcessor, ProcessingOptions};
use rooznama_seo::{GeneratedSeo, SeoContext, SeoGenerator};

use crate::author::AuthorResolver;
use crate::short_link::ShortLinkGenerator;
use crate::slug::SlugAllocator;

/// Insert retries when a concurrent publisher wins the slug partition.
const MAX_INSERT_ATTEMPTS: u32 = 3;

pub struct ContentPublisher {
    store: Arc<dyn ContentStore>,
    authors: Arc<dyn AuthorDirectory>,
    images: ImageProcessor,
    seo: SeoGenerator,
    image_defaults: ImageConfig,
    site_url: String,
}

impl ContentPublisher {
    pub fn new(
        store: Arc<dyn ContentStore>,
        authors: Arc<dyn AuthorDirectory>,
        images: ImageProcessor,
        seo: SeoGenerator,
        image_defaults: ImageConfig,
        site_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            authors,
            images,
            seo,
            image_defaults,
            site_url: site_url.into(),
        }
    }

    /// Publish one ingested item.
    #[tracing::instrument(skip(self, request), fields(lang = %request.language))]
    pub async fn publish(&self, request: PublishRequest) -> PublishOutcome {
        if let Err(e) = request.validate() {
            return PublishOutcome::failed(format!("Invalid publish request: {}", e));
        }

        tracing::info!(title = %truncate(&request.title, 50), "Publishing content");

        let site_base = request
            .site_url
            .as_deref()
            .unwrap_or(&self.site_url)
            .trim_end_matches('/')
            .to_string();

        // Resolve the primary image. A processing failure keeps the raw
        // reference in the record and simply reports no new asset.
        let mut image_processed = false;
        let mut image_field = request.image_url.clone().unwrap_or_default();

        if let Some(ref image_url) = request.image_url {
            let mut options = ProcessingOptions::from_config(&self.image_defaults);
            options.enable_watermark = request.watermark_enabled();
            options.watermark_path = request.watermark_path.clone();

            if let Some(processed) = self.images.process(image_url, &options).await {
                image_processed = processed.was_stored();
                image_field = processed.path().to_string();
            }
        }

        let author_id = AuthorResolver::new(self.authors.as_ref())
            .resolve(request.author_id)
            .await;

        let published_at = Utc::now();
        let allocator = SlugAllocator::new(self.store.as_ref());

        let mut attempt: u32 = 0;
        let (content_id, slug, seo_generated) = loop {
            attempt += 1;

            let slug = match allocator.allocate(&request.title, request.language).await {
                Ok(slug) => slug,
                Err(e) => return PublishOutcome::failed(e.to_string()),
            };

            let canonical_url = format!("{}/blog/{}", site_base, slug);
            let full_image_url = absolute_image_url(&image_field, &site_base);

            let ctx = SeoContext {
                title: &request.title,
                content: &request.content,
                excerpt: &request.excerpt,
                keywords: &request.keywords,
                language: request.language,
                canonical_url: &canonical_url,
                image_url: full_image_url.as_deref(),
                site_base: &site_base,
                author_name: None,
                published_at,
            };

            let (seo_profile, seo_generated) = if request.seo_enabled() {
                let GeneratedSeo {
                    profile,
                    ai_assisted,
                } = self.seo.generate(&ctx).await;
                tracing::info!(ai_assisted, slug = %slug, "SEO profile ready");
                (profile, true)
            } else {
                (self.seo.baseline(&ctx), false)
            };

            let new = NewContent {
                status: ContentStatus::Published,
                is_featured: false,
                image: image_field.clone(),
                author_id,
                category_id: request.category_id,
                translation: NewTranslation {
                    lang: request.language,
                    slug: slug.clone(),
                    title: request.title.clone(),
                    content: request.content.clone(),
                    excerpt: request.excerpt.clone(),
                    seo: seo_profile,
                },
            };

            match self.store.insert_published(new).await {
                Ok(id) => break (id, slug, seo_generated),
                Err(e @ AppError::SlugConflict { .. }) => {
                    if attempt >= MAX_INSERT_ATTEMPTS {
                        return PublishOutcome::failed(e.to_string());
                    }
                    tracing::warn!(
                        slug = %slug,
                        attempt,
                        "Slug taken by a concurrent publisher, re-allocating"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "Persistence failed, aborting publication");
                    return PublishOutcome::failed(e.to_string());
                }
            }
        };

        tracing::info!(content_id, slug = %slug, ?author_id, "Content created");

        let short_link = match ShortLinkGenerator::new(self.store.clone())
            .mint(content_id, &site_base)
            .await
        {
            Ok(link) => Some(link),
            Err(e) => {
                tracing::warn!(content_id, error = %e, "Short link minting failed");
                None
            }
        };

        PublishOutcome {
            success: true,
            content_id: Some(content_id),
            slug: Some(slug),
            short_link,
            seo_generated,
            image_processed,
            error: None,
        }
    }

    /// Duplicate-import probe for ingestion callers: has this slug already
    /// been published in the language partition?
    pub async fn exists_by_slug(&self, lang: Language, slug: &str) -> Result<bool, AppError> {
        self.store.slug_exists(lang, slug).await
    }
}

fn absolute_image_url(image: &str, site_base: &str) -> Option<String> {
    if image.is_empty() {
        None
    } else if image.starts_with("http://") || image.starts_with("https://") {
        Some(image.to_string())
    } else {
        Some(format!("{}{}", site_base, image))
    }
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryStore, StaticAuthors};
    use async_trait::async_trait;
    use bytes::Bytes;
    use image::{Rgba, RgbaImage};
    use rooznama_processing::RemoteImageFetcher;
    use rooznama_seo::provider::OpenAiConfig;
    use rooznama_seo::AiProvider;
    use rooznama_storage::LocalStorage;
    use std::io::Cursor;
    use std::time::Duration;
    use tempfile::TempDir;

    struct FakeFetcher {
        response: Result<Vec<u8>, String>,
    }

    #[async_trait]
    impl RemoteImageFetcher for FakeFetcher {
        async fn fetch(&self, _url: &str) -> Result<Bytes, AppError> {
            match &self.response {
                Ok(data) => Ok(Bytes::from(data.clone())),
                Err(msg) => Err(AppError::ImageProcessing(msg.clone())),
            }
        }
    }

    fn png_bytes() -> Vec<u8> {
        let img = RgbaImage::from_pixel(64, 48, Rgba([10, 20, 30, 255]));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        buffer
    }

    struct Harness {
        publisher: ContentPublisher,
        store: Arc<InMemoryStore>,
        _media_dir: TempDir,
    }

    async fn harness_with(
        authors: StaticAuthors,
        provider: AiProvider,
        fetch: Result<Vec<u8>, String>,
    ) -> Harness {
        let media_dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(LocalStorage::new(media_dir.path()).await.unwrap());
        let store = Arc::new(InMemoryStore::new());

        let publisher = ContentPublisher::new(
            store.clone(),
            Arc::new(authors),
            ImageProcessor::new(Arc::new(FakeFetcher { response: fetch }), storage),
            SeoGenerator::new(provider, "Rooznama"),
            ImageConfig::default(),
            "https://news.example.com",
        );

        Harness {
            publisher,
            store,
            _media_dir: media_dir,
        }
    }

    async fn harness() -> Harness {
        harness_with(
            StaticAuthors::new().with_user(1, true, true),
            AiProvider::Disabled,
            Ok(png_bytes()),
        )
        .await
    }

    fn request(title: &str, lang: Language) -> PublishRequest {
        PublishRequest {
            title: title.to_string(),
            content: "<p>The index climbed again today as traders responded.</p>".to_string(),
            excerpt: "The index climbed again today.".to_string(),
            source_url: "https://feeds.example.com/item/1".to_string(),
            image_url: None,
            video_url: None,
            category_id: 7,
            keywords: vec!["bourse".to_string()],
            author_id: None,
            language: lang,
            enable_seo: None,
            enable_watermark: None,
            watermark_path: None,
            site_url: None,
        }
    }

    #[tokio::test]
    async fn test_full_publication() {
        let h = harness().await;

        let mut req = request("Markets Rally Today", Language::En);
        req.image_url = Some("https://feeds.example.com/pic.jpg".to_string());

        let outcome = h.publisher.publish(req).await;

        assert!(outcome.success, "error: {:?}", outcome.error);
        assert_eq!(outcome.slug.as_deref(), Some("markets-rally-today"));
        assert!(outcome.seo_generated);
        assert!(outcome.image_processed);
        let id = outcome.content_id.unwrap();
        assert_eq!(
            outcome.short_link.as_deref(),
            Some(format!("https://news.example.com/n/{}", crate::short_link::encode_base62(id as u64)).as_str())
        );

        let records = h.store.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert!(record.image.starts_with("/images/blog-images/"));
        assert_eq!(record.author_id, Some(1));
        assert_eq!(
            record.seo.canonical_url.as_deref(),
            Some("https://news.example.com/blog/markets-rally-today")
        );
        assert_eq!(
            record.seo.og_image.as_deref().map(|s| s.starts_with("https://news.example.com/images/")),
            Some(true)
        );
    }

    #[tokio::test]
    async fn test_example_scenario_persian_unreachable_provider() {
        // Title "اخبار بورس امروز", fa, no image, SEO on, provider down
        let provider = AiProvider::OpenAi(OpenAiConfig {
            api_key: "key".to_string(),
            model: "model".to_string(),
            endpoint: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(1),
        });
        let h = harness_with(
            StaticAuthors::new().with_user(1, true, true),
            provider,
            Ok(png_bytes()),
        )
        .await;

        let mut req = request("اخبار بورس امروز", Language::Fa);
        req.enable_seo = Some(true);

        let outcome = h.publisher.publish(req).await;
        assert!(outcome.success);
        assert!(outcome.seo_generated);
        assert!(!outcome.image_processed);
        assert_eq!(outcome.slug.as_deref(), Some("اخبار-بورس-امروز"));

        // Publishing the identical title again takes the -1 suffix
        let again = h
            .publisher
            .publish(request("اخبار بورس امروز", Language::Fa))
            .await;
        assert!(again.success);
        assert_eq!(again.slug.as_deref(), Some("اخبار-بورس-امروز-1"));
    }

    #[tokio::test]
    async fn test_persistence_failure_leaves_no_partial_state() {
        let h = harness().await;
        h.store.fail_next_inserts(true);

        let outcome = h.publisher.publish(request("Doomed", Language::En)).await;

        assert!(!outcome.success);
        assert!(outcome.error.is_some());
        assert!(outcome.content_id.is_none());
        assert!(outcome.short_link.is_none());
        assert_eq!(h.store.record_count(), 0);
    }

    #[tokio::test]
    async fn test_image_failure_degrades_to_raw_reference() {
        let h = harness_with(
            StaticAuthors::new().with_user(1, true, true),
            AiProvider::Disabled,
            Err("connection reset".to_string()),
        )
        .await;

        let mut req = request("Still Publishes", Language::En);
        req.image_url = Some("https://feeds.example.com/pic.jpg".to_string());

        let outcome = h.publisher.publish(req).await;

        assert!(outcome.success);
        assert!(!outcome.image_processed);
        assert_eq!(
            h.store.records()[0].image,
            "https://feeds.example.com/pic.jpg"
        );
    }

    #[tokio::test]
    async fn test_preprocessed_image_not_reprocessed() {
        let h = harness().await;

        let mut req = request("Prewatermarked", Language::En);
        req.image_url = Some("/images/blog-images/already.jpg".to_string());

        let outcome = h.publisher.publish(req).await;

        assert!(outcome.success);
        assert!(!outcome.image_processed);
        assert_eq!(h.store.records()[0].image, "/images/blog-images/already.jpg");
    }

    #[tokio::test]
    async fn test_seo_disabled_keeps_baseline_profile() {
        let h = harness().await;

        let mut req = request("No Seo Please", Language::En);
        req.enable_seo = Some(false);

        let outcome = h.publisher.publish(req).await;

        assert!(outcome.success);
        assert!(!outcome.seo_generated);
        let record = &h.store.records()[0];
        assert_eq!(record.seo.meta_title, "No Seo Please");
        assert!(record.seo.canonical_url.is_none());
        assert!(record.seo.structured_data.is_none());
    }

    #[tokio::test]
    async fn test_slug_conflict_retried_with_fresh_allocation() {
        let h = harness().await;
        h.store.conflict_next_inserts(1);

        let outcome = h.publisher.publish(request("Contested", Language::En)).await;

        assert!(outcome.success, "error: {:?}", outcome.error);
        assert_eq!(h.store.record_count(), 1);
    }

    #[tokio::test]
    async fn test_slug_conflict_exhausted_fails_cleanly() {
        let h = harness().await;
        h.store.conflict_next_inserts(MAX_INSERT_ATTEMPTS as usize);

        let outcome = h.publisher.publish(request("Contested", Language::En)).await;

        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("Slug already taken"));
        assert_eq!(h.store.record_count(), 0);
    }

    #[tokio::test]
    async fn test_no_active_accounts_still_publishes() {
        let h = harness_with(StaticAuthors::new(), AiProvider::Disabled, Ok(png_bytes())).await;

        let outcome = h.publisher.publish(request("Ownerless", Language::En)).await;

        assert!(outcome.success);
        assert_eq!(h.store.records()[0].author_id, None);
    }

    #[tokio::test]
    async fn test_invalid_request_rejected() {
        let h = harness().await;
        let outcome = h.publisher.publish(request("", Language::En)).await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("Invalid publish request"));
    }

    #[tokio::test]
    async fn test_exists_by_slug_probe() {
        let h = harness().await;
        h.publisher.publish(request("Probe Me", Language::En)).await;

        assert!(h
            .publisher
            .exists_by_slug(Language::En, "probe-me")
            .await
            .unwrap());
        assert!(!h
            .publisher
            .exists_by_slug(Language::Fa, "probe-me")
            .await
            .unwrap());
    }
}
