//! SEO Generator
//!
//! Assembles the complete SEO profile for a translation. Tier 1 asks the
//! configured AI provider for refined title/description/keywords; Tier 2
//! fills everything the provider did not deliver with the deterministic
//! algorithm. Either way the caller gets a usable profile.

use chrono::{DateTime, Utc};

use rooznama_core::constants::META_DESCRIPTION_MAX;
use rooznama_core::models::{Language, SeoProfile};

use crate::algorithm;
use crate::provider::{AiProvider, RefineRequest};
use crate::structured::{news_article, ArticleData};

/// Inputs for one generation run.
#[derive(Debug, Clone)]
pub struct SeoContext<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub excerpt: &'a str,
    pub keywords: &'a [String],
    pub language: Language,
    /// Canonical URL built from the allocated slug.
    pub canonical_url: &'a str,
    /// Absolute image URL, when the item has one.
    pub image_url: Option<&'a str>,
    pub site_base: &'a str,
    pub author_name: Option<&'a str>,
    pub published_at: DateTime<Utc>,
}

/// Generation result: the profile plus whether Tier 1 actually contributed.
#[derive(Debug, Clone)]
pub struct GeneratedSeo {
    pub profile: SeoProfile,
    pub ai_assisted: bool,
}

pub struct SeoGenerator {
    provider: AiProvider,
    site_name: String,
}

impl SeoGenerator {
    pub fn new(provider: AiProvider, site_name: impl Into<String>) -> Self {
        Self {
            provider,
            site_name: site_name.into(),
        }
    }

    /// Generate the full profile. Never fails: provider errors and timeouts
    /// degrade to the deterministic algorithm.
    #[tracing::instrument(skip(self, ctx), fields(lang = %ctx.language, canonical = %ctx.canonical_url))]
    pub async fn generate(&self, ctx: &SeoContext<'_>) -> GeneratedSeo {
        let main = algorithm::main_keywords(ctx.keywords, ctx.title);

        let refinement = if self.provider.is_enabled() {
            match self
                .provider
                .refine(RefineRequest {
                    title: ctx.title,
                    content: ctx.content,
                    keywords: ctx.keywords,
                    language: ctx.language,
                })
                .await
            {
                Ok(refinement) => refinement,
                Err(e) => {
                    tracing::warn!(error = %e, "AI refinement failed, using algorithm");
                    None
                }
            }
        } else {
            None
        };

        let ai_assisted = refinement.is_some();
        let refinement = refinement.unwrap_or_default();

        let meta_title = match refinement.title {
            Some(title) => algorithm::meta_title(&title, &main),
            None => algorithm::meta_title(ctx.title, &main),
        };

        let meta_description = match refinement.description {
            Some(description) => {
                algorithm::optimize_description(&description, &main, ctx.language)
            }
            None => algorithm::meta_description(ctx.content, &main, ctx.language),
        };

        let extracted = match refinement.keywords {
            Some(keywords) => keywords,
            None => algorithm::extract_keywords(
                &format!("{} {}", ctx.content, ctx.title),
                &main,
                10,
            ),
        };
        let meta_keywords = algorithm::keyword_string(&main, &extracted);

        let profile = self.assemble(ctx, meta_title, meta_description, meta_keywords, &extracted);

        tracing::info!(ai_assisted, "SEO profile generated");

        GeneratedSeo {
            profile,
            ai_assisted,
        }
    }

    /// The minimal profile used when SEO enrichment is explicitly disabled:
    /// raw title, truncated excerpt, joined keyword list.
    pub fn baseline(&self, ctx: &SeoContext<'_>) -> SeoProfile {
        let description: String = ctx.excerpt.chars().take(META_DESCRIPTION_MAX).collect();

        SeoProfile {
            meta_title: ctx.title.to_string(),
            meta_description: description,
            meta_keywords: ctx.keywords.join(", "),
            og_title: None,
            og_description: None,
            og_image: None,
            og_type: Some("article".to_string()),
            og_url: None,
            og_site_name: None,
            twitter_title: None,
            twitter_description: None,
            twitter_image: None,
            twitter_card: Some("summary_large_image".to_string()),
            canonical_url: None,
            robots: "index, follow".to_string(),
            structured_data: None,
            article_published_time: Some(ctx.published_at),
            article_modified_time: Some(ctx.published_at),
            locale: ctx.language.locale().to_string(),
        }
    }

    fn assemble(
        &self,
        ctx: &SeoContext<'_>,
        meta_title: String,
        meta_description: String,
        meta_keywords: String,
        keywords: &[String],
    ) -> SeoProfile {
        let image_url = ctx.image_url.unwrap_or_default();

        let structured = news_article(&ArticleData {
            headline: &meta_title,
            description: &meta_description,
            image: image_url,
            url: ctx.canonical_url,
            site_base: ctx.site_base,
            site_name: &self.site_name,
            language: ctx.language,
            published_at: ctx.published_at,
            modified_at: ctx.published_at,
            author_name: ctx.author_name,
            keywords,
        });

        let og_image = ctx.image_url.map(|url| url.to_string());

        SeoProfile {
            og_title: Some(meta_title.clone()),
            og_description: Some(meta_description.clone()),
            og_image: og_image.clone(),
            og_type: Some("article".to_string()),
            og_url: Some(ctx.canonical_url.to_string()),
            og_site_name: Some(self.site_name.clone()),
            twitter_title: Some(meta_title.clone()),
            twitter_description: Some(meta_description.clone()),
            twitter_image: og_image,
            twitter_card: Some("summary_large_image".to_string()),
            canonical_url: Some(ctx.canonical_url.to_string()),
            robots: "index, follow".to_string(),
            structured_data: Some(structured.to_string()),
            article_published_time: Some(ctx.published_at),
            article_modified_time: Some(ctx.published_at),
            locale: ctx.language.locale().to_string(),
            meta_title,
            meta_description,
            meta_keywords,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::OpenAiConfig;
    use std::time::Duration;

    fn context<'a>(keywords: &'a [String]) -> SeoContext<'a> {
        SeoContext {
            title: "Tehran bourse index climbs to a record high",
            content: "<p>The Tehran stock exchange index climbed again today as \
                      traders responded to the latest figures. Analysts expect \
                      the rally to continue through the quarter.</p>",
            excerpt: "The Tehran stock exchange index climbed again today.",
            keywords,
            language: Language::En,
            canonical_url: "https://news.example.com/blog/tehran-bourse-index",
            image_url: Some("https://news.example.com/images/blog-images/a.jpg"),
            site_base: "https://news.example.com",
            author_name: None,
            published_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_disabled_provider_still_produces_profile() {
        let generator = SeoGenerator::new(AiProvider::Disabled, "Rooznama");
        let keywords = vec!["bourse".to_string()];
        let result = generator.generate(&context(&keywords)).await;

        assert!(!result.ai_assisted);
        let profile = result.profile;
        assert!(!profile.meta_title.is_empty());
        assert!(!profile.meta_description.is_empty());
        assert!(profile.meta_keywords.contains("bourse"));
        assert_eq!(profile.og_type.as_deref(), Some("article"));
        assert_eq!(profile.twitter_card.as_deref(), Some("summary_large_image"));
        assert_eq!(
            profile.canonical_url.as_deref(),
            Some("https://news.example.com/blog/tehran-bourse-index")
        );
        assert_eq!(profile.locale, "en_US");
        assert!(profile.structured_data.is_some());
    }

    #[tokio::test]
    async fn test_unreachable_provider_falls_back_to_algorithm() {
        let provider = AiProvider::OpenAi(OpenAiConfig {
            api_key: "key".to_string(),
            model: "model".to_string(),
            endpoint: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(1),
        });
        let generator = SeoGenerator::new(provider, "Rooznama");
        let keywords = vec!["bourse".to_string()];
        let result = generator.generate(&context(&keywords)).await;

        // Tier 2 fired; the profile is complete anyway
        assert!(!result.ai_assisted);
        assert!(!result.profile.meta_title.is_empty());
        assert!(!result.profile.meta_description.is_empty());
    }

    #[tokio::test]
    async fn test_structured_data_embeds_timestamps() {
        let generator = SeoGenerator::new(AiProvider::Disabled, "Rooznama");
        let keywords = vec![];
        let result = generator.generate(&context(&keywords)).await;

        let doc: serde_json::Value =
            serde_json::from_str(result.profile.structured_data.as_deref().unwrap()).unwrap();
        assert_eq!(doc["@type"], "NewsArticle");
        assert!(doc["datePublished"].as_str().unwrap().starts_with("2023-11-14"));
    }

    #[test]
    fn test_baseline_profile() {
        let generator = SeoGenerator::new(AiProvider::Disabled, "Rooznama");
        let keywords = vec!["bourse".to_string(), "index".to_string()];
        let ctx = context(&keywords);
        let profile = generator.baseline(&ctx);

        assert_eq!(profile.meta_title, ctx.title);
        assert_eq!(profile.meta_keywords, "bourse, index");
        assert!(profile.structured_data.is_none());
        assert!(profile.meta_description.chars().count() <= 155);
    }
}
