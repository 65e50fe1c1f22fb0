use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Language;

/// Inbound publication request, as handed over by ingestion callers
/// (RSS importer, manual entry).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PublishRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub source_url: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub category_id: i64,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub author_id: Option<i64>,
    pub language: Language,
    /// `None` means enabled; only an explicit `false` skips SEO enrichment.
    pub enable_seo: Option<bool>,
    pub enable_watermark: Option<bool>,
    pub watermark_path: Option<String>,
    /// Overrides the configured site URL for canonical/short links.
    pub site_url: Option<String>,
}

impl PublishRequest {
    pub fn seo_enabled(&self) -> bool {
        self.enable_seo != Some(false)
    }

    pub fn watermark_enabled(&self) -> bool {
        self.enable_watermark == Some(true)
    }
}

/// Structured result of a publication attempt. Publication either fully
/// succeeds (with flags for skipped enhancements) or fully fails with a
/// reason; no partial state is reported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishOutcome {
    pub success: bool,
    pub content_id: Option<i64>,
    pub slug: Option<String>,
    pub short_link: Option<String>,
    pub seo_generated: bool,
    pub image_processed: bool,
    pub error: Option<String>,
}

impl PublishOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}
