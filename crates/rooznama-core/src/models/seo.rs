use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Derived SEO metadata for one translation.
///
/// Every field is a pure function of (title, content, keywords, canonical
/// URL, image URL) at generation time; the profile has no identity of its
/// own and is deleted with its translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SeoProfile {
    pub meta_title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    // Open Graph
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub og_type: Option<String>,
    pub og_url: Option<String>,
    pub og_site_name: Option<String>,
    // Twitter Card
    pub twitter_title: Option<String>,
    pub twitter_description: Option<String>,
    pub twitter_image: Option<String>,
    pub twitter_card: Option<String>,
    pub canonical_url: Option<String>,
    pub robots: String,
    /// Serialized schema.org document, stored as opaque text.
    pub structured_data: Option<String>,
    pub article_published_time: Option<DateTime<Utc>>,
    pub article_modified_time: Option<DateTime<Utc>>,
    pub locale: String,
}
