use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Language partition for translations. Slugs are unique per language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "language", rename_all = "UPPERCASE"))]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Fa,
    En,
}

impl Language {
    /// Open Graph / structured-data locale for this language.
    pub fn locale(&self) -> &'static str {
        match self {
            Language::Fa => "fa_IR",
            Language::En => "en_US",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Fa => write!(f, "FA"),
            Language::En => write!(f, "EN"),
        }
    }
}

/// Publication status. Ingested content is always created `Published`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "content_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Draft,
    Pending,
    Published,
}

/// A published content item. Language-specific text lives in `Translation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ContentItem {
    pub id: i64,
    pub status: ContentStatus,
    pub is_featured: bool,
    /// Primary image: a local media path or an external URL. Empty when the
    /// item has no usable image.
    pub image: String,
    pub author_id: Option<i64>,
    /// Base62 short-link code, filled after minting.
    pub code: Option<String>,
    pub short_link: Option<String>,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Language-specific text of a content item, one row per language.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Translation {
    pub id: i64,
    pub content_id: i64,
    pub lang: Language,
    pub slug: String,
    pub title: String,
    /// Rich HTML body. May embed local media references that the deletion
    /// path discovers by scanning.
    pub content: String,
    pub excerpt: String,
}
