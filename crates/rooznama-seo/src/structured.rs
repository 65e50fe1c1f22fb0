//! schema.org structured data
//!
//! Builds the NewsArticle JSON-LD document embedded in each SEO profile.
//! The document is stored as opaque serialized text; nothing else in the
//! pipeline reads it back.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use rooznama_core::models::Language;

/// Inputs for the NewsArticle document.
#[derive(Debug, Clone)]
pub struct ArticleData<'a> {
    pub headline: &'a str,
    pub description: &'a str,
    /// Absolute or site-relative image reference; made absolute here.
    pub image: &'a str,
    pub url: &'a str,
    pub site_base: &'a str,
    pub site_name: &'a str,
    pub language: Language,
    pub published_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub author_name: Option<&'a str>,
    pub keywords: &'a [String],
}

/// Build the schema.org NewsArticle document.
pub fn news_article(data: &ArticleData<'_>) -> Value {
    let image = if data.image.starts_with("http") {
        data.image.to_string()
    } else {
        format!("{}{}", data.site_base, data.image)
    };

    let default_author = match data.language {
        Language::Fa => "تحریریه",
        Language::En => "Editorial",
    };

    json!({
        "@context": "https://schema.org",
        "@type": "NewsArticle",
        "headline": data.headline,
        "description": data.description,
        "image": image,
        "datePublished": data.published_at.to_rfc3339(),
        "dateModified": data.modified_at.to_rfc3339(),
        "author": {
            "@type": "Person",
            "name": data.author_name.unwrap_or(default_author),
        },
        "publisher": {
            "@type": "Organization",
            "name": data.site_name,
            "logo": {
                "@type": "ImageObject",
                "url": format!("{}/logo.png", data.site_base),
            },
        },
        "mainEntityOfPage": {
            "@type": "WebPage",
            "@id": data.url,
        },
        "keywords": data.keywords.join(", "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data<'a>(keywords: &'a [String]) -> ArticleData<'a> {
        ArticleData {
            headline: "Headline",
            description: "Description",
            image: "/images/blog-images/a.jpg",
            url: "https://news.example.com/blog/headline",
            site_base: "https://news.example.com",
            site_name: "Rooznama",
            language: Language::En,
            published_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            modified_at: DateTime::from_timestamp(1_700_000_500, 0).unwrap(),
            author_name: None,
            keywords,
        }
    }

    #[test]
    fn test_news_article_document() {
        let keywords = vec!["markets".to_string(), "tehran".to_string()];
        let doc = news_article(&data(&keywords));

        assert_eq!(doc["@type"], "NewsArticle");
        assert_eq!(doc["headline"], "Headline");
        assert_eq!(
            doc["image"],
            "https://news.example.com/images/blog-images/a.jpg"
        );
        assert_eq!(doc["author"]["name"], "Editorial");
        assert_eq!(doc["publisher"]["name"], "Rooznama");
        assert_eq!(doc["keywords"], "markets, tehran");
        assert_eq!(
            doc["mainEntityOfPage"]["@id"],
            "https://news.example.com/blog/headline"
        );
    }

    #[test]
    fn test_absolute_image_kept() {
        let keywords = vec![];
        let mut d = data(&keywords);
        d.image = "https://cdn.example.com/pic.jpg";
        let doc = news_article(&d);
        assert_eq!(doc["image"], "https://cdn.example.com/pic.jpg");
    }

    #[test]
    fn test_persian_default_author() {
        let keywords = vec![];
        let mut d = data(&keywords);
        d.language = Language::Fa;
        let doc = news_article(&d);
        assert_eq!(doc["author"]["name"], "تحریریه");
    }
}
