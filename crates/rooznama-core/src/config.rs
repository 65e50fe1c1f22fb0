//! Configuration module
//!
//! Pipeline configuration loaded from the environment (with `.env` support
//! via dotenvy). Values mirror what the ingestion host would otherwise have
//! to pass on every call: storage locations, site identity, image processing
//! defaults, and the optional AI provider for SEO refinement.

use std::env;

use anyhow::{bail, Context};

const DEFAULT_SITE_URL: &str = "http://localhost:3000";
const DEFAULT_SITE_NAME: &str = "Rooznama";
const DEFAULT_MEDIA_ROOT: &str = "./public";
const DEFAULT_IMAGE_MAX_WIDTH: u32 = 1200;
const DEFAULT_IMAGE_MAX_HEIGHT: u32 = 800;
const DEFAULT_IMAGE_QUALITY: u8 = 85;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 60;
const DEFAULT_FETCH_RETRIES: u32 = 5;
const DEFAULT_MAX_DOWNLOAD_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_SEO_TIMEOUT_SECS: u64 = 30;

/// Image fetch/transform settings.
#[derive(Clone, Debug)]
pub struct ImageConfig {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: u8,
    pub fetch_timeout_secs: u64,
    pub fetch_retries: u32,
    pub max_download_bytes: u64,
}

/// AI provider selection for SEO refinement. `provider` is one of
/// `disabled`, `openai`, `huggingface`; the null choice is a first-class
/// variant, not an error.
#[derive(Clone, Debug)]
pub struct SeoProviderConfig {
    pub provider: String,
    pub api_key: Option<String>,
    pub model: Option<String>,
    /// Endpoint override for OpenAI-compatible gateways.
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

/// Pipeline configuration.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub database_url: String,
    /// Root directory of the locally-served media store (the host serves it
    /// at `/`, so a key `images/a.jpg` is reachable as `/images/a.jpg`).
    pub media_root: String,
    pub site_url: String,
    pub site_name: String,
    pub image: ImageConfig,
    pub seo: SeoProviderConfig,
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            media_root: env_or("MEDIA_ROOT", DEFAULT_MEDIA_ROOT),
            site_url: env_or("SITE_URL", DEFAULT_SITE_URL),
            site_name: env_or("SITE_NAME", DEFAULT_SITE_NAME),
            image: ImageConfig {
                max_width: env_parse("IMAGE_MAX_WIDTH", DEFAULT_IMAGE_MAX_WIDTH)?,
                max_height: env_parse("IMAGE_MAX_HEIGHT", DEFAULT_IMAGE_MAX_HEIGHT)?,
                quality: env_parse("IMAGE_QUALITY", DEFAULT_IMAGE_QUALITY)?,
                fetch_timeout_secs: env_parse("IMAGE_FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT_SECS)?,
                fetch_retries: env_parse("IMAGE_FETCH_RETRIES", DEFAULT_FETCH_RETRIES)?,
                max_download_bytes: env_parse("IMAGE_MAX_DOWNLOAD_BYTES", DEFAULT_MAX_DOWNLOAD_BYTES)?,
            },
            seo: SeoProviderConfig {
                provider: env_or("SEO_AI_PROVIDER", "disabled").to_lowercase(),
                api_key: env::var("SEO_AI_API_KEY").ok(),
                model: env::var("SEO_AI_MODEL").ok(),
                endpoint: env::var("SEO_AI_ENDPOINT").ok(),
                timeout_secs: env_parse("SEO_AI_TIMEOUT_SECS", DEFAULT_SEO_TIMEOUT_SECS)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.site_url.trim_end_matches('/').is_empty() {
            bail!("SITE_URL must not be empty");
        }
        if self.image.quality == 0 || self.image.quality > 100 {
            bail!(
                "IMAGE_QUALITY must be within 1..=100, got {}",
                self.image.quality
            );
        }
        if self.image.max_width == 0 || self.image.max_height == 0 {
            bail!("IMAGE_MAX_WIDTH and IMAGE_MAX_HEIGHT must be positive");
        }
        match self.seo.provider.as_str() {
            "disabled" | "openai" | "huggingface" => {}
            other => bail!("Unknown SEO_AI_PROVIDER: {}", other),
        }
        if self.seo.provider == "openai" && self.seo.api_key.is_none() {
            bail!("SEO_AI_API_KEY must be set when SEO_AI_PROVIDER=openai");
        }
        Ok(())
    }

    /// Site URL without a trailing slash, for building absolute URLs.
    pub fn site_base(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_IMAGE_MAX_WIDTH,
            max_height: DEFAULT_IMAGE_MAX_HEIGHT,
            quality: DEFAULT_IMAGE_QUALITY,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            fetch_retries: DEFAULT_FETCH_RETRIES,
            max_download_bytes: DEFAULT_MAX_DOWNLOAD_BYTES,
        }
    }
}

impl Default for SeoProviderConfig {
    fn default() -> Self {
        Self {
            provider: "disabled".to_string(),
            api_key: None,
            model: None,
            endpoint: None,
            timeout_secs: DEFAULT_SEO_TIMEOUT_SECS,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T, anyhow::Error>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PipelineConfig {
        PipelineConfig {
            database_url: "postgres://localhost/rooznama".to_string(),
            media_root: DEFAULT_MEDIA_ROOT.to_string(),
            site_url: "https://news.example.com/".to_string(),
            site_name: DEFAULT_SITE_NAME.to_string(),
            image: ImageConfig::default(),
            seo: SeoProviderConfig::default(),
        }
    }

    #[test]
    fn test_valid_defaults() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_site_base_strips_trailing_slash() {
        assert_eq!(config().site_base(), "https://news.example.com");
    }

    #[test]
    fn test_quality_out_of_range_rejected() {
        let mut cfg = config();
        cfg.image.quality = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let mut cfg = config();
        cfg.seo.provider = "backboard".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_openai_requires_api_key() {
        let mut cfg = config();
        cfg.seo.provider = "openai".to_string();
        assert!(cfg.validate().is_err());
        cfg.seo.api_key = Some("sk-test".to_string());
        assert!(cfg.validate().is_ok());
    }
}
