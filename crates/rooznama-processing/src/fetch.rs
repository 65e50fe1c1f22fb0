//! Remote image fetching
//!
//! Downloads raw images from ingestion sources with bounded size, bounded
//! retries, and a per-attempt timeout. The fetcher is a trait so the
//! processor can be exercised without network access.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

use rooznama_core::{AppError, ImageConfig};

/// Fetches a remote image by URL.
#[async_trait]
pub trait RemoteImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes, AppError>;
}

/// HTTP(S) fetcher backed by reqwest.
pub struct HttpImageFetcher {
    client: reqwest::Client,
    retries: u32,
    max_bytes: u64,
}

impl HttpImageFetcher {
    pub fn new(config: &ImageConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            retries: config.fetch_retries.max(1),
            max_bytes: config.max_download_bytes,
        })
    }

    async fn fetch_once(&self, url: &str) -> Result<Bytes, AppError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            AppError::ImageProcessing(format!("Failed to download from URL: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(AppError::ImageProcessing(format!(
                "URL returned status code: {}",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !content_type.starts_with("image/") {
            return Err(AppError::ImageProcessing(format!(
                "Invalid content type: {}",
                content_type
            )));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_bytes {
                return Err(AppError::ImageProcessing(format!(
                    "Image too large: {} bytes (max: {})",
                    length, self.max_bytes
                )));
            }
        }

        let data = response.bytes().await.map_err(|e| {
            AppError::ImageProcessing(format!("Failed to read response body: {}", e))
        })?;

        if data.is_empty() {
            return Err(AppError::ImageProcessing(
                "Downloaded image is empty".to_string(),
            ));
        }
        if data.len() as u64 > self.max_bytes {
            return Err(AppError::ImageProcessing(format!(
                "Image too large: {} bytes (max: {})",
                data.len(),
                self.max_bytes
            )));
        }

        Ok(data)
    }
}

#[async_trait]
impl RemoteImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, AppError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|_| AppError::ImageProcessing(format!("Invalid URL format: {}", url)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(AppError::ImageProcessing(
                "Only HTTP and HTTPS URLs are allowed".to_string(),
            ));
        }

        let mut last_error = None;

        for attempt in 1..=self.retries {
            match self.fetch_once(url).await {
                Ok(data) => {
                    tracing::info!(
                        url = %url,
                        attempt,
                        size_bytes = data.len(),
                        "Image download successful"
                    );
                    return Ok(data);
                }
                Err(e) => {
                    tracing::warn!(
                        url = %url,
                        attempt,
                        retries = self.retries,
                        error = %e,
                        "Image download attempt failed"
                    );
                    last_error = Some(e);

                    if attempt < self.retries {
                        let backoff =
                            Duration::from_millis((2000u64 << (attempt - 1)).min(30_000));
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            AppError::ImageProcessing("Image download failed".to_string())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> HttpImageFetcher {
        let config = ImageConfig {
            fetch_retries: 1,
            fetch_timeout_secs: 1,
            ..ImageConfig::default()
        };
        HttpImageFetcher::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let err = fetcher().fetch("not a url").await.unwrap_err();
        assert!(matches!(err, AppError::ImageProcessing(_)));
    }

    #[tokio::test]
    async fn test_non_http_scheme_rejected() {
        let err = fetcher().fetch("ftp://example.com/a.jpg").await.unwrap_err();
        assert!(err.to_string().contains("HTTP"));
    }
}
