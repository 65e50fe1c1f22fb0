//! Media Processor
//!
//! Decides whether an incoming image reference is raw or already finalized,
//! and finalizes raw ones: fetch, resize to fit, optional watermark, encode,
//! store. Failures never propagate — publication proceeds without a usable
//! image instead of blocking.

use std::io::Cursor;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;

use rooznama_core::constants::DEFAULT_IMAGE_FOLDER;
use rooznama_core::{AppError, ImageConfig};
use rooznama_storage::{paths, Storage};

use crate::fetch::RemoteImageFetcher;

use super::resize::ImageResize;
use super::watermark::{Watermark, WatermarkConfig};

/// Options for one processing run.
#[derive(Debug, Clone)]
pub struct ProcessingOptions {
    pub enable_watermark: bool,
    /// Logo location: a local media web path (`/uploads/...`) or a
    /// filesystem path.
    pub watermark_path: Option<String>,
    pub target_folder: String,
    pub max_width: u32,
    pub max_height: u32,
    pub quality: u8,
}

impl ProcessingOptions {
    pub fn from_config(config: &ImageConfig) -> Self {
        Self {
            enable_watermark: false,
            watermark_path: None,
            target_folder: DEFAULT_IMAGE_FOLDER.to_string(),
            max_width: config.max_width,
            max_height: config.max_height,
            quality: config.quality,
        }
    }
}

/// Outcome of a processing run that yielded a usable image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessedImage {
    /// The reference was already finalized and was passed through untouched.
    PassedThrough(String),
    /// The pipeline fetched, transformed, and stored a new asset.
    Stored(String),
}

impl ProcessedImage {
    pub fn path(&self) -> &str {
        match self {
            ProcessedImage::PassedThrough(path) | ProcessedImage::Stored(path) => path,
        }
    }

    pub fn was_stored(&self) -> bool {
        matches!(self, ProcessedImage::Stored(_))
    }
}

/// The Media Processor.
pub struct ImageProcessor {
    fetcher: Arc<dyn RemoteImageFetcher>,
    storage: Arc<dyn Storage>,
}

impl ImageProcessor {
    pub fn new(fetcher: Arc<dyn RemoteImageFetcher>, storage: Arc<dyn Storage>) -> Self {
        Self { fetcher, storage }
    }

    /// Process an image reference. `None` means "no usable image" — the
    /// caller publishes without one.
    #[tracing::instrument(skip(self, options), fields(reference = %reference))]
    pub async fn process(
        &self,
        reference: &str,
        options: &ProcessingOptions,
    ) -> Option<ProcessedImage> {
        // Already under the processed-media prefix: finalized upstream
        // (possibly watermarked). Touching it again would double-process.
        if paths::is_processed_path(reference) {
            tracing::info!(path = %reference, "Image already processed, using as-is");
            return Some(ProcessedImage::PassedThrough(reference.to_string()));
        }

        match self.process_raw(reference, options).await {
            Ok(path) => {
                tracing::info!(
                    path = %path,
                    watermarked = options.enable_watermark,
                    "Image processed"
                );
                Some(ProcessedImage::Stored(path))
            }
            Err(e) => {
                tracing::warn!(reference = %reference, error = %e, "Image processing failed, continuing without image");
                None
            }
        }
    }

    async fn process_raw(
        &self,
        url: &str,
        options: &ProcessingOptions,
    ) -> Result<String, AppError> {
        let data = self.fetcher.fetch(url).await?;

        let img = image::ImageReader::new(Cursor::new(data.as_ref()))
            .with_guessed_format()
            .map_err(|e| AppError::ImageProcessing(format!("Unrecognized image data: {}", e)))?
            .decode()
            .map_err(|e| AppError::ImageProcessing(format!("Failed to decode image: {}", e)))?;

        let mut img = ImageResize::fit_within(&img, options.max_width, options.max_height);

        if options.enable_watermark {
            if let Some(ref logo_path) = options.watermark_path {
                match self.load_logo(logo_path).await {
                    Ok(logo) => match Watermark::apply(img.clone(), &logo, &WatermarkConfig::default()) {
                        Ok(marked) => img = marked,
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to apply watermark, storing unwatermarked image");
                        }
                    },
                    Err(e) => {
                        tracing::warn!(logo_path = %logo_path, error = %e, "Failed to load watermark logo");
                    }
                }
            } else {
                tracing::warn!("Watermark enabled but watermark path is missing");
            }
        }

        let extension = paths::extension_from_url(url);
        let encoded = encode(&img, extension, options.quality)?;

        let key = paths::unique_image_key(&options.target_folder, extension);
        let web_path = self
            .storage
            .upload(&key, encoded)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        Ok(web_path)
    }

    /// Load the watermark logo from the media store (web path) or straight
    /// from the filesystem.
    async fn load_logo(&self, logo_path: &str) -> Result<Vec<u8>, AppError> {
        if let Some(key) = paths::web_path_to_key(logo_path) {
            return self
                .storage
                .download(&key)
                .await
                .map_err(|e| AppError::Storage(e.to_string()));
        }
        Ok(tokio::fs::read(logo_path).await?)
    }
}

/// Encode the image in the format implied by the source extension.
fn encode(img: &DynamicImage, extension: &str, quality: u8) -> Result<Vec<u8>, AppError> {
    let mut buffer = Vec::new();

    match extension {
        "png" => {
            img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
                .map_err(|e| AppError::ImageProcessing(format!("PNG encode failed: {}", e)))?;
        }
        "webp" => {
            let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
            let encoder = webp::Encoder::from_image(&rgba)
                .map_err(|e| AppError::ImageProcessing(format!("WebP encode failed: {}", e)))?;
            buffer = encoder.encode(quality as f32).to_vec();
        }
        "gif" => {
            img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Gif)
                .map_err(|e| AppError::ImageProcessing(format!("GIF encode failed: {}", e)))?;
        }
        _ => {
            // JPEG has no alpha channel
            let rgb = img.to_rgb8();
            let mut cursor = Cursor::new(&mut buffer);
            let encoder = JpegEncoder::new_with_quality(&mut cursor, quality);
            rgb.write_with_encoder(encoder)
                .map_err(|e| AppError::ImageProcessing(format!("JPEG encode failed: {}", e)))?;
        }
    }

    Ok(buffer)
}
