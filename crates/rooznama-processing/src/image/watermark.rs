use image::{imageops, DynamicImage, GenericImageView, ImageReader};
use std::io::Cursor;

use super::resize::ImageResize;

/// Margin between the logo and the image edge.
const PADDING: u32 = 20;

/// Logo width as a share of the image width, clamped to [120, 400] px.
const LOGO_WIDTH_RATIO: f32 = 0.18;
const LOGO_MIN_WIDTH: u32 = 120;
const LOGO_MAX_WIDTH: u32 = 400;

/// Watermark configuration
#[derive(Debug, Clone)]
pub struct WatermarkConfig {
    pub position: WatermarkPosition,
    pub opacity: f32,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            position: WatermarkPosition::TopLeft,
            opacity: 1.0,
        }
    }
}

/// Watermark position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatermarkPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

pub struct Watermark;

impl Watermark {
    /// Composite the logo onto the image. When the logo cannot fit (tiny
    /// source images), the image is returned unwatermarked rather than
    /// failing the whole processing run.
    pub fn apply(
        img: DynamicImage,
        logo_data: &[u8],
        config: &WatermarkConfig,
    ) -> Result<DynamicImage, anyhow::Error> {
        let cursor = Cursor::new(logo_data);
        let reader = ImageReader::new(cursor).with_guessed_format()?;
        let logo = reader.decode()?;

        let (img_width, img_height) = img.dimensions();
        let (logo_width, logo_height) = logo.dimensions();

        // Scale the logo relative to the image width
        let computed = (img_width as f32 * LOGO_WIDTH_RATIO) as u32;
        let target_width = computed
            .clamp(LOGO_MIN_WIDTH, LOGO_MAX_WIDTH)
            .min(img_width.saturating_sub(PADDING * 2));

        if target_width == 0 {
            tracing::warn!(
                img_width,
                img_height,
                "Image too small for watermark, skipping"
            );
            return Ok(img);
        }

        let scale = target_width as f32 / logo_width as f32;
        let target_height = ((logo_height as f32 * scale) as u32).max(1);

        if target_height + PADDING * 2 > img_height {
            tracing::warn!(
                img_width,
                img_height,
                "Logo taller than image, skipping watermark"
            );
            return Ok(img);
        }

        let filter = ImageResize::select_filter(logo_width, logo_height, target_width, target_height);
        let mut logo_rgba = logo
            .resize_exact(target_width, target_height, filter)
            .to_rgba8();

        if config.opacity < 1.0 {
            for pixel in logo_rgba.pixels_mut() {
                pixel[3] = (pixel[3] as f32 * config.opacity) as u8;
            }
        }

        let (x, y) = match config.position {
            // Flush left, dropped below the top edge
            WatermarkPosition::TopLeft => (0, 40.min(img_height.saturating_sub(target_height))),
            WatermarkPosition::TopRight => {
                (img_width.saturating_sub(target_width + PADDING), PADDING)
            }
            WatermarkPosition::BottomLeft => {
                (PADDING, img_height.saturating_sub(target_height + PADDING))
            }
            WatermarkPosition::BottomRight => (
                img_width.saturating_sub(target_width + PADDING),
                img_height.saturating_sub(target_height + PADDING),
            ),
            WatermarkPosition::Center => (
                (img_width.saturating_sub(target_width)) / 2,
                (img_height.saturating_sub(target_height)) / 2,
            ),
        };

        let mut img_rgba = img.to_rgba8();
        imageops::overlay(&mut img_rgba, &logo_rgba, x as i64, y as i64);

        Ok(DynamicImage::ImageRgba8(img_rgba))
    }
}
