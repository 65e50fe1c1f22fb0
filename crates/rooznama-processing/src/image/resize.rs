use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

pub struct ImageResize;

impl ImageResize {
    /// Resize to fit within the bounding box, preserving aspect ratio and
    /// never enlarging.
    pub fn fit_within(img: &DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
        let (width, height) = img.dimensions();

        if width <= max_width && height <= max_height {
            return img.clone();
        }

        let filter = Self::select_filter(width, height, max_width, max_height);
        img.resize(max_width, max_height, filter)
    }

    /// Pick a resampling filter for the given source/target sizes. Large
    /// downscales favor quality, small adjustments favor speed.
    pub fn select_filter(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> FilterType {
        let src_pixels = src_w as u64 * src_h as u64;
        let dst_pixels = dst_w as u64 * dst_h as u64;

        if src_pixels > dst_pixels * 4 {
            FilterType::Lanczos3
        } else {
            FilterType::Triangle
        }
    }
}
