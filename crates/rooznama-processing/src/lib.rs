//! Media processing
//!
//! Takes an incoming image reference and produces a finalized local media
//! asset: fetch, resize to fit, optional watermark, encode, store. A
//! reference that is already finalized (under the processed-media prefix) is
//! passed through untouched so nothing is ever watermarked twice.

pub mod fetch;
pub mod image;

pub use fetch::{HttpImageFetcher, RemoteImageFetcher};
pub use self::image::processor::{ImageProcessor, ProcessedImage, ProcessingOptions};
pub use self::image::watermark::{Watermark, WatermarkConfig, WatermarkPosition};
