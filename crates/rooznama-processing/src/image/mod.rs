//! Image processing module
//!
//! - resize: fit-within-bounding-box resizing
//! - watermark: logo overlay
//! - processor: the full fetch → transform → store pipeline

pub mod processor;
pub mod resize;
pub mod watermark;

pub use processor::{ImageProcessor, ProcessedImage, ProcessingOptions};
pub use resize::ImageResize;
pub use watermark::{Watermark, WatermarkConfig, WatermarkPosition};
