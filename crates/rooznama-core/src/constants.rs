//! Shared constants for the publishing pipeline.

/// Web prefix for media the pipeline has already processed and stored.
/// A reference that already starts with this prefix is treated as finalized
/// and is never fetched, resized, or watermarked again.
pub const PROCESSED_MEDIA_PREFIX: &str = "/images/";

/// Web prefix for media placed by the rich-text editor upload flow.
pub const UPLOADS_MEDIA_PREFIX: &str = "/uploads/";

/// Every prefix that maps onto the locally-served media root. Paths under
/// these prefixes are owned by content records and are collected at deletion.
pub const LOCAL_MEDIA_PREFIXES: [&str; 2] = [PROCESSED_MEDIA_PREFIX, UPLOADS_MEDIA_PREFIX];

/// Path segment used for short-link aliases: `{site_url}/n/{code}`.
pub const SHORT_LINK_SEGMENT: &str = "n";

/// Default target folder for primary images processed during publication.
pub const DEFAULT_IMAGE_FOLDER: &str = "blog-images";

/// Search-snippet bound for meta descriptions.
pub const META_DESCRIPTION_MAX: usize = 155;
pub const META_DESCRIPTION_MIN: usize = 140;

/// Meta title bounds (conventional SERP title width).
pub const META_TITLE_MAX: usize = 60;
pub const META_TITLE_MIN: usize = 55;
