//! Web-path ⇄ storage-key convention
//!
//! The media root is served at the site root, so a storage key maps onto its
//! web path by prefixing `/`. Only paths under the known local prefixes
//! belong to the media store; anything else (external URLs, page routes) is
//! not ours to touch.

use rooznama_core::constants::{LOCAL_MEDIA_PREFIXES, PROCESSED_MEDIA_PREFIX};
use uuid::Uuid;

/// Whether the reference is already a finalized, pipeline-owned media path.
/// Such paths are passed through untouched to avoid double-processing.
pub fn is_processed_path(reference: &str) -> bool {
    reference.starts_with(PROCESSED_MEDIA_PREFIX)
}

/// Whether the path points into the locally-served media store.
pub fn is_local_media_path(path: &str) -> bool {
    LOCAL_MEDIA_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

/// Convert a public web path to a storage key. `None` for paths outside the
/// local media prefixes.
pub fn web_path_to_key(path: &str) -> Option<String> {
    if is_local_media_path(path) {
        Some(path.trim_start_matches('/').to_string())
    } else {
        None
    }
}

/// Public web path for a storage key.
pub fn key_to_web_path(key: &str) -> String {
    format!("/{}", key.trim_start_matches('/'))
}

/// Generate a unique storage key for a processed image:
/// `images/{folder}/{uuid}.{ext}`.
pub fn unique_image_key(folder: &str, extension: &str) -> String {
    format!(
        "images/{}/{}.{}",
        folder.trim_matches('/'),
        Uuid::new_v4(),
        extension
    )
}

/// Guess the image file extension from a URL. Defaults to `jpg`.
pub fn extension_from_url(url: &str) -> &'static str {
    let lower = url.to_lowercase();
    if lower.contains(".png") {
        "png"
    } else if lower.contains(".webp") {
        "webp"
    } else if lower.contains(".gif") {
        "gif"
    } else {
        "jpg"
    }
}
