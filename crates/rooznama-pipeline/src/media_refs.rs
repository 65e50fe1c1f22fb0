//! HTML media-reference scanning
//!
//! There is no asset→owner index: the HTML body is the source of truth for
//! media ownership, discovered lazily at deletion time. This module collects
//! every locally-served media path referenced by a body (`<img>`, `<video>`,
//! `<source>`, including lazy-load attributes) and normalizes the primary
//! image reference.

use regex::Regex;
use std::sync::LazyLock;

use rooznama_storage::paths::is_local_media_path;

static IMG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img[^>]+(?:src|data-src|data-lazy-src|data-original)\s*=\s*["']([^"']+)["']"#)
        .unwrap()
});

static VIDEO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<video[^>]+src\s*=\s*["']([^"']+)["']"#).unwrap());

static SOURCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<source[^>]+src\s*=\s*["']([^"']+)["']"#).unwrap());

/// Collect every locally-stored media path referenced by the HTML body,
/// deduplicated in order of appearance.
pub fn extract_local_media(html: &str) -> Vec<String> {
    let mut files = Vec::new();

    for re in [&*IMG_RE, &*VIDEO_RE, &*SOURCE_RE] {
        for captures in re.captures_iter(html) {
            let src = &captures[1];
            if is_local_media_path(src) && !files.iter().any(|f| f == src) {
                files.push(src.to_string());
            }
        }
    }

    files
}

/// Normalize a primary-image reference to a local media path. Absolute URLs
/// under the platform's own host are reduced to their path; genuinely
/// external URLs and non-media paths yield `None`.
pub fn normalize_primary_image(image: &str, site_base: &str) -> Option<String> {
    let path = if image.starts_with("http://") || image.starts_with("https://") {
        let (host, path) = split_url(image)?;
        let (own_host, _) = split_url(site_base)?;
        if host != own_host {
            return None;
        }
        path
    } else {
        image.to_string()
    };

    if is_local_media_path(&path) {
        Some(path)
    } else {
        None
    }
}

/// Split an absolute URL into (host, path), without a URL-parsing
/// dependency: everything between `://` and the first `/` is the host.
fn split_url(url: &str) -> Option<(String, String)> {
    let rest = url.split_once("://")?.1;
    match rest.split_once('/') {
        Some((host, path)) => Some((host.to_string(), format!("/{}", path))),
        None => Some((rest.to_string(), "/".to_string())),
    }
}
