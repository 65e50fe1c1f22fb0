//! Short-Link Generator
//!
//! Mints a compact shareable alias for a published item by Base62-encoding
//! its numeric id: `{site_url}/n/{code}`. Minting failures are non-fatal to
//! publication — the assembler simply omits the link from its result.

use std::sync::Arc;

use rooznama_core::constants::SHORT_LINK_SEGMENT;
use rooznama_core::store::{ContentStore, ShortLinkTarget};
use rooznama_core::AppError;

/// Base62 character set: 0-9, a-z, A-Z.
const CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const BASE: u64 = 62;

/// Encode a number as Base62, e.g. `12345` → `"3d7"`.
pub fn encode_base62(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while n > 0 {
        out.push(CHARSET[(n % BASE) as usize]);
        n /= BASE;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Decode a Base62 string back to a number.
pub fn decode_base62(code: &str) -> Result<u64, AppError> {
    let mut result: u64 = 0;
    for c in code.bytes() {
        let index = CHARSET
            .iter()
            .position(|&x| x == c)
            .ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "Invalid character in Base62 string: {}",
                    c as char
                ))
            })?;
        result = result
            .checked_mul(BASE)
            .and_then(|r| r.checked_add(index as u64))
            .ok_or_else(|| AppError::InvalidInput("Base62 value overflows".to_string()))?;
    }
    Ok(result)
}

pub struct ShortLinkGenerator {
    store: Arc<dyn ContentStore>,
}

impl ShortLinkGenerator {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Mint the alias for a content id and record it on the row.
    #[tracing::instrument(skip(self))]
    pub async fn mint(&self, content_id: i64, site_base: &str) -> Result<String, AppError> {
        let code = encode_base62(content_id as u64);
        let short_link = format!(
            "{}/{}/{}",
            site_base.trim_end_matches('/'),
            SHORT_LINK_SEGMENT,
            code
        );

        self.store
            .set_short_link(content_id, &code, &short_link)
            .await?;

        tracing::info!(content_id, short_link = %short_link, "Short link minted");

        Ok(short_link)
    }

    /// Resolve a code back to its content.
    pub async fn resolve(&self, code: &str) -> Result<Option<ShortLinkTarget>, AppError> {
        self.store.find_by_code(code).await
    }

    /// Mint aliases for records that predate the short-link feature.
    /// Returns (minted, failed) counts.
    pub async fn mint_missing(&self, limit: i64, site_base: &str) -> (usize, usize) {
        let ids = match self.store.ids_missing_short_link(limit).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(error = %e, "Failed to list records missing short links");
                return (0, 0);
            }
        };

        let mut minted = 0;
        let mut failed = 0;

        for id in ids {
            match self.mint(id, site_base).await {
                Ok(_) => minted += 1,
                Err(e) => {
                    tracing::warn!(content_id = id, error = %e, "Short link backfill failed");
                    failed += 1;
                }
            }
        }

        tracing::info!(minted, failed, "Short link backfill finished");

        (minted, failed)
    }
}
