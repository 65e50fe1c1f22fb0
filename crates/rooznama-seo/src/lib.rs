//! SEO generation
//!
//! Produces the full SEO profile for a translation: meta tags, Open Graph
//! and Twitter Card fields, a canonical URL, and a schema.org NewsArticle
//! document. Generation is two-tier: an optional AI provider refines
//! title/description/keywords (Tier 1), and a deterministic algorithm covers
//! everything the provider did not deliver (Tier 2). The generator never
//! fails — a provider outage degrades to Tier 2, not to an error.

pub mod algorithm;
pub mod generator;
pub mod provider;
pub mod structured;

pub use generator::{GeneratedSeo, SeoContext, SeoGenerator};
pub use provider::{AiProvider, Refinement};
