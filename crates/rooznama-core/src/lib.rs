//! Rooznama Core Library
//!
//! This crate provides the domain models, error types, configuration, slug
//! normalization, and store traits shared across all Rooznama pipeline
//! components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod slug;
pub mod store;
pub mod telemetry;

// Re-export commonly used types
pub use config::{ImageConfig, PipelineConfig, SeoProviderConfig};
pub use error::AppError;
pub use store::{
    AuthorDirectory, AuthorRecord, ContentStore, DeletionRecord, NewContent, NewTranslation,
    ShortLinkTarget,
};
