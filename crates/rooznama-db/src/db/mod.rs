//! Database repositories for the data access layer
//!
//! Each repository owns one domain entity's queries. All queries are runtime
//! `sqlx::query`/`query_as` with bound parameters.

pub mod author;
pub mod content;
pub mod transaction;

pub use author::AuthorRepository;
pub use content::ContentRepository;
