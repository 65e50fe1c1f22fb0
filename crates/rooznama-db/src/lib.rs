//! Postgres persistence layer
//!
//! Repository implementations of the store traits from `rooznama-core`, plus
//! transaction utilities. Schema migrations live under `migrations/`.

pub mod db;

pub use db::transaction::TransactionGuard;
pub use db::{AuthorRepository, ContentRepository};
