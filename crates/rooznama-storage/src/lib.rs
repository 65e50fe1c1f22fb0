//! Media store abstraction
//!
//! The publishing pipeline stores processed images and removes orphaned
//! files through the `Storage` trait. The only backend is the locally-served
//! media root (`LocalStorage`); keys are root-relative paths and map 1:1
//! onto public web paths (`images/blog-images/a.jpg` ⇄
//! `/images/blog-images/a.jpg`).
//!
//! Operations are path-keyed and idempotent (delete-if-exists,
//! write-with-unique-generated-name), so concurrent publishers and the
//! independent deletion path never collide on the same path and no locking
//! is needed.

pub mod local;
pub mod paths;
pub mod traits;

pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
