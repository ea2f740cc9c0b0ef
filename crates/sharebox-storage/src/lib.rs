//! Sharebox Storage Library
//!
//! This crate provides the object-store boundary for Sharebox: the Storage
//! trait and implementations for S3 and the local filesystem.
//!
//! # Storage key format
//!
//! Keys are owner-scoped and unique per upload:
//! `files/{owner_id}/{millis}-{filename}`. The millisecond timestamp prefix
//! keeps two uploads of the same filename from colliding. Keys must not
//! contain `..` or a leading `/`. Key generation is centralized in the
//! `keys` module so all backends stay consistent.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use sharebox_core::StorageBackend;
pub use traits::{Storage, StorageError, StorageResult};
