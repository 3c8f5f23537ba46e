//! Storage abstractions for the water-quality producer.
//!
//! Provides:
//! - A [`BlobStore`] trait for write-through image uploads
//! - Object storage (MinIO/S3, or in-memory for dry runs and tests)
//! - The partitioned key layout for satellite imagery

pub mod blob_store;
pub mod object_store;

pub use self::object_store::{ObjectStorage, ObjectStorageConfig, StoragePath};
pub use blob_store::{save_image, BlobStore};
