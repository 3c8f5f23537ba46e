//! Write-through blob store used for compressed images.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Instant;
use tracing::info;

use sat_common::{SatError, SatResult};

use crate::object_store::StoragePath;

/// Minimal put-only storage seam.
///
/// Writes are at-most-once: no retry happens here, callers needing
/// resilience wrap the call themselves.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `key`.
    async fn put(&self, key: &str, data: Bytes) -> SatResult<()>;

    /// Bucket (or namespace) the store writes into.
    fn bucket(&self) -> &str;
}

/// Upload a compressed image and return its storage key.
///
/// Any failure from the store is reported as [`SatError::StorageWrite`]
/// naming the image's file id.
pub async fn save_image(
    store: &dyn BlobStore,
    image_bytes: Bytes,
    timestamp: &str,
    macroarea_id: &str,
    microarea_id: &str,
) -> SatResult<String> {
    let start = Instant::now();
    let file_id = StoragePath::file_id(macroarea_id, microarea_id, timestamp);
    let key = StoragePath::satellite_image(
        timestamp,
        macroarea_id,
        microarea_id,
        &StoragePath::unique_suffix(),
    )?;

    let size = image_bytes.len();
    store.put(&key, image_bytes).await.map_err(|e| {
        SatError::StorageWrite(format!(
            "Failed to store image with image_id={}: {}",
            file_id, e
        ))
    })?;

    info!(
        bucket = store.bucket(),
        key = %key,
        size,
        elapsed_secs = start.elapsed().as_secs_f64(),
        "Uploaded image"
    );

    Ok(key)
}
