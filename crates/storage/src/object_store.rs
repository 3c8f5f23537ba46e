//! Object storage interface for compressed imagery (MinIO/S3 compatible).

use async_trait::async_trait;
use bytes::Bytes;
use object_store::{aws::AmazonS3Builder, memory::InMemory, path::Path, ObjectStore};
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use tracing::{debug, instrument};

use sat_common::{SatError, SatResult};

use crate::blob_store::BlobStore;

/// Configuration for object storage connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectStorageConfig {
    /// S3/MinIO endpoint URL
    pub endpoint: String,
    /// Bucket name
    pub bucket: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// AWS region (use "us-east-1" for MinIO)
    pub region: String,
    /// Allow HTTP (for local MinIO)
    pub allow_http: bool,
}

impl Default for ObjectStorageConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://minio:9000".to_string(),
            bucket: "bronze".to_string(),
            access_key_id: "minioadmin".to_string(),
            secret_access_key: "minioadmin".to_string(),
            region: "us-east-1".to_string(),
            allow_http: true,
        }
    }
}

impl ObjectStorageConfig {
    /// Load from environment variables, falling back to defaults.
    ///
    /// `MINIO_ENDPOINT` may be a bare `host:port`; it gets an `http://` prefix.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let endpoint = env::var("MINIO_ENDPOINT")
            .map(|e| normalize_endpoint(&e))
            .unwrap_or(defaults.endpoint);

        Self {
            endpoint,
            bucket: env::var("MINIO_BUCKET").unwrap_or(defaults.bucket),
            access_key_id: env::var("AWS_ACCESS_KEY_ID").unwrap_or(defaults.access_key_id),
            secret_access_key: env::var("AWS_SECRET_ACCESS_KEY")
                .unwrap_or(defaults.secret_access_key),
            region: env::var("AWS_REGION").unwrap_or(defaults.region),
            allow_http: env::var("S3_ALLOW_HTTP")
                .map(|v| v == "true")
                .unwrap_or(defaults.allow_http),
        }
    }
}

/// Prefix `http://` onto an endpoint given without a scheme.
pub fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{}", endpoint)
    }
}

/// Object storage client for imagery.
pub struct ObjectStorage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl ObjectStorage {
    /// Create a new object storage client from config.
    pub fn new(config: &ObjectStorageConfig) -> SatResult<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_endpoint(&config.endpoint)
            .with_bucket_name(&config.bucket)
            .with_access_key_id(&config.access_key_id)
            .with_secret_access_key(&config.secret_access_key)
            .with_region(&config.region);

        if config.allow_http {
            builder = builder.with_allow_http(true);
        }

        let store = builder
            .build()
            .map_err(|e| SatError::Config(format!("Failed to create S3 client: {}", e)))?;

        Ok(Self {
            store: Arc::new(store),
            bucket: config.bucket.clone(),
        })
    }

    /// Create a store that keeps objects in process memory.
    pub fn in_memory(bucket: impl Into<String>) -> Self {
        Self {
            store: Arc::new(InMemory::new()),
            bucket: bucket.into(),
        }
    }

    /// Write bytes to a path in the bucket.
    #[instrument(skip(self, data), fields(bucket = %self.bucket, path = %path))]
    pub async fn put(&self, path: &str, data: Bytes) -> SatResult<()> {
        let location = Path::from(path);
        debug!(size = data.len(), "Writing object");

        self.store
            .put(&location, data.into())
            .await
            .map_err(|e| SatError::StorageWrite(format!("Failed to write {}: {}", path, e)))?;

        Ok(())
    }

    /// Read bytes from a path.
    #[instrument(skip(self), fields(bucket = %self.bucket, path = %path))]
    pub async fn get(&self, path: &str) -> SatResult<Bytes> {
        let location = Path::from(path);

        let result = self
            .store
            .get(&location)
            .await
            .map_err(|e| SatError::StorageWrite(format!("Failed to read {}: {}", path, e)))?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| SatError::StorageWrite(format!("Failed to read bytes: {}", e)))?;

        debug!(size = bytes.len(), "Read object");
        Ok(bytes)
    }

    /// Check if an object exists.
    pub async fn exists(&self, path: &str) -> SatResult<bool> {
        let location = Path::from(path);

        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(SatError::StorageWrite(format!(
                "Failed to check {}: {}",
                path, e
            ))),
        }
    }
}

#[async_trait]
impl BlobStore for ObjectStorage {
    async fn put(&self, key: &str, data: Bytes) -> SatResult<()> {
        ObjectStorage::put(self, key, data).await
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}

/// Path builder for consistent storage layout.
pub struct StoragePath;

impl StoragePath {
    /// Root prefix for all imagery objects.
    pub const IMAGERY_PREFIX: &'static str = "satellite_imagery/sentinel2";

    /// Build the partitioned key for a compressed satellite image.
    /// Format: satellite_imagery/sentinel2/year={Y}/month={M}/day={D}/sat_img_{macro}_{micro}_{timestamp}_{suffix}.jpg
    ///
    /// Date partitions come from the date part of `timestamp`
    /// (`YYYY-MM-DDTHH:MM:SS.mmm`).
    pub fn satellite_image(
        timestamp: &str,
        macroarea_id: &str,
        microarea_id: &str,
        suffix: &str,
    ) -> SatResult<String> {
        let date = timestamp.split('T').next().unwrap_or_default();
        let parts: Vec<&str> = date.split('-').collect();
        let (year, month, day) = match parts.as_slice() {
            [y, m, d] if !y.is_empty() && !m.is_empty() && !d.is_empty() => (*y, *m, *d),
            _ => {
                return Err(SatError::InvalidPayload(format!(
                    "timestamp '{}' has no YYYY-MM-DD date part",
                    timestamp
                )))
            }
        };

        Ok(format!(
            "{}/year={}/month={}/day={}/sat_img_{}_{}.jpg",
            Self::IMAGERY_PREFIX,
            year,
            month,
            day,
            Self::file_id(macroarea_id, microarea_id, timestamp),
            suffix
        ))
    }

    /// Identifier used in file names and error messages.
    pub fn file_id(macroarea_id: &str, microarea_id: &str, timestamp: &str) -> String {
        format!("{}_{}_{}", macroarea_id, microarea_id, timestamp)
    }

    /// Random 8 hex character suffix making keys unique.
    pub fn unique_suffix() -> String {
        uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_paths() {
        assert_eq!(
            StoragePath::satellite_image("2025-06-01T10:15:30.123", "adriatic", "m1", "a1b2c3d4")
                .unwrap(),
            "satellite_imagery/sentinel2/year=2025/month=06/day=01/sat_img_adriatic_m1_2025-06-01T10:15:30.123_a1b2c3d4.jpg"
        );
    }

    #[test]
    fn test_storage_path_rejects_bad_timestamp() {
        assert!(StoragePath::satellite_image("yesterday", "a", "b", "c").is_err());
    }

    #[test]
    fn test_unique_suffix_shape() {
        let suffix = StoragePath::unique_suffix();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_normalize_endpoint() {
        assert_eq!(normalize_endpoint("minio:9000"), "http://minio:9000");
        assert_eq!(normalize_endpoint("https://s3.example.com"), "https://s3.example.com");
    }
}
