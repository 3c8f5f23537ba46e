//! Builds sampled-pixel metadata and the persisted image payload.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use sat_common::{
    format_timestamp, BoundingBox, ImagePayload, PayloadMetadata, SatError, SatResult,
    SatelliteMetadata,
};
use storage::{save_image, BlobStore};

use crate::location_cache::{CachedTiling, LocationCache};
use crate::measurement::ReadingSource;

/// Result of [`MetadataAssembler::build`].
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub metadata: SatelliteMetadata,
    pub n_cols: usize,
    pub n_rows: usize,
    /// Cells whose reading failed and were left out.
    pub skipped: usize,
    /// Tiling the readings were generated from.
    pub tiling: Arc<CachedTiling>,
}

/// Drives tiling, generation and upload for one micro-area at a time.
pub struct MetadataAssembler {
    cache: Arc<LocationCache>,
    store: Arc<dyn BlobStore>,
}

impl MetadataAssembler {
    pub fn new(cache: Arc<LocationCache>, store: Arc<dyn BlobStore>) -> Self {
        Self { cache, store }
    }

    pub fn cache(&self) -> &LocationCache {
        &self.cache
    }

    /// Generate one reading per cell of the micro-area's tiling.
    ///
    /// `bbox` must be `[min_long, min_lat, max_long, max_lat]`. A cell whose
    /// reading fails with [`SatError::MeasurementGeneration`] is logged and
    /// skipped, so the output can hold fewer readings than there are cells.
    /// Any other error aborts the build.
    pub async fn build<S: ReadingSource + ?Sized>(
        &self,
        bbox: &[f64],
        microarea_id: &str,
        macroarea_id: &str,
        source: &mut S,
    ) -> SatResult<BuildOutput> {
        let bbox = BoundingBox::from_slice(bbox)?;
        let tiling = self.cache.get_or_compute(microarea_id, &bbox).await?;

        let total = tiling.cells.len();
        let mut readings = Vec::with_capacity(total);
        let mut skipped = 0;

        for (i, cell) in tiling.cells.iter().enumerate() {
            match source.reading(cell, microarea_id) {
                Ok(reading) => readings.push(reading),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    skipped += 1;
                    warn!(
                        microarea_id,
                        cell = i + 1,
                        total,
                        error = %e,
                        "Failed to generate pixel, skipping"
                    );
                }
            }
        }

        info!(
            microarea_id,
            macroarea_id,
            readings = readings.len(),
            skipped,
            "Built satellite metadata"
        );

        Ok(BuildOutput {
            metadata: SatelliteMetadata {
                satellite_data: readings,
            },
            n_cols: tiling.n_cols(),
            n_rows: tiling.n_rows(),
            skipped,
            tiling,
        })
    }

    /// Stamp `metadata`, upload the image and return the payload as JSON.
    pub async fn assemble_payload(
        &self,
        image_bytes: Bytes,
        metadata: SatelliteMetadata,
        macroarea_id: &str,
        microarea_id: &str,
    ) -> SatResult<String> {
        let payload = self
            .assemble(image_bytes, metadata, macroarea_id, microarea_id, Utc::now())
            .await?;
        Self::serialize(&payload)
    }

    /// Stamp and upload with an explicit timestamp.
    pub async fn assemble(
        &self,
        image_bytes: Bytes,
        metadata: SatelliteMetadata,
        macroarea_id: &str,
        microarea_id: &str,
        now: DateTime<Utc>,
    ) -> SatResult<ImagePayload> {
        check_image_bytes(&image_bytes)?;

        let timestamp = format_timestamp(&now);
        info!(size = image_bytes.len(), "Saving image to storage");

        let image_pointer = save_image(
            self.store.as_ref(),
            image_bytes,
            &timestamp,
            macroarea_id,
            microarea_id,
        )
        .await?;

        Ok(ImagePayload {
            image_pointer,
            metadata: PayloadMetadata {
                satellite_data: metadata.satellite_data,
                timestamp,
                microarea_id: microarea_id.to_string(),
                macroarea_id: macroarea_id.to_string(),
            },
        })
    }

    /// Untyped variant of [`assemble_payload`](Self::assemble_payload).
    ///
    /// `metadata` must be a JSON object; the timestamp and area ids are
    /// written into it, replacing any existing values.
    pub async fn assemble_payload_value(
        &self,
        image_bytes: Bytes,
        metadata: serde_json::Value,
        macroarea_id: &str,
        microarea_id: &str,
    ) -> SatResult<String> {
        let serde_json::Value::Object(mut map) = metadata else {
            return Err(SatError::InvalidPayload(
                "metadata must be a JSON object".to_string(),
            ));
        };
        check_image_bytes(&image_bytes)?;

        let timestamp = format_timestamp(&Utc::now());
        map.insert("timestamp".to_string(), timestamp.clone().into());
        map.insert("microarea_id".to_string(), microarea_id.into());
        map.insert("macroarea_id".to_string(), macroarea_id.into());

        let image_pointer = save_image(
            self.store.as_ref(),
            image_bytes,
            &timestamp,
            macroarea_id,
            microarea_id,
        )
        .await?;

        let payload = serde_json::json!({
            "image_pointer": image_pointer,
            "metadata": map,
        });
        Self::serialize(&payload)
    }

    fn serialize<T: serde::Serialize>(payload: &T) -> SatResult<String> {
        let start = Instant::now();
        let json = serde_json::to_string(payload)?;
        info!(
            payload_size = json.len(),
            elapsed_secs = start.elapsed().as_secs_f64(),
            "Serialization complete"
        );
        Ok(json)
    }
}

fn check_image_bytes(image_bytes: &Bytes) -> SatResult<()> {
    if image_bytes.is_empty() {
        return Err(SatError::InvalidPayload(
            "image_bytes must be a non-empty byte sequence".to_string(),
        ));
    }
    Ok(())
}
