//! JPEG compression for RGB rasters.

use image::codecs::jpeg::JpegEncoder;
use image::ColorType;
use std::io::Cursor;
use std::time::Instant;
use tracing::info;

use sat_common::{SatError, SatResult};

use crate::raster::RgbRaster;

/// Quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Compress a raster to JPEG bytes.
///
/// `quality` must lie in 1..=100, higher meaning better quality.
pub fn encode_jpeg(raster: &RgbRaster, quality: u8) -> SatResult<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(SatError::ImageValidation(format!(
            "JPEG quality must be in [1, 100], got {}",
            quality
        )));
    }

    let start = Instant::now();
    info!(shape = ?raster.shape(), quality, "Compressing image");

    let mut jpeg_data = Vec::new();
    let mut cursor = Cursor::new(&mut jpeg_data);
    let mut encoder = JpegEncoder::new_with_quality(&mut cursor, quality);
    encoder
        .encode(
            raster.as_bytes(),
            raster.width(),
            raster.height(),
            ColorType::Rgb8,
        )
        .map_err(|e| SatError::ImageEncoding(format!("Failed to encode JPEG: {}", e)))?;

    info!(
        compressed_size = jpeg_data.len(),
        elapsed_secs = start.elapsed().as_secs_f64(),
        "Compression complete"
    );

    Ok(jpeg_data)
}
