//! Error types for the water-quality producer.

use thiserror::Error;

/// Result type alias using SatError.
pub type SatResult<T> = Result<T, SatError>;

/// Primary error type for tiling, synthesis, encoding and storage.
#[derive(Debug, Error)]
pub enum SatError {
    // === Request Errors ===
    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    // === Synthesis Errors ===
    #[error("Measurement generation failed: {0}")]
    MeasurementGeneration(String),

    // === Imaging Errors ===
    #[error("Image validation failed: {0}")]
    ImageValidation(String),

    #[error("Image encoding failed: {0}")]
    ImageEncoding(String),

    // === Storage Errors ===
    #[error("Storage write failed: {0}")]
    StorageWrite(String),

    // === Infrastructure Errors ===
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SatError {
    /// Whether the error aborts the whole request.
    ///
    /// Only per-cell generation failures are recoverable; the assembler
    /// skips the cell and keeps going.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SatError::MeasurementGeneration(_))
    }
}

impl From<serde_json::Error> for SatError {
    fn from(err: serde_json::Error) -> Self {
        SatError::Serialization(format!("JSON error: {}", err))
    }
}
