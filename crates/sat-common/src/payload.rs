//! The persisted unit: an image pointer plus its metadata envelope.

use serde::{Deserialize, Serialize};

use crate::reading::SensorReading;

/// Sampled pixels for one micro-area, before stamping.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SatelliteMetadata {
    pub satellite_data: Vec<SensorReading>,
}

/// Metadata stamped with a timestamp and the area identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadMetadata {
    pub satellite_data: Vec<SensorReading>,
    pub timestamp: String,
    pub microarea_id: String,
    pub macroarea_id: String,
}

/// Storage key of the compressed image and the metadata describing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub image_pointer: String,
    pub metadata: PayloadMetadata,
}

impl ImagePayload {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}
