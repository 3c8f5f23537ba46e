//! Simulated multispectral readings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel-2 style spectral bands carried in each reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    B2,
    B3,
    B4,
    B8,
    B8A,
    B11,
    B12,
}

impl Band {
    /// All bands in payload order.
    pub const ALL: [Band; 7] = [
        Band::B2,
        Band::B3,
        Band::B4,
        Band::B8,
        Band::B8A,
        Band::B11,
        Band::B12,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Band::B2 => "B2",
            Band::B3 => "B3",
            Band::B4 => "B4",
            Band::B8 => "B8",
            Band::B8A => "B8A",
            Band::B11 => "B11",
            Band::B12 => "B12",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reflectance values per band.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bands {
    #[serde(rename = "B2")]
    pub b2: f64,
    #[serde(rename = "B3")]
    pub b3: f64,
    #[serde(rename = "B4")]
    pub b4: f64,
    #[serde(rename = "B8")]
    pub b8: f64,
    #[serde(rename = "B8A")]
    pub b8a: f64,
    #[serde(rename = "B11")]
    pub b11: f64,
    #[serde(rename = "B12")]
    pub b12: f64,
}

impl Bands {
    pub fn get(&self, band: Band) -> f64 {
        match band {
            Band::B2 => self.b2,
            Band::B3 => self.b3,
            Band::B4 => self.b4,
            Band::B8 => self.b8,
            Band::B8A => self.b8a,
            Band::B11 => self.b11,
            Band::B12 => self.b12,
        }
    }

    pub fn set(&mut self, band: Band, value: f64) {
        match band {
            Band::B2 => self.b2 = value,
            Band::B3 => self.b3 = value,
            Band::B4 => self.b4 = value,
            Band::B8 => self.b8 = value,
            Band::B8A => self.b8a = value,
            Band::B11 => self.b11 = value,
            Band::B12 => self.b12 = value,
        }
    }
}

/// One sampled pixel: a cell centroid plus its band values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub latitude: f64,
    pub longitude: f64,
    pub microarea_id: String,
    pub bands: Bands,
}

/// Round `value` to `digits` decimal places (half away from zero).
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}
