//! Geographic bounding box in degrees.

use serde::{Deserialize, Serialize};

use crate::error::{SatError, SatResult};

/// A lat/long bounding box, all coordinates in degrees.
///
/// Construct through [`BoundingBox::new`] or one of the parsers so the
/// `max > min` invariant holds; the fields stay public for cheap reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_long: f64,
    pub min_lat: f64,
    pub max_long: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Create a validated bounding box from corner coordinates.
    pub fn new(min_long: f64, min_lat: f64, max_long: f64, max_lat: f64) -> SatResult<Self> {
        let bbox = Self {
            min_long,
            min_lat,
            max_long,
            max_lat,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    /// Build from a `[min_long, min_lat, max_long, max_lat]` slice.
    ///
    /// Anything other than exactly four components is rejected.
    pub fn from_slice(values: &[f64]) -> SatResult<Self> {
        match values {
            [min_long, min_lat, max_long, max_lat] => {
                Self::new(*min_long, *min_lat, *max_long, *max_lat)
            }
            _ => Err(SatError::InvalidBoundingBox(format!(
                "expected 4 coordinates [min_long, min_lat, max_long, max_lat], got {}",
                values.len()
            ))),
        }
    }

    /// Parse a comma-separated `"min_long,min_lat,max_long,max_lat"` string.
    pub fn from_csv(s: &str) -> SatResult<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(SatError::InvalidBoundingBox(format!(
                "'{}': expected 'min_long,min_lat,max_long,max_lat'",
                s
            )));
        }

        let values = parts
            .iter()
            .map(|p| {
                p.parse::<f64>().map_err(|_| {
                    SatError::InvalidBoundingBox(format!("'{}' is not a number", p))
                })
            })
            .collect::<SatResult<Vec<f64>>>()?;

        Self::from_slice(&values)
    }

    /// Check the box is finite, non-degenerate and within latitude range.
    pub fn validate(&self) -> SatResult<()> {
        let coords = [self.min_long, self.min_lat, self.max_long, self.max_lat];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(SatError::InvalidBoundingBox(format!(
                "non-finite coordinate in {:?}",
                coords
            )));
        }
        if self.max_long <= self.min_long {
            return Err(SatError::InvalidBoundingBox(format!(
                "max_long ({}) must be greater than min_long ({})",
                self.max_long, self.min_long
            )));
        }
        if self.max_lat <= self.min_lat {
            return Err(SatError::InvalidBoundingBox(format!(
                "max_lat ({}) must be greater than min_lat ({})",
                self.max_lat, self.min_lat
            )));
        }
        if self.min_lat < -90.0 || self.max_lat > 90.0 {
            return Err(SatError::InvalidBoundingBox(format!(
                "latitude span [{}, {}] outside [-90, 90]",
                self.min_lat, self.max_lat
            )));
        }
        Ok(())
    }

    /// Width in degrees of longitude.
    pub fn width_deg(&self) -> f64 {
        self.max_long - self.min_long
    }

    /// Height in degrees of latitude.
    pub fn height_deg(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Mean latitude, used to scale longitude degrees to kilometers.
    pub fn mean_lat(&self) -> f64 {
        (self.min_lat + self.max_lat) / 2.0
    }

    /// Corner coordinates as `[min_long, min_lat, max_long, max_lat]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_long, self.min_lat, self.max_long, self.max_lat]
    }
}

impl TryFrom<[f64; 4]> for BoundingBox {
    type Error = SatError;

    fn try_from(value: [f64; 4]) -> SatResult<Self> {
        Self::from_slice(&value)
    }
}
