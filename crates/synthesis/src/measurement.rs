//! Label-conditioned synthetic band values.
//!
//! Every band is an independent uniform draw from a range picked by the
//! cell's label. B2 and B8A do not depend on the label.
//!
//! | Band | Clean       | Polluted    |
//! |------|-------------|-------------|
//! | B2   | 0.05 - 0.20 | 0.05 - 0.20 |
//! | B3   | 0.10 - 0.20 | 0.15 - 0.25 |
//! | B4   | 0.05 - 0.10 | 0.15 - 0.25 |
//! | B8   | 0.01 - 0.05 | 0.05 - 0.15 |
//! | B8A  | 0.01 - 0.10 | 0.01 - 0.10 |
//! | B11  | 0.05 - 0.10 | 0.10 - 0.20 |
//! | B12  | 0.05 - 0.10 | 0.10 - 0.20 |

use rand::Rng;

use sat_common::{
    round_to, Band, Bands, CellCentroid, Label, SatError, SatResult, SensorReading,
};

/// Decimal places kept for band values.
const BAND_DIGITS: i32 = 3;

/// Decimal places kept for coordinates.
const COORD_DIGITS: i32 = 6;

/// Closed interval a band value is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandRange {
    pub min: f64,
    pub max: f64,
}

impl BandRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range for `band` under `label`.
    pub fn for_band(label: Label, band: Band) -> Self {
        match (band, label) {
            (Band::B2, _) => Self::new(0.05, 0.20),
            (Band::B8A, _) => Self::new(0.01, 0.10),

            (Band::B3, Label::Clean) => Self::new(0.10, 0.20),
            (Band::B3, Label::Polluted) => Self::new(0.15, 0.25),

            (Band::B4, Label::Clean) => Self::new(0.05, 0.10),
            (Band::B4, Label::Polluted) => Self::new(0.15, 0.25),

            (Band::B8, Label::Clean) => Self::new(0.01, 0.05),
            (Band::B8, Label::Polluted) => Self::new(0.05, 0.15),

            (Band::B11 | Band::B12, Label::Clean) => Self::new(0.05, 0.10),
            (Band::B11 | Band::B12, Label::Polluted) => Self::new(0.10, 0.20),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Draw a uniform value from the range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SatResult<f64> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(SatError::MeasurementGeneration(format!(
                "invalid band range [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(rng.gen_range(self.min..=self.max))
    }
}

/// Produces one reading per labeled cell.
///
/// The seam the assembler drives; an error for one cell must not affect
/// the others.
pub trait ReadingSource {
    fn reading(&mut self, cell: &CellCentroid, microarea_id: &str) -> SatResult<SensorReading>;
}

/// Uniform random band values from the label's [`BandRange`]s.
///
/// Randomness comes from the injected generator; seed it for reproducible
/// output.
pub struct SyntheticMeasurementGenerator<R> {
    rng: R,
}

impl<R: Rng> SyntheticMeasurementGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generate a reading for a cell centroid.
    pub fn generate(
        &mut self,
        label: Label,
        lat: f64,
        long: f64,
        microarea_id: &str,
    ) -> SatResult<SensorReading> {
        if !lat.is_finite() || !long.is_finite() {
            return Err(SatError::MeasurementGeneration(format!(
                "non-finite centroid ({}, {})",
                lat, long
            )));
        }

        let mut bands = Bands::default();
        for band in Band::ALL {
            let value = BandRange::for_band(label, band).sample(&mut self.rng)?;
            bands.set(band, round_to(value, BAND_DIGITS));
        }

        Ok(SensorReading {
            latitude: round_to(lat, COORD_DIGITS),
            longitude: round_to(long, COORD_DIGITS),
            microarea_id: microarea_id.to_string(),
            bands,
        })
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> ReadingSource for SyntheticMeasurementGenerator<R> {
    fn reading(&mut self, cell: &CellCentroid, microarea_id: &str) -> SatResult<SensorReading> {
        self.generate(cell.label, cell.lat, cell.long, microarea_id)
    }
}
