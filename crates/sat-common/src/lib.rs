//! Common types and utilities shared across the water-quality producer crates.

pub mod bbox;
pub mod error;
pub mod grid;
pub mod label;
pub mod payload;
pub mod reading;
pub mod time;

pub use bbox::BoundingBox;
pub use error::{SatError, SatResult};
pub use grid::{CellCentroid, GridSpec};
pub use label::Label;
pub use payload::{ImagePayload, PayloadMetadata, SatelliteMetadata};
pub use reading::{round_to, Band, Bands, SensorReading};
pub use time::{format_timestamp, TIMESTAMP_FORMAT};
