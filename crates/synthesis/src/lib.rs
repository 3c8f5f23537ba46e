//! Synthetic water-quality metadata generation.
//!
//! Pipeline, leaf first:
//! - [`tiler`]: split a bounding box into area-bounded cells and label them
//! - [`location_cache`]: memoize tilings per micro-area
//! - [`measurement`]: label-conditioned random band values per cell
//! - [`assembler`]: build the sampled-pixel metadata and the stored payload

pub mod assembler;
pub mod location_cache;
pub mod measurement;
pub mod tiler;

pub use assembler::{BuildOutput, MetadataAssembler};
pub use location_cache::{CachedTiling, LocationCache, LocationCacheStats};
pub use measurement::{BandRange, ReadingSource, SyntheticMeasurementGenerator};
pub use tiler::{zone_label, GridTiler, Tiling, DEFAULT_MAX_AREA_KM2, KM_PER_DEG_LAT, MAX_CELLS};
