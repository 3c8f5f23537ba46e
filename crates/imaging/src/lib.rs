//! Imaging for synthetic satellite scenes.
//!
//! - [`raster`]: validated `(H, W, 3)` RGB rasters
//! - [`jpeg`]: JPEG compression with a quality setting
//! - [`scene`]: paints a labeled cell grid into a raster

pub mod jpeg;
pub mod raster;
pub mod scene;

pub use jpeg::{encode_jpeg, DEFAULT_JPEG_QUALITY};
pub use raster::RgbRaster;
pub use scene::render_label_raster;
