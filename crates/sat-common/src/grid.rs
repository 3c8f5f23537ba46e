//! Regular lat/long grid laid over a bounding box.

use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;
use crate::label::Label;

/// Dimensions and step sizes of a grid tiling a bounding box.
///
/// Row 0 is the southernmost row, column 0 the westernmost column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of columns (longitude direction)
    pub n_cols: usize,
    /// Number of rows (latitude direction)
    pub n_rows: usize,
    /// Cell width in degrees of longitude
    pub long_step: f64,
    /// Cell height in degrees of latitude
    pub lat_step: f64,
    /// West edge of the grid
    pub origin_long: f64,
    /// South edge of the grid
    pub origin_lat: f64,
}

impl GridSpec {
    /// Derive steps for an `n_cols x n_rows` grid over `bbox`.
    ///
    /// Zero dimensions are clamped to one.
    pub fn new(bbox: &BoundingBox, n_cols: usize, n_rows: usize) -> Self {
        let n_cols = n_cols.max(1);
        let n_rows = n_rows.max(1);
        Self {
            n_cols,
            n_rows,
            long_step: bbox.width_deg() / n_cols as f64,
            lat_step: bbox.height_deg() / n_rows as f64,
            origin_long: bbox.min_long,
            origin_lat: bbox.min_lat,
        }
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.n_cols * self.n_rows
    }

    /// Always false: a grid has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bounds of cell `(row, col)` as a bounding box.
    pub fn cell_bounds(&self, row: usize, col: usize) -> Option<BoundingBox> {
        if row >= self.n_rows || col >= self.n_cols {
            return None;
        }

        let min_long = self.origin_long + col as f64 * self.long_step;
        let min_lat = self.origin_lat + row as f64 * self.lat_step;

        Some(BoundingBox {
            min_long,
            min_lat,
            max_long: min_long + self.long_step,
            max_lat: min_lat + self.lat_step,
        })
    }

    /// Centroid `(lat, long)` of cell `(row, col)`.
    pub fn centroid(&self, row: usize, col: usize) -> Option<(f64, f64)> {
        let b = self.cell_bounds(row, col)?;
        Some((
            (b.min_lat + b.max_lat) / 2.0,
            (b.min_long + b.max_long) / 2.0,
        ))
    }
}

/// A labeled cell centroid, as produced by tiling and stored in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellCentroid {
    pub label: Label,
    pub lat: f64,
    pub long: f64,
}
