//! Area-bounded grid tiling of a bounding box.
//!
//! Degree spans are converted to kilometers with a flat-earth approximation
//! (111 km per degree, longitude scaled by the cosine of the mean latitude).
//! That is fine for small regions and degrades towards the poles; it is not
//! corrected.

use tracing::debug;

use sat_common::{BoundingBox, CellCentroid, GridSpec, Label, SatError, SatResult};

/// Kilometers per degree of latitude.
pub const KM_PER_DEG_LAT: f64 = 111.0;

/// Default upper bound on a cell's area.
pub const DEFAULT_MAX_AREA_KM2: f64 = 20.0;

/// Largest grid a single tiling may produce.
pub const MAX_CELLS: usize = 1_000_000;

/// Labeled centroids of a tiled bounding box, row-major from the south-west.
#[derive(Debug, Clone, PartialEq)]
pub struct Tiling {
    pub cells: Vec<CellCentroid>,
    pub grid: GridSpec,
}

impl Tiling {
    pub fn n_cols(&self) -> usize {
        self.grid.n_cols
    }

    pub fn n_rows(&self) -> usize {
        self.grid.n_rows
    }
}

/// Label of cell `(row, col)` in an `n_rows x n_cols` grid.
///
/// The polluted zone is the middle third in both directions, using floor
/// division: rows in `[n_rows/3, 2*n_rows/3)` and columns in
/// `[n_cols/3, 2*n_cols/3)`. With a single row (or column) that range is
/// empty and every cell is clean; with two, it is the first row (or column).
pub fn zone_label(row: usize, col: usize, n_rows: usize, n_cols: usize) -> Label {
    let rows = (n_rows / 3)..(2 * n_rows / 3);
    let cols = (n_cols / 3)..(2 * n_cols / 3);

    if rows.contains(&row) && cols.contains(&col) {
        Label::Polluted
    } else {
        Label::Clean
    }
}

/// Stateless tiler; cheap to copy and safe to share across threads.
#[derive(Debug, Clone, Copy)]
pub struct GridTiler {
    max_area_km2: f64,
}

impl Default for GridTiler {
    fn default() -> Self {
        Self {
            max_area_km2: DEFAULT_MAX_AREA_KM2,
        }
    }
}

impl GridTiler {
    /// Tiler targeting cells of at most `max_area_km2`.
    pub fn new(max_area_km2: f64) -> SatResult<Self> {
        if !max_area_km2.is_finite() || max_area_km2 <= 0.0 {
            return Err(SatError::InvalidBoundingBox(format!(
                "max cell area must be a positive number of km², got {}",
                max_area_km2
            )));
        }
        Ok(Self { max_area_km2 })
    }

    pub fn max_area_km2(&self) -> f64 {
        self.max_area_km2
    }

    /// Derive grid dimensions for `bbox`.
    ///
    /// The column/row split follows the box's aspect ratio in kilometers so
    /// cells come out roughly as wide as they are tall.
    pub fn grid_spec(&self, bbox: &BoundingBox) -> SatResult<GridSpec> {
        bbox.validate()?;

        let km_per_deg_long = KM_PER_DEG_LAT * bbox.mean_lat().to_radians().cos();
        let width_km = bbox.width_deg() * km_per_deg_long;
        let height_km = bbox.height_deg() * KM_PER_DEG_LAT;

        if width_km <= 0.0 || height_km <= 0.0 {
            return Err(SatError::InvalidBoundingBox(format!(
                "degenerate extent {:.3} km x {:.3} km",
                width_km, height_km
            )));
        }

        let total_area_km2 = width_km * height_km;
        let target = (total_area_km2 / self.max_area_km2).ceil();
        if !target.is_finite() || target > MAX_CELLS as f64 {
            return Err(SatError::InvalidBoundingBox(format!(
                "{:.1} km² at {} km² per cell exceeds {} cells",
                total_area_km2, self.max_area_km2, MAX_CELLS
            )));
        }
        let num_microareas = (target as usize).max(1);

        let n_cols = ((num_microareas as f64 * (width_km / height_km)).sqrt().ceil() as usize).max(1);
        let n_rows = num_microareas.div_ceil(n_cols).max(1);
        match n_cols.checked_mul(n_rows) {
            Some(cells) if cells <= MAX_CELLS => {}
            _ => {
                return Err(SatError::InvalidBoundingBox(format!(
                    "{}x{} grid exceeds {} cells",
                    n_cols, n_rows, MAX_CELLS
                )))
            }
        }

        debug!(
            width_km,
            height_km,
            total_area_km2,
            num_microareas,
            n_cols,
            n_rows,
            "Derived grid dimensions"
        );

        Ok(GridSpec::new(bbox, n_cols, n_rows))
    }

    /// Tile `bbox` into labeled cell centroids.
    pub fn tile(&self, bbox: &BoundingBox) -> SatResult<Tiling> {
        let grid = self.grid_spec(bbox)?;
        let mut cells = Vec::with_capacity(grid.len());

        for row in 0..grid.n_rows {
            for col in 0..grid.n_cols {
                let (lat, long) = grid.centroid(row, col).ok_or_else(|| {
                    SatError::InvalidBoundingBox(format!(
                        "cell ({}, {}) outside {}x{} grid",
                        row, col, grid.n_rows, grid.n_cols
                    ))
                })?;

                cells.push(CellCentroid {
                    label: zone_label(row, col, grid.n_rows, grid.n_cols),
                    lat,
                    long,
                });
            }
        }

        Ok(Tiling { cells, grid })
    }
}
