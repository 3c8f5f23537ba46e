//! Test data generators for cells, readings and rasters.
//!
//! These generators create predictable, verifiable patterns that can be
//! used across the test suite.

use sat_common::{Bands, CellCentroid, Label, SensorReading};

/// Creates a row-major grid of cells with the given cells polluted.
///
/// Centroids are placed at `(row + 0.5, col + 0.5)` so each cell's position
/// reveals its index.
///
/// # Example
///
/// ```
/// use test_utils::labeled_cells;
///
/// let cells = labeled_cells(2, 3, &[(1, 2)]);
/// assert_eq!(cells.len(), 6);
/// assert!(cells[5].label.is_polluted());
/// assert_eq!(cells[5].lat, 1.5);
/// assert_eq!(cells[5].long, 2.5);
/// ```
pub fn labeled_cells(n_rows: usize, n_cols: usize, polluted: &[(usize, usize)]) -> Vec<CellCentroid> {
    let mut cells = Vec::with_capacity(n_rows * n_cols);
    for row in 0..n_rows {
        for col in 0..n_cols {
            let label = if polluted.contains(&(row, col)) {
                Label::Polluted
            } else {
                Label::Clean
            };
            cells.push(CellCentroid {
                label,
                lat: row as f64 + 0.5,
                long: col as f64 + 0.5,
            });
        }
    }
    cells
}

/// Creates a reading with every band set to `value`.
pub fn uniform_reading(lat: f64, long: f64, microarea_id: &str, value: f64) -> SensorReading {
    SensorReading {
        latitude: lat,
        longitude: long,
        microarea_id: microarea_id.to_string(),
        bands: Bands {
            b2: value,
            b3: value,
            b4: value,
            b8: value,
            b8a: value,
            b11: value,
            b12: value,
        },
    }
}

/// Creates interleaved RGB bytes with a horizontal red and vertical green ramp.
///
/// Returns `width * height * 3` bytes in row-major order.
pub fn create_rgb_gradient(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            data.push((x * 255 / width.max(1)) as u8);
            data.push((y * 255 / height.max(1)) as u8);
            data.push(128);
        }
    }
    data
}
