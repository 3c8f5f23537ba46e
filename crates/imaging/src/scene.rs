//! Synthetic true-color scene for a labeled grid.

use rand::Rng;

use sat_common::{CellCentroid, Label, SatError, SatResult};

use crate::raster::RgbRaster;

/// Base color of open clean water.
const CLEAN_WATER_RGB: [u8; 3] = [28, 72, 138];

/// Base color of turbid, algae-laden water.
const POLLUTED_WATER_RGB: [u8; 3] = [104, 118, 46];

/// Maximum per-channel noise added to each pixel.
const NOISE_AMPLITUDE: i16 = 12;

fn base_color(label: Label) -> [u8; 3] {
    match label {
        Label::Clean => CLEAN_WATER_RGB,
        Label::Polluted => POLLUTED_WATER_RGB,
    }
}

/// Paint each cell as a `pixels_per_cell` square block.
///
/// `cells` must be in row-major order with row 0 at the south edge, as
/// tiling produces them. The image is north-up, so grid row 0 lands at the
/// bottom of the raster.
pub fn render_label_raster<R: Rng + ?Sized>(
    cells: &[CellCentroid],
    n_cols: usize,
    n_rows: usize,
    pixels_per_cell: u32,
    rng: &mut R,
) -> SatResult<RgbRaster> {
    if cells.len() != n_cols * n_rows {
        return Err(SatError::ImageValidation(format!(
            "{} cells do not fill a {}x{} grid",
            cells.len(),
            n_rows,
            n_cols
        )));
    }
    if pixels_per_cell == 0 {
        return Err(SatError::ImageValidation(
            "pixels_per_cell must be at least 1".to_string(),
        ));
    }

    let width = n_cols as u32 * pixels_per_cell;
    let height = n_rows as u32 * pixels_per_cell;
    let mut raster = RgbRaster::filled(width, height, CLEAN_WATER_RGB)?;

    for (index, cell) in cells.iter().enumerate() {
        let row = index / n_cols;
        let col = index % n_cols;
        let top = (n_rows - 1 - row) as u32 * pixels_per_cell;
        let left = col as u32 * pixels_per_cell;
        let base = base_color(cell.label);

        for dy in 0..pixels_per_cell {
            for dx in 0..pixels_per_cell {
                let mut rgb = base;
                for channel in rgb.iter_mut() {
                    let noise = rng.gen_range(-NOISE_AMPLITUDE..=NOISE_AMPLITUDE);
                    *channel = (*channel as i16 + noise).clamp(0, 255) as u8;
                }
                raster.put_pixel(left + dx, top + dy, rgb);
            }
        }
    }

    Ok(raster)
}
