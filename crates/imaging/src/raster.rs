//! RGB raster with shape checked at construction.

use sat_common::{SatError, SatResult};

/// Interleaved 8-bit RGB image, row-major, `height x width x 3`.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbRaster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RgbRaster {
    /// Wrap interleaved RGB bytes, checking `len == width * height * 3`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> SatResult<Self> {
        check_dims(width, height)?;
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(SatError::ImageValidation(format!(
                "Input image must be (H, W, 3): {} bytes for {}x{} (expected {})",
                data.len(),
                height,
                width,
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A raster filled with one color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> SatResult<Self> {
        check_dims(width, height)?;
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build from floating point channel values, which must lie in [0, 255].
    ///
    /// Values are truncated to `u8` like a plain numeric cast.
    pub fn from_f32(width: u32, height: u32, values: &[f32]) -> SatResult<Self> {
        if let Some(bad) = values
            .iter()
            .find(|v| !v.is_finite() || **v < 0.0 || **v > 255.0)
        {
            return Err(SatError::ImageValidation(format!(
                "Image values must be in range [0, 255], found {}",
                bad
            )));
        }
        let data = values.iter().map(|v| *v as u8).collect();
        Self::new(width, height, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Shape as `(H, W, 3)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, 3)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        self.data[i..i + 3].copy_from_slice(&rgb);
    }
}

fn check_dims(width: u32, height: u32) -> SatResult<()> {
    if width == 0 || height == 0 {
        return Err(SatError::ImageValidation(format!(
            "Image dimensions must be non-zero, got {}x{}",
            height, width
        )));
    }
    Ok(())
}
