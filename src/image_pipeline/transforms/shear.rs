//! Horizontal shear used both to remove slant and to synthesize it.

use image::{ImageBuffer, Luma};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::debug;

use crate::image_pipeline::common::error::{FeatureError, Result};
use crate::image_pipeline::raster::{Raster, WHITE};

type LumaF32 = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Shears `raster` horizontally by `degrees`.
///
/// The raster is first widened by `round(|tan| * height)` white columns, on
/// the left for positive angles and on the right for negative ones, so no
/// ink is pushed out of frame. The padded raster is then warped with the
/// affine map `x' = x - y * tan`, `y' = y`, interpolating bilinearly in
/// `f32` and reading white outside the frame.
pub fn shear_horizontal(raster: &Raster, degrees: f64) -> Result<Raster> {
    if !degrees.is_finite() || degrees.abs() >= 90.0 {
        return Err(FeatureError::InvalidInput(format!(
            "shear angle must be finite and within (-90, 90), got {}",
            degrees
        )));
    }
    if degrees == 0.0 {
        return Ok(raster.clone());
    }

    let tan = degrees.to_radians().tan();
    let height = raster.height();
    let padding_x = (tan.abs() * height as f64).round() as usize;

    let padded = if padding_x == 0 {
        raster.clone()
    } else {
        let margin = Raster::filled(padding_x, height, WHITE)?;
        if tan > 0.0 {
            margin.hconcat(raster)?
        } else {
            raster.hconcat(&margin)?
        }
    };

    debug!(degrees, padding_x, width = padded.width(), "Shearing");

    let projection = Projection::from_matrix([
        1.0, -tan as f32, 0.0, //
        0.0, 1.0, 0.0, //
        0.0, 0.0, 1.0,
    ])
    .ok_or_else(|| FeatureError::InvalidInput(format!("shear by {} is not invertible", degrees)))?;

    let input = framed_luma(&padded);
    let mut output = LumaF32::new(padded.width() as u32, height as u32);
    warp_into(&input, &projection, Interpolation::Bilinear, Luma([WHITE]), &mut output);

    Raster::new(padded.width(), height, output.into_raw())
}

/// Copies `raster` into a buffer one pixel wider and taller, the extra row
/// and column white. The bilinear sampler only blends when both neighbours
/// are in bounds, so without them the last row and column would read as
/// background.
fn framed_luma(raster: &Raster) -> LumaF32 {
    let (width, height) = (raster.width(), raster.height());
    LumaF32::from_fn(width as u32 + 1, height as u32 + 1, |x, y| {
        let (col, row) = (x as usize, y as usize);
        if col < width && row < height {
            Luma([raster.get(row, col)])
        } else {
            Luma([WHITE])
        }
    })
}
