//! Height normalization: aspect-preserving resize to a fixed height followed
//! by symmetric white padding on the left and right.

use image::imageops::{self, FilterType};
use tracing::debug;

use crate::image_pipeline::common::error::{FeatureError, Result};
use crate::image_pipeline::raster::{Raster, WHITE};

/// Horizontal padding never drops below this many columns per side.
pub const MIN_PADDING_X: usize = 5;

/// Width after scaling a `width`x`height` raster to `target_height` rows.
pub fn scaled_width(width: usize, height: usize, target_height: usize) -> Result<usize> {
    if height == 0 || target_height == 0 {
        return Err(FeatureError::InvalidInput(format!(
            "cannot scale height {} to {}",
            height, target_height
        )));
    }
    let scale = target_height as f64 / height as f64;
    let new_width = (scale * width as f64).round() as usize;
    if new_width == 0 {
        return Err(FeatureError::InvalidInput(format!(
            "{}x{} image collapses to zero width at height {}",
            width, height, target_height
        )));
    }
    Ok(new_width)
}

/// Columns of white added on each side of a line `width` pixels wide.
pub fn horizontal_padding(width: usize, padding_percent: u32) -> usize {
    let padding = (padding_percent as f64 / 100.0 * width as f64).floor() as usize;
    padding.max(MIN_PADDING_X)
}

/// Resizes `raster` to `target_height` rows keeping its aspect ratio, then
/// pads both sides with `horizontal_padding` white columns.
///
/// Resampling is bilinear on the 8-bit quantization of the input, so the
/// output stays within the input's intensity range.
pub fn scale_to_height(
    raster: &Raster,
    target_height: usize,
    padding_percent: u32,
) -> Result<Raster> {
    let new_width = scaled_width(raster.width(), raster.height(), target_height)?;

    let resized = imageops::resize(
        &raster.to_gray_image(),
        new_width as u32,
        target_height as u32,
        FilterType::Triangle,
    );
    let scaled = Raster::from_gray_image(&resized)?;

    let padding_x = horizontal_padding(new_width, padding_percent);
    debug!(
        from_width = raster.width(),
        from_height = raster.height(),
        new_width,
        padding_x,
        "Scaled line image"
    );

    let margin = Raster::filled(padding_x, target_height, WHITE)?;
    margin.hconcat(&scaled)?.hconcat(&margin)
}
