//! Raster reader backed by the `image` crate.
//!
//! Any format the `image` crate is built with (PNG, JPEG, TIFF, PGM) is
//! accepted. Color inputs are collapsed to luma so that every image reaches
//! the pipeline as a single intensity channel.

use tracing::debug;

use crate::image_pipeline::common::error::{FeatureError, Result};
use crate::image_pipeline::raster::reader::RasterReader;
use crate::image_pipeline::raster::types::Raster;

pub struct ImageCrateReader;

impl RasterReader for ImageCrateReader {
    /// Decodes an encoded image held in memory into a grayscale [`Raster`].
    ///
    /// # Errors
    ///
    /// * `FeatureError::DecodeError` - the bytes are not a decodable image
    /// * `FeatureError::InvalidDimensions` - the image has no pixels
    fn read_raster(&self, data: &[u8]) -> Result<Raster> {
        debug!("Decoding line image, {} bytes", data.len());

        let decoded = image::load_from_memory(data)
            .map_err(|e| FeatureError::DecodeError(e.to_string()))?;

        debug!(
            "Decoded image: {}x{} ({:?})",
            decoded.width(),
            decoded.height(),
            decoded.color()
        );

        Raster::from_gray_image(&decoded.to_luma8())
    }
}
