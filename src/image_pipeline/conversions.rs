//! Pipeline conversions module
//!
//! This module contains the orchestration that chains the raster transforms
//! from a decoded line image to emitted feature matrices.

mod line_features;

#[cfg(test)]
mod tests;

pub use line_features::{AUGMENTED_VARIANTS, LineFeaturePipeline};
