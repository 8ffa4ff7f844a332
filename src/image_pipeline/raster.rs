//! Raster loading module
//!
//! This module provides the in-memory intensity grid and format-agnostic
//! decoding of line images into it.

mod reader;
mod image_reader;
pub mod types;

pub use reader::RasterReader;
pub use image_reader::ImageCrateReader;
pub use types::{Raster, BLACK, WHITE};
