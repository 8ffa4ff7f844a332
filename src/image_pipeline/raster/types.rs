//! Raster data types

use image::{GrayImage, Luma};

use crate::image_pipeline::common::error::{FeatureError, Result};

/// Intensity of pure white paper.
pub const WHITE: f32 = 255.0;
/// Intensity of pure black ink.
pub const BLACK: f32 = 0.0;

/// A single-channel intensity grid, stored row-major.
///
/// Values live on the 0..=255 scale but are kept as `f32` so that contrast
/// stretching and interpolated shears do not lose precision between stages.
/// A `Raster` is never empty and never ragged; every transform produces a new
/// one instead of mutating its input.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Raster {
    /// Wraps row-major `data`, checking it matches `width * height`.
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FeatureError::InvalidDimensions(width, height));
        }
        if data.len() != width * height {
            return Err(FeatureError::InvalidInput(format!(
                "raster buffer holds {} values, expected {}x{}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self { width, height, data })
    }

    pub fn filled(width: usize, height: usize, value: f32) -> Result<Self> {
        Self::new(width, height, vec![value; width * height])
    }

    /// Builds a raster by evaluating `f(row, col)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f32,
    {
        let mut data = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col));
            }
        }
        Self::new(width, height, data)
    }

    pub fn from_gray_image(image: &GrayImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        let data = image.pixels().map(|p| p.0[0] as f32).collect();
        Self::new(width as usize, height as usize, data)
    }

    /// Quantizes back to 8 bits, rounding and clamping to 0..=255.
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let v = self.get(y as usize, x as usize);
            Luma([v.round().clamp(BLACK, WHITE) as u8])
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.width + col]
    }

    pub fn row(&self, row: usize) -> &[f32] {
        let start = row * self.width;
        &self.data[start..start + self.width]
    }

    pub fn map<F>(&self, f: F) -> Raster
    where
        F: Fn(f32) -> f32,
    {
        Raster {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Places `right` to the right of `self`. Heights must match.
    pub fn hconcat(&self, right: &Raster) -> Result<Raster> {
        if self.height != right.height {
            return Err(FeatureError::InvalidInput(format!(
                "cannot join rasters of height {} and {} side by side",
                self.height, right.height
            )));
        }
        let width = self.width + right.width;
        let mut data = Vec::with_capacity(width * self.height);
        for row in 0..self.height {
            data.extend_from_slice(self.row(row));
            data.extend_from_slice(right.row(row));
        }
        Raster::new(width, self.height, data)
    }

    /// Places `below` underneath `self`. Widths must match.
    pub fn vconcat(&self, below: &Raster) -> Result<Raster> {
        if self.width != below.width {
            return Err(FeatureError::InvalidInput(format!(
                "cannot stack rasters of width {} and {}",
                self.width, below.width
            )));
        }
        let mut data = Vec::with_capacity(self.data.len() + below.data.len());
        data.extend_from_slice(&self.data);
        data.extend_from_slice(&below.data);
        Raster::new(self.width, self.height + below.height, data)
    }
}
