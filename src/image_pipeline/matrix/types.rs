//! Feature matrix types

use crate::image_pipeline::common::error::{FeatureError, Result};
use crate::image_pipeline::raster::{Raster, WHITE};

/// A non-empty, rectangular matrix of features in `[0, 1]`.
///
/// Rows run along the sequence axis (the line's width) and columns are the
/// per-frame feature dimension (the line's height).
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl FeatureMatrix {
    /// Builds a matrix from explicit rows, rejecting empty or ragged input.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = check_shape(&rows)?;
        let data = rows.iter().flatten().copied().collect();
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Transposes `raster` and scales intensities from `0..=255` to `[0, 1]`.
    pub fn from_raster(raster: &Raster) -> Result<Self> {
        let rows = (0..raster.width())
            .map(|x| {
                (0..raster.height())
                    .map(|y| raster.get(y, x) as f64 / WHITE as f64)
                    .collect()
            })
            .collect();
        Self::from_rows(rows)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, index: usize) -> &[f64] {
        let start = index * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.cols)
    }
}

/// Column count shared by every row of `rows`.
fn check_shape(rows: &[Vec<f64>]) -> Result<usize> {
    let cols = match rows.first() {
        Some(first) if !first.is_empty() => first.len(),
        _ => return Err(FeatureError::EmptyMatrix),
    };
    for (index, row) in rows.iter().enumerate() {
        if row.len() != cols {
            return Err(FeatureError::RaggedMatrix {
                row: index,
                expected: cols,
                found: row.len(),
            });
        }
    }
    Ok(cols)
}
