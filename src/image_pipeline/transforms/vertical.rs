//! Vertical placement jitter: near-white noise rows above and below a line.

use std::f64::consts::TAU;
use std::str::FromStr;

use rand::Rng;
use tracing::debug;

use crate::image_pipeline::common::error::{FeatureError, Result};
use crate::image_pipeline::raster::{BLACK, Raster, WHITE};

const NOISE_MEAN: f64 = 2.0;
const NOISE_STDDEV: f64 = 1.0;

/// How the vertical padding budget is divided between top and bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalMode {
    /// Even split, extra row on the bottom.
    #[default]
    Mid,
    /// Top receives between half and all of the budget.
    Top,
    /// Top receives between none and half of the budget.
    Bottom,
}

impl FromStr for VerticalMode {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mid" => Ok(Self::Mid),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            other => Err(FeatureError::InvalidInput(format!(
                "unknown vertical shift mode {:?}",
                other
            ))),
        }
    }
}

/// Splits `total` padding rows into `(top, bottom)`.
pub fn split_budget<R: Rng + ?Sized>(total: usize, mode: VerticalMode, rng: &mut R) -> (usize, usize) {
    let half = total / 2;
    let top = match mode {
        VerticalMode::Mid => half,
        VerticalMode::Top => rng.random_range(half..=total),
        VerticalMode::Bottom => rng.random_range(0..=half),
    };
    (top, total - top)
}

/// Draws from a normal distribution with the Box-Muller transform.
pub fn sample_normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, stddev: f64) -> f64 {
    // 1 - u keeps the logarithm finite
    let u1 = 1.0 - rng.random::<f64>();
    let u2 = rng.random::<f64>();
    mean + stddev * (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

fn noise_rows<R: Rng + ?Sized>(width: usize, rows: usize, rng: &mut R) -> Result<Raster> {
    Raster::from_fn(width, rows, |_, _| {
        let dip = sample_normal(rng, NOISE_MEAN, NOISE_STDDEV).trunc() as f32;
        (WHITE - dip).clamp(BLACK, WHITE)
    })
}

/// Adds `total` rows of near-white noise, split above and below `raster`
/// according to `mode`.
pub fn vertical_shift<R: Rng + ?Sized>(
    raster: &Raster,
    total: usize,
    mode: VerticalMode,
    rng: &mut R,
) -> Result<Raster> {
    let (top, bottom) = split_budget(total, mode, rng);
    debug!(top, bottom, ?mode, "Vertical shift");

    let mut shifted = raster.clone();
    if top > 0 {
        shifted = noise_rows(raster.width(), top, rng)?.vconcat(&shifted)?;
    }
    if bottom > 0 {
        shifted = shifted.vconcat(&noise_rows(raster.width(), bottom, rng)?)?;
    }
    Ok(shifted)
}
