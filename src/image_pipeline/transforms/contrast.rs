//! Percentile-based contrast stretching.

use tracing::{debug, warn};

use crate::image_pipeline::common::error::{FeatureError, Result};
use crate::image_pipeline::raster::{BLACK, Raster, WHITE};

/// What to do when the low and high percentile intensities are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegenerateContrastPolicy {
    /// Clip pixels outside the threshold and leave the rest unchanged.
    #[default]
    PassThrough,
    /// Fail with `FeatureError::DegenerateContrast`.
    Fail,
}

/// Intensities found at the low and high percentile positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastThresholds {
    pub low: f32,
    pub high: f32,
}

impl ContrastThresholds {
    pub fn is_degenerate(&self) -> bool {
        self.high == self.low
    }
}

fn check_fraction(name: &str, value: f64) -> Result<()> {
    if !(0.0..1.0).contains(&value) {
        return Err(FeatureError::InvalidInput(format!(
            "{} percentile must lie in [0, 1), got {}",
            name, value
        )));
    }
    Ok(())
}

/// Sorts every pixel and picks the values at `floor(fraction * N)`.
///
/// `low_pct` and `high_pct` are fractions of the pixel count, not of the
/// intensity range.
pub fn percentile_thresholds(
    raster: &Raster,
    low_pct: f64,
    high_pct: f64,
) -> Result<ContrastThresholds> {
    check_fraction("low", low_pct)?;
    check_fraction("high", high_pct)?;
    if low_pct > high_pct {
        return Err(FeatureError::InvalidInput(format!(
            "low percentile {} exceeds high percentile {}",
            low_pct, high_pct
        )));
    }

    let mut sorted = raster.data().to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let low_index = ((low_pct * n as f64).floor() as usize).min(n - 1);
    let high_index = ((high_pct * n as f64).floor() as usize).min(n - 1);

    Ok(ContrastThresholds {
        low: sorted[low_index],
        high: sorted[high_index],
    })
}

/// Stretches intensities so that the low percentile maps to black and the
/// high percentile to white. Pixels beyond either threshold are clipped.
pub fn normalize_contrast(
    raster: &Raster,
    low_pct: f64,
    high_pct: f64,
    policy: DegenerateContrastPolicy,
) -> Result<Raster> {
    let thresholds = percentile_thresholds(raster, low_pct, high_pct)?;
    let ContrastThresholds { low, high } = thresholds;
    debug!(low, high, "Contrast thresholds");

    if thresholds.is_degenerate() {
        match policy {
            DegenerateContrastPolicy::Fail => return Err(FeatureError::DegenerateContrast(low)),
            DegenerateContrastPolicy::PassThrough => {
                warn!(threshold = low, "Contrast thresholds coincide, passing pixels through");
                return Ok(raster.map(|v| {
                    if v > high {
                        WHITE
                    } else if v < low {
                        BLACK
                    } else {
                        v
                    }
                }));
            }
        }
    }

    let span = high - low;
    Ok(raster.map(|v| {
        if v > high {
            WHITE
        } else if v < low {
            BLACK
        } else {
            ((v - low) * WHITE / span).clamp(BLACK, WHITE)
        }
    }))
}
