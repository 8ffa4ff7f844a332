//! Slant estimation by projection-profile dispersion.
//!
//! Every ink pixel is projected onto the horizontal axis along lines tilted
//! by each candidate angle. The angle whose projection is most concentrated,
//! measured as the standard deviation of a 10-bin histogram of the
//! accumulator, is taken as the dominant stroke slant.

use tracing::debug;

use crate::image_pipeline::raster::Raster;

/// Pixels strictly darker than this count as ink.
pub const INK_THRESHOLD: f32 = 100.0;

/// First candidate angle of the sweep, in degrees.
pub const SWEEP_START_DEGREES: i32 = -45;
/// One past the last candidate angle of the sweep, in degrees.
pub const SWEEP_END_DEGREES: i32 = 45;

const HISTOGRAM_BINS: usize = 10;

/// Projection accumulators for every angle of the sweep, one row per angle.
///
/// Each row is `cols + 2 * rows` wide; a pixel at `(r, c)` lands in bin
/// `c + round(r * tan(alpha)) + rows`.
pub fn projection_profiles(raster: &Raster) -> Vec<Vec<u32>> {
    let rows = raster.height();
    let cols = raster.width();
    let angles: Vec<f64> = (SWEEP_START_DEGREES..SWEEP_END_DEGREES)
        .map(|a| (a as f64).to_radians().tan())
        .collect();

    let mut profiles = vec![vec![0u32; cols + 2 * rows]; angles.len()];
    let mut displacement = vec![0i64; angles.len()];

    for r in 0..rows {
        for (disp, tan) in displacement.iter_mut().zip(&angles) {
            *disp = (r as f64 * tan).round() as i64;
        }
        for (c, &value) in raster.row(r).iter().enumerate() {
            if value >= INK_THRESHOLD {
                continue;
            }
            for (profile, &disp) in profiles.iter_mut().zip(&displacement) {
                let bin = c as i64 + disp + rows as i64;
                profile[bin as usize] += 1;
            }
        }
    }
    profiles
}

/// Counts `values` into equal-width bins spanning `[min, max]`.
///
/// A constant input is spread over `[v - 0.5, v + 0.5]`. The last bin is
/// closed on the right.
pub fn histogram(values: &[u32], bins: usize) -> Vec<u64> {
    let mut counts = vec![0u64; bins];
    let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
        return counts;
    };
    let (first, last) = if min == max {
        (min as f64 - 0.5, max as f64 + 0.5)
    } else {
        (min as f64, max as f64)
    };

    let step = (last - first) / bins as f64;
    let edge = |i: usize| if i == bins { last } else { first + i as f64 * step };
    let norm = bins as f64 / (last - first);

    for &v in values {
        let x = v as f64;
        let mut index = (((x - first) * norm) as usize).min(bins - 1);
        // floating point can put x on the wrong side of an edge
        if index > 0 && x < edge(index) {
            index -= 1;
        } else if index + 1 < bins && x >= edge(index + 1) {
            index += 1;
        }
        counts[index] += 1;
    }
    counts
}

/// Population standard deviation of the histogram of `profile`.
pub fn dispersion(profile: &[u32]) -> f64 {
    let counts = histogram(profile, HISTOGRAM_BINS);
    let n = counts.len() as f64;
    let mean = counts.iter().sum::<u64>() as f64 / n;
    let variance = counts
        .iter()
        .map(|&c| {
            let d = c as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    variance.sqrt()
}

/// Picks the sweep angle with the largest dispersion from `(angle, dispersion)`
/// pairs given in sweep order.
///
/// Among equal dispersions the angle closest to zero wins, and between `-a`
/// and `a` the one visited first. An empty sweep selects 0.
pub fn select_slant(candidates: &[(i32, f64)]) -> (i32, f64) {
    let mut best: Option<(i32, f64)> = None;
    for &(angle, spread) in candidates {
        let better = match best {
            None => true,
            Some((best_angle, best_spread)) => {
                spread > best_spread
                    || (spread == best_spread && angle.abs() < best_angle.abs())
            }
        };
        if better {
            best = Some((angle, spread));
        }
    }
    best.unwrap_or((0, 0.0))
}

/// Returns the shear angle, in degrees, that removes the dominant slant.
///
/// The winner is chosen by [`select_slant`]; the correction is its negation.
pub fn estimate_slant(raster: &Raster) -> i32 {
    let candidates: Vec<(i32, f64)> = (SWEEP_START_DEGREES..SWEEP_END_DEGREES)
        .zip(projection_profiles(raster).iter())
        .map(|(angle, profile)| (angle, dispersion(profile)))
        .collect();

    let (angle, spread) = select_slant(&candidates);
    debug!(slant = angle, dispersion = spread, "Estimated slant");
    -angle
}
