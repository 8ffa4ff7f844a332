//! Image moments over ink density and moment-based size normalization.
//!
//! Mass at a pixel is its darkness, `255 - intensity`, so white paper
//! contributes nothing and strokes dominate. `x` is the column index and `y`
//! the row index.

use crate::image_pipeline::common::error::{FeatureError, Result};
use crate::image_pipeline::raster::{Raster, WHITE};

/// Window half-width, in standard deviations, used by [`moment_normalize`].
pub const MOMENT_ALPHA: f64 = 4.0;

#[inline]
fn mass(value: f32) -> f64 {
    (WHITE - value).max(0.0) as f64
}

/// Geometric moment `m_pq = sum x^p y^q mass(x, y)`.
pub fn geometric_moment(raster: &Raster, p: i32, q: i32) -> f64 {
    let mut m = 0.0;
    for y in 0..raster.height() {
        let yq = (y as f64).powi(q);
        for (x, &value) in raster.row(y).iter().enumerate() {
            m += (x as f64).powi(p) * yq * mass(value);
        }
    }
    m
}

/// Center of ink mass as `(x_bar, y_bar)`.
pub fn centroid(raster: &Raster) -> Result<(f64, f64)> {
    let m00 = geometric_moment(raster, 0, 0);
    if m00 == 0.0 {
        return Err(FeatureError::InvalidInput(
            "raster carries no ink, moments are undefined".to_string(),
        ));
    }
    Ok((
        geometric_moment(raster, 1, 0) / m00,
        geometric_moment(raster, 0, 1) / m00,
    ))
}

/// Central moment `mu_pq` taken about the centroid.
pub fn central_moment(raster: &Raster, p: i32, q: i32) -> Result<f64> {
    let (x_bar, y_bar) = centroid(raster)?;
    let mut mu = 0.0;
    for y in 0..raster.height() {
        let dy = (y as f64 - y_bar).powi(q);
        for (x, &value) in raster.row(y).iter().enumerate() {
            mu += (x as f64 - x_bar).powi(p) * dy * mass(value);
        }
    }
    Ok(mu)
}

/// Resamples the ink around its centroid onto a `width`x`height` grid.
///
/// The sampled window spans `alpha * sqrt(mu20 / m00)` columns and
/// `alpha * sqrt(mu02 / m00)` rows, so lines with different stroke spread
/// end up at comparable scale. Samples falling outside the input are white.
pub fn moment_normalize(raster: &Raster, width: usize, height: usize) -> Result<Raster> {
    if width == 0 || height == 0 {
        return Err(FeatureError::InvalidDimensions(width, height));
    }
    let m00 = geometric_moment(raster, 0, 0);
    let (x_bar, y_bar) = centroid(raster)?;
    let sigma_x = MOMENT_ALPHA * (central_moment(raster, 2, 0)? / m00).sqrt();
    let sigma_y = MOMENT_ALPHA * (central_moment(raster, 0, 2)? / m00).sqrt();

    Raster::from_fn(width, height, |row, col| {
        let i = ((col as f64 / width as f64 - 0.5) * sigma_x + x_bar).floor();
        let j = ((row as f64 / height as f64 - 0.5) * sigma_y + y_bar).floor();
        if i < 0.0 || j < 0.0 || i >= raster.width() as f64 || j >= raster.height() as f64 {
            WHITE
        } else {
            raster.get(j as usize, i as usize)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::raster::BLACK;

    fn dots(points: &[(usize, usize)]) -> Raster {
        Raster::from_fn(9, 7, |r, c| {
            if points.contains(&(c, r)) { BLACK } else { WHITE }
        })
        .unwrap()
    }

    #[test]
    fn test_single_dot_centroid() {
        let raster = dots(&[(3, 2)]);
        assert_eq!(geometric_moment(&raster, 0, 0), 255.0);
        assert_eq!(centroid(&raster).unwrap(), (3.0, 2.0));
        assert_eq!(central_moment(&raster, 2, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_spread_moments() {
        let raster = dots(&[(2, 3), (6, 3)]);
        assert_eq!(centroid(&raster).unwrap(), (4.0, 3.0));
        // two unit masses at distance 2 from the centroid
        assert_eq!(central_moment(&raster, 2, 0).unwrap(), 2.0 * 4.0 * 255.0);
        assert_eq!(central_moment(&raster, 0, 2).unwrap(), 0.0);
        assert_eq!(central_moment(&raster, 1, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_blank_raster_has_no_moments() {
        let raster = Raster::filled(5, 5, WHITE).unwrap();
        assert!(matches!(centroid(&raster), Err(FeatureError::InvalidInput(_))));
        assert!(moment_normalize(&raster, 4, 4).is_err());
    }

    #[test]
    fn test_moment_normalize_shape_and_content() {
        let raster = Raster::from_fn(20, 10, |r, c| {
            if (4..6).contains(&r) && (5..15).contains(&c) { BLACK } else { WHITE }
        })
        .unwrap();
        let normalized = moment_normalize(&raster, 16, 8).unwrap();
        assert_eq!(normalized.width(), 16);
        assert_eq!(normalized.height(), 8);
        assert!(normalized.data().iter().any(|&v| v == BLACK));
        assert!(normalized.data().iter().all(|&v| v == BLACK || v == WHITE));
    }
}
