//! Raster transforms
//!
//! Each transform is a pure function from an input raster to a new one.

pub mod contrast;
pub mod moments;
pub mod scale;
pub mod shear;
pub mod slant;
pub mod vertical;

pub use contrast::{ContrastThresholds, DegenerateContrastPolicy, normalize_contrast, percentile_thresholds};
pub use moments::{central_moment, centroid, geometric_moment, moment_normalize};
pub use scale::{horizontal_padding, scale_to_height, scaled_width};
pub use shear::shear_horizontal;
pub use slant::{estimate_slant, select_slant};
pub use vertical::{VerticalMode, sample_normal, split_budget, vertical_shift};
