//! Feature extraction configuration types

use std::path::Path;

use tracing::warn;

use crate::image_pipeline::common::error::{FeatureError, Result};
use crate::image_pipeline::scp::is_training_dir;
use crate::image_pipeline::transforms::{DegenerateContrastPolicy, VerticalMode};

/// Configuration for line image feature extraction
#[derive(Debug, Clone)]
pub struct FeatureConfig {
    /// Height every line is scaled to; also the feature dimension before
    /// vertical padding
    pub target_height: usize,
    /// Left/right padding as a percentage of the scaled width (at least 5 columns)
    pub padding_percent: u32,
    /// Emit three sheared variants per line instead of one matrix
    pub augment: bool,
    /// Total rows of noise padding added above and below each line
    pub vertical_shift: usize,
    /// How the vertical padding is split between top and bottom
    pub vertical_mode: VerticalMode,
    /// Largest synthetic shear, in degrees, drawn during augmentation
    pub horizontal_shear_max: u32,
    /// Fraction of pixels mapped to black by contrast stretching
    pub low_percentile: f64,
    /// Fraction of pixels at which contrast stretching saturates to white
    pub high_percentile: f64,
    /// Behavior when the two contrast thresholds coincide
    pub degenerate_contrast: DegenerateContrastPolicy,
    /// Seed of the generator driving jitter and augmentation draws
    pub seed: u64,
    /// Only scale and pad; skip contrast, slant, shear and jitter
    pub scale_only: bool,
    /// Whether to validate decoded image dimensions
    pub validate_dimensions: bool,
    /// Largest accepted width or height of a decoded image
    pub max_dimension: Option<usize>,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            target_height: 40,
            padding_percent: 5,
            augment: false,
            vertical_shift: 10,
            vertical_mode: VerticalMode::Mid,
            horizontal_shear_max: 45,
            low_percentile: 0.05,
            high_percentile: 0.20,
            degenerate_contrast: DegenerateContrastPolicy::PassThrough,
            seed: 1,
            scale_only: false,
            validate_dimensions: true,
            max_dimension: Some(50000),
        }
    }
}

impl FeatureConfig {
    pub fn builder() -> FeatureConfigBuilder {
        FeatureConfigBuilder::default()
    }

    /// Number of feature columns every emitted matrix will have.
    pub fn feature_dim(&self) -> usize {
        if self.scale_only {
            self.target_height
        } else {
            self.target_height + self.vertical_shift
        }
    }

    /// Restricts augmentation to training data: `augment` is cleared unless
    /// `dir` is a training directory.
    pub fn for_data_dir(mut self, dir: &Path) -> Self {
        if self.augment && !is_training_dir(dir) {
            warn!(
                dir = %dir.display(),
                "Augmentation is only applied to training data, ignoring it"
            );
            self.augment = false;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_height == 0 {
            return Err(FeatureError::InvalidInput("target height must be positive".to_string()));
        }
        for (name, value) in [("low", self.low_percentile), ("high", self.high_percentile)] {
            if !(0.0..1.0).contains(&value) {
                return Err(FeatureError::InvalidInput(format!(
                    "{} percentile must lie in [0, 1), got {}",
                    name, value
                )));
            }
        }
        if self.low_percentile > self.high_percentile {
            return Err(FeatureError::InvalidInput(format!(
                "low percentile {} exceeds high percentile {}",
                self.low_percentile, self.high_percentile
            )));
        }
        if self.horizontal_shear_max >= 90 {
            return Err(FeatureError::InvalidInput(format!(
                "horizontal shear must stay below 90 degrees, got {}",
                self.horizontal_shear_max
            )));
        }
        Ok(())
    }
}

/// Builder for FeatureConfig
#[derive(Default)]
pub struct FeatureConfigBuilder {
    target_height: Option<usize>,
    padding_percent: Option<u32>,
    augment: Option<bool>,
    vertical_shift: Option<usize>,
    vertical_mode: Option<VerticalMode>,
    horizontal_shear_max: Option<u32>,
    low_percentile: Option<f64>,
    high_percentile: Option<f64>,
    degenerate_contrast: Option<DegenerateContrastPolicy>,
    seed: Option<u64>,
    scale_only: Option<bool>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
}

impl FeatureConfigBuilder {
    pub fn target_height(mut self, height: usize) -> Self {
        self.target_height = Some(height);
        self
    }

    pub fn padding_percent(mut self, percent: u32) -> Self {
        self.padding_percent = Some(percent);
        self
    }

    pub fn augment(mut self, enable: bool) -> Self {
        self.augment = Some(enable);
        self
    }

    pub fn vertical_shift(mut self, rows: usize) -> Self {
        self.vertical_shift = Some(rows);
        self
    }

    pub fn vertical_mode(mut self, mode: VerticalMode) -> Self {
        self.vertical_mode = Some(mode);
        self
    }

    pub fn horizontal_shear_max(mut self, degrees: u32) -> Self {
        self.horizontal_shear_max = Some(degrees);
        self
    }

    pub fn percentiles(mut self, low: f64, high: f64) -> Self {
        self.low_percentile = Some(low);
        self.high_percentile = Some(high);
        self
    }

    pub fn degenerate_contrast(mut self, policy: DegenerateContrastPolicy) -> Self {
        self.degenerate_contrast = Some(policy);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn scale_only(mut self, enable: bool) -> Self {
        self.scale_only = Some(enable);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn build(self) -> FeatureConfig {
        let default = FeatureConfig::default();
        FeatureConfig {
            target_height: self.target_height.unwrap_or(default.target_height),
            padding_percent: self.padding_percent.unwrap_or(default.padding_percent),
            augment: self.augment.unwrap_or(default.augment),
            vertical_shift: self.vertical_shift.unwrap_or(default.vertical_shift),
            vertical_mode: self.vertical_mode.unwrap_or(default.vertical_mode),
            horizontal_shear_max: self.horizontal_shear_max.unwrap_or(default.horizontal_shear_max),
            low_percentile: self.low_percentile.unwrap_or(default.low_percentile),
            high_percentile: self.high_percentile.unwrap_or(default.high_percentile),
            degenerate_contrast: self.degenerate_contrast.unwrap_or(default.degenerate_contrast),
            seed: self.seed.unwrap_or(default.seed),
            scale_only: self.scale_only.unwrap_or(default.scale_only),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
        }
    }
}
