//! Line image feature pipeline module
//!
//! This module turns scanned handwriting line images into feature matrices,
//! with separate modules for raster loading, the individual transforms,
//! matrix emission and the orchestrating pipeline.

pub mod common;
pub mod config;
pub mod conversions;
pub mod matrix;
pub mod raster;
pub mod scp;
pub mod timing;
pub mod transforms;

pub use common::{
    FeatureError,
    Result,
};

pub use config::{
    FeatureConfig,
    FeatureConfigBuilder,
};

pub use raster::{
    ImageCrateReader,
    Raster,
    RasterReader,
};

pub use matrix::{
    FeatureMatrix,
    KaldiTextWriter,
    MatrixWriter,
};

pub use transforms::{
    DegenerateContrastPolicy,
    VerticalMode,
};

pub use scp::{
    ImageEntry,
    is_training_dir,
    list_path,
    parse_image_list,
    read_image_list,
};

pub use timing::{
    PipelineTimings,
    StepTiming,
    Timer,
};

pub use conversions::{
    AUGMENTED_VARIANTS,
    LineFeaturePipeline,
};
