//! Common utilities module
//!
//! This module contains shared utilities used across the feature pipeline.

pub mod error;

pub use error::{FeatureError, Result};
