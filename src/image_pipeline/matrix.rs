//! Feature matrix module
//!
//! This module turns the final raster into a feature matrix and serializes it.

mod writer;
mod kaldi_text_writer;
pub mod types;

pub use writer::MatrixWriter;
pub use kaldi_text_writer::KaldiTextWriter;
pub use types::FeatureMatrix;
