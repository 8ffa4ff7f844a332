use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::matrix::types::FeatureMatrix;

pub trait MatrixWriter {
    fn write_matrix(&self, key: &str, matrix: &FeatureMatrix, output: &mut dyn Write) -> Result<()>;
}
