//! Text matrix writer.
//!
//! Produces the bracketed, line-oriented matrix encoding read by Kaldi-style
//! tools:
//!
//! ```text
//! utt-1 [ 1.0 0.5
//! 0.25 1.0 ]
//! ```

use std::io::Write;

use tracing::debug;

use crate::image_pipeline::common::error::{FeatureError, Result};
use crate::image_pipeline::matrix::types::FeatureMatrix;
use crate::image_pipeline::matrix::writer::MatrixWriter;

pub struct KaldiTextWriter;

/// Shortest round-trip decimal, always carrying a decimal point or exponent.
fn format_value(value: f64) -> String {
    format!("{:?}", value)
}

impl KaldiTextWriter {
    pub fn render(key: &str, matrix: &FeatureMatrix) -> Result<String> {
        if key.is_empty() || key.contains(char::is_whitespace) {
            return Err(FeatureError::InvalidInput(format!(
                "matrix key {:?} must be a single non-empty token",
                key
            )));
        }
        let rows: Vec<String> = matrix
            .iter_rows()
            .map(|row| row.iter().map(|&v| format_value(v)).collect::<Vec<_>>().join(" "))
            .collect();
        Ok(format!("{} [ {} ]\n", key, rows.join("\n")))
    }
}

impl MatrixWriter for KaldiTextWriter {
    fn write_matrix(&self, key: &str, matrix: &FeatureMatrix, output: &mut dyn Write) -> Result<()> {
        debug!(key, rows = matrix.rows(), cols = matrix.cols(), "Writing matrix");
        let text = Self::render(key, matrix)?;
        output
            .write_all(text.as_bytes())
            .map_err(|e| FeatureError::OutputWriteError(format!("{}: {}", key, e)))
    }
}
