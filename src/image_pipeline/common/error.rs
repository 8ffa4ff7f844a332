use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Malformed list line {line}: {content:?} (expected `<id> <path>`)")]
    MalformedListLine { line: usize, content: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Contrast thresholds coincide at {0}")]
    DegenerateContrast(f32),

    #[error("Matrix is empty")]
    EmptyMatrix,

    #[error("Ragged matrix: row {row} has {found} columns, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FeatureError>;
