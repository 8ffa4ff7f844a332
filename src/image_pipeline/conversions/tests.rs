use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::image_pipeline::common::error::{FeatureError, Result};
use crate::image_pipeline::config::FeatureConfig;
use crate::image_pipeline::conversions::LineFeaturePipeline;
use crate::image_pipeline::matrix::{FeatureMatrix, KaldiTextWriter, MatrixWriter};
use crate::image_pipeline::raster::{BLACK, Raster, RasterReader, WHITE};
use crate::image_pipeline::scp::ImageEntry;
use crate::image_pipeline::transforms::DegenerateContrastPolicy;

struct MockReader {
    should_fail: bool,
    mock_data: Option<Raster>,
}

impl RasterReader for MockReader {
    fn read_raster(&self, _data: &[u8]) -> Result<Raster> {
        if self.should_fail {
            return Err(FeatureError::DecodeError("Mock decode error".to_string()));
        }
        Ok(self.mock_data.clone().unwrap_or_else(handwriting))
    }
}

struct MockWriter {
    should_fail: bool,
    written: Arc<Mutex<Vec<(String, FeatureMatrix)>>>,
}

impl MatrixWriter for MockWriter {
    fn write_matrix(&self, key: &str, matrix: &FeatureMatrix, _output: &mut dyn Write) -> Result<()> {
        if self.should_fail {
            return Err(FeatureError::OutputWriteError("Mock write error".to_string()));
        }
        self.written.lock().unwrap().push((key.to_string(), matrix.clone()));
        Ok(())
    }
}

/// A 30x120 line with a few leaning strokes on light gray paper.
fn handwriting() -> Raster {
    Raster::from_fn(120, 30, |r, c| {
        let x = c as i64 - (r as i64) / 2;
        if (5..25).contains(&r) && x.rem_euclid(15) < 3 { 30.0 } else { 235.0 }
    })
    .unwrap()
}

fn pipeline(
    reader: MockReader,
    config: FeatureConfig,
) -> (LineFeaturePipeline<MockReader, MockWriter>, Arc<Mutex<Vec<(String, FeatureMatrix)>>>) {
    let written = Arc::new(Mutex::new(Vec::new()));
    let writer = MockWriter { should_fail: false, written: written.clone() };
    (LineFeaturePipeline::with_custom(reader, writer, config).unwrap(), written)
}

fn ok_reader() -> MockReader {
    MockReader { should_fail: false, mock_data: None }
}

#[test]
fn test_config_builder() {
    let config = FeatureConfig::builder()
        .target_height(32)
        .padding_percent(10)
        .augment(true)
        .vertical_shift(6)
        .horizontal_shear_max(30)
        .percentiles(0.1, 0.3)
        .degenerate_contrast(DegenerateContrastPolicy::Fail)
        .seed(9)
        .max_dimension(None)
        .build();

    assert_eq!(config.target_height, 32);
    assert_eq!(config.padding_percent, 10);
    assert!(config.augment);
    assert_eq!(config.vertical_shift, 6);
    assert_eq!(config.horizontal_shear_max, 30);
    assert_eq!(config.low_percentile, 0.1);
    assert_eq!(config.high_percentile, 0.3);
    assert_eq!(config.degenerate_contrast, DegenerateContrastPolicy::Fail);
    assert_eq!(config.seed, 9);
    assert!(!config.scale_only);
    assert_eq!(config.max_dimension, None);
    assert_eq!(config.feature_dim(), 38);
}

#[test]
fn test_invalid_config_is_rejected() {
    for config in [
        FeatureConfig::builder().target_height(0).build(),
        FeatureConfig::builder().percentiles(0.5, 0.2).build(),
        FeatureConfig::builder().percentiles(0.05, 1.5).build(),
        FeatureConfig::builder().horizontal_shear_max(90).build(),
    ] {
        let writer = MockWriter { should_fail: false, written: Arc::default() };
        let result = LineFeaturePipeline::with_custom(ok_reader(), writer, config);
        assert!(matches!(result, Err(FeatureError::InvalidInput(_))));
    }
}

#[test]
fn test_plain_run_emits_one_matrix() {
    let (mut pipeline, written) = pipeline(ok_reader(), FeatureConfig::default());

    let count = pipeline.convert("a01-000u-00", b"fake image", &mut Vec::new()).unwrap();

    assert_eq!(count, 1);
    let written = written.lock().unwrap();
    let (key, matrix) = &written[0];
    assert_eq!(key, "a01-000u-00");
    assert_eq!(matrix.cols(), 40 + 10);
    // 120 columns scaled by 40/30 plus 8 columns of padding on each side,
    // widened further by the deslanting shear
    assert!(matrix.rows() >= 160 + 16);
    assert!(matrix.iter_rows().flatten().all(|&v| (0.0..=1.0).contains(&v)));
}

#[test]
fn test_augmentation_emits_three_variants_in_order() {
    let config = FeatureConfig::builder().augment(true).build();
    let (mut pipeline, written) = pipeline(ok_reader(), config);

    let count = pipeline.convert("line", b"fake image", &mut Vec::new()).unwrap();

    assert_eq!(count, 3);
    let keys: Vec<String> = written.lock().unwrap().iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(keys, vec!["line_shear1", "line_shear2", "line_shear3"]);
    for (_, matrix) in written.lock().unwrap().iter() {
        assert_eq!(matrix.cols(), 50);
    }
}

#[test]
fn test_same_seed_same_output() {
    let config = FeatureConfig::builder().augment(true).seed(42).build();
    let (mut first, first_written) = pipeline(ok_reader(), config.clone());
    let (mut second, second_written) = pipeline(ok_reader(), config);

    for id in ["a", "b"] {
        first.convert(id, b"", &mut Vec::new()).unwrap();
        second.convert(id, b"", &mut Vec::new()).unwrap();
    }

    assert_eq!(*first_written.lock().unwrap(), *second_written.lock().unwrap());
}

#[test]
fn test_scale_only_skips_normalization() {
    let config = FeatureConfig::builder().scale_only(true).build();
    let (mut pipeline, written) = pipeline(ok_reader(), config);

    pipeline.convert("x", b"", &mut Vec::new()).unwrap();

    let written = written.lock().unwrap();
    let matrix = &written[0].1;
    assert_eq!(matrix.cols(), 40);
    assert_eq!(matrix.rows(), 160 + 2 * 8);
    // untouched paper stays at its scanned gray level
    assert!(matrix.iter_rows().flatten().any(|&v| v > 0.9 && v < 1.0));
}

#[test]
fn test_all_white_line_exercises_degenerate_policy() {
    let blank = Raster::filled(100, 20, WHITE).unwrap();

    let reader = MockReader { should_fail: false, mock_data: Some(blank.clone()) };
    let (mut pipeline, written) = pipeline(reader, FeatureConfig::default());
    pipeline.convert("blank", b"", &mut Vec::new()).unwrap();
    let written = written.lock().unwrap();
    let matrix = &written[0].1;
    assert_eq!(matrix.rows(), 220);
    assert_eq!(matrix.cols(), 50);

    let config = FeatureConfig::builder()
        .degenerate_contrast(DegenerateContrastPolicy::Fail)
        .build();
    let reader = MockReader { should_fail: false, mock_data: Some(blank) };
    let (mut strict, strict_written) = self::pipeline(reader, config);
    let result = strict.convert("blank", b"", &mut Vec::new());
    assert!(matches!(result, Err(FeatureError::DegenerateContrast(_))));
    assert!(strict_written.lock().unwrap().is_empty());
}

#[test]
fn test_reader_failure() {
    let reader = MockReader { should_fail: true, mock_data: None };
    let (mut pipeline, written) = pipeline(reader, FeatureConfig::default());

    let result = pipeline.convert("x", b"fake", &mut Vec::new());

    assert!(matches!(result.unwrap_err(), FeatureError::DecodeError(_)));
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_writer_failure() {
    let writer = MockWriter { should_fail: true, written: Arc::default() };
    let mut pipeline =
        LineFeaturePipeline::with_custom(ok_reader(), writer, FeatureConfig::default()).unwrap();

    let result = pipeline.convert("x", b"fake", &mut Vec::new());

    assert!(matches!(result.unwrap_err(), FeatureError::OutputWriteError(_)));
}

#[test]
fn test_dimension_validation_failure() {
    let reader = MockReader {
        should_fail: false,
        mock_data: Some(Raster::filled(600, 20, BLACK).unwrap()),
    };
    let config = FeatureConfig::builder().max_dimension(Some(500)).build();
    let (mut pipeline, _) = pipeline(reader, config);

    let result = pipeline.convert("x", b"", &mut Vec::new());

    assert!(matches!(result.unwrap_err(), FeatureError::InvalidDimensions(600, 20)));
}

#[test]
fn test_dimension_validation_disabled() {
    let reader = MockReader {
        should_fail: false,
        mock_data: Some(Raster::filled(600, 20, BLACK).unwrap()),
    };
    let config = FeatureConfig::builder()
        .max_dimension(Some(500))
        .validate_dimensions(false)
        .scale_only(true)
        .build();
    let (mut pipeline, _) = pipeline(reader, config);

    assert!(pipeline.convert("x", b"", &mut Vec::new()).is_ok());
}

#[test]
fn test_missing_file_stops_the_list() {
    let (mut pipeline, written) = pipeline(ok_reader(), FeatureConfig::default());
    let entries = vec![ImageEntry {
        id: "gone".to_string(),
        path: "/nonexistent/line.png".into(),
    }];

    let result = pipeline.convert_list(&entries, &mut Vec::new());

    assert!(matches!(result.unwrap_err(), FeatureError::InputReadError(_)));
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_timings_cover_every_stage() {
    let config = FeatureConfig::builder().augment(true).build();
    let mut pipeline =
        LineFeaturePipeline::with_custom(ok_reader(), KaldiTextWriter, config).unwrap();
    let mut output = Vec::new();

    let timings = pipeline.convert_with_timings("t", b"", &mut output).unwrap();

    for stage in ["decode", "scale", "contrast", "slant", "shear", "vertical_shift", "emit", "write"] {
        assert!(timings.get_step(stage).is_some(), "missing {}", stage);
    }
    let text = String::from_utf8(output).unwrap();
    assert_eq!(text.matches(" ]\n").count(), 3);
    assert!(text.starts_with("t_shear1 [ "));
}

#[test]
fn test_set_config_reseeds() {
    let config = FeatureConfig::builder().augment(true).seed(5).build();
    let (mut pipeline, written) = pipeline(ok_reader(), config.clone());

    pipeline.convert("a", b"", &mut Vec::new()).unwrap();
    pipeline.set_config(config).unwrap();
    pipeline.convert("a", b"", &mut Vec::new()).unwrap();

    let written = written.lock().unwrap();
    assert_eq!(written[0..3], written[3..6]);
    assert!(pipeline.set_config(FeatureConfig::builder().target_height(0).build()).is_err());
}
