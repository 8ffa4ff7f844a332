use std::io::Write;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, instrument, warn};

use crate::image_pipeline::{
    common::error::{FeatureError, Result},
    config::FeatureConfig,
    matrix::{FeatureMatrix, KaldiTextWriter, MatrixWriter},
    raster::{ImageCrateReader, Raster, RasterReader},
    scp::ImageEntry,
    timing::{PipelineTimings, Timer},
    transforms::{
        estimate_slant, normalize_contrast, scale_to_height, shear_horizontal, vertical_shift,
    },
};

/// Number of sheared variants emitted per line when augmenting.
pub const AUGMENTED_VARIANTS: usize = 3;

/// Turns line images into feature matrices.
///
/// The generator behind jitter noise and augmentation angles is seeded once
/// from the configuration when the pipeline is built and advanced record by
/// record, so a given list and seed always produce the same stream.
pub struct LineFeaturePipeline<R: RasterReader, W: MatrixWriter> {
    reader: R,
    writer: W,
    config: FeatureConfig,
    rng: StdRng,
}

impl LineFeaturePipeline<ImageCrateReader, KaldiTextWriter> {
    pub fn new(config: FeatureConfig) -> Result<Self> {
        Self::with_custom(ImageCrateReader, KaldiTextWriter, config)
    }
}

impl<R: RasterReader, W: MatrixWriter> LineFeaturePipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: FeatureConfig) -> Result<Self> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self {
            reader,
            writer,
            config,
            rng,
        })
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(FeatureError::InvalidDimensions(width, height));
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!("Image dimensions {}x{} exceed maximum {}", width, height, max);
                return Err(FeatureError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    /// Runs every transform on a decoded line and returns the keyed matrices
    /// to emit: one for a plain run, [`AUGMENTED_VARIANTS`] when augmenting.
    pub fn extract(&mut self, id: &str, raster: &Raster) -> Result<Vec<(String, FeatureMatrix)>> {
        self.extract_timed(id, raster, &mut PipelineTimings::new())
    }

    fn extract_timed(
        &mut self,
        id: &str,
        raster: &Raster,
        timings: &mut PipelineTimings,
    ) -> Result<Vec<(String, FeatureMatrix)>> {
        let config = &self.config;

        let timer = Timer::start("scale");
        let scaled = {
            let _span = tracing::info_span!("scale", target_height = config.target_height).entered();
            scale_to_height(raster, config.target_height, config.padding_percent)?
        };
        timer.record(timings);

        if config.scale_only {
            let timer = Timer::start("emit");
            let matrix = FeatureMatrix::from_raster(&scaled)?;
            timer.record(timings);
            return Ok(vec![(id.to_string(), matrix)]);
        }

        let timer = Timer::start("contrast");
        let contrasted = {
            let _span = tracing::info_span!("contrast").entered();
            normalize_contrast(
                &scaled,
                config.low_percentile,
                config.high_percentile,
                config.degenerate_contrast,
            )?
        };
        timer.record(timings);

        let timer = Timer::start("slant");
        let slant = {
            let _span = tracing::info_span!("slant").entered();
            estimate_slant(&contrasted)
        };
        timer.record(timings);

        let timer = Timer::start("shear");
        let deslanted = shear_horizontal(&contrasted, slant as f64)?;
        timer.record(timings);

        let variants: Vec<(String, f64)> = if config.augment {
            let max = config.horizontal_shear_max as i32;
            let angles = [
                0,
                self.rng.random_range(0..=max),
                self.rng.random_range(-max..=0),
            ];
            angles
                .iter()
                .enumerate()
                .map(|(i, &angle)| (format!("{}_shear{}", id, i + 1), angle as f64))
                .collect()
        } else {
            vec![(id.to_string(), 0.0)]
        };

        let mut blocks = Vec::with_capacity(variants.len());
        for (key, angle) in variants {
            let timer = Timer::start("shear");
            let sheared = {
                let _span = tracing::info_span!("shear", angle).entered();
                shear_horizontal(&deslanted, angle)?
            };
            timer.record(timings);

            let timer = Timer::start("vertical_shift");
            let padded = vertical_shift(
                &sheared,
                self.config.vertical_shift,
                self.config.vertical_mode,
                &mut self.rng,
            )?;
            timer.record(timings);

            let timer = Timer::start("emit");
            blocks.push((key, FeatureMatrix::from_raster(&padded)?));
            timer.record(timings);
        }

        info!(id, slant, blocks = blocks.len(), "Extracted features");
        Ok(blocks)
    }

    /// Decodes one encoded image and writes its matrices to `output`.
    /// Returns the number of matrices written.
    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn convert(&mut self, id: &str, input_data: &[u8], output: &mut dyn Write) -> Result<usize> {
        let mut timings = PipelineTimings::new();
        self.convert_timed(id, input_data, output, &mut timings)
    }

    pub fn convert_with_timings(
        &mut self,
        id: &str,
        input_data: &[u8],
        output: &mut dyn Write,
    ) -> Result<PipelineTimings> {
        let mut timings = PipelineTimings::new();
        self.convert_timed(id, input_data, output, &mut timings)?;
        Ok(timings)
    }

    fn convert_timed(
        &mut self,
        id: &str,
        input_data: &[u8],
        output: &mut dyn Write,
        timings: &mut PipelineTimings,
    ) -> Result<usize> {
        let timer = Timer::start("decode");
        let raster = {
            let _span = tracing::info_span!("decode").entered();
            self.reader.read_raster(input_data)?
        };
        timer.record(timings);

        self.validate_dimensions(raster.width(), raster.height())?;

        // every block is built before any is written, so a failing record
        // leaves nothing behind in the stream
        let blocks = self.extract_timed(id, &raster, timings)?;

        let timer = Timer::start("write");
        for (key, matrix) in &blocks {
            self.writer.write_matrix(key, matrix, output)?;
        }
        timer.record(timings);

        Ok(blocks.len())
    }

    #[instrument(skip(self, input_path, output))]
    pub fn convert_file<P: AsRef<Path>>(
        &mut self,
        id: &str,
        input_path: P,
        output: &mut dyn Write,
    ) -> Result<usize> {
        let mut timings = PipelineTimings::new();
        self.convert_file_timed(id, input_path.as_ref(), output, &mut timings)
    }

    fn convert_file_timed(
        &mut self,
        id: &str,
        input_path: &Path,
        output: &mut dyn Write,
        timings: &mut PipelineTimings,
    ) -> Result<usize> {
        info!(id, input = %input_path.display(), "Processing line image");

        let timer = Timer::start("read_input_file");
        let input_data = std::fs::read(input_path).map_err(|e| {
            FeatureError::InputReadError(format!("{}: {}", input_path.display(), e))
        })?;
        timer.record(timings);

        self.convert_timed(id, &input_data, output, timings)
    }

    /// Processes `entries` in order, stopping at the first failure.
    /// Returns the number of matrices written.
    pub fn convert_list(&mut self, entries: &[ImageEntry], output: &mut dyn Write) -> Result<usize> {
        let (written, _) = self.convert_list_with_timings(entries, output)?;
        Ok(written)
    }

    pub fn convert_list_with_timings(
        &mut self,
        entries: &[ImageEntry],
        output: &mut dyn Write,
    ) -> Result<(usize, PipelineTimings)> {
        let mut timings = PipelineTimings::new();
        let mut written = 0;
        for entry in entries {
            written += self.convert_file_timed(&entry.id, &entry.path, output, &mut timings)?;
        }
        info!(
            records = entries.len(),
            matrices = written,
            "Feature extraction complete in {:.3}ms",
            timings.total_duration().as_secs_f64() * 1000.0
        );
        Ok((written, timings))
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Replaces the configuration and reseeds the generator from it.
    pub fn set_config(&mut self, config: FeatureConfig) -> Result<()> {
        config.validate()?;
        self.rng = StdRng::seed_from_u64(config.seed);
        self.config = config;
        Ok(())
    }
}
