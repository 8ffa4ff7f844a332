//! Converts the line images listed in `<dir>/images.scp` into a text feature
//! stream, one matrix per line (three when augmenting training data).

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use line_features_rs::image_pipeline::{
    DegenerateContrastPolicy, FeatureConfig, LineFeaturePipeline, VerticalMode, list_path,
    read_image_list,
};
use line_features_rs::logger::{self, info};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ShiftMode {
    Mid,
    Top,
    Bottom,
}

impl From<ShiftMode> for VerticalMode {
    fn from(mode: ShiftMode) -> Self {
        match mode {
            ShiftMode::Mid => VerticalMode::Mid,
            ShiftMode::Top => VerticalMode::Top,
            ShiftMode::Bottom => VerticalMode::Bottom,
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about = "Generates line image feature matrices")]
struct Args {
    /// Directory holding images.scp
    dir: PathBuf,

    /// Read images.<JOB>.scp instead of images.scp
    #[arg(long)]
    job: Option<String>,

    /// Where to write the feature stream, `-` for stdout
    #[arg(long, default_value = "-")]
    out_ark: String,

    /// Height every image is scaled to
    #[arg(long, default_value_t = 40)]
    feat_dim: usize,

    /// Left/right padding as a percentage of the scaled width
    #[arg(long, default_value_t = 5)]
    padding: u32,

    /// Emit sheared variants (only honoured for training directories)
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    augment: bool,

    /// Total rows of vertical padding per column
    #[arg(long, default_value_t = 10)]
    vertical_shift: usize,

    /// How vertical padding is split between top and bottom
    #[arg(long, value_enum, default_value_t = ShiftMode::Mid)]
    vertical_mode: ShiftMode,

    /// Maximum synthetic horizontal shear, in degrees
    #[arg(long, default_value_t = 45)]
    horizontal_shear: u32,

    /// Fraction of pixels stretched to black
    #[arg(long, default_value_t = 0.05)]
    low_percentile: f64,

    /// Fraction of pixels at which stretching saturates to white
    #[arg(long, default_value_t = 0.20)]
    high_percentile: f64,

    /// Seed for jitter noise and augmentation angles
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Only scale and pad, without contrast, deslanting or jitter
    #[arg(long)]
    scale_only: bool,

    /// Fail on lines whose contrast thresholds coincide instead of passing them through
    #[arg(long)]
    fail_on_degenerate_contrast: bool,

    /// Log per-stage timings when done
    #[arg(long)]
    timings: bool,
}

fn main() -> Result<()> {
    logger::init();
    let args = Args::parse();

    let config = FeatureConfig::builder()
        .target_height(args.feat_dim)
        .padding_percent(args.padding)
        .augment(args.augment)
        .vertical_shift(args.vertical_shift)
        .vertical_mode(args.vertical_mode.into())
        .horizontal_shear_max(args.horizontal_shear)
        .percentiles(args.low_percentile, args.high_percentile)
        .degenerate_contrast(if args.fail_on_degenerate_contrast {
            DegenerateContrastPolicy::Fail
        } else {
            DegenerateContrastPolicy::PassThrough
        })
        .seed(args.seed)
        .scale_only(args.scale_only)
        .build()
        .for_data_dir(&args.dir);
    let mut pipeline = LineFeaturePipeline::new(config).context("Invalid configuration")?;

    info!("Feature pipeline initialized");
    info!("Feature dimension: {}", pipeline.config().feature_dim());
    info!(
        "Augmentation: {}",
        if pipeline.config().augment { "enabled" } else { "disabled" }
    );

    let scp = list_path(&args.dir, args.job.as_deref());
    let entries = read_image_list(&scp)
        .with_context(|| format!("Failed to load image list {}", scp.display()))?;
    info!("Loaded {} records from {}", entries.len(), scp.display());

    let mut output: Box<dyn Write> = if args.out_ark == "-" {
        Box::new(BufWriter::new(io::stdout().lock()))
    } else {
        let file = File::create(&args.out_ark)
            .with_context(|| format!("Failed to create {}", args.out_ark))?;
        Box::new(BufWriter::new(file))
    };

    let (written, timings) = pipeline
        .convert_list_with_timings(&entries, &mut *output)
        .context("Feature extraction failed")?;
    output.flush().context("Failed to flush feature stream")?;

    info!("Wrote {} matrices", written);
    if args.timings {
        timings.log_summary();
    }

    Ok(())
}
