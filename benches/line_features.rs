use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use line_features_rs::image_pipeline::{
    FeatureConfig, KaldiTextWriter, LineFeaturePipeline, Raster, RasterReader, Result,
};
use line_features_rs::image_pipeline::transforms::{estimate_slant, normalize_contrast, DegenerateContrastPolicy};

const EMPTY: &[u8] = &[];

/// Serves a synthetic line so the benchmarks measure transforms, not decoding.
struct SyntheticReader {
    raster: Raster,
}

impl RasterReader for SyntheticReader {
    fn read_raster(&self, _data: &[u8]) -> Result<Raster> {
        Ok(self.raster.clone())
    }
}

fn generate_line(width: usize, height: usize) -> Raster {
    Raster::from_fn(width, height, |r, c| {
        let x = c as i64 - r as i64 / 3;
        if x.rem_euclid(11) < 2 && r > height / 5 && r < height * 4 / 5 {
            20.0
        } else {
            240.0
        }
    })
    .unwrap()
}

fn benchmark_line_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_by_size");

    let sizes = vec![
        (400, 60, "400x60"),
        (1200, 100, "1200x100"),
        (2400, 120, "2400x120"),
    ];

    for (width, height, label) in sizes {
        let raster = generate_line(width, height);

        group.bench_with_input(BenchmarkId::from_parameter(label), &raster, |b, raster| {
            let reader = SyntheticReader { raster: raster.clone() };
            let mut pipeline =
                LineFeaturePipeline::with_custom(reader, KaldiTextWriter, FeatureConfig::default())
                    .unwrap();

            b.iter(|| {
                let mut output = Vec::new();
                let _ = pipeline.convert("bench", black_box(EMPTY), &mut output);
            });
        });
    }

    group.finish();
}

fn benchmark_augmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("augmentation");
    let raster = generate_line(1200, 100);

    for (augment, label) in [(false, "plain"), (true, "augmented")] {
        group.bench_function(label, |b| {
            let reader = SyntheticReader { raster: raster.clone() };
            let config = FeatureConfig::builder().augment(augment).build();
            let mut pipeline = LineFeaturePipeline::with_custom(reader, KaldiTextWriter, config).unwrap();

            b.iter(|| {
                let mut output = Vec::new();
                let _ = pipeline.convert("bench", black_box(EMPTY), &mut output);
            });
        });
    }

    group.finish();
}

fn benchmark_slant_estimation(c: &mut Criterion) {
    let mut group = c.benchmark_group("slant_estimation");
    let raster = normalize_contrast(
        &generate_line(700, 40),
        0.05,
        0.20,
        DegenerateContrastPolicy::PassThrough,
    )
    .unwrap();

    group.bench_function("sweep_90_angles", |b| {
        b.iter(|| estimate_slant(black_box(&raster)));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_line_sizes,
    benchmark_augmentation,
    benchmark_slant_estimation
);
criterion_main!(benches);
