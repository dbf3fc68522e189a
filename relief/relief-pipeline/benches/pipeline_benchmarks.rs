//! Benchmarks for the depth-to-mesh pipeline.
//!
//! Run with: cargo bench -p relief-pipeline
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p relief-pipeline -- --save-baseline main
//! 2. After changes: cargo bench -p relief-pipeline -- --baseline main

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use relief_pipeline::{
    DepthEstimator, DepthGrid, ImageGrid, InferenceError, PipelineConfig, ReliefPipeline,
    VertexColor,
};

/// A deterministic ripple depth field, shaped like real model output.
fn ripple_depth(height: usize, width: usize) -> DepthGrid {
    let values = (0..height * width)
        .map(|i| {
            let (row, col) = (i / width, i % width);
            let y = row as f32 / height as f32;
            let x = col as f32 / width as f32;
            ((x * 12.0).sin() + (y * 12.0).cos()) * 0.5
        })
        .collect();
    DepthGrid::from_values(height, width, values).unwrap()
}

struct RippleModel;

impl DepthEstimator for RippleModel {
    fn estimate_depth(&self, image: &ImageGrid) -> Result<DepthGrid, InferenceError> {
        Ok(ripple_depth(image.height(), image.width()))
    }
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for size in [64usize, 256] {
        let pipeline = ReliefPipeline::new(RippleModel, PipelineConfig::default());
        let image = ImageGrid::solid(size, size, VertexColor::WHITE).unwrap();

        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_function(format!("{size}x{size}"), |b| {
            b.iter(|| {
                let artifact = pipeline.generate(black_box(&image)).unwrap();
                black_box(artifact.len())
            });
        });
    }

    group.finish();
}

fn bench_downscaled_generate(c: &mut Criterion) {
    // Above the default threshold the stride-2 policy kicks in; this
    // measures the full large-image path including subsampling.
    let pipeline = ReliefPipeline::new(RippleModel, PipelineConfig::default());
    let image = ImageGrid::solid(1200, 1400, VertexColor::WHITE).unwrap();

    c.bench_function("generate/1400x1200-downscaled", |b| {
        b.iter(|| {
            let artifact = pipeline.generate(black_box(&image)).unwrap();
            black_box(artifact.len())
        });
    });
}

criterion_group!(benches, bench_generate, bench_downscaled_generate);
criterion_main!(benches);
