// Benchmark for noise model throughput
// Run with: cargo bench --bench noise_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sensim_core::rendering::{Image, PixelFormat, PostProcessChain};
use sensim_noise::prelude::*;
use std::sync::Arc;

fn benchmark_scalar_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("gaussian_scalar");

    let configs = [
        ("plain", NoiseParams::gaussian(0.0, 0.01)),
        ("quantized", NoiseParams::gaussian(0.0, 0.01).with_precision(0.001)),
        (
            "dynamic_bias",
            NoiseParams::gaussian(0.0, 0.01).with_dynamic_bias(0.001, 400.0),
        ),
    ];

    for (name, params) in configs.iter() {
        let mut model = GaussianNoiseModel::new(&params.clone().with_seed(1)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(name), name, |b, _| {
            b.iter(|| black_box(model.apply(black_box(9.81), 0.005)));
        });
    }

    group.finish();
}

fn benchmark_buffer_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("gaussian_buffer");

    for len in [360, 1024, 16384].iter() {
        let mut model = GaussianNoiseModel::new(&NoiseParams::gaussian(0.0, 0.02).with_seed(2)).unwrap();
        let mut ranges = vec![10.0; *len];
        group.bench_with_input(BenchmarkId::from_parameter(len), len, |b, _| {
            b.iter(|| {
                model.apply_buffer(black_box(&mut ranges), 0.1);
            });
        });
    }

    group.finish();
}

fn benchmark_image_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("image_noise_pass");

    for (width, height) in [(320u32, 240u32), (640, 480)].iter() {
        let chain = Arc::new(PostProcessChain::new("camera"));
        let mut model =
            ImageGaussianNoiseModel::new(&NoiseParams::gaussian(0.0, 0.007).with_seed(3)).unwrap();
        model.set_target(chain.clone()).unwrap();

        let mut frame = Image::new(*width, *height, PixelFormat::Rgb8).unwrap();
        let label = format!("{}x{}", width, height);
        group.bench_with_input(BenchmarkId::from_parameter(label), &chain, |b, chain| {
            b.iter(|| chain.render(black_box(&mut frame), 0.033));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_scalar_apply,
    benchmark_buffer_apply,
    benchmark_image_pass
);
criterion_main!(benches);
