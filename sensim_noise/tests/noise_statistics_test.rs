// Statistical behaviour of the Gaussian models over long runs
use approx::assert_relative_eq;
use sensim_core::rendering::{Image, ImageData, PixelFormat, PostProcessChain};
use sensim_noise::prelude::*;
use std::sync::Arc;

fn mean_and_std(samples: impl Iterator<Item = f64> + Clone) -> (f64, f64) {
    let n = samples.clone().count() as f64;
    let mean = samples.clone().sum::<f64>() / n;
    let variance = samples.map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

#[test]
fn test_biased_noise_statistics() {
    let params = NoiseParams::gaussian(0.05, 0.2)
        .with_bias(0.3, 0.0)
        .with_seed(2024);
    let mut model = NoiseFactory::new_noise_model(&params, SensorKind::Scalar).unwrap();

    let mut readings = vec![1.0; 20_000];
    for reading in readings.iter_mut() {
        *reading = model.apply(*reading, 0.01);
    }

    let (mean, std_dev) = mean_and_std(readings.iter().copied());
    assert_relative_eq!(mean, 1.35, epsilon = 0.01);
    assert_relative_eq!(std_dev, 0.2, epsilon = 0.01);
}

#[test]
fn test_dynamic_bias_decorrelates_over_long_runs() {
    // Correlation between consecutive biases separated by dt is exp(-dt/tau)
    let (dyn_std, tau, dt) = (1.0, 1.0, 0.5);
    let params = NoiseParams::gaussian(0.0, 0.0)
        .with_dynamic_bias(dyn_std, tau)
        .with_seed(77);
    let mut model = GaussianNoiseModel::new(&params).unwrap();

    let biases: Vec<f64> = (0..20_000)
        .map(|_| {
            model.apply(0.0, dt);
            model.bias()
        })
        .collect();

    let (mean, std_dev) = mean_and_std(biases.iter().copied());
    assert_relative_eq!(mean, 0.0, epsilon = 0.1);
    assert_relative_eq!(std_dev, dyn_std, epsilon = 0.05);

    let lag_one = biases
        .windows(2)
        .map(|w| (w[0] - mean) * (w[1] - mean))
        .sum::<f64>()
        / (biases.len() - 1) as f64
        / std_dev.powi(2);
    assert_relative_eq!(lag_one, (-dt / tau).exp(), epsilon = 0.05);
}

#[test]
fn test_image_noise_statistics() {
    let chain = Arc::new(PostProcessChain::new("camera"));
    let params = NoiseParams::gaussian(0.0, 0.02).with_seed(5);
    let mut model = ImageGaussianNoiseModel::new(&params).unwrap();
    model.set_target(chain.clone()).unwrap();

    let mut frame = Image::from_u8(100, 100, PixelFormat::Rgb8, vec![128; 30_000]).unwrap();
    chain.render(&mut frame, 0.033);

    let ImageData::U8(samples) = frame.data() else {
        panic!("8-bit frame expected");
    };
    let (mean, std_dev) = mean_and_std(samples.iter().map(|&s| f64::from(s) / 255.0));
    assert_relative_eq!(mean, 128.0 / 255.0, epsilon = 0.005);
    assert_relative_eq!(std_dev, 0.02, epsilon = 0.003);
}

#[test]
fn test_seeded_runs_reproduce() {
    let params = NoiseParams::gaussian(0.0, 0.1)
        .with_bias(0.0, 0.05)
        .with_precision(0.01)
        .with_seed(99);

    let run = || {
        let mut model = NoiseFactory::new_noise_model(&params, SensorKind::Scalar).unwrap();
        let mut values: Vec<f64> = (0..256u32).map(f64::from).collect();
        model.apply_buffer(&mut values, 0.1);
        values
    };

    assert_eq!(run(), run());
}
