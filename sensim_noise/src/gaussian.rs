//! Additive Gaussian noise with optional bias, drift and quantization

use crate::model::{model_rng, NoiseModel};
use crate::params::{NoiseParams, NoiseType};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use sensim_core::error::{SensimError, SensimResult};
use std::any::Any;
use std::fmt;

/// Gaussian sensor noise
///
/// Each reading becomes `value + bias + N(mean, stddev)`, optionally rounded
/// to a multiple of `precision`. The bias is drawn once on load from
/// `N(bias_mean, bias_stddev)`; with a dynamic bias configured it then drifts
/// as a first-order Gauss-Markov process over simulated time.
pub struct GaussianNoiseModel {
    params: NoiseParams,
    bias: f64,
    /// Simulated seconds accumulated since load
    sim_time: f64,
    /// Time of the last bias update, `Some` only with dynamic bias enabled
    last_update_time: Option<f64>,
    rng: ChaCha8Rng,
}

impl GaussianNoiseModel {
    /// Create a model and load `params` into it
    pub fn new(params: &NoiseParams) -> SensimResult<Self> {
        let mut model = Self {
            params: NoiseParams::gaussian(0.0, 0.0),
            bias: 0.0,
            sim_time: 0.0,
            last_update_time: None,
            rng: model_rng(params.seed),
        };
        model.load(params)?;
        Ok(model)
    }

    pub fn mean(&self) -> f64 {
        self.params.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.params.stddev
    }

    /// Current bias, including any drift
    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn precision(&self) -> f64 {
        self.params.precision
    }

    pub fn is_quantized(&self) -> bool {
        self.params.is_quantized()
    }

    pub fn dynamic_bias_std_dev(&self) -> f64 {
        self.params.dynamic_bias_stddev
    }

    pub fn dynamic_bias_correlation_time(&self) -> f64 {
        self.params.dynamic_bias_correlation_time
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    /// Advance simulated time and let the bias drift accordingly
    pub(crate) fn advance_time(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.sim_time += dt;
        }

        let Some(last) = self.last_update_time else {
            return;
        };
        let elapsed = self.sim_time - last;
        if elapsed <= 0.0 {
            return;
        }

        // Exact discretization of the Ornstein-Uhlenbeck process, whose
        // stationary deviation is dynamic_bias_stddev.
        let tau = self.params.dynamic_bias_correlation_time;
        let decay = (-elapsed / tau).exp();
        let diffusion = (-(-2.0 * elapsed / tau).exp_m1()).sqrt();
        let kick = gaussian_sample(&mut self.rng, 0.0, self.params.dynamic_bias_stddev);
        self.bias = self.bias * decay + kick * diffusion;
        self.last_update_time = Some(self.sim_time);
    }

    /// Noise one sample at the current instant
    pub(crate) fn sample(&mut self, value: f64) -> f64 {
        let noise = gaussian_sample(&mut self.rng, self.params.mean, self.params.stddev);
        let output = value + self.bias + noise;

        if self.params.is_quantized() {
            let precision = self.params.precision;
            (output / precision).round() * precision
        } else {
            output
        }
    }
}

/// Draw from `N(mean, std_dev)`, exactly `mean` when `std_dev` is zero
fn gaussian_sample<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    if std_dev == 0.0 {
        return mean;
    }
    match Normal::new(mean, std_dev) {
        Ok(normal) => normal.sample(rng),
        Err(_) => mean,
    }
}

impl NoiseModel for GaussianNoiseModel {
    fn noise_type(&self) -> NoiseType {
        if self.params.is_quantized() {
            NoiseType::GaussianQuantized
        } else {
            NoiseType::Gaussian
        }
    }

    fn load(&mut self, params: &NoiseParams) -> SensimResult<()> {
        if !matches!(params.noise_type, NoiseType::Gaussian | NoiseType::GaussianQuantized) {
            return Err(SensimError::invalid_parameters(format!(
                "gaussian model cannot load '{}' noise parameters",
                params.noise_type
            )));
        }
        params.validate()?;

        if params.precision > 0.0 && !params.is_quantized() {
            log::warn!(
                "Noise precision {} ignored because quantization is disabled",
                params.precision
            );
        }

        if let Some(seed) = params.seed {
            self.rng = model_rng(Some(seed));
        }
        self.params = params.clone();
        self.bias = gaussian_sample(&mut self.rng, params.bias_mean, params.bias_stddev);
        self.sim_time = 0.0;
        self.last_update_time = params.has_dynamic_bias().then_some(0.0);

        log::debug!("Loaded {}", self.describe_state());
        Ok(())
    }

    fn apply(&mut self, value: f64, dt: f64) -> f64 {
        self.advance_time(dt);
        self.sample(value)
    }

    fn apply_buffer(&mut self, values: &mut [f64], dt: f64) {
        self.advance_time(dt);
        for value in values.iter_mut() {
            *value = self.sample(*value);
        }
    }

    fn describe_state(&self) -> String {
        format!(
            "Gaussian noise, mean[{}], std_dev[{}], bias[{}], precision[{}], quantized[{}], \
             dynamic bias std_dev[{}], dynamic bias correlation time[{}]",
            self.params.mean,
            self.params.stddev,
            self.bias,
            self.params.precision,
            self.params.is_quantized(),
            self.params.dynamic_bias_stddev,
            self.params.dynamic_bias_correlation_time,
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Display for GaussianNoiseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe_state())
    }
}

impl fmt::Debug for GaussianNoiseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GaussianNoiseModel")
            .field("params", &self.params)
            .field("bias", &self.bias)
            .field("sim_time", &self.sim_time)
            .field("last_update_time", &self.last_update_time)
            .finish_non_exhaustive()
    }
}
