//! Noise parameters as supplied by sensor configuration

use sensim_core::error::{SensimError, SensimResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which noise model a sensor uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseType {
    /// Readings pass through untouched
    #[default]
    None,
    Gaussian,
    /// Gaussian followed by rounding to `precision`
    GaussianQuantized,
    /// User supplied callback
    Custom,
}

impl NoiseType {
    pub fn as_str(self) -> &'static str {
        match self {
            NoiseType::None => "none",
            NoiseType::Gaussian => "gaussian",
            NoiseType::GaussianQuantized => "gaussian_quantized",
            NoiseType::Custom => "custom",
        }
    }
}

impl fmt::Display for NoiseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoiseType {
    type Err = SensimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(NoiseType::None),
            "gaussian" => Ok(NoiseType::Gaussian),
            "gaussian_quantized" => Ok(NoiseType::GaussianQuantized),
            "custom" => Ok(NoiseType::Custom),
            other => Err(SensimError::invalid_parameters(format!(
                "unknown noise type '{}'",
                other
            ))),
        }
    }
}

/// Noise configuration for one sensor
///
/// Missing fields default to zero / disabled, so a config only needs to name
/// what it uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    #[serde(rename = "type")]
    pub noise_type: NoiseType,
    pub mean: f64,
    #[serde(alias = "std_dev")]
    pub stddev: f64,
    pub bias_mean: f64,
    #[serde(alias = "bias_std_dev")]
    pub bias_stddev: f64,
    pub quantized: bool,
    pub precision: f64,
    #[serde(alias = "dynamic_bias_std_dev")]
    pub dynamic_bias_stddev: f64,
    pub dynamic_bias_correlation_time: f64,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            noise_type: NoiseType::None,
            mean: 0.0,
            stddev: 0.0,
            bias_mean: 0.0,
            bias_stddev: 0.0,
            quantized: false,
            precision: 0.0,
            dynamic_bias_stddev: 0.0,
            dynamic_bias_correlation_time: 0.0,
            seed: None,
        }
    }
}

impl NoiseParams {
    /// Gaussian noise `N(mean, stddev)` without bias
    pub fn gaussian(mean: f64, stddev: f64) -> Self {
        Self {
            noise_type: NoiseType::Gaussian,
            mean,
            stddev,
            ..Self::default()
        }
    }

    pub fn custom() -> Self {
        Self {
            noise_type: NoiseType::Custom,
            ..Self::default()
        }
    }

    /// Constant bias drawn once from `N(mean, stddev)`
    pub fn with_bias(mut self, mean: f64, stddev: f64) -> Self {
        self.bias_mean = mean;
        self.bias_stddev = stddev;
        self
    }

    /// Round outputs to the nearest multiple of `precision`
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.quantized = true;
        self.precision = precision;
        self
    }

    /// Let the bias drift with stationary deviation `stddev` and correlation time `tau`
    pub fn with_dynamic_bias(mut self, stddev: f64, tau: f64) -> Self {
        self.dynamic_bias_stddev = stddev;
        self.dynamic_bias_correlation_time = tau;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn is_quantized(&self) -> bool {
        self.quantized || self.noise_type == NoiseType::GaussianQuantized
    }

    pub fn has_dynamic_bias(&self) -> bool {
        self.dynamic_bias_stddev > 0.0
    }

    /// Check the parameters, failing loudly instead of producing wrong data later
    pub fn validate(&self) -> SensimResult<()> {
        let fields = [
            ("mean", self.mean),
            ("stddev", self.stddev),
            ("bias_mean", self.bias_mean),
            ("bias_stddev", self.bias_stddev),
            ("precision", self.precision),
            ("dynamic_bias_stddev", self.dynamic_bias_stddev),
            ("dynamic_bias_correlation_time", self.dynamic_bias_correlation_time),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(SensimError::invalid_parameters(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }

        for (name, value) in [
            ("stddev", self.stddev),
            ("bias_stddev", self.bias_stddev),
            ("dynamic_bias_stddev", self.dynamic_bias_stddev),
        ] {
            if value < 0.0 {
                return Err(SensimError::invalid_parameters(format!(
                    "{} must be >= 0, got {}",
                    name, value
                )));
            }
        }

        if self.is_quantized() && self.precision <= 0.0 {
            return Err(SensimError::invalid_parameters(format!(
                "precision must be > 0 when quantization is enabled, got {}",
                self.precision
            )));
        }

        if self.has_dynamic_bias() && self.dynamic_bias_correlation_time <= 0.0 {
            return Err(SensimError::invalid_parameters(format!(
                "dynamic_bias_correlation_time must be > 0 when dynamic bias is enabled, got {}",
                self.dynamic_bias_correlation_time
            )));
        }

        Ok(())
    }
}
