//! # SENSIM Noise
//!
//! Sensor noise models for simulated sensors:
//!
//! - **Gaussian**: additive `N(mean, stddev)` with a sampled bias, optional
//!   drifting bias and optional quantization
//! - **Image Gaussian**: the same model attached to a camera's render target
//! - **Custom**: noise computed by a user callback
//! - **Config**: per-sensor noise settings loaded from YAML, TOML or JSON
//!
//! ## Quick Start
//!
//! ```rust
//! use sensim_noise::prelude::*;
//!
//! let params = NoiseParams::gaussian(0.0, 0.02)
//!     .with_bias(0.01, 0.0)
//!     .with_seed(42);
//! let mut model = NoiseFactory::new_noise_model(&params, SensorKind::Scalar).unwrap();
//!
//! let reading = model.apply(9.81, 0.01);
//! assert!((reading - 9.82).abs() < 0.2);
//! ```

pub mod config;
pub mod custom;
pub mod gaussian;
pub mod image;
pub mod model;
pub mod params;

pub use config::{NoiseConfig, SensorNoiseConfig};
pub use custom::{CustomNoiseCallback, CustomNoiseModel};
pub use gaussian::GaussianNoiseModel;
pub use image::{ImageGaussianNoiseModel, NOISE_PASS_NAME};
pub use model::{NoNoise, NoiseFactory, NoiseModel, SensorKind};
pub use params::{NoiseParams, NoiseType};

/// Commonly used noise types
pub mod prelude {
    pub use crate::config::NoiseConfig;
    pub use crate::custom::CustomNoiseModel;
    pub use crate::gaussian::GaussianNoiseModel;
    pub use crate::image::ImageGaussianNoiseModel;
    pub use crate::model::{NoNoise, NoiseFactory, NoiseModel, SensorKind};
    pub use crate::params::{NoiseParams, NoiseType};
}
