//! Common contract for all noise models, and the factory selecting one

use crate::custom::CustomNoiseModel;
use crate::gaussian::GaussianNoiseModel;
use crate::image::{noise_samples, ImageGaussianNoiseModel};
use crate::params::{NoiseParams, NoiseType};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sensim_core::error::SensimResult;
use sensim_core::rendering::{Image, RenderTarget};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Trait for noise models that can be applied to sensor data
///
/// A model belongs to one sensor and is driven from that sensor's thread;
/// it is `Send` but never shared without external locking.
pub trait NoiseModel: Send {
    fn noise_type(&self) -> NoiseType;

    /// Validate and adopt `params`
    ///
    /// On error the previous configuration stays in place.
    fn load(&mut self, params: &NoiseParams) -> SensimResult<()>;

    /// Apply noise to a single reading
    ///
    /// `dt` is simulated seconds since the previous call; pass `0.0` for
    /// further samples of the same instant.
    fn apply(&mut self, value: f64, dt: f64) -> f64;

    /// Apply noise to every element of `values`, all taken at the same instant
    fn apply_buffer(&mut self, values: &mut [f64], dt: f64) {
        let mut step = dt;
        for value in values.iter_mut() {
            *value = self.apply(*value, step);
            step = 0.0;
        }
    }

    /// Apply noise to every pixel-channel sample of `image`
    ///
    /// 8-bit samples are noised in normalized `[0, 1]` space and clamped;
    /// float samples are noised directly, non-finite ones are left alone.
    fn apply_image(&mut self, image: &mut Image, dt: f64) -> SensimResult<()> {
        let mut step = dt;
        noise_samples(image, |value| {
            let noisy = self.apply(value, step);
            step = 0.0;
            noisy
        });
        Ok(())
    }

    /// Human-readable dump of the current configuration and state
    fn describe_state(&self) -> String;

    /// Attach to a render output; only image models use it
    fn set_target(&mut self, _target: Arc<dyn RenderTarget>) -> SensimResult<()> {
        Ok(())
    }

    /// Release render-target resources; safe to call repeatedly
    fn finalize(&mut self) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl fmt::Display for dyn NoiseModel + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe_state())
    }
}

impl fmt::Debug for dyn NoiseModel + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseModel")
            .field("type", &self.noise_type())
            .field("state", &self.describe_state())
            .finish()
    }
}

/// Kind of sensor a model is created for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// IMU, altimeter, lidar ranges, ... noised sample by sample
    #[default]
    Scalar,
    /// Camera-like sensor noised through its render target
    Camera,
}

/// Builds the model matching a configured noise type
pub struct NoiseFactory;

impl NoiseFactory {
    /// Create and load a model for a sensor
    ///
    /// Gaussian noise on a camera yields an [`ImageGaussianNoiseModel`].
    pub fn new_noise_model(params: &NoiseParams, kind: SensorKind) -> SensimResult<Box<dyn NoiseModel>> {
        params.validate()?;

        let model: Box<dyn NoiseModel> = match (params.noise_type, kind) {
            (NoiseType::None, _) => {
                let mut model = NoNoise;
                model.load(params)?;
                Box::new(model)
            }
            (NoiseType::Gaussian | NoiseType::GaussianQuantized, SensorKind::Camera) => {
                Box::new(ImageGaussianNoiseModel::new(params)?)
            }
            (NoiseType::Gaussian | NoiseType::GaussianQuantized, SensorKind::Scalar) => {
                Box::new(GaussianNoiseModel::new(params)?)
            }
            (NoiseType::Custom, _) => Box::new(CustomNoiseModel::new(params)?),
        };

        log::debug!("Created {} noise model for {:?} sensor", params.noise_type, kind);
        Ok(model)
    }
}

/// Identity model for sensors configured without noise
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNoise;

impl NoiseModel for NoNoise {
    fn noise_type(&self) -> NoiseType {
        NoiseType::None
    }

    fn load(&mut self, params: &NoiseParams) -> SensimResult<()> {
        params.validate()
    }

    fn apply(&mut self, value: f64, _dt: f64) -> f64 {
        value
    }

    fn describe_state(&self) -> String {
        "No noise".to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// RNG for one model: seeded when reproducibility is requested
pub(crate) fn model_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}
