//! Gaussian noise for camera images, applied as a render-target post-process

use crate::gaussian::GaussianNoiseModel;
use crate::model::NoiseModel;
use crate::params::{NoiseParams, NoiseType};
use parking_lot::Mutex;
use sensim_core::error::{SensimError, SensimResult};
use sensim_core::rendering::{Image, ImageData, PassId, PostProcessPass, RenderTarget};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Name under which the noise pass shows up in a render target
pub const NOISE_PASS_NAME: &str = "gaussian_noise";

/// Run `noise` over every sample of `image`
///
/// 8-bit samples are mapped to `[0, 1]` first and clamped before being
/// written back. Non-finite float samples (no-return pixels) are skipped.
pub(crate) fn noise_samples<F>(image: &mut Image, mut noise: F)
where
    F: FnMut(f64) -> f64,
{
    match image.data_mut() {
        ImageData::U8(data) => {
            for sample in data.iter_mut() {
                let value = f64::from(*sample) / 255.0;
                let noisy = noise(value).clamp(0.0, 1.0);
                *sample = (noisy * 255.0).round() as u8;
            }
        }
        ImageData::F32(data) => {
            for sample in data.iter_mut().filter(|s| s.is_finite()) {
                *sample = noise(f64::from(*sample)) as f32;
            }
        }
    }
}

fn noise_frame(model: &mut GaussianNoiseModel, image: &mut Image, dt: f64) {
    model.advance_time(dt);
    noise_samples(image, |value| model.sample(value));
}

/// Post-process pass installed into the render target
struct GaussianNoisePass {
    model: Arc<Mutex<GaussianNoiseModel>>,
}

impl PostProcessPass for GaussianNoisePass {
    fn name(&self) -> &str {
        NOISE_PASS_NAME
    }

    fn process(&self, image: &mut Image, dt: f64) {
        noise_frame(&mut self.model.lock(), image, dt);
    }
}

struct Attachment {
    target: Arc<dyn RenderTarget>,
    pass: PassId,
}

/// Gaussian noise applied to every pixel of a camera's output
///
/// After [`NoiseModel::set_target`] the model noises each frame the target
/// renders, sharing its configuration and random state with direct calls to
/// [`NoiseModel::apply_image`]. The pass is removed on
/// [`NoiseModel::finalize`] or when the model is dropped.
pub struct ImageGaussianNoiseModel {
    model: Arc<Mutex<GaussianNoiseModel>>,
    attachment: Option<Attachment>,
}

impl ImageGaussianNoiseModel {
    pub fn new(params: &NoiseParams) -> SensimResult<Self> {
        Ok(Self {
            model: Arc::new(Mutex::new(GaussianNoiseModel::new(params)?)),
            attachment: None,
        })
    }

    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }

    /// Name of the render target the model is attached to
    pub fn target_name(&self) -> Option<&str> {
        self.attachment.as_ref().map(|a| a.target.name())
    }

    pub fn mean(&self) -> f64 {
        self.model.lock().mean()
    }

    pub fn std_dev(&self) -> f64 {
        self.model.lock().std_dev()
    }

    pub fn bias(&self) -> f64 {
        self.model.lock().bias()
    }
}

impl NoiseModel for ImageGaussianNoiseModel {
    fn noise_type(&self) -> NoiseType {
        self.model.lock().noise_type()
    }

    fn load(&mut self, params: &NoiseParams) -> SensimResult<()> {
        self.model.lock().load(params)
    }

    fn apply(&mut self, value: f64, dt: f64) -> f64 {
        self.model.lock().apply(value, dt)
    }

    fn apply_buffer(&mut self, values: &mut [f64], dt: f64) {
        self.model.lock().apply_buffer(values, dt)
    }

    /// Noise one frame by hand; requires an attached render target
    fn apply_image(&mut self, image: &mut Image, dt: f64) -> SensimResult<()> {
        if self.attachment.is_none() {
            return Err(SensimError::not_attached(
                "image noise has no render target, call set_target first",
            ));
        }
        noise_frame(&mut self.model.lock(), image, dt);
        Ok(())
    }

    fn describe_state(&self) -> String {
        format!(
            "Image {}, target[{}]",
            self.model.lock().describe_state(),
            self.target_name().unwrap_or("none")
        )
    }

    fn set_target(&mut self, target: Arc<dyn RenderTarget>) -> SensimResult<()> {
        self.finalize();

        let pass = Arc::new(GaussianNoisePass {
            model: self.model.clone(),
        });
        let id = target.add_post_process(pass);
        log::info!("Gaussian image noise attached to '{}'", target.name());
        self.attachment = Some(Attachment { target, pass: id });
        Ok(())
    }

    fn finalize(&mut self) {
        if let Some(attachment) = self.attachment.take() {
            if attachment.target.remove_post_process(attachment.pass) {
                log::info!(
                    "Gaussian image noise detached from '{}'",
                    attachment.target.name()
                );
            } else {
                log::warn!(
                    "Gaussian image noise pass already gone from '{}'",
                    attachment.target.name()
                );
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Drop for ImageGaussianNoiseModel {
    fn drop(&mut self) {
        self.finalize();
    }
}

impl fmt::Display for ImageGaussianNoiseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe_state())
    }
}

impl fmt::Debug for ImageGaussianNoiseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageGaussianNoiseModel")
            .field("model", &*self.model.lock())
            .field("target", &self.target_name())
            .finish()
    }
}
