use crate::model::NoiseModel;
use crate::params::{NoiseParams, NoiseType};
use sensim_core::error::{SensimError, SensimResult};
use std::any::Any;
use std::fmt;

/// Callback computing a noisy reading from `(value, dt)`
pub type CustomNoiseCallback = Box<dyn FnMut(f64, f64) -> f64 + Send>;

/// Noise computed by a user supplied function
///
/// Until a callback is set readings pass through unchanged and a single
/// error is logged.
pub struct CustomNoiseModel {
    params: NoiseParams,
    callback: Option<CustomNoiseCallback>,
    warned: bool,
}

impl CustomNoiseModel {
    pub fn new(params: &NoiseParams) -> SensimResult<Self> {
        let mut model = Self {
            params: NoiseParams::custom(),
            callback: None,
            warned: false,
        };
        model.load(params)?;
        Ok(model)
    }

    pub fn set_callback<F>(&mut self, callback: F)
    where
        F: FnMut(f64, f64) -> f64 + Send + 'static,
    {
        self.callback = Some(Box::new(callback));
        self.warned = false;
    }

    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(f64, f64) -> f64 + Send + 'static,
    {
        self.set_callback(callback);
        self
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }
}

impl NoiseModel for CustomNoiseModel {
    fn noise_type(&self) -> NoiseType {
        NoiseType::Custom
    }

    fn load(&mut self, params: &NoiseParams) -> SensimResult<()> {
        if params.noise_type != NoiseType::Custom {
            return Err(SensimError::invalid_parameters(format!(
                "custom model cannot load '{}' noise parameters",
                params.noise_type
            )));
        }
        params.validate()?;
        self.params = params.clone();
        Ok(())
    }

    fn apply(&mut self, value: f64, dt: f64) -> f64 {
        match self.callback.as_mut() {
            Some(callback) => callback(value, dt),
            None => {
                if !self.warned {
                    log::error!("Custom noise callback function not set");
                    self.warned = true;
                }
                value
            }
        }
    }

    fn describe_state(&self) -> String {
        format!("Custom noise, callback[{}]", if self.has_callback() { "set" } else { "unset" })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Debug for CustomNoiseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomNoiseModel")
            .field("params", &self.params)
            .field("has_callback", &self.has_callback())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_callback_passes_through() {
        let mut model = CustomNoiseModel::new(&NoiseParams::custom()).unwrap();
        assert!(!model.has_callback());
        assert_eq!(model.apply(4.5, 0.1), 4.5);
        assert_eq!(model.apply(-1.0, 0.1), -1.0);
    }

    #[test]
    fn test_callback_receives_value_and_dt() {
        let mut model = CustomNoiseModel::new(&NoiseParams::custom())
            .unwrap()
            .with_callback(|value, dt| value * 2.0 + dt);
        assert_eq!(model.apply(3.0, 0.5), 6.5);
    }

    #[test]
    fn test_stateful_callback() {
        let mut calls = 0u32;
        let mut model = CustomNoiseModel::new(&NoiseParams::custom()).unwrap();
        model.set_callback(move |value, _dt| {
            calls += 1;
            value + f64::from(calls)
        });

        let mut values = [0.0, 0.0, 0.0];
        model.apply_buffer(&mut values, 0.1);
        assert_eq!(values, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_rejects_gaussian_parameters() {
        assert!(CustomNoiseModel::new(&NoiseParams::gaussian(0.0, 1.0)).is_err());
    }
}
