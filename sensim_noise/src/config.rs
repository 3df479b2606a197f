/// Noise configuration files
///
/// Maps sensor names to noise parameters so simulations can tune noise
/// without recompiling. YAML, TOML and JSON are accepted.
use crate::model::{NoiseFactory, NoiseModel, SensorKind};
use crate::params::NoiseParams;
use sensim_core::error::{SensimError, SensimResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Noise settings of one sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorNoiseConfig {
    /// Kind of sensor, decides between scalar and image models
    #[serde(default)]
    pub kind: SensorKind,

    /// Noise parameters
    #[serde(default)]
    pub noise: NoiseParams,
}

/// Full configuration file with one entry per sensor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Map of sensor name -> noise settings
    #[serde(default)]
    pub sensors: BTreeMap<String, SensorNoiseConfig>,
}

impl NoiseConfig {
    /// Load config from a file (format detected from the extension)
    pub fn from_file<P: AsRef<Path>>(path: P) -> SensimResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SensimError::config(format!(
                "Failed to read noise config '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            _ => Self::from_yaml_str(&contents).or_else(|_| Self::from_toml_str(&contents)),
        }?;

        log::info!(
            "Loaded noise config for {} sensor(s) from {}",
            config.sensors.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parse and validate config from a TOML string
    pub fn from_toml_str(contents: &str) -> SensimResult<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| SensimError::config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate config from a YAML string
    pub fn from_yaml_str(contents: &str) -> SensimResult<Self> {
        let config: Self = serde_yaml::from_str(contents)
            .map_err(|e| SensimError::config(format!("Failed to parse YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate config from a JSON string
    pub fn from_json_str(contents: &str) -> SensimResult<Self> {
        let config: Self = serde_json::from_str(contents)
            .map_err(|e| SensimError::config(format!("Failed to parse JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> SensimResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_toml_string(&self) -> SensimResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Write config to a file, format chosen by extension (YAML by default)
    pub fn save<P: AsRef<Path>>(&self, path: P) -> SensimResult<()> {
        let path = path.as_ref();
        let contents = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => self.to_toml_string()?,
            Some("json") => serde_json::to_string_pretty(self)?,
            _ => self.to_yaml_string()?,
        };
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Check every sensor's parameters
    pub fn validate(&self) -> SensimResult<()> {
        for (name, sensor) in &self.sensors {
            sensor.noise.validate().map_err(|e| {
                SensimError::invalid_parameters(format!("sensor '{}': {}", name, e))
            })?;
        }
        Ok(())
    }

    /// Get a sensor's settings by name
    pub fn sensor(&self, name: &str) -> SensimResult<&SensorNoiseConfig> {
        self.sensors
            .get(name)
            .ok_or_else(|| SensimError::config(format!("Sensor '{}' not found in noise config", name)))
    }

    /// Add or replace a sensor entry
    pub fn insert(&mut self, name: impl Into<String>, kind: SensorKind, noise: NoiseParams) {
        self.sensors.insert(name.into(), SensorNoiseConfig { kind, noise });
    }

    /// Build the noise model configured for `name`
    pub fn create_model(&self, name: &str) -> SensimResult<Box<dyn NoiseModel>> {
        let sensor = self.sensor(name)?;
        NoiseFactory::new_noise_model(&sensor.noise, sensor.kind)
    }
}
