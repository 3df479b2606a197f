//! Error types shared by every SENSIM crate

use thiserror::Error;

/// Result alias used across SENSIM
pub type SensimResult<T> = Result<T, SensimError>;

/// Errors raised by event registration, noise configuration and rendering hooks
#[derive(Debug, Error)]
pub enum SensimError {
    /// A subscription was attempted without a callback
    #[error("Invalid callback: {0}")]
    InvalidCallback(String),

    /// A registry key is already bound to a different event signature
    #[error("Event '{key}' is registered as {registered}, requested as {requested}")]
    TypeMismatch {
        key: String,
        registered: &'static str,
        requested: &'static str,
    },

    /// Noise parameters failed validation
    #[error("Invalid noise parameters: {0}")]
    InvalidParameters(String),

    /// An image model was applied before a render target was set
    #[error("Noise model is not attached to a render target: {0}")]
    NotAttached(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SensimError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        SensimError::Config(msg.into())
    }

    /// Create a parameter validation error
    pub fn invalid_parameters(msg: impl Into<String>) -> Self {
        SensimError::InvalidParameters(msg.into())
    }

    /// Create an invalid callback error
    pub fn invalid_callback(msg: impl Into<String>) -> Self {
        SensimError::InvalidCallback(msg.into())
    }

    /// Create a not-attached error
    pub fn not_attached(msg: impl Into<String>) -> Self {
        SensimError::NotAttached(msg.into())
    }

    /// Whether this error comes from configuration rather than runtime use
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SensimError::InvalidParameters(_)
                | SensimError::TypeMismatch { .. }
                | SensimError::Config(_)
        )
    }
}

impl From<serde_yaml::Error> for SensimError {
    fn from(err: serde_yaml::Error) -> Self {
        SensimError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for SensimError {
    fn from(err: serde_json::Error) -> Self {
        SensimError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for SensimError {
    fn from(err: toml::de::Error) -> Self {
        SensimError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for SensimError {
    fn from(err: toml::ser::Error) -> Self {
        SensimError::Serialization(err.to_string())
    }
}
