//! # SENSIM - Sensor Simulation
//!
//! SENSIM sits between a rendering engine and simulated sensors. It carries
//! rendered data to whoever needs it and makes sensor readings imperfect the
//! way real hardware is.
//!
//! ## Quick Start
//!
//! ```rust
//! use sensim::prelude::*;
//!
//! let registry = EventRegistry::new();
//! let events = RenderingEvents::with_registry(&registry).unwrap();
//!
//! let params = NoiseParams::gaussian(0.0, 0.01).with_seed(7);
//! let noise = Arc::new(Mutex::new(
//!     NoiseFactory::new_noise_model(&params, SensorKind::Scalar).unwrap(),
//! ));
//!
//! let sink = noise.clone();
//! let _connection = events.lidar_event().connect(move |frame: &LidarFrame<'_>| {
//!     let mut ranges: Vec<f64> = frame.scan.iter().map(|&r| f64::from(r)).collect();
//!     sink.lock().unwrap().apply_buffer(&mut ranges, 0.1);
//! });
//!
//! let buffer = vec![5.0_f32; 360];
//! let frame = LidarFrame::new(&buffer, 360, 1, 1, "PF_FLOAT32_R").unwrap();
//! events.publish_lidar_scan(&frame);
//! ```
//!
//! ## Features
//!
//! - **Typed event channels** with RAII subscriptions and a name registry
//! - **Rendering events** for images, lidar scans and scene swaps
//! - **Gaussian noise** with bias, drifting bias and quantization
//! - **Camera noise** applied as a render-target post-process
//! - **Config files** mapping sensors to noise settings

pub use sensim_core::{self, *};
pub use sensim_noise as noise;

/// Events, rendering types, noise models and error handling in one import
pub mod prelude {
    pub use sensim_core::events::{Connection, Event, EventRegistry, EventSignature};

    pub use sensim_core::rendering::{
        Image, ImageData, LidarFrame, LidarScan, PixelFormat, PostProcessChain, PostProcessPass,
        RenderTarget, RenderingEvents, Scene, ScenePtr,
    };

    pub use sensim_noise::prelude::*;

    pub use sensim_core::error::{SensimError, SensimResult};
    pub type Result<T> = SensimResult<T>;

    pub use std::sync::{Arc, Mutex};

    pub use serde::{Deserialize, Serialize};

    // For application code that mixes SENSIM errors with its own
    pub use anyhow::{anyhow, bail, ensure, Context, Result as AnyResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version() -> &'static str {
    VERSION
}
