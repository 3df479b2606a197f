//! # SENSIM Core
//!
//! Shared runtime pieces of the SENSIM sensor simulation layer:
//!
//! - **Events**: typed multi-subscriber channels with RAII connections
//! - **Registry**: discovery of channels by name across modules
//! - **Rendering**: scene/render-target/image types and the rendering event hub
//! - **Errors**: the error taxonomy used by every SENSIM crate
//!
//! ## Quick Start
//!
//! ```rust
//! use sensim_core::rendering::{Image, PixelFormat, RenderingEvents};
//! use sensim_core::events::EventRegistry;
//!
//! let registry = EventRegistry::new();
//! let events = RenderingEvents::with_registry(&registry).unwrap();
//!
//! let connection = events.image_event().connect(|image: &Image| {
//!     println!("frame {}x{}", image.width(), image.height());
//! });
//!
//! events.publish_image(&Image::new(640, 480, PixelFormat::Rgb8).unwrap());
//! drop(connection);
//! ```

pub mod error;
pub mod events;
pub mod rendering;

// Re-export commonly used types for easy access
pub use error::{SensimError, SensimResult};
pub use events::{Connection, ConnectionId, Event, EventRegistry, EventSignature};
pub use rendering::{Image, LidarFrame, RenderTarget, RenderingEvents, ScenePtr};
