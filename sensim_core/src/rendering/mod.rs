//! # Rendering-side types and events
//!
//! The rendering engine itself lives outside SENSIM. This module defines what
//! SENSIM consumes from it (scenes, render targets, images, lidar buffers) and
//! the [`RenderingEvents`] hub through which rendered data is delivered.

pub mod events;
pub mod image;
pub mod lidar;
pub mod scene;
pub mod target;

pub use events::{
    ImageEvent, LidarEvent, RenderingEvents, SceneEvent, IMAGE_EVENT_KEY, LIDAR_EVENT_KEY,
    SCENE_EVENT_KEY,
};
pub use image::{Image, ImageData, PixelFormat};
pub use lidar::{LidarFrame, LidarScan};
pub use scene::{same_scene, Scene, ScenePtr};
pub use target::{PassId, PostProcessChain, PostProcessPass, RenderTarget};
