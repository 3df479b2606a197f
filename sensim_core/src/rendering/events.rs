//! Well-known rendering events
//!
//! Three channels registered under fixed, versioned keys so that sensors,
//! engine glue and consumers built separately all meet on the same channel.

use super::image::Image;
use super::lidar::LidarFrame;
use super::scene::{same_scene, ScenePtr};
use crate::error::SensimResult;
use crate::events::{Connection, Event, EventRegistry, EventSignature};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::fmt;

pub const IMAGE_EVENT_KEY: &str = "sensim_events.v1.ImageEvent";
pub const LIDAR_EVENT_KEY: &str = "sensim_events.v1.LidarEvent";
pub const SCENE_EVENT_KEY: &str = "sensim_events.v1.SceneEvent";

/// A new image was rendered
pub enum ImageEvent {}

impl EventSignature for ImageEvent {
    type Args<'a> = Image;
    const NAME: &'static str = "ImageEvent";
}

/// A lidar update completed; the scan is only valid during the callback
pub enum LidarEvent {}

impl EventSignature for LidarEvent {
    type Args<'a> = LidarFrame<'a>;
    const NAME: &'static str = "LidarEvent";
}

/// The active rendering scene was swapped
pub enum SceneEvent {}

impl EventSignature for SceneEvent {
    type Args<'a> = ScenePtr;
    const NAME: &'static str = "SceneEvent";
}

static GLOBAL_EVENTS: OnceCell<RenderingEvents> = OnceCell::new();

/// Hub exposing the rendering channels
///
/// Callbacks run on the render thread. Do not block inside them.
pub struct RenderingEvents {
    image: Event<ImageEvent>,
    lidar: Event<LidarEvent>,
    scene: Event<SceneEvent>,
    active_scene: RwLock<Option<ScenePtr>>,
}

impl RenderingEvents {
    /// Hub backed by the process-wide registry
    pub fn global() -> SensimResult<&'static RenderingEvents> {
        GLOBAL_EVENTS.get_or_try_init(|| Self::with_registry(EventRegistry::global()))
    }

    /// Hub backed by `registry`
    ///
    /// Fails with a type mismatch if one of the well-known keys was already
    /// registered with another signature.
    pub fn with_registry(registry: &EventRegistry) -> SensimResult<Self> {
        Ok(Self {
            image: registry.register::<ImageEvent>(IMAGE_EVENT_KEY)?,
            lidar: registry.register::<LidarEvent>(LIDAR_EVENT_KEY)?,
            scene: registry.register::<SceneEvent>(SCENE_EVENT_KEY)?,
            active_scene: RwLock::new(None),
        })
    }

    /// Set a callback to be called every time the scene changes
    ///
    /// The subscription ends when the returned connection is dropped.
    pub fn connect_scene_change_callback<F>(&self, callback: F) -> Connection
    where
        F: Fn(&ScenePtr) + Send + Sync + 'static,
    {
        self.scene.connect(callback)
    }

    pub fn image_event(&self) -> &Event<ImageEvent> {
        &self.image
    }

    pub fn lidar_event(&self) -> &Event<LidarEvent> {
        &self.lidar
    }

    pub fn scene_event(&self) -> &Event<SceneEvent> {
        &self.scene
    }

    /// Broadcast a rendered frame
    pub fn publish_image(&self, image: &Image) -> usize {
        self.image.broadcast(image)
    }

    /// Broadcast a completed lidar update
    pub fn publish_lidar_scan(&self, frame: &LidarFrame<'_>) -> usize {
        self.lidar.broadcast(frame)
    }

    /// Make `scene` the active scene
    ///
    /// Scene-changed is broadcast only when `scene` differs from the current
    /// one. Returns whether it did.
    pub fn set_scene(&self, scene: ScenePtr) -> bool {
        let changed = {
            let mut active = self.active_scene.write();
            match active.as_ref() {
                Some(current) if same_scene(current, &scene) => false,
                _ => {
                    *active = Some(scene.clone());
                    true
                }
            }
        };

        if changed {
            log::debug!("Active scene changed to '{}' ({})", scene.name(), scene.id());
            self.scene.broadcast(&scene);
        }
        changed
    }

    pub fn active_scene(&self) -> Option<ScenePtr> {
        self.active_scene.read().clone()
    }
}

impl fmt::Debug for RenderingEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderingEvents")
            .field("image", &self.image)
            .field("lidar", &self.lidar)
            .field("scene", &self.scene)
            .field("active_scene", &self.active_scene.read())
            .finish()
    }
}
