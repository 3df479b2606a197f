use std::fmt::Debug;
use std::sync::Arc;

/// Scene owned by the rendering engine
pub trait Scene: Send + Sync + Debug {
    /// Engine-assigned scene id
    fn id(&self) -> u32;

    fn name(&self) -> &str;
}

/// Shared reference to an engine scene
pub type ScenePtr = Arc<dyn Scene>;

/// Identity comparison of two scene references
pub fn same_scene(a: &ScenePtr, b: &ScenePtr) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
