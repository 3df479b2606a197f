use super::image::Image;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Handle of an installed post-process pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PassId(u64);

/// Stage run on every rendered frame before it leaves the render target
pub trait PostProcessPass: Send + Sync {
    fn name(&self) -> &str;

    /// Modify `image` in place; `dt` is simulated seconds since the previous frame
    fn process(&self, image: &mut Image, dt: f64);
}

/// Render output (camera, render texture) that accepts post-process passes
pub trait RenderTarget: Send + Sync {
    fn name(&self) -> &str;

    fn add_post_process(&self, pass: Arc<dyn PostProcessPass>) -> PassId;

    /// Returns false if the pass was not installed
    fn remove_post_process(&self, id: PassId) -> bool;
}

/// Ordered post-process chain usable as a [`RenderTarget`]
///
/// Engine glue embeds one per camera and calls [`PostProcessChain::render`]
/// with every frame it reads back.
pub struct PostProcessChain {
    name: String,
    next_id: AtomicU64,
    passes: RwLock<Vec<(PassId, Arc<dyn PostProcessPass>)>>,
}

impl PostProcessChain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            next_id: AtomicU64::new(1),
            passes: RwLock::new(Vec::new()),
        }
    }

    pub fn pass_count(&self) -> usize {
        self.passes.read().len()
    }

    /// Names of installed passes, in execution order
    pub fn pass_names(&self) -> Vec<String> {
        self.passes
            .read()
            .iter()
            .map(|(_, pass)| pass.name().to_string())
            .collect()
    }

    /// Run every pass over `image`, returns how many ran
    pub fn render(&self, image: &mut Image, dt: f64) -> usize {
        // Snapshot so a pass may detach itself while running.
        let passes: Vec<Arc<dyn PostProcessPass>> =
            self.passes.read().iter().map(|(_, pass)| pass.clone()).collect();
        for pass in &passes {
            pass.process(image, dt);
        }
        passes.len()
    }
}

impl RenderTarget for PostProcessChain {
    fn name(&self) -> &str {
        &self.name
    }

    fn add_post_process(&self, pass: Arc<dyn PostProcessPass>) -> PassId {
        let id = PassId(self.next_id.fetch_add(1, Ordering::Relaxed));
        log::debug!("{}: added post-process pass '{}'", self.name, pass.name());
        self.passes.write().push((id, pass));
        id
    }

    fn remove_post_process(&self, id: PassId) -> bool {
        let mut passes = self.passes.write();
        let before = passes.len();
        passes.retain(|(pass_id, _)| *pass_id != id);
        before != passes.len()
    }
}

impl fmt::Debug for PostProcessChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostProcessChain")
            .field("name", &self.name)
            .field("passes", &self.pass_names())
            .finish()
    }
}
