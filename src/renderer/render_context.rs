/// RenderContext - per-frame handle tying a renderer to an output target

use std::sync::{Arc, Mutex};

use crate::renderer::{Renderer, RenderTarget, TextureFormat};

/// Rendering context handed to batches at `begin`
///
/// Bundles the shared renderer with the target being rendered to for the
/// current frame, plus a reload generation counter. Cheap to clone; batches
/// hold a clone only between `begin` and `end`.
#[derive(Clone)]
pub struct RenderContext {
    /// The shared renderer
    pub renderer: Arc<Mutex<dyn Renderer>>,
    /// Output target for this frame
    pub target: Arc<dyn RenderTarget>,
    /// Reload generation, bumped every time GPU resources are rebuilt
    /// (target swap, resize). Batches compare against it to detect staleness.
    pub reload_count: u64,
}

impl RenderContext {
    /// Create a new render context
    ///
    /// # Arguments
    ///
    /// * `renderer` - The shared renderer
    /// * `target` - Output target to render to
    pub fn new(renderer: Arc<Mutex<dyn Renderer>>, target: Arc<dyn RenderTarget>) -> Self {
        Self {
            renderer,
            target,
            reload_count: 0,
        }
    }

    /// Width of the current target in pixels
    pub fn width(&self) -> u32 {
        self.target.width()
    }

    /// Height of the current target in pixels
    pub fn height(&self) -> u32 {
        self.target.height()
    }

    /// Color format of the current target
    pub fn format(&self) -> TextureFormat {
        self.target.format()
    }

    /// Swap the output target and bump the reload generation
    ///
    /// Batches created against the old generation must call `reload` before
    /// drawing again.
    ///
    /// # Arguments
    ///
    /// * `target` - The new output target
    pub fn set_target(&mut self, target: Arc<dyn RenderTarget>) {
        self.target = target;
        self.reload_count += 1;
    }
}
