/// Framebuffer trait and framebuffer descriptor

use std::sync::Arc;

use crate::renderer::{RenderPass, RenderTarget};

/// Descriptor for creating a framebuffer
#[derive(Clone)]
pub struct FramebufferDesc {
    /// Render pass the framebuffer is compatible with
    pub render_pass: Arc<dyn RenderPass>,
    /// Attachments, in render pass attachment order
    pub attachments: Vec<Arc<dyn RenderTarget>>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Framebuffer trait
///
/// Binds concrete render targets to a render pass.
pub trait Framebuffer: Send + Sync {
    /// Width in pixels
    fn width(&self) -> u32;

    /// Height in pixels
    fn height(&self) -> u32;
}
