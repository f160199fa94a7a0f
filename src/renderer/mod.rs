/// Renderer module - the GPU resource layer contract consumed by the batching core

// Module declarations
pub mod renderer;
pub mod render_context;
pub mod buffer;
pub mod texture;
pub mod shader;
pub mod pipeline;
pub mod render_pass;
pub mod render_target;
pub mod framebuffer;
pub mod binding_group;
pub mod command_list;
pub mod semaphore;

#[cfg(test)]
pub mod mock_renderer;

// Re-export everything from renderer.rs
pub use renderer::*;

// Re-export from other modules
pub use render_context::*;
pub use buffer::*;
pub use texture::*;
pub use shader::*;
pub use pipeline::*;
pub use render_pass::*;
pub use render_target::*;
pub use framebuffer::*;
pub use binding_group::*;
pub use command_list::*;
pub use semaphore::*;
