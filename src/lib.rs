/*!
# Nova 2D Engine

Core batching and synchronization layer for the Nova 2D rendering engine.

This crate provides the platform-agnostic 2D quad-batching API using trait-based
dynamic polymorphism. Backend implementations (Vulkan, etc.) are registered at
runtime via the plugin system and only need to implement the `renderer` traits.

## Architecture

- **Renderer**: Factory trait for creating GPU resources and submitting work
- **RenderContext**: Cheap handle bundling the renderer, the output target and a
  reload generation counter
- **Mesh / UniformBlock**: CPU staging arrays mirrored into GPU buffers
- **CommandChain**: Pools command lists and semaphores, chaining submissions so
  GPU execution order matches recording order
- **SpriteBatch / BlockBatch**: Accumulate quads into shared buffers and collapse
  them into a minimum of draw calls

Backend implementations provide concrete types that implement the renderer traits.
*/

// Internal modules
mod error;
pub mod log;
pub mod renderer;
pub mod graphic;
pub mod batch;

// Main nova2d namespace module
pub mod nova2d {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
        // Note: engine_* macros are NOT re-exported here - they are internal only
    }

    // Render sub-module with the GPU resource layer contract
    pub mod render {
        pub use crate::renderer::*;
    }

    // Graphic data sub-module (mesh and uniform plumbing)
    pub mod graphic {
        pub use crate::graphic::*;
    }

    // Batch sub-module with the quad batching API
    pub mod batch {
        pub use crate::batch::*;
    }
}

// Re-export math library at crate root
pub use glam;
