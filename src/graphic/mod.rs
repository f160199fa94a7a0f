/// Graphic module - CPU-side data plumbing between batches and the GPU

// Module declarations
pub mod mesh;
pub mod uniform;
pub mod texture_region;

// Re-exports
pub use mesh::*;
pub use uniform::*;
pub use texture_region::*;
