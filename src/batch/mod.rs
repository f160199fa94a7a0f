/// Batch module - quad batching over a semaphore-chained submission pool

// Module declarations
pub mod command_chain;
pub mod base;
pub mod sprite;
pub mod block;

// Re-exports
pub use command_chain::*;
pub use base::*;
pub use sprite::*;
pub use block::*;
