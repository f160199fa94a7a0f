//! Error types for the Nova2D engine
//!
//! This module defines the error types used throughout the engine: batch state
//! machine violations, GPU resource creation failures and capacity overflows.

use std::fmt;

/// Result type for Nova2D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Nova2D engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (Vulkan, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, buffer, shader, etc.)
    InvalidResource(String),

    /// Initialization failed (renderer, subsystems)
    InitializationFailed(String),

    /// `begin` called on a batch already in the drawing state
    AlreadyDrawing,

    /// `draw`, `flush` or `end` called on a batch outside a begin/end bracket
    NotDrawing,

    /// Batch generation does not match the context generation; `reload` is
    /// required after the output target changed
    StaleBatch {
        /// Generation cached by the batch
        batch: u64,
        /// Current generation of the context
        context: u64,
    },

    /// More quads drawn than the declared batch capacity before a flush
    BatchFull {
        /// Declared capacity of the batch, in quads
        capacity: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::AlreadyDrawing => write!(f, "Currently drawing"),
            Error::NotDrawing => write!(f, "Not currently drawing"),
            Error::StaleBatch { batch, context } => write!(
                f,
                "Batch not reloaded, can't draw (batch generation {}, context generation {})",
                batch, context
            ),
            Error::BatchFull { capacity } => {
                write!(f, "Batch capacity exceeded ({} quads)", capacity)
            }
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
