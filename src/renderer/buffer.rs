/// Buffer trait and buffer descriptor

use bitflags::bitflags;

use crate::error::Result;

bitflags! {
    /// Buffer usage flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BufferUsage: u32 {
        /// Vertex buffer
        const VERTEX = 0x01;
        /// Index buffer
        const INDEX = 0x02;
        /// Uniform/constant buffer
        const UNIFORM = 0x04;
        /// Transfer source (staging upload)
        const TRANSFER_SRC = 0x08;
        /// Transfer destination (staging upload)
        const TRANSFER_DST = 0x10;
    }
}

/// Descriptor for creating a buffer
#[derive(Debug, Clone)]
pub struct BufferDesc {
    /// Size in bytes
    pub size: u64,
    /// Buffer usage
    pub usage: BufferUsage,
}

/// Buffer resource trait
///
/// Implemented by backend-specific buffer types (e.g., VulkanBuffer).
/// The buffer is automatically destroyed when dropped.
pub trait Buffer: Send + Sync {
    /// Update buffer data
    ///
    /// # Arguments
    ///
    /// * `offset` - Offset into the buffer in bytes
    /// * `data` - Data to write
    fn update(&self, offset: u64, data: &[u8]) -> Result<()>;

    /// Size of the buffer in bytes
    fn size(&self) -> u64;
}
