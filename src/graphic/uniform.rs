/// UniformBlock - CPU staging for a uniform buffer with dirty tracking

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::renderer::{Buffer, BufferDesc, BufferUsage, RenderContext};

/// Shape of one uniform attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformShape {
    /// Single scalar
    Scalar,
    /// 2-component vector
    Vector2,
    /// 4-component vector
    Vector4,
    /// 4x4 matrix
    Matrix4,
}

impl UniformShape {
    /// Number of components of this shape
    pub fn components(&self) -> usize {
        match self {
            UniformShape::Scalar => 1,
            UniformShape::Vector2 => 2,
            UniformShape::Vector4 => 4,
            UniformShape::Matrix4 => 16,
        }
    }
}

/// Component data type of one uniform attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformDataType {
    /// 32-bit float
    Float,
}

impl UniformDataType {
    /// Size of one component in bytes
    pub fn size_bytes(&self) -> usize {
        match self {
            UniformDataType::Float => 4,
        }
    }
}

/// CPU-staged uniform buffer
///
/// Attribute byte offsets are the cumulative sums of the attribute sizes, in
/// declaration order. `set_uniform` writes into the staging bytes and marks
/// the block dirty; `upload` pushes the staging bytes to the GPU buffer only
/// when dirty.
pub struct UniformBlock {
    offsets: Vec<usize>,
    sizes: Vec<usize>,
    staging: Vec<u8>,
    buffer: Arc<dyn Buffer>,
    dirty: bool,
}

impl UniformBlock {
    /// Create a uniform block for the given attribute layout
    ///
    /// # Arguments
    ///
    /// * `context` - Render context providing the renderer
    /// * `attributes` - Attribute shapes and component types, in order
    pub fn new(
        context: &RenderContext,
        attributes: &[(UniformShape, UniformDataType)],
    ) -> Result<Self> {
        let mut offsets = Vec::with_capacity(attributes.len());
        let mut sizes = Vec::with_capacity(attributes.len());
        let mut total = 0usize;
        for (shape, data_type) in attributes {
            let size = shape.components() * data_type.size_bytes();
            offsets.push(total);
            sizes.push(size);
            total += size;
        }

        let buffer = context.renderer.lock().unwrap().create_buffer(BufferDesc {
            size: total as u64,
            usage: BufferUsage::UNIFORM | BufferUsage::TRANSFER_DST,
        })?;

        Ok(Self {
            offsets,
            sizes,
            staging: vec![0; total],
            buffer,
            dirty: false,
        })
    }

    /// Total size of the block in bytes
    pub fn size(&self) -> u64 {
        self.staging.len() as u64
    }

    /// Byte offset of attribute `index`
    pub fn offset(&self, index: usize) -> Option<usize> {
        self.offsets.get(index).copied()
    }

    /// Whether staged data has not been uploaded yet
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The GPU uniform buffer
    pub fn buffer(&self) -> &Arc<dyn Buffer> {
        &self.buffer
    }

    /// Stage new data for attribute `index` and mark the block dirty
    ///
    /// # Arguments
    ///
    /// * `index` - Attribute index in declaration order
    /// * `data` - Component values; length must match the attribute exactly
    pub fn set_uniform(&mut self, index: usize, data: &[f32]) -> Result<()> {
        let (offset, size) = match (self.offsets.get(index), self.sizes.get(index)) {
            (Some(&offset), Some(&size)) => (offset, size),
            _ => {
                return Err(Error::InvalidResource(format!(
                    "Uniform index {} out of range ({} attributes)",
                    index,
                    self.offsets.len()
                )));
            }
        };
        let bytes: &[u8] = bytemuck::cast_slice(data);
        if bytes.len() != size {
            return Err(Error::InvalidResource(format!(
                "Uniform {} expects {} bytes, got {}",
                index,
                size,
                bytes.len()
            )));
        }
        self.staging[offset..offset + size].copy_from_slice(bytes);
        self.dirty = true;
        Ok(())
    }

    /// Upload the staging bytes to the GPU buffer when dirty
    pub fn upload(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.buffer.update(0, &self.staging)?;
        self.dirty = false;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "uniform_tests.rs"]
mod tests;
