/// Mesh - CPU vertex/index staging arrays backed by GPU buffers
///
/// A Mesh owns a fixed-capacity vertex array mutated in place, an index array
/// set once after construction, and the GPU buffers both are uploaded into.
/// Indices are 16-bit; a capacity that cannot be indexed by u16 is rejected at
/// construction.

use std::mem;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};

use crate::error::{Error, Result};
use crate::renderer::{
    Buffer, BufferDesc, BufferUsage, CommandList, IndexType, RenderContext, VertexAttributes,
};

/// Vertex type contract
///
/// Implemented by the concrete vertex structs fed into a `Mesh`; provides the
/// attribute layout the pipeline is built against.
pub trait VertexType {
    /// Attribute layout of this vertex type
    fn attributes() -> VertexAttributes;
}

/// Mesh with CPU staging and GPU vertex/index buffers
pub struct Mesh<V: Pod + VertexType> {
    vertices: Vec<V>,
    indices: Vec<u16>,
    vertex_buffer: Arc<dyn Buffer>,
    index_buffer: Arc<dyn Buffer>,
}

impl<V: Pod + VertexType> Mesh<V> {
    /// Create a new mesh with zeroed staging arrays and matching GPU buffers
    ///
    /// # Arguments
    ///
    /// * `context` - Render context providing the renderer
    /// * `max_vertices` - Vertex capacity (at most `u16::MAX + 1`)
    /// * `max_indices` - Index capacity
    pub fn new(context: &RenderContext, max_vertices: usize, max_indices: usize) -> Result<Self> {
        if max_vertices > u16::MAX as usize + 1 {
            return Err(Error::InvalidResource(format!(
                "Mesh vertex capacity {} exceeds 16-bit index range",
                max_vertices
            )));
        }

        let vertex_size = (max_vertices * mem::size_of::<V>()) as u64;
        let index_size = (max_indices * mem::size_of::<u16>()) as u64;

        let mut renderer = context.renderer.lock().unwrap();
        let vertex_buffer = renderer.create_buffer(BufferDesc {
            size: vertex_size,
            usage: BufferUsage::VERTEX | BufferUsage::TRANSFER_DST,
        })?;
        let index_buffer = renderer.create_buffer(BufferDesc {
            size: index_size,
            usage: BufferUsage::INDEX | BufferUsage::TRANSFER_DST,
        })?;

        Ok(Self {
            vertices: vec![V::zeroed(); max_vertices],
            indices: vec![0; max_indices],
            vertex_buffer,
            index_buffer,
        })
    }

    /// Vertex capacity
    pub fn max_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Index capacity
    pub fn max_indices(&self) -> usize {
        self.indices.len()
    }

    /// Overwrite one vertex in the staging array
    ///
    /// # Arguments
    ///
    /// * `index` - Vertex slot to overwrite
    /// * `vertex` - New vertex value
    pub fn set_vertex(&mut self, index: usize, vertex: V) -> Result<()> {
        if index >= self.vertices.len() {
            return Err(Error::InvalidResource(format!(
                "Vertex index {} out of range (capacity {})",
                index,
                self.vertices.len()
            )));
        }
        self.vertices[index] = vertex;
        Ok(())
    }

    /// Set the index array (from the start; remaining slots stay zero)
    ///
    /// # Arguments
    ///
    /// * `indices` - Index values, at most the index capacity
    pub fn set_indices(&mut self, indices: &[u16]) -> Result<()> {
        if indices.len() > self.indices.len() {
            return Err(Error::InvalidResource(format!(
                "{} indices exceed capacity {}",
                indices.len(),
                self.indices.len()
            )));
        }
        self.indices[..indices.len()].copy_from_slice(indices);
        Ok(())
    }

    /// Upload both staging arrays into the GPU buffers
    pub fn upload(&self) -> Result<()> {
        self.vertex_buffer
            .update(0, bytemuck::cast_slice(&self.vertices))?;
        self.index_buffer
            .update(0, bytemuck::cast_slice(&self.indices))?;
        Ok(())
    }

    /// Bind the vertex and index buffers for drawing
    pub fn bind(&self, command_list: &mut dyn CommandList) -> Result<()> {
        command_list.bind_vertex_buffer(&self.vertex_buffer, 0)?;
        command_list.bind_index_buffer(&self.index_buffer, 0, IndexType::U16)?;
        Ok(())
    }

    /// Record an indexed draw of `index_count` indices starting at `first_index`
    pub fn draw(
        &self,
        command_list: &mut dyn CommandList,
        index_count: u32,
        first_index: u32,
    ) -> Result<()> {
        command_list.draw_indexed(index_count, first_index, 0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;
