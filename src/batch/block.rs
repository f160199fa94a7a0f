/// BlockBatch - batches stylized untextured quads (blocks)
///
/// Blocks carry per-corner colors, border widths, border colors, and corner
/// radii, all resolved in the fragment shader. No texture is involved, so the
/// whole frame flushes as a single draw call and the one binding group (the
/// matrix uniform) is written once at construction.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::error::{Error, Result};
use crate::graphic::VertexType;
use crate::renderer::{
    BindingGroup, BindingGroupPoolDesc, BindingResource, BindingSlotDesc, BindingType,
    BindingWrite, RenderContext, RenderTarget, Semaphore, ShaderDesc, ShaderStage,
    ShaderStageFlags, VertexAttributes, VertexFormat,
};

use super::{quad_corners, BatchBase, ShaderPair};

// ============================================================================
// Vertex
// ============================================================================

/// Vertex format of block quads
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct BlockVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
    pub border_widths: [f32; 4],
    pub border_color_top: [f32; 4],
    pub border_color_right: [f32; 4],
    pub border_color_bottom: [f32; 4],
    pub border_color_left: [f32; 4],
    pub border_radius: [f32; 4],
}

impl VertexType for BlockVertex {
    fn attributes() -> VertexAttributes {
        VertexAttributes::new(&[
            (0, VertexFormat::R32G32_SFLOAT),
            (1, VertexFormat::R32G32_SFLOAT),
            (2, VertexFormat::R32G32B32A32_SFLOAT),
            (3, VertexFormat::R32G32B32A32_SFLOAT),
            (4, VertexFormat::R32G32B32A32_SFLOAT),
            (5, VertexFormat::R32G32B32A32_SFLOAT),
            (6, VertexFormat::R32G32B32A32_SFLOAT),
            (7, VertexFormat::R32G32B32A32_SFLOAT),
            (8, VertexFormat::R32G32B32A32_SFLOAT),
        ])
    }
}

// ============================================================================
// Draw parameters
// ============================================================================

/// Properties of one block draw
///
/// `colors` are the corner colors in top-left, top-right, bottom-right,
/// bottom-left order. `border_widths`, `border_colors`, and `border_radius`
/// are in top, right, bottom, left order. Rotation is in radians, clockwise
/// about the block center.
#[derive(Debug, Clone)]
pub struct BlockProperty {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub colors: [[f32; 4]; 4],
    pub scale: [f32; 2],
    pub rotation: f32,
    pub border_widths: [f32; 4],
    pub border_radius: [f32; 4],
    pub border_colors: [[f32; 4]; 4],
}

impl Default for BlockProperty {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            colors: [[1.0; 4]; 4],
            scale: [1.0; 2],
            rotation: 0.0,
            border_widths: [0.0; 4],
            border_radius: [0.0; 4],
            border_colors: [[1.0; 4]; 4],
        }
    }
}

/// BlockBatch construction parameters
pub struct BlockBatchDesc {
    /// Maximum blocks per flush
    pub capacity: usize,
    /// Custom shader pair; `None` uses the embedded block shaders
    pub shaders: Option<ShaderPair>,
    /// Explicit output target; `None` renders to the context target
    pub target: Option<Arc<dyn RenderTarget>>,
}

impl Default for BlockBatchDesc {
    fn default() -> Self {
        Self {
            capacity: 1000,
            shaders: None,
            target: None,
        }
    }
}

// ============================================================================
// BlockBatch
// ============================================================================

pub struct BlockBatch {
    base: BatchBase<BlockVertex>,
    group: Arc<dyn BindingGroup>,
}

impl BlockBatch {
    /// Create a block batch
    ///
    /// # Arguments
    ///
    /// * `context` - Render context used for all GPU resource creation
    /// * `desc` - Construction parameters
    pub fn new(context: &RenderContext, desc: BlockBatchDesc) -> Result<Self> {
        let shaders = desc.shaders.unwrap_or_else(default_shaders);
        let entries = vec![BindingSlotDesc {
            binding: 0,
            binding_type: BindingType::UniformBuffer,
            count: 1,
            stage_flags: ShaderStageFlags::VERTEX,
        }];
        let base = BatchBase::new(context, desc.capacity, shaders, entries, desc.target, None)?;

        // One group for the matrix uniform, written once and reused forever
        let group = {
            let mut renderer = context.renderer.lock().unwrap();
            let mut pool = renderer.create_binding_group_pool(&BindingGroupPoolDesc {
                sizes: vec![(BindingType::UniformBuffer, 1)],
                max_groups: 1,
            })?;
            let group = pool.allocate(base.layout())?;
            renderer.update_binding_group(
                &group,
                &[BindingWrite {
                    binding: 0,
                    resource: BindingResource::UniformBuffer {
                        buffer: Arc::clone(base.uniform().buffer()),
                        offset: 0,
                        size: base.uniform().size(),
                    },
                }],
            )?;
            group
        };

        Ok(Self { base, group })
    }

    /// Start a frame
    pub fn begin(
        &mut self,
        context: &RenderContext,
        wait_semaphores: &[Arc<dyn Semaphore>],
    ) -> Result<()> {
        self.base.begin(context, wait_semaphores)
    }

    /// Flush the pending blocks and end the frame
    ///
    /// # Returns
    ///
    /// The final semaphore of the frame, `None` when nothing was drawn.
    pub fn end(&mut self) -> Result<Option<Arc<dyn Semaphore>>> {
        self.flush()?;
        self.base.finish()
    }

    /// Draw one block
    pub fn draw(&mut self, properties: &BlockProperty) -> Result<()> {
        if !self.base.is_drawing() {
            return Err(Error::NotDrawing);
        }

        let width = properties.width * properties.scale[0];
        let height = properties.height * properties.scale[1];
        let corners = quad_corners(properties.x, properties.y, width, height, properties.rotation);
        let uvs = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]];
        // Vertices run top-left, bottom-left, bottom-right, top-right while
        // colors are declared top-left, top-right, bottom-right, bottom-left
        let corner_colors = [
            properties.colors[0],
            properties.colors[3],
            properties.colors[2],
            properties.colors[1],
        ];

        let mut vertices = [BlockVertex::zeroed(); 4];
        for i in 0..4 {
            vertices[i] = BlockVertex {
                position: corners[i],
                uv: uvs[i],
                color: corner_colors[i],
                border_widths: properties.border_widths,
                border_color_top: properties.border_colors[0],
                border_color_right: properties.border_colors[1],
                border_color_bottom: properties.border_colors[2],
                border_color_left: properties.border_colors[3],
                border_radius: properties.border_radius,
            };
        }
        self.base.push_vertices(vertices)
    }

    /// Flush all pending blocks as one draw call
    pub fn flush(&mut self) -> Result<()> {
        if self.base.pending_quads() == 0 {
            return Ok(());
        }
        let group = Arc::clone(&self.group);
        self.base.flush_quads(&group)
    }

    /// Rebuild target-dependent resources after a context reload
    pub fn reload(&mut self, context: &RenderContext) -> Result<()> {
        self.base.reload(context)
    }

    /// Replace the model transform; takes effect at the next `begin`
    pub fn update_transform(&mut self, transform: &Mat4) {
        self.base.update_transform(transform);
    }

    /// Replace the projection; takes effect at the next `begin`
    pub fn update_projection(&mut self, projection: &Mat4) {
        self.base.update_projection(projection);
    }

    /// Current projection matrix
    pub fn projection(&self) -> &Mat4 {
        self.base.projection()
    }

    /// Blocks pushed since the last flush
    pub fn pending_blocks(&self) -> usize {
        self.base.pending_quads()
    }
}

fn default_shaders() -> ShaderPair {
    ShaderPair {
        vertex: ShaderDesc::glsl(ShaderStage::Vertex, include_str!("shaders/block.vert.glsl")),
        fragment: ShaderDesc::glsl(
            ShaderStage::Fragment,
            include_str!("shaders/block.frag.glsl"),
        ),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "block_tests.rs"]
mod tests;
