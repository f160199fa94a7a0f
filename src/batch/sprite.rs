/// SpriteBatch - batches textured quads into a minimum of draw calls
///
/// Sprites drawn with the same texture accumulate in the vertex array; a draw
/// with a different texture flushes the pending quads first, so each flush is
/// one draw call bound to one texture. Binding groups come from a
/// double-buffered descriptor pool rewritten once per flush.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};

use crate::error::{Error, Result};
use crate::graphic::{TextureRegion, UniformBlock, VertexType};
use crate::renderer::{
    BindingGroup, BindingGroupLayout, BindingGroupPool, BindingGroupPoolDesc, BindingResource,
    BindingSlotDesc, BindingType, BindingWrite, RenderContext, RenderTarget, SamplerType,
    Semaphore, ShaderDesc, ShaderStage, ShaderStageFlags, Texture, VertexAttributes, VertexFormat,
};

use super::{quad_corners, BatchBase, ShaderPair};
use glam::Mat4;

// ============================================================================
// Vertex
// ============================================================================

/// Vertex format of sprite quads
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl VertexType for SpriteVertex {
    fn attributes() -> VertexAttributes {
        VertexAttributes::new(&[
            (0, VertexFormat::R32G32_SFLOAT),
            (1, VertexFormat::R32G32_SFLOAT),
            (2, VertexFormat::R32G32B32A32_SFLOAT),
        ])
    }
}

// ============================================================================
// Draw parameters
// ============================================================================

/// Per-sprite draw parameters
///
/// A zero `width` together with a zero `height` takes the texture's native
/// pixel size. Rotation is in radians, clockwise about the sprite center.
#[derive(Debug, Clone, Copy)]
pub struct SpriteParams {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub u: f32,
    pub v: f32,
    pub u2: f32,
    pub v2: f32,
    pub color: [f32; 4],
    pub scale_x: f32,
    pub scale_y: f32,
    pub rotation: f32,
}

impl Default for SpriteParams {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            u: 0.0,
            v: 0.0,
            u2: 1.0,
            v2: 1.0,
            color: [1.0, 1.0, 1.0, 1.0],
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
        }
    }
}

/// SpriteBatch construction parameters
pub struct SpriteBatchDesc {
    /// Maximum sprites per flush
    pub capacity: usize,
    /// Custom shader pair; `None` uses the embedded sprite shaders
    pub shaders: Option<ShaderPair>,
    /// Explicit output target; `None` renders to the context target
    pub target: Option<Arc<dyn RenderTarget>>,
    /// Clear color applied at the first flush of a frame; `None` loads
    pub clear: Option<[f32; 4]>,
}

impl Default for SpriteBatchDesc {
    fn default() -> Self {
        Self {
            capacity: 1000,
            shaders: None,
            target: None,
            clear: None,
        }
    }
}

// ============================================================================
// Descriptor pool
// ============================================================================

/// Double-buffered arena of binding groups for sprite textures
///
/// One group is pulled per flush and rewritten with the current uniform buffer
/// and texture. Two arenas alternate frame by frame: `reset` flips the active
/// arena at frame end, so a group rewritten this frame was last bound two
/// frames ago and the submission reading it has already been waited on.
pub struct SpriteDescriptorPool {
    pool: Box<dyn BindingGroupPool>,
    arenas: [Vec<Arc<dyn BindingGroup>>; 2],
    active: usize,
    next: usize,
    groups_per_frame: usize,
}

impl SpriteDescriptorPool {
    fn new(pool: Box<dyn BindingGroupPool>, groups_per_frame: usize) -> Self {
        Self {
            pool,
            arenas: [Vec::new(), Vec::new()],
            active: 0,
            next: 0,
            groups_per_frame,
        }
    }

    /// Take the next group of the active arena and rewrite it for `texture`
    pub fn pull(
        &mut self,
        context: &RenderContext,
        layout: &Arc<dyn BindingGroupLayout>,
        uniform: &UniformBlock,
        texture: &Arc<dyn Texture>,
    ) -> Result<Arc<dyn BindingGroup>> {
        if self.next == self.groups_per_frame {
            crate::engine_error!(
                "nova2d::SpriteBatch",
                "Descriptor pool exhausted ({} groups per frame)",
                self.groups_per_frame
            );
            return Err(Error::OutOfMemory);
        }
        let arena = &mut self.arenas[self.active];
        if self.next == arena.len() {
            arena.push(self.pool.allocate(layout)?);
        }
        let group = Arc::clone(&arena[self.next]);
        self.next += 1;

        context.renderer.lock().unwrap().update_binding_group(
            &group,
            &[
                BindingWrite {
                    binding: 0,
                    resource: BindingResource::UniformBuffer {
                        buffer: Arc::clone(uniform.buffer()),
                        offset: 0,
                        size: uniform.size(),
                    },
                },
                BindingWrite {
                    binding: 1,
                    resource: BindingResource::CombinedImageSampler {
                        texture: Arc::clone(texture),
                        sampler: SamplerType::Linear,
                    },
                },
            ],
        )?;

        Ok(group)
    }

    /// Flip to the other arena and rewind its cursor
    pub fn reset(&mut self) {
        self.active = 1 - self.active;
        self.next = 0;
    }
}

// ============================================================================
// SpriteBatch
// ============================================================================

/// Flushes one frame's arena can serve; the pool backs two alternating arenas
const GROUPS_PER_FRAME: usize = 64;

pub struct SpriteBatch {
    base: BatchBase<SpriteVertex>,
    dspool: SpriteDescriptorPool,
    last_texture: Option<Arc<dyn Texture>>,
}

impl SpriteBatch {
    /// Create a sprite batch
    ///
    /// # Arguments
    ///
    /// * `context` - Render context used for all GPU resource creation
    /// * `desc` - Construction parameters
    pub fn new(context: &RenderContext, desc: SpriteBatchDesc) -> Result<Self> {
        let shaders = desc.shaders.unwrap_or_else(default_shaders);
        let entries = vec![
            BindingSlotDesc {
                binding: 0,
                binding_type: BindingType::UniformBuffer,
                count: 1,
                stage_flags: ShaderStageFlags::VERTEX,
            },
            BindingSlotDesc {
                binding: 1,
                binding_type: BindingType::CombinedImageSampler,
                count: 1,
                stage_flags: ShaderStageFlags::FRAGMENT,
            },
        ];
        let base = BatchBase::new(
            context,
            desc.capacity,
            shaders,
            entries,
            desc.target,
            desc.clear,
        )?;

        // Two arenas of GROUPS_PER_FRAME groups each
        let max_groups = GROUPS_PER_FRAME * 2;
        let pool = context
            .renderer
            .lock()
            .unwrap()
            .create_binding_group_pool(&BindingGroupPoolDesc {
                sizes: vec![
                    (BindingType::UniformBuffer, max_groups as u32),
                    (BindingType::CombinedImageSampler, max_groups as u32),
                ],
                max_groups: max_groups as u32,
            })?;

        Ok(Self {
            base,
            dspool: SpriteDescriptorPool::new(pool, GROUPS_PER_FRAME),
            last_texture: None,
        })
    }

    /// Start a frame
    pub fn begin(
        &mut self,
        context: &RenderContext,
        wait_semaphores: &[Arc<dyn Semaphore>],
    ) -> Result<()> {
        self.base.begin(context, wait_semaphores)
    }

    /// Flush the pending sprites and end the frame
    ///
    /// # Returns
    ///
    /// The final semaphore of the frame, `None` when nothing was drawn.
    pub fn end(&mut self) -> Result<Option<Arc<dyn Semaphore>>> {
        self.flush()?;
        let semaphore = self.base.finish()?;
        self.dspool.reset();
        self.last_texture = None;
        Ok(semaphore)
    }

    /// Draw `texture` with the given parameters
    ///
    /// Switching textures flushes the sprites accumulated so far.
    pub fn draw(&mut self, texture: &Arc<dyn Texture>, params: &SpriteParams) -> Result<()> {
        if !self.base.is_drawing() {
            return Err(Error::NotDrawing);
        }

        match &self.last_texture {
            Some(last) if Arc::ptr_eq(last, texture) => {}
            Some(_) => self.flush()?,
            None => {}
        }
        self.last_texture = Some(Arc::clone(texture));

        let info = *texture.info();
        self.push_sprite(params, (info.width as f32, info.height as f32))
    }

    /// Draw a texture region; zero size defaults to the region's pixel size
    pub fn draw_region(&mut self, region: &TextureRegion, params: &SpriteParams) -> Result<()> {
        let params = SpriteParams {
            u: region.u,
            v: region.v,
            u2: region.u2,
            v2: region.v2,
            ..*params
        };
        let native = (region.width() as f32, region.height() as f32);

        if !self.base.is_drawing() {
            return Err(Error::NotDrawing);
        }
        match &self.last_texture {
            Some(last) if Arc::ptr_eq(last, &region.texture) => {}
            Some(_) => self.flush()?,
            None => {}
        }
        self.last_texture = Some(Arc::clone(&region.texture));

        self.push_sprite(&params, native)
    }

    /// Flush all pending sprites as one draw call
    pub fn flush(&mut self) -> Result<()> {
        if self.base.pending_quads() == 0 {
            return Ok(());
        }
        let texture = match &self.last_texture {
            Some(texture) => Arc::clone(texture),
            None => return Ok(()),
        };
        let context = match self.base.context() {
            Some(context) => context.clone(),
            None => return Err(Error::NotDrawing),
        };

        let group = self
            .dspool
            .pull(&context, self.base.layout(), self.base.uniform(), &texture)?;
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

    /// Sprites pushed since the last flush
    pub fn pending_sprites(&self) -> usize {
        self.base.pending_quads()
    }

    fn push_sprite(&mut self, params: &SpriteParams, native_size: (f32, f32)) -> Result<()> {
        let (mut width, mut height) = if params.width == 0.0 && params.height == 0.0 {
            native_size
        } else {
            (params.width, params.height)
        };
        width *= params.scale_x;
        height *= params.scale_y;

        let corners = quad_corners(params.x, params.y, width, height, params.rotation);
        let uvs = [
            [params.u, params.v],
            [params.u, params.v2],
            [params.u2, params.v2],
            [params.u2, params.v],
        ];

        let mut vertices = [SpriteVertex::zeroed(); 4];
        for i in 0..4 {
            vertices[i] = SpriteVertex {
                position: corners[i],
                uv: uvs[i],
                color: params.color,
            };
        }
        self.base.push_vertices(vertices)
    }
}

fn default_shaders() -> ShaderPair {
    ShaderPair {
        vertex: ShaderDesc::glsl(
            ShaderStage::Vertex,
            include_str!("shaders/sprite.vert.glsl"),
        ),
        fragment: ShaderDesc::glsl(
            ShaderStage::Fragment,
            include_str!("shaders/sprite.frag.glsl"),
        ),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "sprite_tests.rs"]
mod tests;
