/// BatchBase - shared quad batching core for sprite and block batches
///
/// Owns the quad mesh, the matrix uniform block, the command chain, and the
/// render pass / pipeline / framebuffer triple bound to the output target.
/// Concrete batches push 4 vertices per quad and flush through it; indices are
/// pre-built once as the quad pattern `[4k, 4k+1, 4k+2, 4k+2, 4k+3, 4k]`.

use std::sync::Arc;

use bytemuck::Pod;
use glam::Mat4;

use crate::error::{Error, Result};
use crate::graphic::{Mesh, UniformBlock, UniformDataType, UniformShape, VertexType};
use crate::renderer::{
    AttachmentDesc, BindingGroup, BindingGroupLayout, BindingGroupLayoutDesc, BindingSlotDesc,
    BlendState, ClearValue, CullMode, Framebuffer, FramebufferDesc, FrontFace, ImageLayout,
    LoadOp, Pipeline, PipelineDesc, PrimitiveTopology, Rect2D, RenderContext, RenderPass,
    RenderPassDesc, RenderTarget, Semaphore, Shader, ShaderDesc, StoreOp,
};

use super::CommandChain;

// ============================================================================
// Geometry helpers
// ============================================================================

/// Corner positions of a quad, in top-left, bottom-left, bottom-right,
/// top-right order
///
/// Rotation is in radians, clockwise-positive in y-down screen coordinates,
/// about the quad center. A rotation of exactly zero takes a fast path that
/// returns the axis-aligned corners untouched by any trigonometry.
pub fn quad_corners(x: f32, y: f32, width: f32, height: f32, rotation: f32) -> [[f32; 2]; 4] {
    if rotation == 0.0 {
        return [
            [x, y],
            [x, y + height],
            [x + width, y + height],
            [x + width, y],
        ];
    }

    let half_w = width / 2.0;
    let half_h = height / 2.0;
    let center_x = x + half_w;
    let center_y = y + half_h;
    let (sin, cos) = rotation.sin_cos();

    let rotate = |dx: f32, dy: f32| {
        [
            center_x + dx * cos - dy * sin,
            center_y + dx * sin + dy * cos,
        ]
    };

    [
        rotate(-half_w, -half_h),
        rotate(-half_w, half_h),
        rotate(half_w, half_h),
        rotate(half_w, -half_h),
    ]
}

/// Orthographic projection for a y-down 2D pixel space
pub fn orthographic_2d(x: f32, y: f32, width: f32, height: f32) -> Mat4 {
    Mat4::orthographic_rh(x, x + width, y + height, y, 0.0, 1.0)
}

// ============================================================================
// Shader pair
// ============================================================================

/// Vertex and fragment shader sources for a batch pipeline
#[derive(Clone)]
pub struct ShaderPair {
    pub vertex: ShaderDesc,
    pub fragment: ShaderDesc,
}

// ============================================================================
// Target binding
// ============================================================================

/// Render pass, pipeline, and framebuffer bound to one output target
///
/// Replaced as a whole on `reload`: the new triple is fully built before the
/// old one is dropped, so a failed rebuild leaves the previous binding intact.
struct TargetBinding {
    render_pass: Arc<dyn RenderPass>,
    pipeline: Arc<dyn Pipeline>,
    framebuffer: Arc<dyn Framebuffer>,
}

// ============================================================================
// BatchBase
// ============================================================================

pub struct BatchBase<V: Pod + VertexType> {
    mesh: Mesh<V>,
    uniform: UniformBlock,
    chain: CommandChain,
    layout: Arc<dyn BindingGroupLayout>,
    vertex_shader: Arc<dyn Shader>,
    fragment_shader: Arc<dyn Shader>,
    binding: TargetBinding,
    out_target: Arc<dyn RenderTarget>,
    custom_target: bool,
    clear: Option<[f32; 4]>,
    /// Quad capacity
    capacity: usize,
    /// Next free vertex slot; always a multiple of 4
    cursor: usize,
    drawing: bool,
    context: Option<RenderContext>,
    projection: Mat4,
    transform: Mat4,
    combined: Mat4,
    matrices_dirty: bool,
    reload_count: u64,
}

impl<V: Pod + VertexType> BatchBase<V> {
    /// Create the shared batch core
    ///
    /// # Arguments
    ///
    /// * `context` - Render context used to create every GPU resource
    /// * `capacity` - Maximum quads per flush
    /// * `shaders` - Pipeline shader sources
    /// * `layout_entries` - Binding group layout of set 0
    /// * `target` - Explicit output target; defaults to the context target
    /// * `clear` - Clear color; `None` loads the existing target contents
    pub fn new(
        context: &RenderContext,
        capacity: usize,
        shaders: ShaderPair,
        layout_entries: Vec<BindingSlotDesc>,
        target: Option<Arc<dyn RenderTarget>>,
        clear: Option<[f32; 4]>,
    ) -> Result<Self> {
        let mut mesh = Mesh::new(context, capacity * 4, capacity * 6)?;
        let mut indices = Vec::with_capacity(capacity * 6);
        for quad in 0..capacity {
            let first = (quad * 4) as u16;
            indices.extend_from_slice(&[first, first + 1, first + 2, first + 2, first + 3, first]);
        }
        mesh.set_indices(&indices)?;

        let uniform =
            UniformBlock::new(context, &[(UniformShape::Matrix4, UniformDataType::Float)])?;

        let custom_target = target.is_some();
        let out_target = target.unwrap_or_else(|| Arc::clone(&context.target));

        let (vertex_shader, fragment_shader, layout) = {
            let mut renderer = context.renderer.lock().unwrap();
            (
                renderer.create_shader(shaders.vertex.clone())?,
                renderer.create_shader(shaders.fragment.clone())?,
                renderer.create_binding_group_layout(&BindingGroupLayoutDesc {
                    entries: layout_entries,
                })?,
            )
        };

        let binding = build_target_binding::<V>(
            context,
            &vertex_shader,
            &fragment_shader,
            &layout,
            &out_target,
            clear.is_some(),
        )?;

        let projection =
            orthographic_2d(0.0, 0.0, out_target.width() as f32, out_target.height() as f32);
        let transform = Mat4::IDENTITY;

        Ok(Self {
            mesh,
            uniform,
            chain: CommandChain::new(),
            layout,
            vertex_shader,
            fragment_shader,
            binding,
            out_target,
            custom_target,
            clear,
            capacity,
            cursor: 0,
            drawing: false,
            context: None,
            projection,
            transform,
            combined: projection,
            matrices_dirty: true,
            reload_count: context.reload_count,
        })
    }

    /// Quad capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Quads pushed since the last flush
    pub fn pending_quads(&self) -> usize {
        self.cursor / 4
    }

    /// Whether the batch is between `begin` and `finish`
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Current projection matrix
    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// Reload generation this batch's resources were built against
    pub fn reload_count(&self) -> u64 {
        self.reload_count
    }

    /// Binding group layout of set 0
    pub fn layout(&self) -> &Arc<dyn BindingGroupLayout> {
        &self.layout
    }

    /// Matrix uniform block
    pub fn uniform(&self) -> &UniformBlock {
        &self.uniform
    }

    /// Context of the active frame
    pub fn context(&self) -> Option<&RenderContext> {
        self.context.as_ref()
    }

    /// Start a frame
    ///
    /// Re-checks the reload generation, uploads the combined matrix when it
    /// changed, and opens the command chain.
    pub fn begin(
        &mut self,
        context: &RenderContext,
        wait_semaphores: &[Arc<dyn Semaphore>],
    ) -> Result<()> {
        if self.drawing {
            return Err(Error::AlreadyDrawing);
        }
        if context.reload_count != self.reload_count {
            return Err(Error::StaleBatch {
                batch: self.reload_count,
                context: context.reload_count,
            });
        }

        if self.matrices_dirty {
            self.uniform
                .set_uniform(0, &self.combined.to_cols_array())?;
            self.matrices_dirty = false;
        }
        self.uniform.upload()?;

        self.chain.begin(context, wait_semaphores)?;
        self.context = Some(context.clone());
        self.drawing = true;
        self.cursor = 0;
        Ok(())
    }

    /// End the frame; the caller flushes pending quads first
    ///
    /// # Returns
    ///
    /// The final semaphore of the frame's submission chain, `None` when
    /// nothing was submitted.
    pub fn finish(&mut self) -> Result<Option<Arc<dyn Semaphore>>> {
        if !self.drawing {
            return Err(Error::NotDrawing);
        }
        self.drawing = false;
        self.context = None;
        self.chain.end()
    }

    /// Push the 4 vertices of one quad
    ///
    /// Fails with `BatchFull` rather than overrunning the vertex array; the
    /// caller decides whether to flush and retry.
    pub fn push_vertices(&mut self, vertices: [V; 4]) -> Result<()> {
        if !self.drawing {
            return Err(Error::NotDrawing);
        }
        if self.cursor + 4 > self.capacity * 4 {
            return Err(Error::BatchFull {
                capacity: self.capacity,
            });
        }
        for (i, vertex) in vertices.into_iter().enumerate() {
            self.mesh.set_vertex(self.cursor + i, vertex)?;
        }
        self.cursor += 4;
        Ok(())
    }

    /// Flush all pending quads as one chained submission
    ///
    /// A flush with nothing pending is a no-op: no upload, no submission.
    ///
    /// # Arguments
    ///
    /// * `binding_group` - Set 0 bindings for this draw
    pub fn flush_quads(&mut self, binding_group: &Arc<dyn BindingGroup>) -> Result<()> {
        if !self.drawing {
            return Err(Error::NotDrawing);
        }
        if self.cursor == 0 {
            return Ok(());
        }

        self.mesh.upload()?;
        let index_count = (self.cursor / 4 * 6) as u32;
        let render_area = Rect2D {
            x: 0,
            y: 0,
            width: self.out_target.width(),
            height: self.out_target.height(),
        };
        let clear_values = match self.clear {
            Some(color) => vec![ClearValue::Color(color)],
            None => Vec::new(),
        };

        let mesh = &self.mesh;
        let binding = &self.binding;
        self.chain.record(|cmd| {
            cmd.begin_render_pass(
                &binding.render_pass,
                &binding.framebuffer,
                render_area,
                &clear_values,
            )?;
            cmd.bind_pipeline(&binding.pipeline)?;
            mesh.bind(cmd)?;
            cmd.bind_binding_group(&binding.pipeline, 0, binding_group)?;
            mesh.draw(cmd, index_count, 0)?;
            cmd.end_render_pass()
        })?;

        self.cursor = 0;
        Ok(())
    }

    /// Replace the model transform; takes effect at the next `begin`
    pub fn update_transform(&mut self, transform: &Mat4) {
        self.transform = *transform;
        self.combined = self.projection * self.transform;
        self.matrices_dirty = true;
    }

    /// Replace the projection; takes effect at the next `begin`
    pub fn update_projection(&mut self, projection: &Mat4) {
        self.projection = *projection;
        self.combined = self.projection * self.transform;
        self.matrices_dirty = true;
    }

    /// Rebuild target-dependent resources after the context reloaded
    ///
    /// Recomputes the orthographic projection for the new extent (unless the
    /// batch renders to an explicit custom target), rebuilds the render pass /
    /// pipeline / framebuffer triple, and adopts the context's generation.
    pub fn reload(&mut self, context: &RenderContext) -> Result<()> {
        if self.drawing {
            return Err(Error::AlreadyDrawing);
        }

        if !self.custom_target {
            self.out_target = Arc::clone(&context.target);
            self.projection = orthographic_2d(
                0.0,
                0.0,
                self.out_target.width() as f32,
                self.out_target.height() as f32,
            );
            self.combined = self.projection * self.transform;
            self.matrices_dirty = true;
        }

        // Build the replacement triple completely before swapping it in
        let binding = build_target_binding::<V>(
            context,
            &self.vertex_shader,
            &self.fragment_shader,
            &self.layout,
            &self.out_target,
            self.clear.is_some(),
        )?;
        self.binding = binding;
        self.reload_count = context.reload_count;
        crate::engine_info!(
            "nova2d::BatchBase",
            "Reloaded target binding ({}x{}, generation {})",
            self.out_target.width(),
            self.out_target.height(),
            self.reload_count
        );
        Ok(())
    }
}

fn build_target_binding<V: Pod + VertexType>(
    context: &RenderContext,
    vertex_shader: &Arc<dyn Shader>,
    fragment_shader: &Arc<dyn Shader>,
    layout: &Arc<dyn BindingGroupLayout>,
    target: &Arc<dyn RenderTarget>,
    clears: bool,
) -> Result<TargetBinding> {
    let mut renderer = context.renderer.lock().unwrap();

    let (load_op, initial_layout) = if clears {
        (LoadOp::Clear, ImageLayout::Undefined)
    } else {
        (LoadOp::Load, ImageLayout::ColorAttachment)
    };
    let render_pass = renderer.create_render_pass(&RenderPassDesc {
        color_attachments: vec![AttachmentDesc {
            format: target.format(),
            samples: 1,
            load_op,
            store_op: StoreOp::Store,
            initial_layout,
            final_layout: ImageLayout::ColorAttachment,
        }],
    })?;

    let pipeline = renderer.create_pipeline(&PipelineDesc {
        vertex_shader: Arc::clone(vertex_shader),
        fragment_shader: Arc::clone(fragment_shader),
        vertex_attributes: V::attributes(),
        topology: PrimitiveTopology::TriangleList,
        cull_mode: CullMode::None,
        front_face: FrontFace::CounterClockwise,
        blend: BlendState::alpha(),
        extent: (target.width(), target.height()),
        render_pass: Arc::clone(&render_pass),
        binding_layouts: vec![Arc::clone(layout)],
    })?;

    let framebuffer = renderer.create_framebuffer(&FramebufferDesc {
        render_pass: Arc::clone(&render_pass),
        attachments: vec![Arc::clone(target)],
        width: target.width(),
        height: target.height(),
    })?;

    Ok(TargetBinding {
        render_pass,
        pipeline,
        framebuffer,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "base_tests.rs"]
mod tests;
