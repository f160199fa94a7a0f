/// Mock Renderer for unit tests (no GPU required)
///
/// This mock renderer allows testing the batching layer and other components
/// without requiring a real GPU or graphics backend. Every command list created
/// by a MockRenderer records into one shared command log, and every queue
/// submission is captured with its wait/signal semaphore sets so tests can
/// verify chaining via `Arc::ptr_eq`.

use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::renderer::{
    BindingGroup, BindingGroupLayout, BindingGroupLayoutDesc, BindingGroupPool,
    BindingGroupPoolDesc, BindingWrite, Buffer, BufferDesc, ClearValue, CommandList, Framebuffer,
    FramebufferDesc, IndexType, Pipeline, PipelineDesc, PipelineStage, Rect2D, Renderer,
    RendererStats, RenderPass, RenderPassDesc, RenderTarget, Semaphore, Shader, ShaderDesc,
    SubmitDesc, Texture, TextureDesc, TextureFormat, TextureInfo,
};

// ============================================================================
// Mock Buffer
// ============================================================================

#[derive(Debug)]
pub struct MockBuffer {
    pub size: u64,
    pub name: String,
    /// Recorded update calls as (offset, payload bytes)
    pub updates: Mutex<Vec<(u64, Vec<u8>)>>,
}

impl MockBuffer {
    pub fn new(size: u64, name: String) -> Self {
        Self {
            size,
            name,
            updates: Mutex::new(Vec::new()),
        }
    }
}

impl Buffer for MockBuffer {
    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        self.updates.lock().unwrap().push((offset, data.to_vec()));
        Ok(())
    }

    fn size(&self) -> u64 {
        self.size
    }
}

// ============================================================================
// Mock Texture
// ============================================================================

#[derive(Debug)]
pub struct MockTexture {
    pub info: TextureInfo,
    pub name: String,
}

impl MockTexture {
    pub fn new(width: u32, height: u32, name: String) -> Self {
        Self {
            info: TextureInfo {
                width,
                height,
                format: TextureFormat::R8G8B8A8_UNORM,
                usage: crate::renderer::TextureUsage::Sampled,
            },
            name,
        }
    }
}

impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }
}

// ============================================================================
// Mock Shader
// ============================================================================

#[derive(Debug)]
pub struct MockShader {
    pub stage: crate::renderer::ShaderStage,
    pub name: String,
}

impl MockShader {
    pub fn new(stage: crate::renderer::ShaderStage, name: String) -> Self {
        Self { stage, name }
    }
}

impl Shader for MockShader {
    fn stage(&self) -> crate::renderer::ShaderStage {
        self.stage
    }
}

// ============================================================================
// Mock Pipeline
// ============================================================================

#[derive(Debug)]
pub struct MockPipeline {
    pub name: String,
}

impl MockPipeline {
    pub fn new(name: String) -> Self {
        Self { name }
    }
}

impl Pipeline for MockPipeline {}

// ============================================================================
// Mock RenderPass / RenderTarget / Framebuffer
// ============================================================================

#[derive(Debug)]
pub struct MockRenderPass;

impl RenderPass for MockRenderPass {}

#[derive(Debug)]
pub struct MockRenderTarget {
    pub width: u32,
    pub height: u32,
}

impl MockRenderTarget {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl RenderTarget for MockRenderTarget {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn format(&self) -> TextureFormat {
        TextureFormat::B8G8R8A8_UNORM
    }
}

#[derive(Debug)]
pub struct MockFramebuffer {
    pub width: u32,
    pub height: u32,
}

impl MockFramebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Framebuffer for MockFramebuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

// ============================================================================
// Mock Semaphore
// ============================================================================

#[derive(Debug)]
pub struct MockSemaphore {
    pub id: u64,
}

impl Semaphore for MockSemaphore {}

// ============================================================================
// Mock BindingGroup / layout / pool
// ============================================================================

#[derive(Debug)]
pub struct MockBindingGroupLayout {
    pub binding_count: usize,
}

impl BindingGroupLayout for MockBindingGroupLayout {}

#[derive(Debug)]
pub struct MockBindingGroup {
    pub name: String,
}

impl BindingGroup for MockBindingGroup {}

pub struct MockBindingGroupPool {
    pub max_groups: u32,
    /// Shared with the creating MockRenderer: total groups allocated
    pub allocations: Arc<Mutex<u32>>,
}

impl BindingGroupPool for MockBindingGroupPool {
    fn allocate(&mut self, _layout: &Arc<dyn BindingGroupLayout>) -> Result<Arc<dyn BindingGroup>> {
        let mut count = self.allocations.lock().unwrap();
        *count += 1;
        Ok(Arc::new(MockBindingGroup {
            name: format!("binding_group_{}", *count),
        }))
    }
}

// ============================================================================
// Mock CommandList
// ============================================================================

/// Records command names into a log shared by all lists from one MockRenderer
pub struct MockCommandList {
    pub log: Arc<Mutex<Vec<String>>>,
}

impl MockCommandList {
    fn push(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

impl CommandList for MockCommandList {
    fn begin(&mut self) -> Result<()> {
        self.push("begin".to_string());
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.push("end".to_string());
        Ok(())
    }

    fn begin_render_pass(
        &mut self,
        _render_pass: &Arc<dyn RenderPass>,
        _framebuffer: &Arc<dyn Framebuffer>,
        render_area: Rect2D,
        _clear_values: &[ClearValue],
    ) -> Result<()> {
        self.push(format!(
            "begin_render_pass {}x{}",
            render_area.width, render_area.height
        ));
        Ok(())
    }

    fn end_render_pass(&mut self) -> Result<()> {
        self.push("end_render_pass".to_string());
        Ok(())
    }

    fn bind_pipeline(&mut self, _pipeline: &Arc<dyn Pipeline>) -> Result<()> {
        self.push("bind_pipeline".to_string());
        Ok(())
    }

    fn bind_binding_group(
        &mut self,
        _pipeline: &Arc<dyn Pipeline>,
        set_index: u32,
        _binding_group: &Arc<dyn BindingGroup>,
    ) -> Result<()> {
        self.push(format!("bind_binding_group set{}", set_index));
        Ok(())
    }

    fn bind_vertex_buffer(&mut self, _buffer: &Arc<dyn Buffer>, offset: u64) -> Result<()> {
        self.push(format!("bind_vertex_buffer offset{}", offset));
        Ok(())
    }

    fn bind_index_buffer(
        &mut self,
        _buffer: &Arc<dyn Buffer>,
        offset: u64,
        _index_type: IndexType,
    ) -> Result<()> {
        self.push(format!("bind_index_buffer offset{}", offset));
        Ok(())
    }

    fn draw(&mut self, vertex_count: u32, first_vertex: u32) -> Result<()> {
        self.push(format!("draw {} {}", vertex_count, first_vertex));
        Ok(())
    }

    fn draw_indexed(
        &mut self,
        index_count: u32,
        first_index: u32,
        vertex_offset: i32,
    ) -> Result<()> {
        self.push(format!(
            "draw_indexed {} {} {}",
            index_count, first_index, vertex_offset
        ));
        Ok(())
    }
}

// ============================================================================
// Mock Renderer
// ============================================================================

/// One captured graphics queue submission
#[derive(Clone)]
pub struct MockSubmission {
    pub wait_semaphores: Vec<Arc<dyn Semaphore>>,
    pub wait_stage: PipelineStage,
    pub signal_semaphores: Vec<Arc<dyn Semaphore>>,
}

/// Mock Renderer that tracks created resources and submissions without GPU
pub struct MockRenderer {
    /// Track created buffers
    pub created_buffers: Arc<Mutex<Vec<String>>>,
    /// Concrete handles to created buffers, for payload inspection
    pub buffer_handles: Arc<Mutex<Vec<Arc<MockBuffer>>>>,
    /// Track created textures
    pub created_textures: Arc<Mutex<Vec<String>>>,
    /// Track created shaders
    pub created_shaders: Arc<Mutex<Vec<String>>>,
    /// Track created pipelines
    pub created_pipelines: Arc<Mutex<Vec<String>>>,
    /// Track created render passes
    pub created_render_passes: Arc<Mutex<u32>>,
    /// Track created framebuffers
    pub created_framebuffers: Arc<Mutex<u32>>,
    /// Number of command lists handed out
    pub command_lists_created: Arc<Mutex<u32>>,
    /// Number of semaphores handed out
    pub semaphores_created: Arc<Mutex<u32>>,
    /// Total binding groups allocated across all pools from this renderer
    pub pool_allocations: Arc<Mutex<u32>>,
    /// Recorded `update_binding_group` calls as binding numbers written
    pub binding_updates: Arc<Mutex<Vec<Vec<u32>>>>,
    /// Command log shared by every command list from this renderer
    pub command_log: Arc<Mutex<Vec<String>>>,
    /// Captured queue submissions, in submit order
    pub submissions: Arc<Mutex<Vec<MockSubmission>>>,
}

impl MockRenderer {
    /// Create a new mock renderer
    pub fn new() -> Self {
        Self {
            created_buffers: Arc::new(Mutex::new(Vec::new())),
            buffer_handles: Arc::new(Mutex::new(Vec::new())),
            created_textures: Arc::new(Mutex::new(Vec::new())),
            created_shaders: Arc::new(Mutex::new(Vec::new())),
            created_pipelines: Arc::new(Mutex::new(Vec::new())),
            created_render_passes: Arc::new(Mutex::new(0)),
            created_framebuffers: Arc::new(Mutex::new(0)),
            command_lists_created: Arc::new(Mutex::new(0)),
            semaphores_created: Arc::new(Mutex::new(0)),
            pool_allocations: Arc::new(Mutex::new(0)),
            binding_updates: Arc::new(Mutex::new(Vec::new())),
            command_log: Arc::new(Mutex::new(Vec::new())),
            submissions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get names of created buffers
    pub fn get_created_buffers(&self) -> Vec<String> {
        self.created_buffers.lock().unwrap().clone()
    }

    /// Get names of created shaders
    pub fn get_created_shaders(&self) -> Vec<String> {
        self.created_shaders.lock().unwrap().clone()
    }

    /// Find a created buffer by name
    pub fn find_buffer(&self, name: &str) -> Option<Arc<MockBuffer>> {
        self.buffer_handles
            .lock()
            .unwrap()
            .iter()
            .find(|buffer| buffer.name == name)
            .cloned()
    }

    /// Get the shared command log
    pub fn get_command_log(&self) -> Vec<String> {
        self.command_log.lock().unwrap().clone()
    }

    /// Get captured submissions
    pub fn get_submissions(&self) -> Vec<MockSubmission> {
        self.submissions.lock().unwrap().clone()
    }
}

impl Renderer for MockRenderer {
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>> {
        let name = format!("buffer_{}", desc.size);
        self.created_buffers.lock().unwrap().push(name.clone());
        let buffer = Arc::new(MockBuffer::new(desc.size, name));
        self.buffer_handles.lock().unwrap().push(Arc::clone(&buffer));
        Ok(buffer)
    }

    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>> {
        let name = format!("texture_{}x{}", desc.width, desc.height);
        self.created_textures.lock().unwrap().push(name.clone());
        Ok(Arc::new(MockTexture::new(desc.width, desc.height, name)))
    }

    fn create_shader(&mut self, desc: ShaderDesc) -> Result<Arc<dyn Shader>> {
        let name = format!("shader_{:?}", desc.stage);
        self.created_shaders.lock().unwrap().push(name.clone());
        Ok(Arc::new(MockShader::new(desc.stage, name)))
    }

    fn create_render_pass(&mut self, _desc: &RenderPassDesc) -> Result<Arc<dyn RenderPass>> {
        *self.created_render_passes.lock().unwrap() += 1;
        Ok(Arc::new(MockRenderPass))
    }

    fn create_pipeline(&mut self, desc: &PipelineDesc) -> Result<Arc<dyn Pipeline>> {
        let name = format!("pipeline_{}x{}", desc.extent.0, desc.extent.1);
        self.created_pipelines.lock().unwrap().push(name.clone());
        Ok(Arc::new(MockPipeline::new(name)))
    }

    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> Result<Arc<dyn Framebuffer>> {
        *self.created_framebuffers.lock().unwrap() += 1;
        Ok(Arc::new(MockFramebuffer::new(desc.width, desc.height)))
    }

    fn create_binding_group_layout(
        &mut self,
        desc: &BindingGroupLayoutDesc,
    ) -> Result<Arc<dyn BindingGroupLayout>> {
        Ok(Arc::new(MockBindingGroupLayout {
            binding_count: desc.entries.len(),
        }))
    }

    fn create_binding_group_pool(
        &mut self,
        desc: &BindingGroupPoolDesc,
    ) -> Result<Box<dyn BindingGroupPool>> {
        Ok(Box::new(MockBindingGroupPool {
            max_groups: desc.max_groups,
            allocations: Arc::clone(&self.pool_allocations),
        }))
    }

    fn update_binding_group(
        &mut self,
        _group: &Arc<dyn BindingGroup>,
        writes: &[BindingWrite],
    ) -> Result<()> {
        self.binding_updates
            .lock()
            .unwrap()
            .push(writes.iter().map(|w| w.binding).collect());
        Ok(())
    }

    fn create_command_list(&mut self) -> Result<Box<dyn CommandList>> {
        *self.command_lists_created.lock().unwrap() += 1;
        Ok(Box::new(MockCommandList {
            log: Arc::clone(&self.command_log),
        }))
    }

    fn create_semaphore(&mut self) -> Result<Arc<dyn Semaphore>> {
        let mut count = self.semaphores_created.lock().unwrap();
        *count += 1;
        Ok(Arc::new(MockSemaphore { id: *count as u64 }))
    }

    fn submit_to_graphics_queue(&mut self, submit: SubmitDesc<'_>) -> Result<()> {
        self.submissions.lock().unwrap().push(MockSubmission {
            wait_semaphores: submit.wait_semaphores.to_vec(),
            wait_stage: submit.wait_stage,
            signal_semaphores: submit.signal_semaphores.to_vec(),
        });
        Ok(())
    }

    fn wait_idle(&self) -> Result<()> {
        Ok(())
    }

    fn stats(&self) -> RendererStats {
        RendererStats::default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_renderer_tests.rs"]
mod tests;
