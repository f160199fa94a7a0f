/// Renderer trait - main GPU resource factory and graphics queue interface

use std::sync::{Arc, Mutex};

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::renderer::{
    BindingGroup, BindingGroupLayout, BindingGroupLayoutDesc, BindingGroupPool,
    BindingGroupPoolDesc, BindingWrite, Buffer, BufferDesc, CommandList, Framebuffer,
    FramebufferDesc, Pipeline, PipelineDesc, RenderPass, RenderPassDesc, Semaphore, Shader,
    ShaderDesc, Texture, TextureDesc,
};

// ============================================================================
// Common types
// ============================================================================

/// Renderer configuration
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Enable validation/debug layers
    pub enable_validation: bool,
    /// Application name
    pub app_name: String,
    /// Application version (major, minor, patch)
    pub app_version: (u32, u32, u32),
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            enable_validation: cfg!(debug_assertions),
            app_name: "Nova2D Application".to_string(),
            app_version: (1, 0, 0),
        }
    }
}

/// Renderer statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct RendererStats {
    /// Number of draw calls this frame
    pub draw_calls: u32,
    /// Number of triangles drawn this frame
    pub triangles: u32,
    /// GPU memory used (bytes)
    pub gpu_memory_used: u64,
}

/// Pipeline stage a submission waits at for its wait semaphores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Top of the pipeline
    TopOfPipe,
    /// Vertex input fetch (batches wait here: vertex data is the first use)
    VertexInput,
    /// Color attachment writes
    ColorAttachmentOutput,
    /// Bottom of the pipeline
    BottomOfPipe,
}

/// One submission to the graphics queue
///
/// Submitting is an asynchronous enqueue: it returns as soon as the work is
/// queued, GPU execution being ordered only by the wait/signal semaphore sets.
pub struct SubmitDesc<'a> {
    /// Semaphores the GPU waits on before executing, at `wait_stage`
    pub wait_semaphores: &'a [Arc<dyn Semaphore>],
    /// Stage at which the wait semaphores block execution
    pub wait_stage: PipelineStage,
    /// Semaphores signaled when the command list finishes executing
    pub signal_semaphores: &'a [Arc<dyn Semaphore>],
    /// The recorded command list to execute
    pub command_list: &'a dyn CommandList,
}

// ============================================================================
// Renderer trait
// ============================================================================

/// Main renderer trait
///
/// This is the central factory interface for creating GPU resources and the
/// submission point for recorded command lists. Implemented by backend-specific
/// renderers (e.g., a Vulkan renderer plugin).
pub trait Renderer: Send + Sync {
    /// Create a buffer
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>>;

    /// Create a texture
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>>;

    /// Create a shader module
    fn create_shader(&mut self, desc: ShaderDesc) -> Result<Arc<dyn Shader>>;

    /// Create a render pass
    fn create_render_pass(&mut self, desc: &RenderPassDesc) -> Result<Arc<dyn RenderPass>>;

    /// Create a graphics pipeline
    fn create_pipeline(&mut self, desc: &PipelineDesc) -> Result<Arc<dyn Pipeline>>;

    /// Create a framebuffer
    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> Result<Arc<dyn Framebuffer>>;

    /// Create a binding group layout
    fn create_binding_group_layout(
        &mut self,
        desc: &BindingGroupLayoutDesc,
    ) -> Result<Arc<dyn BindingGroupLayout>>;

    /// Create a binding group pool
    fn create_binding_group_pool(
        &mut self,
        desc: &BindingGroupPoolDesc,
    ) -> Result<Box<dyn BindingGroupPool>>;

    /// Rewrite the contents of a binding group
    ///
    /// The group must not be in use by GPU work that is still pending.
    fn update_binding_group(
        &mut self,
        group: &Arc<dyn BindingGroup>,
        writes: &[BindingWrite],
    ) -> Result<()>;

    /// Create a command list (with its own transient command pool)
    fn create_command_list(&mut self) -> Result<Box<dyn CommandList>>;

    /// Create a semaphore
    fn create_semaphore(&mut self) -> Result<Arc<dyn Semaphore>>;

    /// Submit one recorded command list to the graphics queue
    ///
    /// Asynchronous: enqueues the work and returns without blocking.
    fn submit_to_graphics_queue(&mut self, submit: SubmitDesc<'_>) -> Result<()>;

    /// Wait for all GPU operations to complete
    fn wait_idle(&self) -> Result<()>;

    /// Get statistics about the renderer
    fn stats(&self) -> RendererStats;
}

// ============================================================================
// Plugin system for registering renderer backends
// ============================================================================

/// Renderer plugin factory function type
type RendererPluginFactory =
    Box<dyn Fn(RendererConfig) -> Result<Arc<Mutex<dyn Renderer>>> + Send + Sync>;

/// Plugin registry for renderer backends
pub struct RendererPluginRegistry {
    plugins: FxHashMap<&'static str, RendererPluginFactory>,
}

impl RendererPluginRegistry {
    /// Create a new plugin registry
    fn new() -> Self {
        Self {
            plugins: FxHashMap::default(),
        }
    }

    /// Register a plugin
    ///
    /// # Arguments
    ///
    /// * `name` - Plugin name (e.g., "vulkan")
    /// * `factory` - Factory function to create the plugin
    pub fn register_plugin<F>(&mut self, name: &'static str, factory: F)
    where
        F: Fn(RendererConfig) -> Result<Arc<Mutex<dyn Renderer>>> + Send + Sync + 'static,
    {
        self.plugins.insert(name, Box::new(factory));
        crate::engine_info!("nova2d::Renderer", "Registered renderer plugin '{}'", name);
    }

    /// Create a renderer using a registered plugin
    ///
    /// # Arguments
    ///
    /// * `plugin_name` - Name of the plugin to use
    /// * `config` - Renderer configuration
    ///
    /// # Returns
    ///
    /// A shared, thread-safe renderer instance
    pub fn create_renderer(
        &self,
        plugin_name: &str,
        config: RendererConfig,
    ) -> Result<Arc<Mutex<dyn Renderer>>> {
        self.plugins
            .get(plugin_name)
            .ok_or_else(|| {
                Error::InitializationFailed(format!("Plugin '{}' not found", plugin_name))
            })?(config)
    }
}

static RENDERER_REGISTRY: Mutex<Option<RendererPluginRegistry>> = Mutex::new(None);

/// Get the global renderer plugin registry
pub fn renderer_plugin_registry() -> &'static Mutex<Option<RendererPluginRegistry>> {
    // Initialize on first access
    let mut registry = RENDERER_REGISTRY.lock().unwrap();
    if registry.is_none() {
        *registry = Some(RendererPluginRegistry::new());
    }
    drop(registry);
    &RENDERER_REGISTRY
}

/// Register a renderer plugin in the global registry
///
/// # Arguments
///
/// * `name` - Plugin name
/// * `factory` - Factory function
pub fn register_renderer_plugin<F>(name: &'static str, factory: F)
where
    F: Fn(RendererConfig) -> Result<Arc<Mutex<dyn Renderer>>> + Send + Sync + 'static,
{
    renderer_plugin_registry()
        .lock()
        .unwrap()
        .as_mut()
        .unwrap()
        .register_plugin(name, factory);
}
