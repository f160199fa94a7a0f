/// BindingGroup traits and descriptors
///
/// A BindingGroup is a set of GPU resource bindings (uniform buffers, textures).
/// It is Nova2D's abstraction over GPU descriptor sets. Unlike an immutable
/// bind-group model, groups allocated from a `BindingGroupPool` may be rewritten
/// between uses via `Renderer::update_binding_group` - the sprite batch relies on
/// this to rebind one texture per flush from a double-buffered pool.

use std::sync::Arc;

use bitflags::bitflags;

use crate::error::Result;
use crate::renderer::{Buffer, SamplerType, ShaderStage, Texture};

// ============================================================================
// Binding types and layout description
// ============================================================================

/// Type of resource bound at a given slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingType {
    /// Uniform buffer (read-only structured data)
    UniformBuffer,
    /// Combined image sampler (texture + sampler in one binding)
    CombinedImageSampler,
}

bitflags! {
    /// Shader stage visibility flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ShaderStageFlags: u32 {
        const VERTEX = 0x01;
        const FRAGMENT = 0x02;
    }
}

impl ShaderStageFlags {
    /// Create from a slice of ShaderStage
    pub fn from_stages(stages: &[ShaderStage]) -> Self {
        let mut flags = ShaderStageFlags::empty();
        for stage in stages {
            flags |= match stage {
                ShaderStage::Vertex => ShaderStageFlags::VERTEX,
                ShaderStage::Fragment => ShaderStageFlags::FRAGMENT,
            };
        }
        flags
    }
}

/// Description of a single binding slot within a BindingGroupLayout
#[derive(Debug, Clone)]
pub struct BindingSlotDesc {
    /// Binding number (corresponds to `layout(binding = N)` in GLSL)
    pub binding: u32,
    /// Type of resource at this binding
    pub binding_type: BindingType,
    /// Number of descriptors at this binding (>1 for arrays)
    pub count: u32,
    /// Shader stages that access this binding
    pub stage_flags: ShaderStageFlags,
}

/// Description of a BindingGroup layout (blueprint for a set of bindings)
#[derive(Debug, Clone)]
pub struct BindingGroupLayoutDesc {
    /// Binding slot descriptions
    pub entries: Vec<BindingSlotDesc>,
}

/// Binding group layout trait
///
/// The backend creates the actual GPU layout object from the description.
pub trait BindingGroupLayout: Send + Sync {}

// ============================================================================
// Pool
// ============================================================================

/// Descriptor for creating a binding group pool
#[derive(Debug, Clone)]
pub struct BindingGroupPoolDesc {
    /// Descriptor budget per binding type
    pub sizes: Vec<(BindingType, u32)>,
    /// Maximum number of groups allocatable from the pool
    pub max_groups: u32,
}

/// Pool from which binding groups are allocated
///
/// Allocation is the only operation; groups are recycled by rewriting them, not
/// by returning them to the pool. Dropping the pool frees all its groups.
pub trait BindingGroupPool: Send + Sync {
    /// Allocate one binding group matching `layout`
    ///
    /// # Arguments
    ///
    /// * `layout` - The layout the group must conform to
    fn allocate(&mut self, layout: &Arc<dyn BindingGroupLayout>) -> Result<Arc<dyn BindingGroup>>;
}

// ============================================================================
// Binding resources (concrete data written into a group)
// ============================================================================

/// A concrete resource to write into a binding slot
#[derive(Clone)]
pub enum BindingResource {
    /// Uniform buffer range
    UniformBuffer {
        /// The buffer to bind
        buffer: Arc<dyn Buffer>,
        /// Offset into the buffer in bytes
        offset: u64,
        /// Bound range size in bytes
        size: u64,
    },
    /// Sampled texture (the backend resolves the actual GPU sampler from the type)
    CombinedImageSampler {
        /// The texture to bind
        texture: Arc<dyn Texture>,
        /// Sampler filtering behavior
        sampler: SamplerType,
    },
}

/// One write into a binding group slot
#[derive(Clone)]
pub struct BindingWrite {
    /// Binding number to write
    pub binding: u32,
    /// Resource to bind there
    pub resource: BindingResource,
}

// ============================================================================
// BindingGroup trait
// ============================================================================

/// A set of GPU resource bindings, bindable at one set index during recording
///
/// Contents are written through `Renderer::update_binding_group`. A group must
/// not be rewritten while a previously submitted command buffer that reads it
/// may still execute; the batch layer sequences this via its semaphore chain.
pub trait BindingGroup: Send + Sync {}
