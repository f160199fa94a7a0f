/// Pipeline trait and pipeline descriptor

use std::sync::Arc;

use crate::renderer::{BindingGroupLayout, RenderPass, Shader};

/// Primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    /// Triangle list
    TriangleList,
    /// Triangle strip
    TriangleStrip,
    /// Line list
    LineList,
}

/// Index buffer element type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    /// 16-bit indices (max 65536 vertices)
    U16,
    /// 32-bit indices
    U32,
}

impl IndexType {
    /// Size in bytes of one index element
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

/// Vertex attribute format (data type and component count)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum VertexFormat {
    R32_SFLOAT,
    R32G32_SFLOAT,
    R32G32B32_SFLOAT,
    R32G32B32A32_SFLOAT,
}

impl VertexFormat {
    /// Size in bytes of one attribute of this format
    pub fn size_bytes(&self) -> u32 {
        match self {
            VertexFormat::R32_SFLOAT => 4,
            VertexFormat::R32G32_SFLOAT => 8,
            VertexFormat::R32G32B32_SFLOAT => 12,
            VertexFormat::R32G32B32A32_SFLOAT => 16,
        }
    }

    /// Number of components of this format
    pub fn components(&self) -> u32 {
        match self {
            VertexFormat::R32_SFLOAT => 1,
            VertexFormat::R32G32_SFLOAT => 2,
            VertexFormat::R32G32B32_SFLOAT => 3,
            VertexFormat::R32G32B32A32_SFLOAT => 4,
        }
    }
}

/// Vertex attribute description
#[derive(Debug, Clone, Copy)]
pub struct VertexAttribute {
    /// Attribute location in shader
    pub location: u32,
    /// Format of the attribute
    pub format: VertexFormat,
    /// Offset in bytes from the start of the vertex
    pub offset: u32,
}

/// Interleaved vertex attribute layout for one vertex binding
///
/// Offsets are computed by cumulative sum over the declaration order, which must
/// match the attribute order in the vertex shader.
#[derive(Debug, Clone)]
pub struct VertexAttributes {
    attributes: Vec<VertexAttribute>,
    stride: u32,
}

impl VertexAttributes {
    /// Build a layout from `(location, format)` pairs in shader declaration order
    pub fn new(formats: &[(u32, VertexFormat)]) -> Self {
        let mut attributes = Vec::with_capacity(formats.len());
        let mut offset = 0;
        for &(location, format) in formats {
            attributes.push(VertexAttribute {
                location,
                format,
                offset,
            });
            offset += format.size_bytes();
        }
        Self {
            attributes,
            stride: offset,
        }
    }

    /// Stride in bytes between consecutive vertices
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Attribute descriptions in declaration order
    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }
}

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    /// No culling
    None,
    /// Cull front faces
    Front,
    /// Cull back faces
    Back,
}

/// Front face winding order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontFace {
    /// Counter-clockwise vertices define front face
    CounterClockwise,
    /// Clockwise vertices define front face
    Clockwise,
}

/// Blend factor for color blending equations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
}

/// Blend operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendOp {
    /// result = src * srcFactor + dst * dstFactor
    Add,
    /// result = src * srcFactor - dst * dstFactor
    Subtract,
}

/// Color blending state for the single color attachment
#[derive(Debug, Clone, Copy)]
pub struct BlendState {
    /// Whether blending is enabled
    pub enabled: bool,
    /// Source color/alpha factor
    pub src_factor: BlendFactor,
    /// Destination color/alpha factor
    pub dst_factor: BlendFactor,
    /// Blend operation
    pub op: BlendOp,
}

impl BlendState {
    /// Standard src-alpha / one-minus-src-alpha blending
    pub fn alpha() -> Self {
        Self {
            enabled: true,
            src_factor: BlendFactor::SrcAlpha,
            dst_factor: BlendFactor::OneMinusSrcAlpha,
            op: BlendOp::Add,
        }
    }

    /// Blending disabled (source overwrites destination)
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            src_factor: BlendFactor::One,
            dst_factor: BlendFactor::Zero,
            op: BlendOp::Add,
        }
    }
}

/// Descriptor for creating a graphics pipeline
///
/// Viewport and scissor are baked statically from `extent`; a pipeline is tied
/// to one output size and is rebuilt on target resize (see batch reload).
#[derive(Clone)]
pub struct PipelineDesc {
    /// Vertex shader module
    pub vertex_shader: Arc<dyn Shader>,
    /// Fragment shader module
    pub fragment_shader: Arc<dyn Shader>,
    /// Interleaved vertex layout (binding 0)
    pub vertex_attributes: VertexAttributes,
    /// Primitive topology
    pub topology: PrimitiveTopology,
    /// Face culling mode
    pub cull_mode: CullMode,
    /// Front face winding order
    pub front_face: FrontFace,
    /// Color blending state
    pub blend: BlendState,
    /// Static viewport/scissor extent (width, height)
    pub extent: (u32, u32),
    /// Render pass this pipeline renders within
    pub render_pass: Arc<dyn RenderPass>,
    /// Binding group layouts, in set-index order (the pipeline layout)
    pub binding_layouts: Vec<Arc<dyn BindingGroupLayout>>,
}

/// Graphics pipeline trait
///
/// Implemented by backend-specific pipeline types. The backend owns the pipeline
/// and its layout; both are destroyed when the pipeline is dropped.
pub trait Pipeline: Send + Sync {}
