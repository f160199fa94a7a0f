/// Shader trait and shader descriptor

/// Shader pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment shader
    Fragment,
}

/// Shader source code handed to the backend
#[derive(Debug, Clone)]
pub enum ShaderSource {
    /// Pre-compiled SPIR-V words
    SpirV(Vec<u32>),
    /// GLSL source, compiled by the backend
    Glsl(String),
}

/// Descriptor for creating a shader module
#[derive(Debug, Clone)]
pub struct ShaderDesc {
    /// Pipeline stage this shader runs in
    pub stage: ShaderStage,
    /// Source code
    pub source: ShaderSource,
    /// Entry point name
    pub entry_point: String,
}

impl ShaderDesc {
    /// Shader descriptor from GLSL source with the standard `main` entry point
    pub fn glsl(stage: ShaderStage, source: &str) -> Self {
        Self {
            stage,
            source: ShaderSource::Glsl(source.to_string()),
            entry_point: "main".to_string(),
        }
    }
}

/// Shader module trait
///
/// Implemented by backend-specific shader types.
pub trait Shader: Send + Sync {
    /// Pipeline stage this shader was created for
    fn stage(&self) -> ShaderStage;
}
