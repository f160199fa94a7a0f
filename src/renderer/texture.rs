/// Texture trait, texture descriptor, and texture info

/// Texture and attachment pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    R8G8B8A8_SRGB,
    R8G8B8A8_UNORM,
    B8G8R8A8_SRGB,
    B8G8R8A8_UNORM,
}

/// Texture usage flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureUsage {
    /// Texture can be sampled in shaders
    Sampled,
    /// Texture can be used as render target
    RenderTarget,
    /// Texture can be used for both
    SampledAndRenderTarget,
}

/// Sampler filtering behavior, resolved to an actual GPU sampler by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerType {
    /// Bilinear filtering
    Linear,
    /// Nearest-neighbor filtering (pixel art)
    Nearest,
}

/// Descriptor for creating a texture
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Usage flags
    pub usage: TextureUsage,
    /// Optional initial pixel data to upload at creation time
    pub data: Option<Vec<u8>>,
}

/// Read-only properties of a created texture
#[derive(Debug, Clone, Copy)]
pub struct TextureInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Usage flags
    pub usage: TextureUsage,
}

/// Texture resource trait
///
/// Implemented by backend-specific texture types. The backend owns the image,
/// its view and its memory; they are destroyed when the texture is dropped.
pub trait Texture: Send + Sync {
    /// Read-only properties of the texture
    fn info(&self) -> &TextureInfo;
}
