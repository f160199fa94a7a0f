/// TextureRegion - rectangular sub-area of a texture in normalized coordinates

use std::sync::Arc;

use crate::renderer::Texture;

/// Sub-rectangle of a texture, addressed by normalized UV coordinates
#[derive(Clone)]
pub struct TextureRegion {
    /// The source texture
    pub texture: Arc<dyn Texture>,
    /// Left edge (normalized)
    pub u: f32,
    /// Top edge (normalized)
    pub v: f32,
    /// Right edge (normalized)
    pub u2: f32,
    /// Bottom edge (normalized)
    pub v2: f32,
}

impl TextureRegion {
    /// Create a region from normalized coordinates
    pub fn new(texture: Arc<dyn Texture>, u: f32, v: f32, u2: f32, v2: f32) -> Self {
        Self { texture, u, v, u2, v2 }
    }

    /// Create a region covering the whole texture
    pub fn full(texture: Arc<dyn Texture>) -> Self {
        Self::new(texture, 0.0, 0.0, 1.0, 1.0)
    }

    /// Create a region from pixel coordinates
    ///
    /// # Arguments
    ///
    /// * `texture` - The source texture
    /// * `x`, `y` - Top-left corner in pixels
    /// * `width`, `height` - Region extent in pixels
    pub fn from_pixels(texture: Arc<dyn Texture>, x: u32, y: u32, width: u32, height: u32) -> Self {
        let info = *texture.info();
        let tex_width = info.width as f32;
        let tex_height = info.height as f32;
        Self {
            texture,
            u: x as f32 / tex_width,
            v: y as f32 / tex_height,
            u2: (x + width) as f32 / tex_width,
            v2: (y + height) as f32 / tex_height,
        }
    }

    /// Region width in pixels
    pub fn width(&self) -> u32 {
        let info = self.texture.info();
        ((self.u2 - self.u) * info.width as f32).round() as u32
    }

    /// Region height in pixels
    pub fn height(&self) -> u32 {
        let info = self.texture.info();
        ((self.v2 - self.v) * info.height as f32).round() as u32
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "texture_region_tests.rs"]
mod tests;
