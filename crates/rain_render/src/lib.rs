mod animator;
mod glyphs;
mod image_pipeline;
mod surface;

use std::path::PathBuf;

pub use animator::RainAnimator;
pub use glyphs::{
    alphabet::Alphabet,
    cache::{green, GlyphCache, Sprite, GREEN_LEVELS},
    grid::{RainGrid, CHANGE_INTERVAL_RANGE, COLUMN_SPEED_RANGE},
    raster::{Coverage, FontRasterizer, GlyphRasterizer, PatternRasterizer},
};
pub use image_pipeline::{
    loader::{ImageFile, MaskSource, StaticImage},
    resize::GridGeometry,
    threshold::{Mask, DEFAULT_THRESHOLD},
};
pub use surface::{FrameBuffer, Surface};

#[derive(Debug, thiserror::Error)]
pub enum RainError {
    #[error("failed to load image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to load font {}: {reason}", .path.display())]
    Font { path: PathBuf, reason: String },
    #[error("a {width}x{height} surface does not fit a single {cell_size}px cell")]
    InvalidLayout { width: u32, height: u32, cell_size: u32 },
}

impl RainError {
    /// Whether an input file could not be found, opened or decoded.
    pub fn is_resource(&self) -> bool {
        matches!(self, RainError::Image { .. } | RainError::Font { .. })
    }
}

#[derive(Clone, Debug)]
pub struct RainOptions {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Side of a square glyph cell in pixels.
    pub cell_size: u32,
    /// Channel value a mask pixel must exceed on R, G and B to be drawable.
    pub threshold: u8,
    /// Green intensity glyphs are drawn with.
    pub draw_intensity: u8,
}

impl RainOptions {
    pub fn geometry(&self) -> Result<GridGeometry, RainError> {
        GridGeometry::from_surface(self.width, self.height, self.cell_size).ok_or(
            RainError::InvalidLayout {
                width: self.width,
                height: self.height,
                cell_size: self.cell_size,
            },
        )
    }
}

impl Default for RainOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 480,
            cell_size: 12,
            threshold: DEFAULT_THRESHOLD,
            draw_intensity: u8::MAX,
        }
    }
}
