use std::fs;
use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};
use log::debug;

use crate::RainError;

/// Square alpha map of a single glyph, `size * size` bytes, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coverage {
    pub size: u32,
    pub alpha: Vec<u8>,
}

impl Coverage {
    pub fn empty(size: u32) -> Self {
        Self { size, alpha: vec![0; (size * size) as usize] }
    }

    pub fn is_blank(&self) -> bool {
        self.alpha.iter().all(|&alpha| alpha == 0)
    }
}

/// Turns a symbol into its coverage inside a square cell.
pub trait GlyphRasterizer {
    fn rasterize(&self, symbol: char, cell_size: u32) -> Coverage;
}

/// Rasterizes symbols from a TrueType/OpenType font.
pub struct FontRasterizer {
    font: Font,
}

impl FontRasterizer {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RainError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|err| font_error(path, err.to_string()))?;
        let rasterizer = Self::from_bytes(bytes).map_err(|reason| font_error(path, reason))?;
        debug!("loaded glyph font from {}", path.display());
        Ok(rasterizer)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, String> {
        let font = Font::from_bytes(bytes, FontSettings::default()).map_err(str::to_string)?;
        Ok(Self { font })
    }

    pub fn supports(&self, symbol: char) -> bool {
        self.font.lookup_glyph_index(symbol) != 0
    }
}

impl GlyphRasterizer for FontRasterizer {
    fn rasterize(&self, symbol: char, cell_size: u32) -> Coverage {
        let (metrics, bitmap) = self.font.rasterize(symbol, cell_size as f32);
        let mut coverage = Coverage::empty(cell_size);
        let cell = cell_size as usize;

        // Centre the glyph box, cropping whatever overflows the cell.
        let offset_x = cell as i64 - metrics.width as i64;
        let offset_y = cell as i64 - metrics.height as i64;
        let (offset_x, offset_y) = (offset_x / 2, offset_y / 2);

        for y in 0..metrics.height {
            for x in 0..metrics.width {
                let px = x as i64 + offset_x;
                let py = y as i64 + offset_y;
                if px < 0 || py < 0 || px >= cell as i64 || py >= cell as i64 {
                    continue;
                }
                coverage.alpha[py as usize * cell + px as usize] = bitmap[y * metrics.width + x];
            }
        }

        coverage
    }
}

fn font_error(path: &Path, reason: String) -> RainError {
    RainError::Font { path: PathBuf::from(path), reason }
}

/// Side length, in blocks, of a pattern glyph.
const PATTERN_BLOCKS: u32 = 5;

/// Font-free rasterizer drawing a blocky pattern derived from the code point.
///
/// Every symbol gets a stable, mirrored 5x5 block pattern scaled to the cell,
/// so the effect still reads as a field of distinct glyphs without any font.
#[derive(Clone, Copy, Debug, Default)]
pub struct PatternRasterizer;

impl GlyphRasterizer for PatternRasterizer {
    fn rasterize(&self, symbol: char, cell_size: u32) -> Coverage {
        let mut coverage = Coverage::empty(cell_size);
        let block = cell_size / PATTERN_BLOCKS;
        if block == 0 {
            coverage.alpha.fill(u8::MAX);
            return coverage;
        }

        let bits = mix(symbol as u64);
        let margin = (cell_size - block * PATTERN_BLOCKS) / 2;
        let half = PATTERN_BLOCKS.div_ceil(2);

        for by in 0..PATTERN_BLOCKS {
            for bx in 0..PATTERN_BLOCKS {
                let mirrored = bx.min(PATTERN_BLOCKS - 1 - bx);
                if (bits >> (by * half + mirrored)) & 1 == 0 {
                    continue;
                }

                // Leave a one pixel gap between blocks when there is room.
                let fill = if block > 2 { block - 1 } else { block };
                for y in 0..fill {
                    for x in 0..fill {
                        let px = margin + bx * block + x;
                        let py = margin + by * block + y;
                        coverage.alpha[(py * cell_size + px) as usize] = u8::MAX;
                    }
                }
            }
        }

        coverage
    }
}

/// SplitMix64 finalizer.
fn mix(mut value: u64) -> u64 {
    value = value.wrapping_add(0x9e37_79b9_7f4a_7c15);
    value = (value ^ (value >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    value = (value ^ (value >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    value ^ (value >> 31)
}
