use super::alphabet::Alphabet;
use super::raster::{Coverage, GlyphRasterizer};

/// Number of green intensities pre-rendered for every symbol.
pub const GREEN_LEVELS: usize = 256;

/// Pre-rendered glyph image, ARGB with coverage in the alpha byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl Sprite {
    /// Colours `coverage` with `rgb` (`0x00RRGGBB`).
    pub fn from_coverage(coverage: &Coverage, rgb: u32) -> Self {
        let rgb = rgb & 0x00ff_ffff;
        let pixels = coverage.alpha.iter().map(|&alpha| (u32::from(alpha) << 24) | rgb).collect();
        Self { width: coverage.size, height: coverage.size, pixels }
    }
}

/// Pure green at the given intensity, as `0x00RRGGBB`.
pub fn green(intensity: u8) -> u32 {
    u32::from(intensity) << 8
}

/// Sprites for every printable symbol at every green intensity.
///
/// Blank symbols have no entry: they are never drawn.
pub struct GlyphCache {
    cell_size: u32,
    /// Alphabet index to the first sprite of that symbol.
    slots: Vec<Option<usize>>,
    sprites: Vec<Sprite>,
}

impl GlyphCache {
    pub fn build(alphabet: &Alphabet, rasterizer: &dyn GlyphRasterizer, cell_size: u32) -> Self {
        let mut slots = vec![None; alphabet.len()];
        let mut sprites = Vec::with_capacity(alphabet.printable().count() * GREEN_LEVELS);

        for (index, symbol) in alphabet.printable() {
            slots[usize::from(index)] = Some(sprites.len());
            let coverage = rasterizer.rasterize(symbol, cell_size);
            sprites.extend((0..=u8::MAX).map(|level| Sprite::from_coverage(&coverage, green(level))));
        }

        Self { cell_size, slots, sprites }
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Sprite for alphabet index `symbol` in green at `intensity`.
    pub fn get(&self, symbol: u8, intensity: u8) -> Option<&Sprite> {
        let first = (*self.slots.get(usize::from(symbol))?)?;
        self.sprites.get(first + usize::from(intensity))
    }
}
