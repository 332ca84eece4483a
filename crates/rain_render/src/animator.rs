use log::{debug, trace};
use rand::Rng;

use crate::glyphs::alphabet::Alphabet;
use crate::glyphs::cache::GlyphCache;
use crate::glyphs::grid::RainGrid;
use crate::glyphs::raster::GlyphRasterizer;
use crate::image_pipeline::loader::MaskSource;
use crate::image_pipeline::resize::GridGeometry;
use crate::image_pipeline::threshold::Mask;
use crate::surface::Surface;
use crate::{RainError, RainOptions};

/// Glyph rain over a grid of cells, drawn only where the mask is lit.
pub struct RainAnimator<R> {
    geometry: GridGeometry,
    alphabet: Alphabet,
    grid: RainGrid,
    mask: Mask,
    cache: GlyphCache,
    draw_intensity: u8,
    rng: R,
}

impl<R: Rng> RainAnimator<R> {
    pub fn new(
        options: &RainOptions,
        source: &dyn MaskSource,
        rasterizer: &dyn GlyphRasterizer,
        mut rng: R,
    ) -> Result<Self, RainError> {
        let geometry = options.geometry()?;
        let alphabet = Alphabet::katakana();
        let grid = RainGrid::random(geometry.rows, geometry.columns, &alphabet, &mut rng);

        let image = source.load()?;
        let mask = Mask::from_image(&geometry.fit(&image), options.threshold);

        let cache = GlyphCache::build(&alphabet, rasterizer, geometry.cell_size);
        debug!(
            "rain grid {}x{} cells, {} masked in, {} cached sprites",
            geometry.columns,
            geometry.rows,
            mask.count_on(),
            cache.len()
        );

        Ok(Self::from_parts(geometry, alphabet, grid, mask, cache, options.draw_intensity, rng))
    }

    /// Assembles an animator from prepared parts sharing one geometry.
    pub fn from_parts(
        geometry: GridGeometry,
        alphabet: Alphabet,
        grid: RainGrid,
        mask: Mask,
        cache: GlyphCache,
        draw_intensity: u8,
        rng: R,
    ) -> Self {
        assert_eq!((grid.rows(), grid.columns()), (geometry.rows, geometry.columns));
        assert_eq!((mask.rows(), mask.columns()), (geometry.rows, geometry.columns));
        assert_eq!(cache.cell_size(), geometry.cell_size);
        Self { geometry, alphabet, grid, mask, cache, draw_intensity, rng }
    }

    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn grid(&self) -> &RainGrid {
        &self.grid
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Steps the rain to `frame`: scrolls the due columns down by one row,
    /// then redraws the glyphs whose change interval divides `frame`.
    pub fn advance(&mut self, frame: u64) {
        let due = self.grid.columns_due(frame);
        for &column in &due {
            self.grid.rotate_column_down(column);
        }

        let changed = self.grid.change_glyphs(frame, &self.alphabet, &mut self.rng);
        trace!("frame {frame}: {} columns shifted, {changed} glyphs changed", due.len());
    }

    /// Blits every visible, masked-in glyph onto `surface`.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        for row in 0..self.geometry.rows {
            for column in 0..self.geometry.columns {
                if !self.mask.is_on(row, column) {
                    continue;
                }

                let glyph = self.grid.glyph(row, column);
                if self.alphabet.symbol(glyph).is_none() {
                    continue;
                }

                if let Some(sprite) = self.cache.get(glyph, self.draw_intensity) {
                    let (x, y) = self.geometry.cell_origin(row, column);
                    surface.blit(sprite, x, y);
                }
            }
        }
    }
}
