use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};

/// Cell layout of a pixel surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridGeometry {
    pub columns: usize,
    pub rows: usize,
    pub cell_size: u32,
}

impl GridGeometry {
    /// Whole cells fitting in a `width` x `height` surface, or `None` when not
    /// even one does.
    pub fn from_surface(width: u32, height: u32, cell_size: u32) -> Option<Self> {
        if cell_size == 0 {
            return None;
        }

        let columns = (width / cell_size) as usize;
        let rows = (height / cell_size) as usize;
        if columns == 0 || rows == 0 {
            return None;
        }

        Some(Self { columns, rows, cell_size })
    }

    pub fn cells(&self) -> usize {
        self.columns * self.rows
    }

    /// Pixel origin of the cell at `row`, `column`.
    pub fn cell_origin(&self, row: usize, column: usize) -> (u32, u32) {
        (column as u32 * self.cell_size, row as u32 * self.cell_size)
    }

    /// Samples `image` down (or up) to one pixel per cell.
    pub fn fit(&self, image: &DynamicImage) -> RgbImage {
        image.resize_exact(self.columns as u32, self.rows as u32, FilterType::Nearest).to_rgb8()
    }
}
