use image::RgbImage;

/// Channel value every component must exceed for a pixel to count as lit.
pub const DEFAULT_THRESHOLD: u8 = 128;

/// Binary drawability map, one entry per grid cell, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    columns: usize,
    rows: usize,
    cells: Vec<bool>,
}

impl Mask {
    /// Marks a cell on when all three channels of its pixel exceed `threshold`.
    pub fn from_image(image: &RgbImage, threshold: u8) -> Self {
        let cells = image.pixels().map(|pixel| pixel.0.iter().all(|&c| c > threshold)).collect();
        Self { columns: image.width() as usize, rows: image.height() as usize, cells }
    }

    pub fn filled(columns: usize, rows: usize, on: bool) -> Self {
        Self { columns, rows, cells: vec![on; columns * rows] }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn is_on(&self, row: usize, column: usize) -> bool {
        self.cells[row * self.columns + column]
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn count_on(&self) -> usize {
        self.cells.iter().filter(|&&on| on).count()
    }

    /// Text preview, `#` for drawable cells and `.` for suppressed ones.
    pub fn text_rows(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .chunks(self.columns.max(1))
            .map(|row| row.iter().map(|&on| if on { '#' } else { '.' }).collect::<String>())
    }
}
