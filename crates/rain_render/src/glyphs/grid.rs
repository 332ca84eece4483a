use std::ops::Range;

use rand::Rng;

use super::alphabet::Alphabet;

/// Frames between glyph replacements, per cell.
pub const CHANGE_INTERVAL_RANGE: Range<u32> = 25..50;
/// Frames between column shifts, per cell.
pub const COLUMN_SPEED_RANGE: Range<u32> = 1..500;

/// Character grid with per-cell timing, stored as flat row-major arrays.
///
/// Only the glyph indices change after construction; the change intervals and
/// column speeds are fixed for the grid's lifetime.
#[derive(Clone, Debug)]
pub struct RainGrid {
    rows: usize,
    columns: usize,
    glyphs: Vec<u8>,
    change_intervals: Vec<u32>,
    column_speeds: Vec<u32>,
}

impl RainGrid {
    /// Grid with every glyph, interval and speed drawn independently.
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        columns: usize,
        alphabet: &Alphabet,
        rng: &mut R,
    ) -> Self {
        let len = rows * columns;
        let glyphs = (0..len).map(|_| alphabet.sample(rng)).collect();
        let change_intervals = (0..len).map(|_| rng.gen_range(CHANGE_INTERVAL_RANGE)).collect();
        let column_speeds = (0..len).map(|_| rng.gen_range(COLUMN_SPEED_RANGE)).collect();
        Self { rows, columns, glyphs, change_intervals, column_speeds }
    }

    /// Grid from explicit arrays.
    ///
    /// Intervals and speeds of zero would never fire and are rejected.
    pub fn from_parts(
        rows: usize,
        columns: usize,
        glyphs: Vec<u8>,
        change_intervals: Vec<u32>,
        column_speeds: Vec<u32>,
    ) -> Self {
        let len = rows * columns;
        assert_eq!(glyphs.len(), len);
        assert_eq!(change_intervals.len(), len);
        assert_eq!(column_speeds.len(), len);
        assert!(change_intervals.iter().chain(&column_speeds).all(|&value| value > 0));
        Self { rows, columns, glyphs, change_intervals, column_speeds }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn glyphs(&self) -> &[u8] {
        &self.glyphs
    }

    pub fn glyph(&self, row: usize, column: usize) -> u8 {
        self.glyphs[row * self.columns + column]
    }

    pub fn change_interval(&self, row: usize, column: usize) -> u32 {
        self.change_intervals[row * self.columns + column]
    }

    pub fn column_speed(&self, row: usize, column: usize) -> u32 {
        self.column_speeds[row * self.columns + column]
    }

    /// Columns due to scroll at `frame`, ascending and without duplicates.
    ///
    /// A column is due as soon as any of its cells' speeds divides the frame.
    pub fn columns_due(&self, frame: u64) -> Vec<usize> {
        (0..self.columns)
            .filter(|&column| {
                (0..self.rows).any(|row| fires(frame, self.column_speed(row, column)))
            })
            .collect()
    }

    /// Moves every glyph in `column` one row down, wrapping the bottom glyph
    /// to the top.
    pub fn rotate_column_down(&mut self, column: usize) {
        if self.rows < 2 {
            return;
        }

        let columns = self.columns;
        let last = self.glyphs[(self.rows - 1) * columns + column];
        for row in (1..self.rows).rev() {
            self.glyphs[row * columns + column] = self.glyphs[(row - 1) * columns + column];
        }
        self.glyphs[column] = last;
    }

    /// Replaces every glyph whose change interval divides `frame`, drawing in
    /// row-major order. Returns the number of replaced cells.
    pub fn change_glyphs<R: Rng + ?Sized>(
        &mut self,
        frame: u64,
        alphabet: &Alphabet,
        rng: &mut R,
    ) -> usize {
        let mut changed = 0;
        for (glyph, &interval) in self.glyphs.iter_mut().zip(&self.change_intervals) {
            if fires(frame, interval) {
                *glyph = alphabet.sample(rng);
                changed += 1;
            }
        }
        changed
    }

    /// Text rendering of the current glyphs, one string per row.
    pub fn text_rows<'a>(&'a self, alphabet: &'a Alphabet) -> impl Iterator<Item = String> + 'a {
        self.glyphs.chunks(self.columns.max(1)).map(move |row| {
            row.iter().map(|&index| alphabet.symbol(index).unwrap_or(' ')).collect::<String>()
        })
    }
}

fn fires(frame: u64, period: u32) -> bool {
    frame % u64::from(period) == 0
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn sequential_grid(rows: usize, columns: usize, speeds: Vec<u32>) -> RainGrid {
        let len = rows * columns;
        let glyphs = (0..len).map(|index| index as u8).collect();
        RainGrid::from_parts(rows, columns, glyphs, vec![7; len], speeds)
    }

    #[test]
    fn random_parameters_stay_in_range() {
        let alphabet = Alphabet::katakana();
        let mut rng = StdRng::seed_from_u64(1);
        let grid = RainGrid::random(20, 30, &alphabet, &mut rng);

        for row in 0..grid.rows() {
            for column in 0..grid.columns() {
                assert!(CHANGE_INTERVAL_RANGE.contains(&grid.change_interval(row, column)));
                assert!(COLUMN_SPEED_RANGE.contains(&grid.column_speed(row, column)));
                assert!(usize::from(grid.glyph(row, column)) < alphabet.len());
            }
        }
    }

    #[test]
    fn rotation_moves_glyphs_down_and_wraps() {
        let mut grid = sequential_grid(3, 2, vec![1; 6]);
        grid.rotate_column_down(1);
        // Column 1 held 1, 3, 5 from top to bottom.
        assert_eq!(grid.glyphs(), &[0, 5, 2, 1, 4, 3]);
    }

    #[test]
    fn single_row_rotation_is_noop() {
        let mut grid = sequential_grid(1, 3, vec![1; 3]);
        grid.rotate_column_down(2);
        assert_eq!(grid.glyphs(), &[0, 1, 2]);
    }

    #[test]
    fn column_is_due_when_any_row_fires() {
        // Column 0 only fires through its bottom row.
        let grid = sequential_grid(2, 3, vec![999, 4, 999, 3, 999, 999]);
        assert_eq!(grid.columns_due(3), vec![0]);
        assert_eq!(grid.columns_due(4), vec![1]);
        assert_eq!(grid.columns_due(12), vec![0, 1]);
        assert_eq!(grid.columns_due(999), vec![0, 1, 2]);
        assert!(grid.columns_due(5).is_empty());
    }

    #[test]
    fn glyph_change_only_touches_due_cells() {
        let alphabet = Alphabet::katakana();
        let mut rng = StdRng::seed_from_u64(3);
        let glyphs = vec![200; 4];
        let mut grid = RainGrid::from_parts(2, 2, glyphs, vec![2, 3, 4, 5], vec![1; 4]);

        let changed = grid.change_glyphs(4, &alphabet, &mut rng);

        assert_eq!(changed, 2);
        assert!(usize::from(grid.glyph(0, 0)) < alphabet.len());
        assert_eq!(grid.glyph(0, 1), 200);
        assert!(usize::from(grid.glyph(1, 0)) < alphabet.len());
        assert_eq!(grid.glyph(1, 1), 200);
    }

    #[test]
    fn text_rows_render_blanks_as_spaces() {
        let alphabet = Alphabet::new(vec![Some('a'), Some('b'), None]);
        let grid = RainGrid::from_parts(2, 2, vec![0, 2, 1, 0], vec![1; 4], vec![1; 4]);
        let rows: Vec<String> = grid.text_rows(&alphabet).collect();
        assert_eq!(rows, vec!["a ".to_string(), "ba".to_string()]);
    }
}
