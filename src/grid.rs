// Copyright (c) 2026 rezky_nightky

use crate::color::Hsl;

/// One lit segment of a droplet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub color: Hsl,
    pub opacity: f32,
}

/// Row-major cell buffer. Row 0 is the spawn edge, `rows - 1` the exit edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    rows: u16,
    cols: u16,
    cells: Vec<Option<Segment>>,
}

impl Grid {
    pub fn new(rows: u16, cols: u16) -> Self {
        let len = rows as usize * cols as usize;
        Self {
            rows,
            cols,
            cells: vec![None; len],
        }
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn index(&self, row: u16, col: u16) -> Option<usize> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(row as usize * self.cols as usize + col as usize)
    }

    pub fn get(&self, row: u16, col: u16) -> Option<Segment> {
        self.index(row, col).and_then(|i| self.cells[i])
    }

    /// Writes outside the buffer are dropped.
    pub fn set(&mut self, row: u16, col: u16, cell: Option<Segment>) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = cell;
        }
    }

    pub fn cells(&self) -> &[Option<Segment>] {
        &self.cells
    }

    pub fn lit_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Moves every row one step toward the exit edge. The bottom row is lost
    /// and row 0 comes back empty.
    pub fn shift_rows_down(&mut self) {
        let width = self.cols as usize;
        if width == 0 || self.rows == 0 {
            return;
        }
        let len = self.cells.len();
        self.cells.copy_within(0..len - width, width);
        self.cells[..width].fill(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(opacity: f32) -> Segment {
        Segment {
            color: Hsl::new(200, 90, 55),
            opacity,
        }
    }

    #[test]
    fn new_grid_is_empty_for_every_size() {
        for (rows, cols) in [(1, 1), (3, 7), (10, 10), (40, 2)] {
            let g = Grid::new(rows, cols);
            assert_eq!(g.cells().len(), rows as usize * cols as usize);
            assert!(g.is_empty());
        }
    }

    #[test]
    fn zero_sized_grid_has_no_cells() {
        let mut g = Grid::new(0, 5);
        g.set(0, 0, Some(seg(1.0)));
        g.shift_rows_down();
        assert!(g.cells().is_empty());
        assert_eq!(g.get(0, 0), None);
    }

    #[test]
    fn out_of_bounds_access_is_ignored() {
        let mut g = Grid::new(2, 2);
        g.set(2, 0, Some(seg(1.0)));
        g.set(0, 2, Some(seg(1.0)));
        assert!(g.is_empty());
        assert_eq!(g.get(5, 5), None);
    }

    #[test]
    fn shift_rows_down_drops_bottom_row() {
        let mut g = Grid::new(3, 2);
        g.set(0, 0, Some(seg(0.2)));
        g.set(2, 1, Some(seg(0.8)));
        g.shift_rows_down();
        assert_eq!(g.get(1, 0), Some(seg(0.2)));
        assert_eq!(g.get(0, 0), None);
        assert_eq!(g.lit_count(), 1);
    }
}
