// Copyright (c) 2026 rezky_nightky

use crate::grid::Grid;

/// One mover tick: every lit cell falls one row, the bottom row falls off.
pub fn fall(grid: &Grid) -> Grid {
    let mut next = grid.clone();
    next.shift_rows_down();
    next
}
