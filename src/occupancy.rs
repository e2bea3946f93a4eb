// Copyright (c) 2026 rezky_nightky

use std::collections::BTreeSet;

/// Columns reserved by a spawned droplet. Entries stay until the next full
/// reset, whether or not the droplet is still visible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OccupiedColumns {
    cols: BTreeSet<u16>,
}

impl OccupiedColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, col: u16) -> bool {
        self.cols.contains(&col)
    }

    pub fn insert(&mut self, col: u16) {
        self.cols.insert(col);
    }

    pub fn len(&self) -> usize {
        self.cols.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }

    /// Columns in `0..cols` that may host a new droplet, ascending.
    pub fn available(&self, cols: u16) -> Vec<u16> {
        (0..cols).filter(|c| !self.contains(*c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_skips_occupied_columns() {
        let mut occ = OccupiedColumns::new();
        occ.insert(1);
        occ.insert(3);
        assert_eq!(occ.available(5), vec![0, 2, 4]);
        assert_eq!(occ.len(), 2);
    }

    #[test]
    fn columns_past_width_do_not_count_as_available() {
        let mut occ = OccupiedColumns::new();
        occ.insert(9);
        assert_eq!(occ.available(3), vec![0, 1, 2]);
    }
}
