// Copyright (c) 2026 rezky_nightky

use crate::{
    color::Hsl,
    grid::{Grid, Segment},
    occupancy::OccupiedColumns,
    random::RandomSource,
};

/// Droplets per wave.
pub const WAVE_WIDTH: usize = 3;
/// Segments per droplet, head included.
pub const DROPLET_LEN: u16 = 5;
/// Smallest index distance between two columns of one wave.
pub const MIN_COLUMN_GAP: u16 = 3;

const OPACITY_STEP: f32 = 0.2;
const MAX_PICK_ATTEMPTS: usize = 32;

/// Chooses the columns of one wave from `available`.
///
/// Every pick is uniform over the columns still far enough from the ones
/// already chosen. A pick that runs out of candidates starts over, and after
/// `MAX_PICK_ATTEMPTS` dead ends the wave is abandoned.
pub fn pick_wave_columns(
    available: &[u16],
    rng: &mut impl RandomSource,
) -> Option<[u16; WAVE_WIDTH]> {
    if available.len() < WAVE_WIDTH {
        return None;
    }

    'attempt: for _ in 0..MAX_PICK_ATTEMPTS {
        let mut picked = [0u16; WAVE_WIDTH];
        let mut candidates = available.to_vec();
        for slot in &mut picked {
            if candidates.is_empty() {
                continue 'attempt;
            }
            let col = candidates[rng.below(candidates.len() as u32) as usize];
            *slot = col;
            candidates.retain(|&c| c.abs_diff(col) >= MIN_COLUMN_GAP);
        }
        return Some(picked);
    }

    None
}

pub fn wave_color(rng: &mut impl RandomSource) -> Hsl {
    let hue = rng.below(360) as u16;
    let saturation = 80 + rng.below(20) as u8;
    let lightness = 50 + rng.below(10) as u8;
    Hsl::new(hue, saturation, lightness)
}

pub fn droplet_opacity(offset: u16) -> f32 {
    (OPACITY_STEP * f32::from(offset + 1)).min(1.0)
}

/// Writes a fresh droplet at the top of `col`, clipped to the grid height.
pub fn paint_droplet(grid: &mut Grid, col: u16, color: Hsl) {
    for offset in 0..DROPLET_LEN.min(grid.rows()) {
        let opacity = droplet_opacity(offset);
        grid.set(offset, col, Some(Segment { color, opacity }));
    }
}

/// One spawner tick. `None` means the tick is skipped and nothing changes.
pub fn spawn(
    grid: &Grid,
    occupied: &OccupiedColumns,
    rng: &mut impl RandomSource,
) -> Option<(Grid, OccupiedColumns)> {
    let available = occupied.available(grid.cols());
    let columns = pick_wave_columns(&available, rng)?;
    let color = wave_color(rng);

    let mut next_grid = grid.clone();
    let mut next_occupied = occupied.clone();
    for col in columns {
        next_occupied.insert(col);
        paint_droplet(&mut next_grid, col, color);
    }
    Some((next_grid, next_occupied))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedRandom, StdRandom};

    fn assert_spaced(cols: &[u16]) {
        for (i, a) in cols.iter().enumerate() {
            for b in &cols[i + 1..] {
                assert!(a.abs_diff(*b) > 2, "{a} and {b} too close in {cols:?}");
            }
        }
    }

    #[test]
    fn picked_columns_keep_minimum_gap() {
        let mut rng = StdRandom::new(Some(42));
        let available: Vec<u16> = (0..12).collect();
        for _ in 0..500 {
            let cols = pick_wave_columns(&available, &mut rng).unwrap();
            assert!(cols.iter().all(|c| available.contains(c)));
            assert_spaced(&cols);
        }
    }

    #[test]
    fn too_few_columns_skip_without_drawing() {
        let mut rng = ScriptedRandom::new([0]);
        assert_eq!(pick_wave_columns(&[0, 5], &mut rng), None);
    }

    #[test]
    fn unsatisfiable_gap_gives_up() {
        let mut rng = StdRandom::new(Some(1));
        assert_eq!(pick_wave_columns(&[0, 1, 2, 3, 4], &mut rng), None);
    }

    #[test]
    fn dead_end_restarts_selection() {
        // cols 0..=6 only admit {0, 3, 6}; first attempt picks 1 then 4.
        let available: Vec<u16> = (0..7).collect();
        let mut rng = ScriptedRandom::new([1, 0, 0, 0, 0]);
        assert_eq!(pick_wave_columns(&available, &mut rng), Some([0, 3, 6]));
    }

    #[test]
    fn wave_color_stays_in_ranges() {
        let mut rng = StdRandom::new(Some(9));
        for _ in 0..200 {
            let c = wave_color(&mut rng);
            assert!(c.hue < 360);
            assert!((80..100).contains(&c.saturation));
            assert!((50..60).contains(&c.lightness));
        }
    }

    #[test]
    fn short_grid_clips_droplet() {
        let mut grid = Grid::new(3, 4);
        paint_droplet(&mut grid, 2, Hsl::new(10, 90, 55));
        assert_eq!(grid.lit_count(), 3);
        let opacities: Vec<f32> = (0..3).map(|r| grid.get(r, 2).unwrap().opacity).collect();
        for (got, want) in opacities.iter().zip([0.2, 0.4, 0.6]) {
            assert!((got - want).abs() < 1e-6);
        }
    }

    #[test]
    fn spawn_marks_columns_and_shares_color() {
        let grid = Grid::new(10, 10);
        let occupied = OccupiedColumns::new();
        let mut rng = StdRandom::new(Some(5));
        let (next, occ) = spawn(&grid, &occupied, &mut rng).unwrap();

        assert_eq!(occ.len(), WAVE_WIDTH);
        assert_eq!(next.lit_count(), WAVE_WIDTH * DROPLET_LEN as usize);
        let colors: Vec<Hsl> = next.cells().iter().flatten().map(|s| s.color).collect();
        assert!(colors.windows(2).all(|w| w[0] == w[1]));
        assert!(grid.is_empty());
    }

    #[test]
    fn spawn_never_exceeds_width() {
        let mut grid = Grid::new(6, 9);
        let mut occupied = OccupiedColumns::new();
        let mut rng = StdRandom::new(Some(11));
        for _ in 0..20 {
            if let Some((g, o)) = spawn(&grid, &occupied, &mut rng) {
                grid = g;
                occupied = o;
            }
            assert!(occupied.len() <= grid.cols() as usize);
        }
    }
}
