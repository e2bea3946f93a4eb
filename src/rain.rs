// Copyright (c) 2026 rezky_nightky

use crate::{
    grid::Grid,
    mover,
    occupancy::OccupiedColumns,
    random::RandomSource,
    schedule::{Process, Tick},
    spawner,
};

/// The committed snapshot every periodic process reads and replaces.
#[derive(Clone, Debug, PartialEq)]
pub struct RainState {
    pub grid: Grid,
    pub occupied: OccupiedColumns,
}

impl RainState {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            grid: Grid::new(rows, cols),
            occupied: OccupiedColumns::new(),
        }
    }

    /// `None` when the spawner skips this tick.
    pub fn spawned(&self, rng: &mut impl RandomSource) -> Option<Self> {
        spawner::spawn(&self.grid, &self.occupied, rng)
            .map(|(grid, occupied)| Self { grid, occupied })
    }

    pub fn fallen(&self) -> Self {
        Self {
            grid: mover::fall(&self.grid),
            occupied: self.occupied.clone(),
        }
    }

    pub fn occupancy_reset(&self) -> Self {
        Self {
            grid: self.grid.clone(),
            occupied: OccupiedColumns::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Committed,
    Skipped,
    /// The tick belongs to a grid that has since been replaced.
    Stale,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RainStats {
    pub waves: u64,
    pub skipped_waves: u64,
    pub falls: u64,
    pub resets: u64,
    pub reinits: u64,
}

/// Single owner of the rain state. All mutation goes through `apply` and
/// `reinit`.
pub struct Rain<R> {
    state: RainState,
    epoch: u64,
    rng: R,
    stats: RainStats,
}

impl<R: RandomSource> Rain<R> {
    pub fn new(rows: u16, cols: u16, rng: R) -> Self {
        Self {
            state: RainState::new(rows, cols),
            epoch: 0,
            rng,
            stats: RainStats::default(),
        }
    }

    pub fn state(&self) -> &RainState {
        &self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.state.grid
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn stats(&self) -> RainStats {
        self.stats
    }

    pub fn dims(&self) -> (u16, u16) {
        (self.state.grid.rows(), self.state.grid.cols())
    }

    /// Replaces the grid with an empty one of the new size and starts a new
    /// epoch. Returns the epoch new timers must carry.
    pub fn reinit(&mut self, rows: u16, cols: u16) -> u64 {
        self.state = RainState::new(rows, cols);
        self.epoch = self.epoch.wrapping_add(1);
        self.stats.reinits += 1;
        self.epoch
    }

    pub fn apply(&mut self, tick: Tick) -> Applied {
        if tick.epoch != self.epoch {
            return Applied::Stale;
        }

        let next = match tick.process {
            Process::Spawner => match self.state.spawned(&mut self.rng) {
                Some(next) => {
                    self.stats.waves += 1;
                    next
                }
                None => {
                    self.stats.skipped_waves += 1;
                    return Applied::Skipped;
                }
            },
            Process::Mover => {
                self.stats.falls += 1;
                self.state.fallen()
            }
            Process::Resetter => {
                self.stats.resets += 1;
                self.state.occupancy_reset()
            }
        };

        self.state = next;
        Applied::Committed
    }
}
