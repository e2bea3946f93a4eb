// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Process {
    Spawner,
    Mover,
    Resetter,
}

/// One firing of a periodic process, tagged with the epoch of the grid it
/// was scheduled for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    pub epoch: u64,
    pub process: Process,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Intervals {
    pub spawn: Duration,
    pub fall: Duration,
    pub reset: Duration,
}

impl Default for Intervals {
    fn default() -> Self {
        Self {
            spawn: Duration::from_millis(600),
            fall: Duration::from_millis(200),
            reset: Duration::from_millis(3600),
        }
    }
}

#[derive(Clone, Debug)]
struct Timer {
    process: Process,
    period: Duration,
    next: Instant,
}

impl Timer {
    fn new(process: Process, period: Duration, now: Instant) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self {
            process,
            period,
            next: now + period,
        }
    }

    fn fire_if_due(&mut self, now: Instant) -> Option<Instant> {
        if now < self.next {
            return None;
        }
        let fired_at = self.next;
        self.next += self.period;
        if self.next <= now {
            self.next = now + self.period;
        }
        Some(fired_at)
    }
}

/// Repeating timers for one grid epoch. Dropping the scheduler stops them.
#[derive(Clone, Debug)]
pub struct Scheduler {
    epoch: u64,
    timers: [Timer; 3],
}

impl Scheduler {
    pub fn start(epoch: u64, intervals: Intervals, now: Instant) -> Self {
        Self {
            epoch,
            timers: [
                Timer::new(Process::Spawner, intervals.spawn, now),
                Timer::new(Process::Mover, intervals.fall, now),
                Timer::new(Process::Resetter, intervals.reset, now),
            ],
        }
    }

    pub fn next_deadline(&self) -> Instant {
        self.timers
            .iter()
            .map(|t| t.next)
            .min()
            .unwrap_or_else(Instant::now)
    }

    /// Ticks due at `now`, oldest deadline first. A timer that fell behind
    /// fires once and resyncs instead of catching up.
    pub fn due(&mut self, now: Instant) -> Vec<Tick> {
        let mut fired: Vec<(Instant, Process)> = self
            .timers
            .iter_mut()
            .filter_map(|t| t.fire_if_due(now).map(|at| (at, t.process)))
            .collect();
        fired.sort_by_key(|(at, _)| *at);
        fired
            .into_iter()
            .map(|(_, process)| Tick {
                epoch: self.epoch,
                process,
            })
            .collect()
    }
}
