use rand::Rng;

use crate::components::{Dir, Pos};
use crate::level::Grid;
use crate::movement::resolve;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ghost {
    pub pos: Pos,
    spawn: Pos,
}

impl Ghost {
    pub fn new(spawn: Pos) -> Self {
        Self { pos: spawn, spawn }
    }

    pub fn spawn(&self) -> Pos {
        self.spawn
    }
}

/// Where ghosts get their next direction from.
pub trait DirectionSource {
    fn next_dir(&mut self) -> Dir;
}

/// Uniform draw over the four directions. No memory, no look-ahead.
pub struct Wander<R> {
    rng: R,
}

impl<R: Rng> Wander<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> DirectionSource for Wander<R> {
    fn next_dir(&mut self) -> Dir {
        Dir::ALL[self.rng.gen_range(0..Dir::ALL.len())]
    }
}

/// One independent draw and move per ghost. Drawing a wall means standing
/// still this tick.
pub fn move_ghosts(ghosts: &mut [Ghost], grid: &Grid, dirs: &mut impl DirectionSource) {
    for ghost in ghosts.iter_mut() {
        let dir = dirs.next_dir();
        ghost.pos = resolve(grid, ghost.pos, dir);
    }
}
