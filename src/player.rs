use crate::components::{Dir, Pos, Tile};
use crate::level::Grid;
use crate::movement::resolve;

pub const DOT_SCORE: u32 = 1;
pub const PILL_SCORE: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Player {
    pub pos: Pos,
    spawn: Pos,
}

/// What the player ate on the cell it stepped onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eaten {
    Dot,
    Pill,
}

impl Eaten {
    pub fn score(self) -> u32 {
        match self {
            Eaten::Dot => DOT_SCORE,
            Eaten::Pill => PILL_SCORE,
        }
    }
}

impl Player {
    pub fn new(spawn: Pos) -> Self {
        Self { pos: spawn, spawn }
    }

    pub fn spawn(&self) -> Pos {
        self.spawn
    }

    pub fn respawn(&mut self) {
        self.pos = self.spawn;
    }

    /// Moves one step and clears whatever collectible sits on the new cell.
    pub fn step(&mut self, grid: &mut Grid, dir: Dir) -> Option<Eaten> {
        self.pos = resolve(grid, self.pos, dir);
        match grid.clear_cell(self.pos)? {
            Tile::Dot => Some(Eaten::Dot),
            Tile::Pill => Some(Eaten::Pill),
            _ => None,
        }
    }
}
