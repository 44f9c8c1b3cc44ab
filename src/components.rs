/// A single maze cell after loading. Spawn markers are turned into `Empty`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Empty,
    Dot,
    Pill,
}

impl Tile {
    pub fn is_collectible(self) -> bool {
        matches!(self, Tile::Dot | Tile::Pill)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    /// (row, col) offset of a single step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (-1, 0),
            Dir::Down => (1, 0),
            Dir::Left => (0, -1),
            Dir::Right => (0, 1),
        }
    }
}

/// Shared ghost status. Every ghost reads the same value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GhostStatus {
    #[default]
    Normal,
    Vulnerable,
}
