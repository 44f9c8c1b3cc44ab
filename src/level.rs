use std::fs;
use std::path::Path;

use tracing::info;

use crate::components::{Pos, Tile};
use crate::error::{LoadError, LoadResult};

/// The maze. Its dimensions never change after load; only collectibles are
/// cleared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<Tile>>,
}

impl Grid {
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Length of one row. Rows are uniform after `Level::parse`, but
    /// wraparound asks per row anyway.
    pub fn row_len(&self, row: usize) -> usize {
        self.rows[row].len()
    }

    /// Callers only pass in-bounds positions; movement keeps them there.
    pub fn cell_at(&self, pos: Pos) -> Tile {
        self.rows[pos.row][pos.col]
    }

    /// Replaces a dot or pill with floor and returns what was there.
    /// Any other cell is left alone.
    pub fn clear_cell(&mut self, pos: Pos) -> Option<Tile> {
        let cell = &mut self.rows[pos.row][pos.col];
        if cell.is_collectible() {
            let eaten = *cell;
            *cell = Tile::Empty;
            Some(eaten)
        } else {
            None
        }
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&cell| cell == tile)
            .count()
    }
}

/// A parsed maze plus the spawn points found in it.
#[derive(Clone, Debug)]
pub struct Level {
    pub grid: Grid,
    pub player_spawn: Pos,
    pub ghost_spawns: Vec<Pos>,
    pub dots: usize,
}

impl Level {
    pub fn load(path: impl AsRef<Path>) -> LoadResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let level = Self::parse(&text)?;
        info!(
            path = %path.display(),
            rows = level.grid.height(),
            cols = level.grid.width(),
            ghosts = level.ghost_spawns.len(),
            dots = level.dots,
            "maze loaded"
        );
        Ok(level)
    }

    /// `#` wall, `.` dot, `X` pill, `P` player, `G` ghost, anything else is
    /// floor. Trailing blank lines are ignored.
    pub fn parse(text: &str) -> LoadResult<Self> {
        let mut lines: Vec<&str> = text.lines().collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        if lines.is_empty() {
            return Err(LoadError::EmptyMaze);
        }

        let expected = lines[0].chars().count();
        if expected == 0 {
            return Err(LoadError::EmptyMaze);
        }
        let mut rows = Vec::with_capacity(lines.len());
        let mut player_spawn = None;
        let mut ghost_spawns = Vec::new();

        for (row, line) in lines.iter().enumerate() {
            let mut cells = Vec::with_capacity(expected);
            for (col, ch) in line.chars().enumerate() {
                let tile = match ch {
                    '#' => Tile::Wall,
                    '.' => Tile::Dot,
                    'X' => Tile::Pill,
                    'P' => {
                        if player_spawn.is_some() {
                            return Err(LoadError::DuplicatePlayer { row, col });
                        }
                        player_spawn = Some(Pos::new(row, col));
                        Tile::Empty
                    }
                    'G' => {
                        ghost_spawns.push(Pos::new(row, col));
                        Tile::Empty
                    }
                    _ => Tile::Empty,
                };
                cells.push(tile);
            }
            if cells.len() != expected {
                return Err(LoadError::RaggedRow {
                    row,
                    expected,
                    found: cells.len(),
                });
            }
            rows.push(cells);
        }

        let player_spawn = player_spawn.ok_or(LoadError::MissingPlayer)?;
        if ghost_spawns.is_empty() {
            return Err(LoadError::NoGhosts);
        }

        let grid = Grid { rows };
        let dots = grid.count(Tile::Dot);
        Ok(Self {
            grid,
            player_spawn,
            ghost_spawns,
            dots,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_symbols_and_spawns() {
        let level = Level::parse("#####\n#P.G#\n#X z#\n#####\n").unwrap();
        assert_eq!(level.grid.height(), 4);
        assert_eq!(level.grid.width(), 5);
        assert_eq!(level.player_spawn, Pos::new(1, 1));
        assert_eq!(level.ghost_spawns, vec![Pos::new(1, 3)]);
        assert_eq!(level.dots, 1);
        assert_eq!(level.grid.cell_at(Pos::new(0, 0)), Tile::Wall);
        assert_eq!(level.grid.cell_at(Pos::new(1, 1)), Tile::Empty);
        assert_eq!(level.grid.cell_at(Pos::new(1, 2)), Tile::Dot);
        assert_eq!(level.grid.cell_at(Pos::new(1, 3)), Tile::Empty);
        assert_eq!(level.grid.cell_at(Pos::new(2, 1)), Tile::Pill);
        assert_eq!(level.grid.cell_at(Pos::new(2, 3)), Tile::Empty);
    }

    #[test]
    fn pills_are_not_counted_as_dots() {
        let level = Level::parse("XX.P\n..GX").unwrap();
        assert_eq!(level.dots, 3);
        assert_eq!(level.grid.count(Tile::Pill), 3);
    }

    #[test]
    fn clear_cell_only_touches_collectibles() {
        let mut level = Level::parse("#.XPG").unwrap();
        assert_eq!(level.grid.clear_cell(Pos::new(0, 0)), None);
        assert_eq!(level.grid.cell_at(Pos::new(0, 0)), Tile::Wall);
        assert_eq!(level.grid.clear_cell(Pos::new(0, 1)), Some(Tile::Dot));
        assert_eq!(level.grid.clear_cell(Pos::new(0, 2)), Some(Tile::Pill));
        assert_eq!(level.grid.cell_at(Pos::new(0, 1)), Tile::Empty);
        assert_eq!(level.grid.cell_at(Pos::new(0, 2)), Tile::Empty);
        assert_eq!(level.grid.clear_cell(Pos::new(0, 1)), None);
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = Level::parse("#####\n#P G\n#####").unwrap_err();
        assert!(matches!(
            err,
            LoadError::RaggedRow {
                row: 1,
                expected: 5,
                found: 4
            }
        ));
    }

    #[test]
    fn rejects_missing_or_duplicate_player() {
        assert!(matches!(
            Level::parse("#G.#").unwrap_err(),
            LoadError::MissingPlayer
        ));
        assert!(matches!(
            Level::parse("PGP").unwrap_err(),
            LoadError::DuplicatePlayer { row: 0, col: 2 }
        ));
    }

    #[test]
    fn rejects_empty_maze_and_no_ghosts() {
        assert!(matches!(Level::parse("").unwrap_err(), LoadError::EmptyMaze));
        assert!(matches!(Level::parse("\n\n").unwrap_err(), LoadError::EmptyMaze));
        assert!(matches!(
            Level::parse("\n#P.G#\n#####").unwrap_err(),
            LoadError::EmptyMaze
        ));
        assert!(matches!(Level::parse("P..").unwrap_err(), LoadError::NoGhosts));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Level::load("/definitely/not/here/maze.txt").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
