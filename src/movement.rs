use crate::components::{Dir, Pos, Tile};
use crate::level::Grid;

/// Where a sprite at `pos` ends up after trying to step in `dir`.
///
/// Edges wrap around to the opposite side. A wall at the destination cancels
/// the move and `pos` comes back unchanged.
pub fn resolve(grid: &Grid, pos: Pos, dir: Dir) -> Pos {
    let (dr, dc) = dir.delta();
    let row = wrap(pos.row, dr, grid.height());
    let col = wrap(pos.col, dc, grid.row_len(row));
    let next = Pos { row, col };
    match grid.cell_at(next) {
        Tile::Wall => pos,
        _ => next,
    }
}

fn wrap(index: usize, delta: isize, len: usize) -> usize {
    (index as isize + delta).rem_euclid(len as isize) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;

    fn open_grid() -> Grid {
        Level::parse("P...\n....\nG...").unwrap().grid
    }

    #[test]
    fn steps_in_each_direction() {
        let grid = open_grid();
        let pos = Pos::new(1, 1);
        assert_eq!(resolve(&grid, pos, Dir::Up), Pos::new(0, 1));
        assert_eq!(resolve(&grid, pos, Dir::Down), Pos::new(2, 1));
        assert_eq!(resolve(&grid, pos, Dir::Left), Pos::new(1, 0));
        assert_eq!(resolve(&grid, pos, Dir::Right), Pos::new(1, 2));
    }

    #[test]
    fn wraps_on_every_edge() {
        let grid = open_grid();
        assert_eq!(resolve(&grid, Pos::new(0, 2), Dir::Up), Pos::new(2, 2));
        assert_eq!(resolve(&grid, Pos::new(2, 2), Dir::Down), Pos::new(0, 2));
        assert_eq!(resolve(&grid, Pos::new(1, 3), Dir::Right), Pos::new(1, 0));
        assert_eq!(resolve(&grid, Pos::new(1, 0), Dir::Left), Pos::new(1, 3));
    }

    #[test]
    fn walls_block_including_across_the_wrap() {
        let grid = Level::parse("#P#\n.G.\n###").unwrap().grid;
        let pos = Pos::new(1, 1);
        assert_eq!(resolve(&grid, pos, Dir::Down), pos);
        assert_eq!(resolve(&grid, Pos::new(0, 1), Dir::Left), Pos::new(0, 1));
        assert_eq!(resolve(&grid, Pos::new(0, 1), Dir::Up), Pos::new(0, 1));
        assert_eq!(resolve(&grid, Pos::new(1, 0), Dir::Left), Pos::new(1, 2));
    }

    #[test]
    fn resolve_does_not_touch_the_grid() {
        let grid = open_grid();
        let before = grid.clone();
        for dir in Dir::ALL {
            let _ = resolve(&grid, Pos::new(1, 2), dir);
        }
        assert_eq!(grid, before);
    }
}
