//! Collision checks for a piece's four cells against the grid.

use crate::grid::Grid;
use crate::types::GridCoord;

/// A piece's cell offsets relative to its position.
pub type PieceCells = [GridCoord; 4];

/// True when every `cell + position` is inside the grid bounds and unoccupied.
pub fn is_valid(cells: &PieceCells, position: GridCoord, grid: &Grid) -> bool {
    is_valid_ignoring(cells, position, grid, &[])
}

/// Like [`is_valid`], but coordinates in `ignored` count as empty.
///
/// The active piece is written into the grid between ticks, so projections of
/// that same piece pass its current absolute cells here.
pub fn is_valid_ignoring(
    cells: &PieceCells,
    position: GridCoord,
    grid: &Grid,
    ignored: &[GridCoord],
) -> bool {
    let bounds = grid.bounds();
    cells.iter().all(|&offset| {
        let c = offset + position;
        bounds.contains(c) && (!grid.is_occupied(c) || ignored.contains(&c))
    })
}

/// Absolute coordinates of `cells` placed at `position`.
pub fn absolute(cells: &PieceCells, position: GridCoord) -> PieceCells {
    cells.map(|offset| offset + position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GridCoord as C, Tile};

    const BAR: PieceCells = [C::new(-1, 0), C::new(0, 0), C::new(1, 0), C::new(2, 0)];

    #[test]
    fn test_valid_on_empty_grid() {
        let grid = Grid::default();
        assert!(is_valid(&BAR, C::new(0, 0), &grid));
        assert!(is_valid(&BAR, C::new(-4, -10), &grid));
        assert!(is_valid(&BAR, C::new(2, 9), &grid));
    }

    #[test]
    fn test_each_edge_is_exclusive_on_max_side() {
        let grid = Grid::default();
        assert!(!is_valid(&BAR, C::new(-5, 0), &grid)); // x = -6
        assert!(!is_valid(&BAR, C::new(3, 0), &grid)); // x = 5
        assert!(!is_valid(&BAR, C::new(0, -11), &grid));
        assert!(!is_valid(&BAR, C::new(0, 10), &grid));
    }

    #[test]
    fn test_occupied_cell_blocks() {
        let mut grid = Grid::default();
        grid.set(C::new(2, 0), Some(Tile::Blank));
        assert!(!is_valid(&BAR, C::new(0, 0), &grid));
        assert!(is_valid(&BAR, C::new(0, 1), &grid));
    }

    #[test]
    fn test_ignored_cells_count_as_empty() {
        let mut grid = Grid::default();
        grid.set(C::new(2, 0), Some(Tile::Blank));
        assert!(is_valid_ignoring(&BAR, C::new(0, 0), &grid, &[C::new(2, 0)]));
        // Ignoring never admits out-of-bounds cells.
        assert!(!is_valid_ignoring(&BAR, C::new(3, 0), &grid, &[C::new(5, 0)]));
    }
}
