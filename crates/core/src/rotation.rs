//! Rotation with wall kicks
//!
//! Cells turn by a 90° matrix `[0, 1, -1, 0]` scaled by the direction sign
//! (`x' = y·d`, `y' = -x·d`, clockwise for `d = +1` with `y` up). The pivot
//! policy comes from [`Pivot`]:
//!
//! - [`Pivot::Center`]: the matrix is applied to the integer offsets directly.
//! - [`Pivot::Corner`]: offsets are shifted by `-½` on both axes, turned, then
//!   rounded up. Half-cell values are tracked in doubled integer coordinates
//!   so the ceiling is exact and four turns return the original cells.
//!
//! A blocked rotation tries the kind's kick row in order. If nothing fits, the
//! inverse turn is re-applied and the position is left untouched.

use tracing::{debug, trace};

use crate::collision::PieceCells;
use crate::grid::Grid;
use crate::piece::ActivePiece;
use crate::pieces::{kick_table, pivot, Pivot};
use crate::types::GridCoord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Cw,
    Ccw,
}

impl Direction {
    /// `+1` for clockwise, `-1` for counter-clockwise.
    pub fn sign(self) -> i32 {
        match self {
            Direction::Cw => 1,
            Direction::Ccw => -1,
        }
    }

    pub fn inverse(self) -> Self {
        match self {
            Direction::Cw => Direction::Ccw,
            Direction::Ccw => Direction::Cw,
        }
    }
}

/// `ceil(v / 2)` for any integer `v`.
#[inline(always)]
fn ceil_half(v: i32) -> i32 {
    (v + 1).div_euclid(2)
}

fn rotate_cell(cell: GridCoord, pivot: Pivot, d: i32) -> GridCoord {
    match pivot {
        Pivot::Center => GridCoord::new(cell.y * d, -cell.x * d),
        Pivot::Corner => {
            let x2 = 2 * cell.x - 1;
            let y2 = 2 * cell.y - 1;
            GridCoord::new(ceil_half(y2 * d), ceil_half(-x2 * d))
        }
    }
}

/// Turn all four offsets once in `dir`.
pub fn rotate_cells(cells: &PieceCells, pivot: Pivot, dir: Direction) -> PieceCells {
    let d = dir.sign();
    cells.map(|c| rotate_cell(c, pivot, d))
}

/// Kick row for arriving at `new_rotation` by turning in `dir`:
/// `2·new_rotation`, minus one when turning counter-clockwise, wrapped into `0..8`.
pub fn kick_row(new_rotation: u8, dir: Direction) -> usize {
    let back = if dir == Direction::Ccw { 1 } else { 0 };
    (2 * new_rotation as i32 - back).rem_euclid(8) as usize
}

/// Rotate the piece in place, kicking if needed. Returns whether it turned.
///
/// Kicks go through [`ActivePiece::translate`], so a successful rotation
/// resets the lock timer exactly like a move.
pub fn rotate(piece: &mut ActivePiece, dir: Direction, grid: &Grid) -> bool {
    let previous = piece.rotation;
    let policy = pivot(piece.kind);

    piece.rotation = (previous as i32 + dir.sign()).rem_euclid(4) as u8;
    piece.cells = rotate_cells(&piece.cells, policy, dir);

    let row = &kick_table(piece.kind)[kick_row(piece.rotation, dir)];
    for (i, &(dx, dy)) in row.iter().enumerate() {
        if piece.translate(GridCoord::new(dx as i32, dy as i32), grid) {
            if i > 0 {
                debug!(kind = piece.kind.as_str(), dx, dy, "wall kick");
            }
            return true;
        }
    }

    trace!(kind = piece.kind.as_str(), "rotation blocked");
    piece.rotation = previous;
    piece.cells = rotate_cells(&piece.cells, policy, dir.inverse());
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::base_cells;
    use crate::types::{PieceKind, Tile};
    use std::collections::HashSet;

    fn as_set(cells: &PieceCells) -> HashSet<GridCoord> {
        cells.iter().copied().collect()
    }

    #[test]
    fn test_kick_row_wraps() {
        assert_eq!(kick_row(1, Direction::Cw), 2);
        assert_eq!(kick_row(0, Direction::Ccw), 7);
        assert_eq!(kick_row(3, Direction::Ccw), 5);
        assert_eq!(kick_row(0, Direction::Cw), 0);
    }

    #[test]
    fn test_t_turns_clockwise_about_its_centre() {
        let cells = rotate_cells(&base_cells(PieceKind::T), Pivot::Center, Direction::Cw);
        // Nub points right after a clockwise turn from pointing up.
        let expected = [
            GridCoord::new(1, 0),
            GridCoord::new(0, 1),
            GridCoord::new(0, 0),
            GridCoord::new(0, -1),
        ];
        assert_eq!(cells, expected);
    }

    #[test]
    fn test_i_turns_about_cell_corner() {
        let cells = rotate_cells(&base_cells(PieceKind::I), Pivot::Corner, Direction::Cw);
        let expected = [
            GridCoord::new(1, 2),
            GridCoord::new(1, 1),
            GridCoord::new(1, 0),
            GridCoord::new(1, -1),
        ];
        assert_eq!(cells, expected);
    }

    #[test]
    fn test_o_keeps_its_footprint() {
        let base = base_cells(PieceKind::O);
        for dir in [Direction::Cw, Direction::Ccw] {
            assert_eq!(as_set(&rotate_cells(&base, Pivot::Corner, dir)), as_set(&base));
        }
    }

    #[test]
    fn test_inverse_turn_restores_cells() {
        for kind in PieceKind::ALL {
            let base = base_cells(kind);
            let p = pivot(kind);
            let there = rotate_cells(&base, p, Direction::Ccw);
            assert_eq!(rotate_cells(&there, p, Direction::Cw), base, "{kind:?}");
        }
    }

    #[test]
    fn test_rotation_state_normalized_after_ccw_from_zero() {
        let grid = Grid::default();
        let mut piece = ActivePiece::spawn(PieceKind::T, GridCoord::new(0, 0));
        assert!(rotate(&mut piece, Direction::Ccw, &grid));
        assert_eq!(piece.rotation(), 3);
    }

    #[test]
    fn test_blocked_rotation_reverts() {
        let mut grid = Grid::default();
        // A T resting on the floor; fill everything around it so no kick fits.
        let mut piece = ActivePiece::spawn(PieceKind::T, GridCoord::new(0, -10));
        let own = piece.absolute_cells();
        for y in -10..-6 {
            for x in -5..5 {
                let c = GridCoord::new(x, y);
                if !own.contains(&c) {
                    grid.set(c, Some(Tile::Blank));
                }
            }
        }
        let before = piece;
        assert!(!rotate(&mut piece, Direction::Cw, &grid));
        assert_eq!(piece, before);
    }

    #[test]
    fn test_wall_kick_moves_piece_off_wall() {
        let grid = Grid::default();
        // Vertical I hugging the left wall: cells at x = -5.
        let mut piece = ActivePiece::spawn(PieceKind::I, GridCoord::new(0, 0));
        assert!(rotate(&mut piece, Direction::Cw, &grid));
        while piece.translate(GridCoord::LEFT, &grid) {}
        assert_eq!(piece.absolute_cells()[0].x, -5);

        // Turning back to horizontal needs a kick to the right.
        assert!(rotate(&mut piece, Direction::Ccw, &grid));
        assert_eq!(piece.rotation(), 0);
        assert!(piece.absolute_cells().iter().all(|c| c.x >= -5));
        assert!(piece.position().x > -6);
    }
}
