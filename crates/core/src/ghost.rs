//! Ghost piece: where the active piece would land.
//!
//! Purely advisory. The projection never writes into the grid.

use crate::collision::{absolute, is_valid_ignoring, PieceCells};
use crate::grid::Grid;
use crate::piece::ActivePiece;
use crate::types::GridCoord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostPiece {
    pub position: GridCoord,
    pub cells: PieceCells,
}

impl GhostPiece {
    pub fn absolute_cells(&self) -> PieceCells {
        absolute(&self.cells, self.position)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GhostProjector {
    ghost: Option<GhostPiece>,
}

impl GhostProjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the landing position of `piece`.
    ///
    /// The piece's own cells are ignored, so this works whether or not the
    /// piece is currently written into `grid`. Yields `None` if the piece's
    /// current position is itself invalid.
    pub fn project(&mut self, piece: &ActivePiece, grid: &Grid) -> Option<&GhostPiece> {
        let own = piece.absolute_cells();
        let cells = *piece.cells();
        let mut position = piece.position();

        self.ghost = None;
        if !is_valid_ignoring(&cells, position, grid, &own) {
            return None;
        }
        while is_valid_ignoring(&cells, position + GridCoord::DOWN, grid, &own) {
            position += GridCoord::DOWN;
        }
        self.ghost = Some(GhostPiece { position, cells });
        self.ghost.as_ref()
    }

    pub fn ghost(&self) -> Option<&GhostPiece> {
        self.ghost.as_ref()
    }

    pub fn clear(&mut self) {
        self.ghost = None;
    }
}
