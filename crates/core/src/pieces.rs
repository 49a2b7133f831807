//! Pieces module - tetromino shape data and wall kick tables
//!
//! Each kind carries its spawn cells, the pivot policy used by
//! [`crate::rotation`], and a wall kick table. Offsets are `(x, y)` with `y` up.

use crate::collision::PieceCells;
use crate::types::{GridCoord, PieceKind};

/// How a kind's cells turn about their centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pivot {
    /// Turns about the corner shared by four cells, i.e. the point `(0.5, 0.5)`.
    /// Used by the two kinds whose bounding box is even-sized (`I` and `O`).
    Corner,
    /// Turns about the centre of cell `(0, 0)`.
    Center,
}

/// Wall kick translations: 8 rows (see [`crate::rotation::kick_row`]), 5 tests each.
pub type KickTable = [[(i8, i8); 5]; 8];

const fn cells(raw: [(i32, i32); 4]) -> PieceCells {
    [
        GridCoord::new(raw[0].0, raw[0].1),
        GridCoord::new(raw[1].0, raw[1].1),
        GridCoord::new(raw[2].0, raw[2].1),
        GridCoord::new(raw[3].0, raw[3].1),
    ]
}

const I_CELLS: PieceCells = cells([(-1, 1), (0, 1), (1, 1), (2, 1)]);
const J_CELLS: PieceCells = cells([(-1, 1), (-1, 0), (0, 0), (1, 0)]);
const L_CELLS: PieceCells = cells([(1, 1), (-1, 0), (0, 0), (1, 0)]);
const O_CELLS: PieceCells = cells([(0, 1), (1, 1), (0, 0), (1, 0)]);
const S_CELLS: PieceCells = cells([(0, 1), (1, 1), (-1, 0), (0, 0)]);
const T_CELLS: PieceCells = cells([(0, 1), (-1, 0), (0, 0), (1, 0)]);
const Z_CELLS: PieceCells = cells([(-1, 1), (0, 1), (0, 0), (1, 0)]);

/// Spawn-orientation cells of a kind.
pub fn base_cells(kind: PieceKind) -> PieceCells {
    match kind {
        PieceKind::I => I_CELLS,
        PieceKind::J => J_CELLS,
        PieceKind::L => L_CELLS,
        PieceKind::O => O_CELLS,
        PieceKind::S => S_CELLS,
        PieceKind::T => T_CELLS,
        PieceKind::Z => Z_CELLS,
    }
}

pub fn pivot(kind: PieceKind) -> Pivot {
    match kind {
        PieceKind::I | PieceKind::O => Pivot::Corner,
        _ => Pivot::Center,
    }
}

/// Kick table for a kind. `O` shares the JLSTZ table; its rotation maps the
/// square onto itself, so only the first entry is ever used.
pub fn kick_table(kind: PieceKind) -> &'static KickTable {
    match kind {
        PieceKind::I => &I_KICKS,
        _ => &JLOSTZ_KICKS,
    }
}

/// I piece kick table
const I_KICKS: KickTable = [
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
];

/// Kick table shared by J, L, O, S, T and Z
const JLOSTZ_KICKS: KickTable = [
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
];
