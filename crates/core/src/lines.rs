//! Line clearing
//!
//! Rows are scanned bottom to top. A full row is emptied, everything above
//! drops one row, and the same row index is examined again before moving on,
//! since the row that just dropped into it may be full as well.

use tracing::debug;

use crate::grid::Grid;
use crate::scoring::line_clear_points;

/// Result of one clearing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearOutcome {
    pub rows_cleared: u32,
    pub points: u32,
}

impl ClearOutcome {
    pub fn any(&self) -> bool {
        self.rows_cleared > 0
    }
}

/// Remove every full row, shifting the rows above down. Returns the number of
/// rows removed.
pub fn clear_full_rows(grid: &mut Grid) -> u32 {
    let bounds = grid.bounds();
    let mut cleared = 0;
    let mut y = bounds.y_min();

    while y < bounds.y_max() {
        if !grid.row_is_full(y) {
            y += 1;
            continue;
        }
        grid.clear_row(y);
        for row in y..bounds.y_max() {
            grid.copy_row(row + 1, row);
        }
        cleared += 1;
    }

    cleared
}

/// Runs clearing passes and keeps session totals.
#[derive(Debug, Clone, Default)]
pub struct LineClearEngine {
    rows_total: u32,
}

impl LineClearEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear full rows and score them at `level`.
    pub fn run(&mut self, grid: &mut Grid, level: u32) -> ClearOutcome {
        let rows_cleared = clear_full_rows(grid);
        let points = line_clear_points(rows_cleared, level);
        self.rows_total = self.rows_total.saturating_add(rows_cleared);
        if rows_cleared > 0 {
            debug!(rows_cleared, points, "rows cleared");
        }
        ClearOutcome {
            rows_cleared,
            points,
        }
    }

    /// Rows cleared since the last reset.
    pub fn rows_total(&self) -> u32 {
        self.rows_total
    }

    pub fn reset(&mut self) {
        self.rows_total = 0;
    }
}
