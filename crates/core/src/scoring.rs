//! Scoring module - classic Nintendo line-clear points
//!
//! Only completed rows score. Soft and hard drops award nothing.

use crate::types::LINE_SCORES;

/// Points for clearing `rows` rows in one lock at `level`.
///
/// `LINE_SCORES[rows] × (level + 1)` for 1–4 rows, 0 otherwise.
pub fn line_clear_points(rows: u32, level: u32) -> u32 {
    if rows == 0 || rows as usize >= LINE_SCORES.len() {
        return 0;
    }
    LINE_SCORES[rows as usize].saturating_mul(level.saturating_add(1))
}
