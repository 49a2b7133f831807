//! Grid module - occupancy over the playable rectangle
//!
//! The grid stores one [`Cell`] per coordinate inside its [`Bounds`] in a flat,
//! row-major array (row `y_min` first). Coordinates outside the rectangle are
//! never stored: reads report empty and writes are rejected. Deciding whether a
//! piece may stand somewhere is the job of [`crate::collision`], not the grid.

use crate::types::{Bounds, Cell, GridCoord, Tile};

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    bounds: Bounds,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid covering `bounds`
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            cells: vec![None; bounds.area()],
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline(always)]
    fn index(&self, c: GridCoord) -> Option<usize> {
        if !self.bounds.contains(c) {
            return None;
        }
        let col = (c.x - self.bounds.x_min()) as usize;
        let row = (c.y - self.bounds.y_min()) as usize;
        Some(row * self.bounds.width() as usize + col)
    }

    /// Marker at `c`; out-of-bounds reads are empty.
    pub fn get(&self, c: GridCoord) -> Cell {
        self.index(c).and_then(|i| self.cells[i])
    }

    pub fn is_occupied(&self, c: GridCoord) -> bool {
        self.get(c).is_some()
    }

    /// Write a marker. Returns false (and stores nothing) when `c` is out of bounds.
    pub fn set(&mut self, c: GridCoord, cell: Cell) -> bool {
        match self.index(c) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    pub fn clear_all(&mut self) {
        self.cells.fill(None);
    }

    /// True when every column of row `y` is occupied.
    pub fn row_is_full(&self, y: i32) -> bool {
        match self.row_range(y) {
            Some(range) => self.cells[range].iter().all(Option::is_some),
            None => false,
        }
    }

    /// Copy row `from` into row `to`. A `from` row outside the grid copies as empty.
    pub fn copy_row(&mut self, from: i32, to: i32) {
        let Some(dst) = self.row_range(to) else {
            return;
        };
        match self.row_range(from) {
            Some(src) => self.cells.copy_within(src, dst.start),
            None => self.cells[dst].fill(None),
        }
    }

    pub fn clear_row(&mut self, y: i32) {
        if let Some(range) = self.row_range(y) {
            self.cells[range].fill(None);
        }
    }

    /// Iterate occupied coordinates with their markers, bottom row first.
    pub fn occupied(&self) -> impl Iterator<Item = (GridCoord, Tile)> + '_ {
        let width = self.bounds.width() as usize;
        let (x_min, y_min) = (self.bounds.x_min(), self.bounds.y_min());
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|tile| {
                let c = GridCoord::new(x_min + (i % width) as i32, y_min + (i / width) as i32);
                (c, tile)
            })
        })
    }

    fn row_range(&self, y: i32) -> Option<std::ops::Range<usize>> {
        if y < self.bounds.y_min() || y >= self.bounds.y_max() {
            return None;
        }
        let width = self.bounds.width() as usize;
        let start = (y - self.bounds.y_min()) as usize * width;
        Some(start..start + width)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(Bounds::default())
    }
}
