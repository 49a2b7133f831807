//! Engine-facing sinks that the terminal view reads from.

use crate::core::{AudioTempoSink, RenderSurface};
use crate::types::{Bounds, GridCoord, RenderTile, MIN_TEMPO};

/// Retained copy of everything the engine painted.
#[derive(Debug, Clone, PartialEq)]
pub struct TileCanvas {
    bounds: Bounds,
    tiles: Vec<RenderTile>,
}

impl TileCanvas {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            tiles: vec![RenderTile::Empty; bounds.area()],
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn index(&self, c: GridCoord) -> Option<usize> {
        if !self.bounds.contains(c) {
            return None;
        }
        let col = (c.x - self.bounds.x_min()) as usize;
        let row = (c.y - self.bounds.y_min()) as usize;
        Some(row * self.bounds.width() as usize + col)
    }

    /// Tile at `c`; anything outside the board reads as empty.
    pub fn get(&self, c: GridCoord) -> RenderTile {
        self.index(c).map_or(RenderTile::Empty, |i| self.tiles[i])
    }
}

impl RenderSurface for TileCanvas {
    fn set_cell(&mut self, coord: GridCoord, tile: RenderTile) {
        if let Some(i) = self.index(coord) {
            self.tiles[i] = tile;
        }
    }

    fn clear_all(&mut self) {
        self.tiles.fill(RenderTile::Empty);
    }
}

/// Stands in for the music player: remembers the last tempo it was given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoGauge {
    tempo: f32,
    changes: u32,
}

impl TempoGauge {
    pub fn new() -> Self {
        Self {
            tempo: MIN_TEMPO,
            changes: 0,
        }
    }

    pub fn tempo(&self) -> f32 {
        self.tempo
    }

    /// How many times the engine pushed a tempo.
    pub fn changes(&self) -> u32 {
        self.changes
    }
}

impl Default for TempoGauge {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioTempoSink for TempoGauge {
    fn set_tempo(&mut self, multiplier: f32) {
        self.tempo = multiplier;
        self.changes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PieceKind, Tile};

    #[test]
    fn test_canvas_keeps_writes_inside_bounds() {
        let mut canvas = TileCanvas::new(Bounds::default());
        let tile = RenderTile::Tile(Tile::Piece(PieceKind::L));
        canvas.set_cell(GridCoord::new(4, 9), tile);
        canvas.set_cell(GridCoord::new(5, 9), tile);
        assert_eq!(canvas.get(GridCoord::new(4, 9)), tile);
        assert_eq!(canvas.get(GridCoord::new(5, 9)), RenderTile::Empty);

        canvas.clear_all();
        assert_eq!(canvas.get(GridCoord::new(4, 9)), RenderTile::Empty);
    }

    #[test]
    fn test_gauge_tracks_last_tempo() {
        let mut gauge = TempoGauge::new();
        assert_eq!(gauge.tempo(), 0.75);
        gauge.set_tempo(1.5);
        gauge.set_tempo(2.0);
        assert_eq!(gauge.tempo(), 2.0);
        assert_eq!(gauge.changes(), 2);
    }
}
