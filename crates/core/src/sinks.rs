//! Outbound collaborator interfaces.
//!
//! The engine pushes; it never reads render or audio state back.

use crate::types::{GridCoord, RenderTile};

/// Receives every grid and ghost write.
pub trait RenderSurface {
    fn set_cell(&mut self, coord: GridCoord, tile: RenderTile);
    fn clear_all(&mut self);
}

/// Receives the music tempo multiplier whenever difficulty changes.
pub trait AudioTempoSink {
    fn set_tempo(&mut self, multiplier: f32);
}

/// Render surface that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl RenderSurface for NullSurface {
    fn set_cell(&mut self, _coord: GridCoord, _tile: RenderTile) {}
    fn clear_all(&mut self) {}
}

/// Tempo sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioTempoSink for NullAudio {
    fn set_tempo(&mut self, _multiplier: f32) {}
}

impl<T: RenderSurface + ?Sized> RenderSurface for &mut T {
    fn set_cell(&mut self, coord: GridCoord, tile: RenderTile) {
        (**self).set_cell(coord, tile)
    }

    fn clear_all(&mut self) {
        (**self).clear_all()
    }
}

impl<T: AudioTempoSink + ?Sized> AudioTempoSink for &mut T {
    fn set_tempo(&mut self, multiplier: f32) {
        (**self).set_tempo(multiplier)
    }
}
