//! GameView: maps a [`TileCanvas`] and HUD values into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::canvas::TileCanvas;
use crate::fb::{FrameBuffer, Rgb, Style};
use crate::types::{PieceKind, RenderTile, Tile};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Values shown next to the board.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hud {
    pub level: u32,
    pub score: u32,
    pub tempo: f32,
    pub clear_events: u32,
    pub games_over: u32,
}

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const BLACK: Rgb = Rgb::new(0, 0, 0);

pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 roughly squares up a cell in most terminal fonts.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl GameView {
    /// Draw the board and HUD into `fb`, resizing it to the viewport.
    pub fn render_into(&self, canvas: &TileCanvas, hud: &Hud, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear();

        let bounds = canvas.bounds();
        let inner_w = bounds.width() * self.cell_w;
        let inner_h = bounds.height() * self.cell_h;
        let frame_w = inner_w + 2;
        let frame_h = inner_h + 2;
        let left = viewport.width.saturating_sub(frame_w) / 2;
        let top = viewport.height.saturating_sub(frame_h) / 2;

        fb.fill_rect(left + 1, top + 1, inner_w, inner_h, ' ', Style::new(PLAY_BG, PLAY_BG));
        draw_frame(fb, left, top, frame_w, frame_h);

        // Screen rows grow downwards, board rows grow up.
        for (row, y) in (bounds.y_min()..bounds.y_max()).rev().enumerate() {
            for (col, x) in (bounds.x_min()..bounds.x_max()).enumerate() {
                let (ch, style) = tile_glyph(canvas.get((x, y).into()));
                let px = left + 1 + col as u16 * self.cell_w;
                let py = top + 1 + row as u16 * self.cell_h;
                fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
            }
        }

        self.draw_hud(fb, hud, viewport, left.saturating_add(frame_w).saturating_add(2), top);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, canvas: &TileCanvas, hud: &Hud, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(canvas, hud, viewport, &mut fb);
        fb
    }

    fn draw_hud(&self, fb: &mut FrameBuffer, hud: &Hud, viewport: Viewport, x: u16, top: u16) {
        if x.saturating_add(8) > viewport.width {
            return;
        }
        let label = Style::default().bold();
        let value = Style::new(Rgb::new(200, 200, 200), BLACK);

        let rows = [
            ("LEVEL", hud.level.to_string()),
            ("SCORE", hud.score.to_string()),
            ("TEMPO", format!("{:.2}x", hud.tempo)),
            ("CLEARS", hud.clear_events.to_string()),
            ("RESETS", hud.games_over.to_string()),
        ];
        let mut y = top;
        for (name, text) in rows {
            fb.put_str(x, y, name, label);
            fb.put_str(x, y.saturating_add(1), &text, value);
            y = y.saturating_add(3);
        }

        let help = Style::new(Rgb::new(140, 140, 150), BLACK).dim();
        fb.put_str(x, y, "arrows move", help);
        fb.put_str(x, y.saturating_add(1), "Q/E rotate", help);
        fb.put_str(x, y.saturating_add(2), "space drop", help);
        fb.put_str(x, y.saturating_add(3), "esc quit", help);
    }
}

fn draw_frame(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
    if w < 2 || h < 2 {
        return;
    }
    let style = Style::new(Rgb::new(200, 200, 200), BLACK);
    let (right, bottom) = (x + w - 1, y + h - 1);

    fb.set(x, y, '┌', style);
    fb.set(right, y, '┐', style);
    fb.set(x, bottom, '└', style);
    fb.set(right, bottom, '┘', style);
    for cx in x + 1..right {
        fb.set(cx, y, '─', style);
        fb.set(cx, bottom, '─', style);
    }
    for cy in y + 1..bottom {
        fb.set(x, cy, '│', style);
        fb.set(right, cy, '│', style);
    }
}

fn tile_glyph(tile: RenderTile) -> (char, Style) {
    match tile {
        RenderTile::Empty => ('·', Style::new(Rgb::new(90, 90, 100), PLAY_BG).dim()),
        RenderTile::Ghost => ('░', Style::new(Rgb::new(140, 140, 140), PLAY_BG).dim()),
        RenderTile::Tile(Tile::Blank) => ('▓', Style::new(Rgb::new(150, 150, 150), PLAY_BG)),
        RenderTile::Tile(Tile::Piece(kind)) => ('█', Style::new(piece_color(kind), PLAY_BG).bold()),
    }
}

fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::Z => Rgb::new(220, 80, 80),
    }
}
