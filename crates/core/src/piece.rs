//! Active piece and the per-piece fall/lock state machine.
//!
//! A piece lives through `Falling -> Locking -> Locked`. `Locking` only means
//! "a one-row-down move would fail right now"; the piece may still slide or
//! rotate back into `Falling`. `Locked` is terminal and is reached either by a
//! gravity step that fails after the lock delay has elapsed, or by a hard drop.

use std::time::Duration;

use tracing::trace;

use crate::collision::{absolute, is_valid, PieceCells};
use crate::grid::Grid;
use crate::pieces::base_cells;
use crate::rotation::{rotate, Direction};
use crate::types::{GameAction, GridCoord, PieceKind};

/// The falling piece: shape, orientation, position and its two timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    pub(crate) kind: PieceKind,
    pub(crate) rotation: u8,
    pub(crate) position: GridCoord,
    pub(crate) cells: PieceCells,
    pub(crate) fall_timer: Duration,
    pub(crate) lock_timer: Duration,
}

impl ActivePiece {
    /// A fresh piece in spawn orientation with both timers at zero.
    pub fn spawn(kind: PieceKind, position: GridCoord) -> Self {
        Self {
            kind,
            rotation: 0,
            position,
            cells: base_cells(kind),
            fall_timer: Duration::ZERO,
            lock_timer: Duration::ZERO,
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Orientation in `0..4`.
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    pub fn position(&self) -> GridCoord {
        self.position
    }

    /// Cell offsets relative to [`ActivePiece::position`].
    pub fn cells(&self) -> &PieceCells {
        &self.cells
    }

    pub fn absolute_cells(&self) -> PieceCells {
        absolute(&self.cells, self.position)
    }

    pub fn fall_timer(&self) -> Duration {
        self.fall_timer
    }

    pub fn lock_timer(&self) -> Duration {
        self.lock_timer
    }

    /// Move by `delta` if the destination is valid. A successful move resets
    /// the lock timer; a failed one changes nothing.
    pub fn translate(&mut self, delta: GridCoord, grid: &Grid) -> bool {
        let target = self.position + delta;
        if !is_valid(&self.cells, target, grid) {
            return false;
        }
        self.position = target;
        self.lock_timer = Duration::ZERO;
        true
    }

    /// True when one row down is still a valid position.
    pub fn can_fall(&self, grid: &Grid) -> bool {
        is_valid(&self.cells, self.position + GridCoord::DOWN, grid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PiecePhase {
    Falling,
    Locking,
    Locked,
}

/// Why a piece locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockCause {
    /// A gravity step failed after the piece sat idle for the lock delay.
    Settled,
    HardDrop,
}

/// Result of one controller tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PieceTick {
    /// The piece changed position or orientation.
    pub moved: bool,
    pub locked: Option<LockCause>,
}

/// Owns the active piece between spawn and lock, plus the timing parameters
/// that outlive individual pieces.
#[derive(Debug, Clone)]
pub struct PieceController {
    piece: Option<ActivePiece>,
    phase: PiecePhase,
    step_delay: Duration,
    lock_delay: Duration,
}

impl PieceController {
    pub fn new(step_delay: Duration, lock_delay: Duration) -> Self {
        Self {
            piece: None,
            phase: PiecePhase::Locked,
            step_delay,
            lock_delay,
        }
    }

    /// Replace the active piece with a fresh `kind` at `position`.
    pub fn spawn(&mut self, kind: PieceKind, position: GridCoord) -> &ActivePiece {
        self.phase = PiecePhase::Falling;
        self.piece.insert(ActivePiece::spawn(kind, position))
    }

    pub fn piece(&self) -> Option<&ActivePiece> {
        self.piece.as_ref()
    }

    pub fn phase(&self) -> PiecePhase {
        self.phase
    }

    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }

    pub fn set_step_delay(&mut self, step_delay: Duration) {
        self.step_delay = step_delay;
    }

    pub fn lock_delay(&self) -> Duration {
        self.lock_delay
    }

    /// Advance by `dt`, applying at most one action.
    ///
    /// `grid` must not contain the piece's own cells.
    pub fn tick(&mut self, dt: Duration, action: Option<GameAction>, grid: &Grid) -> PieceTick {
        if self.phase == PiecePhase::Locked {
            return PieceTick::default();
        }
        let Some(piece) = self.piece.as_mut() else {
            return PieceTick::default();
        };

        piece.lock_timer += dt;

        let mut moved = false;
        if let Some(action) = action {
            moved = Self::apply(piece, action, grid);
            if action == GameAction::HardDrop {
                self.phase = PiecePhase::Locked;
                return PieceTick {
                    moved,
                    locked: Some(LockCause::HardDrop),
                };
            }
        }

        piece.fall_timer += dt;
        if piece.fall_timer >= self.step_delay {
            piece.fall_timer = Duration::ZERO;
            moved |= piece.translate(GridCoord::DOWN, grid);
            if piece.lock_timer >= self.lock_delay {
                self.phase = PiecePhase::Locked;
                return PieceTick {
                    moved,
                    locked: Some(LockCause::Settled),
                };
            }
        }

        self.phase = if piece.can_fall(grid) {
            PiecePhase::Falling
        } else {
            PiecePhase::Locking
        };
        PieceTick {
            moved,
            locked: None,
        }
    }

    fn apply(piece: &mut ActivePiece, action: GameAction, grid: &Grid) -> bool {
        let moved = match action {
            GameAction::MoveLeft => piece.translate(GridCoord::LEFT, grid),
            GameAction::MoveRight => piece.translate(GridCoord::RIGHT, grid),
            GameAction::SoftDrop => piece.translate(GridCoord::DOWN, grid),
            GameAction::RotateCw => rotate(piece, Direction::Cw, grid),
            GameAction::RotateCcw => rotate(piece, Direction::Ccw, grid),
            GameAction::HardDrop => {
                let rows = Self::drop_to_floor(piece, grid);
                trace!(rows, "hard drop");
                rows > 0
            }
        };
        if !moved {
            trace!(action = action.as_str(), "action rejected");
        }
        moved
    }

    /// Number of rows dropped.
    fn drop_to_floor(piece: &mut ActivePiece, grid: &Grid) -> u32 {
        let mut rows = 0;
        while piece.translate(GridCoord::DOWN, grid) {
            rows += 1;
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tile;

    const STEP: Duration = Duration::from_millis(1000);
    const LOCK: Duration = Duration::from_millis(500);

    fn controller(kind: PieceKind) -> PieceController {
        let mut c = PieceController::new(STEP, LOCK);
        c.spawn(kind, GridCoord::new(-1, 8));
        c
    }

    #[test]
    fn test_spawn_state() {
        let c = controller(PieceKind::T);
        let p = c.piece().unwrap();
        assert_eq!(p.rotation(), 0);
        assert_eq!(p.position(), GridCoord::new(-1, 8));
        assert_eq!(p.fall_timer(), Duration::ZERO);
        assert_eq!(p.lock_timer(), Duration::ZERO);
        assert_eq!(c.phase(), PiecePhase::Falling);
    }

    #[test]
    fn test_successful_move_resets_lock_timer() {
        let grid = Grid::default();
        let mut c = controller(PieceKind::T);
        c.tick(Duration::from_millis(300), None, &grid);
        assert_eq!(c.piece().unwrap().lock_timer(), Duration::from_millis(300));

        let t = c.tick(Duration::from_millis(100), Some(GameAction::MoveLeft), &grid);
        assert!(t.moved);
        assert_eq!(c.piece().unwrap().lock_timer(), Duration::ZERO);
    }

    #[test]
    fn test_failed_move_is_noop() {
        let mut grid = Grid::default();
        let mut c = controller(PieceKind::T);
        // Wall the piece in on the left.
        grid.set(GridCoord::new(-3, 8), Some(Tile::Blank));
        let t = c.tick(Duration::from_millis(200), Some(GameAction::MoveLeft), &grid);
        assert!(!t.moved);
        let p = c.piece().unwrap();
        assert_eq!(p.position(), GridCoord::new(-1, 8));
        assert_eq!(p.lock_timer(), Duration::from_millis(200));
    }

    #[test]
    fn test_step_moves_down_and_reschedules() {
        let grid = Grid::default();
        let mut c = controller(PieceKind::O);
        let t = c.tick(Duration::from_millis(999), None, &grid);
        assert!(!t.moved);
        let t = c.tick(Duration::from_millis(1), None, &grid);
        assert!(t.moved);
        let p = c.piece().unwrap();
        assert_eq!(p.position(), GridCoord::new(-1, 7));
        assert_eq!(p.fall_timer(), Duration::ZERO);
    }

    #[test]
    fn test_hard_drop_locks_on_floor() {
        let grid = Grid::default();
        let mut c = controller(PieceKind::O);
        let t = c.tick(Duration::ZERO, Some(GameAction::HardDrop), &grid);
        assert_eq!(t.locked, Some(LockCause::HardDrop));
        assert_eq!(c.phase(), PiecePhase::Locked);
        assert_eq!(c.piece().unwrap().position(), GridCoord::new(-1, -10));

        // Terminal: further ticks do nothing.
        let t = c.tick(STEP, Some(GameAction::MoveLeft), &grid);
        assert_eq!(t, PieceTick::default());
    }

    #[test]
    fn test_failed_step_after_lock_delay_locks() {
        let grid = Grid::default();
        let mut c = controller(PieceKind::O);
        while c.phase() == PiecePhase::Falling {
            c.tick(Duration::ZERO, Some(GameAction::SoftDrop), &grid);
        }
        assert_eq!(c.phase(), PiecePhase::Locking);

        let t = c.tick(STEP, None, &grid);
        assert_eq!(t.locked, Some(LockCause::Settled));
    }

    #[test]
    fn test_failed_step_before_lock_delay_keeps_piece_alive() {
        let grid = Grid::default();
        let mut c = controller(PieceKind::O);
        while c.phase() == PiecePhase::Falling {
            c.tick(Duration::ZERO, Some(GameAction::SoftDrop), &grid);
        }
        c.tick(Duration::from_millis(900), None, &grid);
        // Rotating resets the lock timer right before the step fires.
        let t = c.tick(Duration::from_millis(100), Some(GameAction::RotateCw), &grid);
        assert_eq!(t.locked, None);
        assert_eq!(c.phase(), PiecePhase::Locking);
    }
}
