//! Game state module - the board orchestrator
//!
//! [`GameState`] owns the grid, the piece controller, the line-clear engine,
//! the difficulty ramp and the ghost projector, and is the only thing that
//! writes to the grid during play. Collaborators are passed in explicitly at
//! construction: a [`RandomSource`] for piece selection, a [`RenderSurface`]
//! that mirrors every grid and ghost write, and an [`AudioTempoSink`] that
//! follows the difficulty ramp.
//!
//! The active piece is written into the grid between ticks so the grid always
//! shows what the player sees. Each tick lifts it out, lets the controller
//! move it against the settled blocks only, then writes it back (or settles
//! it for good when it locks).

use std::time::Duration;

use tracing::{debug, info};

use crate::collision::{is_valid, is_valid_ignoring, PieceCells};
use crate::config::{ConfigError, GameConfig, Settings};
use crate::difficulty::DifficultyRamp;
use crate::ghost::{GhostPiece, GhostProjector};
use crate::grid::Grid;
use crate::lines::{ClearOutcome, LineClearEngine};
use crate::piece::{ActivePiece, LockCause, PieceController, PiecePhase};
use crate::pieces::base_cells;
use crate::rng::{RandomSource, SimpleRng};
use crate::sinks::{AudioTempoSink, NullAudio, NullSurface, RenderSurface};
use crate::types::{Cell, GameAction, GridCoord, PieceKind, RenderTile, Tile};

/// Everything that happened when a piece locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub kind: PieceKind,
    pub cause: LockCause,
    pub clear: ClearOutcome,
    /// The next piece could not spawn and the session was reset.
    pub game_over: bool,
}

/// Result of [`GameState::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    pub moved: bool,
    pub lock: Option<LockEvent>,
}

/// Complete game state
#[derive(Debug)]
pub struct GameState<R = SimpleRng, S = NullSurface, A = NullAudio> {
    config: GameConfig,
    settings: Settings,
    grid: Grid,
    controller: PieceController,
    lines: LineClearEngine,
    ramp: DifficultyRamp,
    ghost: GhostProjector,
    rng: R,
    surface: S,
    audio: A,
    score: u32,
    games_over: u32,
    started: bool,
    /// The active piece's cells are currently in `grid`.
    written: bool,
}

impl<R: RandomSource> GameState<R> {
    /// A game with no render or audio collaborators.
    pub fn headless(config: GameConfig, settings: Settings, rng: R) -> Result<Self, ConfigError> {
        GameState::new(config, settings, rng, NullSurface, NullAudio)
    }
}

impl<R, S, A> GameState<R, S, A>
where
    R: RandomSource,
    S: RenderSurface,
    A: AudioTempoSink,
{
    pub fn new(
        config: GameConfig,
        settings: Settings,
        rng: R,
        surface: S,
        audio: A,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        settings.validate()?;

        let ramp = DifficultyRamp::new(config.lines_max, settings.level);
        let controller = PieceController::new(ramp.step_delay(), config.lock_delay());

        Ok(Self {
            grid: Grid::new(config.bounds()),
            config,
            settings,
            controller,
            lines: LineClearEngine::new(),
            ramp,
            ghost: GhostProjector::new(),
            rng,
            surface,
            audio,
            score: 0,
            games_over: 0,
            started: false,
            written: false,
        })
    }

    /// Seed the random-start blocks if enabled and spawn the first piece.
    /// Calling it again does nothing.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.apply_difficulty();
        if self.settings.random_start {
            self.load_random_start();
        }
        info!(
            level = self.settings.level,
            random_start = self.settings.random_start,
            "session started"
        );
        self.spawn_piece();
    }

    /// Advance the game by `dt`, consuming at most one action.
    ///
    /// Does nothing before [`GameState::start`].
    pub fn tick<I>(&mut self, dt: Duration, actions: I) -> TickOutcome
    where
        I: IntoIterator<Item = GameAction>,
    {
        if !self.started {
            return TickOutcome::default();
        }
        let action = actions.into_iter().next();

        self.erase_active();
        let step = self.controller.tick(dt, action, &self.grid);

        let lock = match (step.locked, self.controller.piece().copied()) {
            (Some(cause), Some(piece)) => Some(self.lock_piece(piece, cause)),
            _ => {
                self.write_active();
                None
            }
        };
        self.refresh_ghost();

        TickOutcome {
            moved: step.moved,
            lock,
        }
    }

    /// Spawn a random kind at the spawn position.
    ///
    /// Returns false when the spawn position was blocked; the session has then
    /// been reset and the piece placed on the fresh board.
    pub fn spawn_piece(&mut self) -> bool {
        let index = self.rng.next_int(0, PieceKind::ALL.len() as u32);
        self.spawn_kind(PieceKind::from_index(index as usize))
    }

    /// Like [`GameState::spawn_piece`] with a chosen kind. Replaces any
    /// active piece.
    pub fn spawn_kind(&mut self, kind: PieceKind) -> bool {
        self.erase_active();
        let spawn = self.config.spawn();
        let fits = is_valid(&base_cells(kind), spawn, &self.grid);
        if !fits {
            self.game_over();
        }

        self.controller.spawn(kind, spawn);
        self.write_active();
        self.refresh_ghost();
        debug!(kind = kind.as_str(), "spawned piece");
        fits
    }

    /// Whether `cells` placed at `at` fit on the board. The active piece's
    /// own cells count as empty.
    pub fn is_valid_position(&self, cells: &PieceCells, at: GridCoord) -> bool {
        match self.active_cells() {
            Some(own) => is_valid_ignoring(cells, at, &self.grid, &own),
            None => is_valid(cells, at, &self.grid),
        }
    }

    /// Clear full rows among the settled blocks, scoring them at the current
    /// level. The active piece is lifted out while rows shift.
    ///
    /// If the shifted rows now overlap the active piece, it is replaced by a
    /// freshly spawned one.
    pub fn clear_lines(&mut self) -> bool {
        self.erase_active();
        let outcome = self.run_line_clear();
        let displaced = self
            .controller
            .piece()
            .is_some_and(|p| !is_valid(p.cells(), p.position(), &self.grid));
        if displaced {
            debug!("active piece overlapped by shifted rows");
            self.spawn_piece();
        } else {
            self.write_active();
            self.refresh_ghost();
        }
        outcome.any()
    }

    /// Write a settled cell directly, e.g. to set up a board.
    /// Returns false for coordinates outside the board or under the active
    /// piece.
    pub fn set_cell(&mut self, coord: GridCoord, cell: Cell) -> bool {
        if self.active_cells().is_some_and(|own| own.contains(&coord)) {
            return false;
        }
        let stored = self.put(coord, cell);
        if stored {
            self.refresh_ghost();
        }
        stored
    }

    /// Swap in new settings. The level applies from the next line clear.
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), ConfigError> {
        settings.validate()?;
        if settings != self.settings {
            debug!(
                level = settings.level,
                random_start = settings.random_start,
                "settings updated"
            );
        }
        self.settings = settings;
        Ok(())
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Locks that cleared at least one row this session.
    pub fn line_clear_events(&self) -> u32 {
        self.ramp.clear_events()
    }

    /// Rows removed this session.
    pub fn rows_cleared_total(&self) -> u32 {
        self.lines.rows_total()
    }

    pub fn level(&self) -> u32 {
        self.settings.level
    }

    /// Current music tempo multiplier.
    pub fn tempo(&self) -> f32 {
        self.ramp.tempo()
    }

    pub fn step_delay(&self) -> Duration {
        self.controller.step_delay()
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.controller.piece()
    }

    pub fn phase(&self) -> PiecePhase {
        self.controller.phase()
    }

    pub fn ghost(&self) -> Option<&GhostPiece> {
        self.ghost.ghost()
    }

    /// The board, including the active piece's cells.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Number of resets caused by a blocked spawn.
    pub fn games_over(&self) -> u32 {
        self.games_over
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn started(&self) -> bool {
        self.started
    }

    fn lock_piece(&mut self, piece: ActivePiece, cause: LockCause) -> LockEvent {
        // The piece's cells become settled blocks.
        self.write_active();
        self.written = false;
        debug!(
            kind = piece.kind().as_str(),
            x = piece.position().x,
            y = piece.position().y,
            ?cause,
            "piece locked"
        );

        let clear = self.run_line_clear();
        let game_over = !self.spawn_piece();
        LockEvent {
            kind: piece.kind(),
            cause,
            clear,
            game_over,
        }
    }

    fn run_line_clear(&mut self) -> ClearOutcome {
        let level = self.settings.level;
        let outcome = self.lines.run(&mut self.grid, level);
        if outcome.any() {
            self.score = self.score.saturating_add(outcome.points);
            self.ramp.set_level(level);
            self.ramp.record_clear_event();
            self.apply_difficulty();
            self.repaint();
            info!(
                rows = outcome.rows_cleared,
                points = outcome.points,
                score = self.score,
                clear_events = self.ramp.clear_events(),
                "lines cleared"
            );
        }
        outcome
    }

    fn apply_difficulty(&mut self) {
        self.controller.set_step_delay(self.ramp.step_delay());
        self.audio.set_tempo(self.ramp.tempo());
    }

    fn game_over(&mut self) {
        self.games_over += 1;
        info!(
            score = self.score,
            clear_events = self.ramp.clear_events(),
            games_over = self.games_over,
            "game over"
        );

        self.grid.clear_all();
        self.surface.clear_all();
        self.ghost.clear();
        self.written = false;
        self.score = 0;
        self.lines.reset();
        self.ramp.reset();
        self.apply_difficulty();
        if self.settings.random_start {
            self.load_random_start();
        }
    }

    /// Place `level` blank blocks at distinct random coordinates in the
    /// bottom half of the board.
    fn load_random_start(&mut self) {
        let bounds = self.grid.bounds();
        let top = self.config.random_zone_top();
        let mut candidates: Vec<GridCoord> = (bounds.x_min()..bounds.x_max())
            .flat_map(|x| (bounds.y_min()..=top).map(move |y| GridCoord::new(x, y)))
            .filter(|&c| !self.grid.is_occupied(c))
            .collect();

        let count = (self.settings.level as usize).min(candidates.len());
        for _ in 0..count {
            let i = self.rng.next_int(0, candidates.len() as u32) as usize;
            let c = candidates.remove(i.min(candidates.len() - 1));
            self.put(c, Some(Tile::Blank));
        }
        debug!(count, "random start blocks placed");
    }

    fn put(&mut self, coord: GridCoord, cell: Cell) -> bool {
        if !self.grid.set(coord, cell) {
            return false;
        }
        self.surface.set_cell(coord, RenderTile::from(cell));
        true
    }

    fn active_cells(&self) -> Option<PieceCells> {
        if !self.written {
            return None;
        }
        self.controller.piece().map(ActivePiece::absolute_cells)
    }

    fn write_active(&mut self) {
        if self.written {
            return;
        }
        let Some(piece) = self.controller.piece().copied() else {
            return;
        };
        let tile = Some(Tile::Piece(piece.kind()));
        for c in piece.absolute_cells() {
            self.put(c, tile);
        }
        self.written = true;
    }

    fn erase_active(&mut self) {
        let Some(cells) = self.active_cells() else {
            return;
        };
        for c in cells {
            self.put(c, None);
        }
        self.written = false;
    }

    fn refresh_ghost(&mut self) {
        if let Some(old) = self.ghost.ghost().copied() {
            for c in old.absolute_cells() {
                let tile = RenderTile::from(self.grid.get(c));
                self.surface.set_cell(c, tile);
            }
        }

        let Some(piece) = self.controller.piece().copied() else {
            self.ghost.clear();
            return;
        };
        if let Some(ghost) = self.ghost.project(&piece, &self.grid).copied() {
            for c in ghost.absolute_cells() {
                if !self.grid.is_occupied(c) {
                    self.surface.set_cell(c, RenderTile::Ghost);
                }
            }
        }
    }

    fn repaint(&mut self) {
        self.surface.clear_all();
        for (c, tile) in self.grid.occupied() {
            self.surface.set_cell(c, RenderTile::Tile(tile));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Replays a fixed list of draws, reduced into the requested range.
    struct Script {
        draws: Vec<u32>,
        next: usize,
    }

    impl Script {
        fn new(draws: &[u32]) -> Self {
            Self {
                draws: draws.to_vec(),
                next: 0,
            }
        }
    }

    impl RandomSource for Script {
        fn next_int(&mut self, lo: u32, hi: u32) -> u32 {
            let v = self.draws[self.next % self.draws.len()];
            self.next += 1;
            if hi <= lo {
                lo
            } else {
                lo + v % (hi - lo)
            }
        }
    }

    #[derive(Default)]
    struct Canvas {
        cells: HashMap<GridCoord, RenderTile>,
        clears: u32,
    }

    impl RenderSurface for Canvas {
        fn set_cell(&mut self, coord: GridCoord, tile: RenderTile) {
            self.cells.insert(coord, tile);
        }

        fn clear_all(&mut self) {
            self.cells.clear();
            self.clears += 1;
        }
    }

    #[derive(Default)]
    struct Tempo(Vec<f32>);

    impl AudioTempoSink for Tempo {
        fn set_tempo(&mut self, multiplier: f32) {
            self.0.push(multiplier);
        }
    }

    const O: u32 = 3;

    fn game(draws: &[u32]) -> GameState<Script> {
        GameState::headless(GameConfig::default(), Settings::default(), Script::new(draws))
            .unwrap()
    }

    #[test]
    fn test_tick_before_start_is_noop() {
        let mut g = game(&[O]);
        let out = g.tick(Duration::from_secs(5), [GameAction::HardDrop]);
        assert_eq!(out, TickOutcome::default());
        assert!(g.active().is_none());
    }

    #[test]
    fn test_start_spawns_and_writes_piece() {
        let mut g = game(&[O]);
        g.start();
        let piece = *g.active().unwrap();
        assert_eq!(piece.kind(), PieceKind::O);
        assert_eq!(piece.position(), GridCoord::new(-1, 8));
        for c in piece.absolute_cells() {
            assert_eq!(g.grid().get(c), Some(Tile::Piece(PieceKind::O)));
        }
        // Its own cells never block it.
        assert!(g.is_valid_position(piece.cells(), piece.position()));
    }

    #[test]
    fn test_only_first_action_is_consumed() {
        let mut g = game(&[O]);
        g.start();
        g.tick(
            Duration::ZERO,
            [GameAction::MoveLeft, GameAction::MoveLeft, GameAction::MoveLeft],
        );
        assert_eq!(g.active().unwrap().position(), GridCoord::new(-2, 8));
    }

    #[test]
    fn test_hard_drop_locks_and_spawns_next() {
        let mut g = game(&[O]);
        g.start();
        let out = g.tick(Duration::ZERO, [GameAction::HardDrop]);
        let lock = out.lock.unwrap();
        assert_eq!(lock.cause, LockCause::HardDrop);
        assert!(!lock.game_over);
        assert!(g.grid().is_occupied(GridCoord::new(-1, -10)));
        assert!(g.grid().is_occupied(GridCoord::new(0, -9)));
        assert_eq!(g.active().unwrap().position(), GridCoord::new(-1, 8));
        assert_eq!(g.phase(), PiecePhase::Falling);
    }

    #[test]
    fn test_ghost_painted_below_piece() {
        let mut g = GameState::new(
            GameConfig::default(),
            Settings::default(),
            Script::new(&[O]),
            Canvas::default(),
            NullAudio,
        )
        .unwrap();
        g.start();
        assert_eq!(g.ghost().unwrap().position, GridCoord::new(-1, -10));
        let canvas = g.surface();
        assert_eq!(canvas.cells[&GridCoord::new(-1, -10)], RenderTile::Ghost);
        assert_eq!(
            canvas.cells[&GridCoord::new(-1, 8)],
            RenderTile::Tile(Tile::Piece(PieceKind::O))
        );

        // Moving the piece moves the ghost and wipes the old shadow.
        g.tick(Duration::ZERO, [GameAction::MoveRight]);
        let canvas = g.surface();
        assert_eq!(canvas.cells[&GridCoord::new(-1, -10)], RenderTile::Empty);
        assert_eq!(canvas.cells[&GridCoord::new(1, -10)], RenderTile::Ghost);
    }

    #[test]
    fn test_clear_lines_scores_and_ramps() {
        let mut g = GameState::new(
            GameConfig::default(),
            Settings::new(2, false).unwrap(),
            Script::new(&[O]),
            NullSurface,
            Tempo::default(),
        )
        .unwrap();
        for x in -5..5 {
            g.set_cell(GridCoord::new(x, -10), Some(Tile::Blank));
        }
        assert!(g.clear_lines());
        assert_eq!(g.score(), 120);
        assert_eq!(g.line_clear_events(), 1);
        // 200 / 2 = 100 events to peak.
        assert!((g.tempo() - 0.7625).abs() < 1e-6);
        assert_eq!(g.step_delay(), Duration::from_millis(991));
        assert_eq!(g.audio().0.len(), 1);
        assert!(!g.clear_lines());
    }

    #[test]
    fn test_set_cell_under_active_piece_is_refused() {
        let mut g = game(&[O]);
        g.start();
        assert!(!g.set_cell(GridCoord::new(-1, 9), Some(Tile::Blank)));
        assert_eq!(g.grid().get(GridCoord::new(-1, 9)), Some(Tile::Piece(PieceKind::O)));

        // A settled block beside the piece survives the piece moving on.
        assert!(g.set_cell(GridCoord::new(-2, 9), Some(Tile::Blank)));
        g.tick(Duration::ZERO, [GameAction::MoveRight]);
        assert_eq!(g.active().unwrap().position(), GridCoord::new(0, 8));
        assert_eq!(g.grid().get(GridCoord::new(-2, 9)), Some(Tile::Blank));
        assert_eq!(g.grid().get(GridCoord::new(-1, 9)), None);
    }

    #[test]
    fn test_clear_lines_keeps_block_shifted_onto_piece() {
        let mut g = game(&[O]);
        g.start();
        for _ in 0..10 {
            g.tick(Duration::ZERO, [GameAction::SoftDrop]);
        }
        let p = g.active().unwrap().position();
        assert_eq!(p, GridCoord::new(-1, -2));
        assert!(g.set_cell(GridCoord::new(p.x, p.y + 2), Some(Tile::Blank)));
        for x in -5..5 {
            g.set_cell(GridCoord::new(x, -10), Some(Tile::Blank));
        }

        assert!(g.clear_lines());
        let blank = GridCoord::new(p.x, p.y + 1);
        assert_eq!(g.grid().get(blank), Some(Tile::Blank));
        // The overlapped piece was replaced at the spawn position.
        assert_eq!(g.active().unwrap().position(), GridCoord::new(-1, 8));

        g.tick(Duration::ZERO, [GameAction::MoveRight]);
        assert_eq!(g.grid().get(blank), Some(Tile::Blank));
        let blanks = g.grid().occupied().filter(|(_, t)| *t == Tile::Blank).count();
        assert_eq!(blanks, 1);
    }

    #[test]
    fn test_level_change_applies_to_next_clear() {
        let mut g = game(&[O]);
        g.update_settings(Settings::new(4, false).unwrap()).unwrap();
        for x in -5..5 {
            g.set_cell(GridCoord::new(x, -10), Some(Tile::Blank));
        }
        g.clear_lines();
        assert_eq!(g.score(), 40 * 5);
        assert!(g.update_settings(Settings { level: 0, random_start: false }).is_err());
        assert_eq!(g.level(), 4);
    }

    #[test]
    fn test_blocked_spawn_resets_session() {
        let mut g = GameState::new(
            GameConfig::default(),
            Settings::default(),
            Script::new(&[O]),
            Canvas::default(),
            Tempo::default(),
        )
        .unwrap();
        g.start();
        g.tick(Duration::ZERO, [GameAction::MoveRight]);
        g.tick(Duration::ZERO, [GameAction::MoveRight]);
        g.set_cell(GridCoord::new(0, 0), Some(Tile::Blank));
        g.set_cell(GridCoord::new(-1, 8), Some(Tile::Blank));

        assert!(!g.spawn_kind(PieceKind::T));
        assert_eq!(g.games_over(), 1);
        assert_eq!(g.score(), 0);
        assert_eq!(g.line_clear_events(), 0);
        assert_eq!(g.step_delay(), Duration::from_secs(1));
        assert_eq!(g.audio().0.last(), Some(&0.75));
        assert!(!g.grid().is_occupied(GridCoord::new(0, 0)));
        // Only the fresh piece is on the board.
        assert_eq!(g.grid().occupied().count(), 4);
        assert_eq!(g.active().unwrap().kind(), PieceKind::T);
        assert!(g.surface().clears >= 1);
    }

    #[test]
    fn test_random_start_places_level_blocks_in_bottom_half() {
        let settings = Settings::new(7, true).unwrap();
        let mut g = GameState::headless(
            GameConfig::default(),
            settings,
            SimpleRng::new(2024),
        )
        .unwrap();
        g.start();

        let blanks: Vec<_> = g
            .grid()
            .occupied()
            .filter(|(_, t)| *t == Tile::Blank)
            .map(|(c, _)| c)
            .collect();
        assert_eq!(blanks.len(), 7);
        assert!(blanks.iter().all(|c| c.y <= 0 && c.x >= -5 && c.x < 5));
    }
}
