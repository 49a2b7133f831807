//! Core rules engine - pure, deterministic, and testable
//!
//! This crate holds every game rule of blockfall and nothing else. It has no
//! dependencies on the terminal, the keyboard or a clock: time arrives as the
//! `dt` passed to [`GameState::tick`], randomness through an injected
//! [`RandomSource`], and output leaves through [`RenderSurface`] and
//! [`AudioTempoSink`].
//!
//! # Module Structure
//!
//! - [`grid`]: occupancy over an origin-centred rectangle
//! - [`collision`]: validity of four cells at a position
//! - [`pieces`]: shape data, pivot policy and wall kick tables
//! - [`rotation`]: 90° turns with wall kicks
//! - [`piece`]: the active piece and its fall/lock state machine
//! - [`lines`] and [`scoring`]: full-row removal and points
//! - [`difficulty`]: gravity and tempo driven by clear events
//! - [`ghost`]: landing projection for rendering
//! - [`game_state`]: the orchestrator that wires all of the above
//!
//! # Coordinates
//!
//! `x` grows to the right and `y` grows **up**. A `w × h` board spans
//! `[-w/2, -w/2 + w) × [-h/2, -h/2 + h)`, so the default 10×20 board runs from
//! `(-5, -10)` to `(4, 9)` and pieces spawn at `(-1, 8)`.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_core::{GameConfig, GameState, Settings, SimpleRng};
//! use blockfall_types::GameAction;
//!
//! let mut game =
//!     GameState::headless(GameConfig::default(), Settings::default(), SimpleRng::new(7))
//!         .unwrap();
//! game.start();
//!
//! game.tick(Duration::from_millis(16), [GameAction::MoveRight]);
//! let out = game.tick(Duration::from_millis(16), [GameAction::HardDrop]);
//! assert!(out.lock.is_some());
//! ```
//!
//! # Timing
//!
//! - **Gravity**: one row every 1.0 s, falling linearly to 0.1 s at peak difficulty
//! - **Lock delay**: 500 ms without a successful move before a failed gravity step locks
//! - **Hard drop**: locks in the same tick

pub mod collision;
pub mod config;
pub mod difficulty;
pub mod game_state;
pub mod ghost;
pub mod grid;
pub mod lines;
pub mod piece;
pub mod pieces;
pub mod rng;
pub mod rotation;
pub mod scoring;
pub mod sinks;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use collision::{is_valid, PieceCells};
pub use config::{ConfigError, GameConfig, Settings};
pub use difficulty::DifficultyRamp;
pub use game_state::{GameState, LockEvent, TickOutcome};
pub use ghost::{GhostPiece, GhostProjector};
pub use grid::Grid;
pub use lines::{ClearOutcome, LineClearEngine};
pub use piece::{ActivePiece, LockCause, PieceController, PiecePhase};
pub use pieces::{base_cells, Pivot};
pub use rng::{RandomSource, SimpleRng};
pub use rotation::Direction;
pub use scoring::line_clear_points;
pub use sinks::{AudioTempoSink, NullAudio, NullSurface, RenderSurface};
