//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. Keys are
//! read as press events only; the engine consumes at most one action per tick,
//! so callers queue what they read and feed it in one at a time.

pub mod map;

pub use blockfall_types as types;

pub use map::{handle_key_event, should_quit};
