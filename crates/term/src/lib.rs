//! Terminal front-end for the blockfall engine.
//!
//! The engine pushes tile writes into a [`TileCanvas`] and tempo changes into
//! a [`TempoGauge`]; [`GameView`] turns those into a framebuffer and
//! [`TerminalRenderer`] flushes only the changed runs to the terminal.
//!
//! Everything except [`TerminalRenderer`] is pure and unit-tested.

pub mod canvas;
pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use canvas::{TempoGauge, TileCanvas};
pub use fb::{FrameBuffer, Glyph, Rgb, Style};
pub use game_view::{GameView, Hud, Viewport};
pub use renderer::{encode_frame_into, TerminalRenderer};
