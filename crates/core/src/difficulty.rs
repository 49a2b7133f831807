//! Difficulty ramp driven by line-clear events.
//!
//! Each lock that clears at least one row counts as one event, regardless of
//! how many rows went. Peak difficulty arrives after `lines_max / level`
//! events; up to there gravity speeds up and the music tempo rises linearly.

use std::time::Duration;

use crate::types::{INITIAL_STEP_DELAY_MS, LINES_MAX, MAX_TEMPO, MIN_STEP_DELAY_MS, MIN_TEMPO};

#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyRamp {
    lines_max: u32,
    level: u32,
    clear_events: u32,
}

impl DifficultyRamp {
    /// `level` below 1 is treated as 1.
    pub fn new(lines_max: u32, level: u32) -> Self {
        Self {
            lines_max,
            level: level.max(1),
            clear_events: 0,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = level.max(1);
    }

    pub fn clear_events(&self) -> u32 {
        self.clear_events
    }

    pub fn record_clear_event(&mut self) {
        self.clear_events = self.clear_events.saturating_add(1);
    }

    pub fn reset(&mut self) {
        self.clear_events = 0;
    }

    /// Events needed to reach peak difficulty.
    pub fn ramp_span(&self) -> f32 {
        self.lines_max as f32 / self.level as f32
    }

    /// Progress towards peak difficulty, clamped to `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        let span = self.ramp_span();
        if span <= 0.0 {
            return 1.0;
        }
        (self.clear_events as f32 / span).min(1.0)
    }

    /// Music playback multiplier, 0.75× rising to 2×.
    pub fn tempo(&self) -> f32 {
        MIN_TEMPO + (MAX_TEMPO - MIN_TEMPO) * self.fraction()
    }

    /// Gravity interval, 1s falling to 0.1s.
    pub fn step_delay(&self) -> Duration {
        const NANOS_PER_MS: f64 = 1_000_000.0;
        let initial = INITIAL_STEP_DELAY_MS as f64 * NANOS_PER_MS;
        let span = (INITIAL_STEP_DELAY_MS - MIN_STEP_DELAY_MS) as f64 * NANOS_PER_MS;
        let nanos = initial - span * self.fraction() as f64;
        Duration::from_nanos(nanos.round() as u64)
    }
}

impl Default for DifficultyRamp {
    fn default() -> Self {
        Self::new(LINES_MAX, 1)
    }
}
