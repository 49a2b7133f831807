//! Board configuration and player settings.
//!
//! [`GameConfig`] is fixed for the lifetime of a [`crate::GameState`];
//! [`Settings`] mirror the in-game menu and may be swapped between ticks.
//! Both deserialize with serde, defaulting every missing field.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collision::absolute;
use crate::pieces::base_cells;
use crate::types::{
    Bounds, GridCoord, PieceKind, BOARD_HEIGHT, BOARD_WIDTH, LINES_MAX, LOCK_DELAY_MS,
    SPAWN_POSITION,
};

/// Smallest accepted board edge.
pub const MIN_BOARD_EDGE: u16 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("level must be at least 1, got {0}")]
    InvalidLevel(u32),
    #[error("board must be at least {min}x{min}, got {width}x{height}", min = MIN_BOARD_EDGE)]
    InvalidBoardSize { width: u16, height: u16 },
    #[error("{kind:?} piece does not fit inside the board at spawn ({}, {})", spawn.x, spawn.y)]
    SpawnOutOfBounds { kind: PieceKind, spawn: GridCoord },
    #[error("spawn row {spawn_row} reaches into the random-start zone (rows up to {zone_top})")]
    SpawnOverlapsRandomZone { spawn_row: i32, zone_top: i32 },
    #[error("lines_max must be at least 1")]
    InvalidLinesMax,
    #[error("lock delay must be positive")]
    InvalidLockDelay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    /// Spawn position as `[x, y]`.
    pub spawn: [i32; 2],
    pub lock_delay_ms: u32,
    /// Clear events to peak difficulty at level 1.
    pub lines_max: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            spawn: [SPAWN_POSITION.x, SPAWN_POSITION.y],
            lock_delay_ms: LOCK_DELAY_MS,
            lines_max: LINES_MAX,
        }
    }
}

impl GameConfig {
    pub fn bounds(&self) -> Bounds {
        Bounds::centered(self.width, self.height)
    }

    pub fn spawn(&self) -> GridCoord {
        GridCoord::new(self.spawn[0], self.spawn[1])
    }

    pub fn lock_delay(&self) -> Duration {
        Duration::from_millis(self.lock_delay_ms as u64)
    }

    /// Highest row (inclusive) that random-start blocks may occupy: the
    /// bottom half of the board plus its middle row.
    pub fn random_zone_top(&self) -> i32 {
        let b = self.bounds();
        b.y_min() + b.height() as i32 / 2
    }

    /// Check that the board is usable: every kind fits at spawn, above the
    /// random-start zone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_BOARD_EDGE || self.height < MIN_BOARD_EDGE {
            return Err(ConfigError::InvalidBoardSize {
                width: self.width,
                height: self.height,
            });
        }
        if self.lines_max == 0 {
            return Err(ConfigError::InvalidLinesMax);
        }
        if self.lock_delay_ms == 0 {
            return Err(ConfigError::InvalidLockDelay);
        }

        let bounds = self.bounds();
        let spawn = self.spawn();
        let zone_top = self.random_zone_top();
        for kind in PieceKind::ALL {
            let cells = absolute(&base_cells(kind), spawn);
            if !cells.iter().all(|&c| bounds.contains(c)) {
                return Err(ConfigError::SpawnOutOfBounds { kind, spawn });
            }
            if let Some(low) = cells.iter().map(|c| c.y).min() {
                if low <= zone_top {
                    return Err(ConfigError::SpawnOverlapsRandomZone {
                        spawn_row: low,
                        zone_top,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Player-facing options from the settings menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty level, at least 1. Scales scoring and shortens the ramp.
    pub level: u32,
    /// Seed `level` blank blocks into the bottom half at session start.
    pub random_start: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: 1,
            random_start: false,
        }
    }
}

impl Settings {
    pub fn new(level: u32, random_start: bool) -> Result<Self, ConfigError> {
        let settings = Self {
            level,
            random_start,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.level == 0 {
            return Err(ConfigError::InvalidLevel(self.level));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.random_zone_top(), 0);
        assert_eq!(config.lock_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_tiny_board_rejected() {
        let config = GameConfig {
            width: 3,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidBoardSize {
                width: 3,
                height: 20
            })
        );
    }

    #[test]
    fn test_spawn_outside_board_rejected() {
        let config = GameConfig {
            spawn: [-1, 9],
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpawnOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_spawn_in_random_zone_rejected() {
        let config = GameConfig {
            spawn: [-1, 0],
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::SpawnOverlapsRandomZone {
                spawn_row: 0,
                zone_top: 0
            })
        );
    }

    #[test]
    fn test_level_zero_rejected() {
        assert_eq!(Settings::new(0, false), Err(ConfigError::InvalidLevel(0)));
        assert!(Settings::new(3, true).is_ok());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConfigError::InvalidLevel(0).to_string(),
            "level must be at least 1, got 0"
        );
        assert_eq!(
            ConfigError::InvalidBoardSize { width: 2, height: 9 }.to_string(),
            "board must be at least 4x4, got 2x9"
        );
    }
}
