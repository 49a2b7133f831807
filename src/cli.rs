//! Command line and config file handling for the terminal binary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::debug;

use crate::core::{GameConfig, Settings};

#[derive(Debug, Clone, Parser)]
#[command(name = "blockfall", version, about = "Falling-block puzzle in the terminal")]
pub struct Cli {
    /// Starting level (1 or higher). Overrides the config file.
    #[arg(long)]
    pub level: Option<u32>,

    /// Seed the bottom half of the board with `level` blank blocks.
    #[arg(long)]
    pub random_start: bool,

    /// Seed for piece selection. Defaults to the clock.
    #[arg(long)]
    pub seed: Option<u32>,

    /// TOML file with optional `[board]` and `[settings]` tables.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Where log output goes. The terminal itself is used for the game.
    #[arg(long, value_name = "FILE", default_value = "blockfall.log")]
    pub log: PathBuf,
}

/// On-disk configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub board: GameConfig,
    pub settings: Settings,
}

impl ConfigFile {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid config file")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("in {}", path.display()))
    }
}

impl Cli {
    /// Merge the config file (if any) with command-line overrides and
    /// validate the result.
    pub fn resolve(&self) -> Result<(GameConfig, Settings)> {
        let mut file = match &self.config {
            Some(path) => ConfigFile::from_file(path)?,
            None => ConfigFile::default(),
        };
        if let Some(level) = self.level {
            file.settings.level = level;
        }
        if self.random_start {
            file.settings.random_start = true;
        }

        file.board.validate().context("invalid board configuration")?;
        file.settings.validate().context("invalid settings")?;
        debug!(?file, "configuration resolved");
        Ok((file.board, file.settings))
    }
}
