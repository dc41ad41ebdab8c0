//! Optional TOML configuration, overridden by command line flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use tessella_lib::octree::NearestSearch;
use tessella_mosaic::{assemble::DEFAULT_PROGRESS_INTERVAL, mode::Mode};

/// Which nearest neighbor search the tile index uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Search {
    /// Follow the path of the queried color only; fast but approximate.
    #[default]
    SinglePath,
    /// Branch and bound over the whole index; always finds the closest tile.
    Exact,
}

impl From<Search> for NearestSearch {
    fn from(search: Search) -> Self {
        match search {
            Search::SinglePath => Self::SinglePath,
            Search::Exact => Self::Exact,
        }
    }
}

/// Every setting is optional, so that a file and the command line can be layered.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory containing the tile images.
    pub tiles: Option<PathBuf>,
    /// Path the mosaic is written to.
    pub output: Option<PathBuf>,
    pub mode: Option<Mode>,
    /// Seed for tile placement; random if missing.
    pub seed: Option<u64>,
    pub search: Option<Search>,
    /// Log progress every this many tiles, `0` to disable.
    pub progress_interval: Option<u64>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Layers `overrides` on top of `self`, preferring every value set in `overrides`.
    pub fn overridden_by(self, overrides: Self) -> Self {
        Self {
            tiles: overrides.tiles.or(self.tiles),
            output: overrides.output.or(self.output),
            mode: overrides.mode.or(self.mode),
            seed: overrides.seed.or(self.seed),
            search: overrides.search.or(self.search),
            progress_interval: overrides.progress_interval.or(self.progress_interval),
        }
    }

    /// Fills in defaults for everything that is still unset, except for the seed.
    pub fn resolve(self) -> Settings {
        Settings {
            tiles: self.tiles.unwrap_or_else(|| PathBuf::from("assets")),
            output: self.output.unwrap_or_else(|| PathBuf::from("output.png")),
            mode: self.mode.unwrap_or_default(),
            seed: self.seed,
            search: self.search.unwrap_or_default().into(),
            progress_interval: self.progress_interval.unwrap_or(DEFAULT_PROGRESS_INTERVAL),
        }
    }
}

/// Fully resolved settings for a single mosaic.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub tiles: PathBuf,
    pub output: PathBuf,
    pub mode: Mode,
    pub seed: Option<u64>,
    pub search: NearestSearch,
    pub progress_interval: u64,
}
