//! Configuration settings for simulation runs and still-life searches

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub board: BoardConfig,
    pub simulation: SimulationConfig,
    pub search: SearchConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Chance (in percent) that a randomised cell starts alive
    pub density_percent: u8,
    pub generations: u64,
    /// Print every N-th generation
    pub display_every: u64,
    /// Seed for reproducible random boards
    #[serde(default)]
    pub seed: Option<u64>,
    pub stop_when_extinct: bool,
    /// Start from this pattern instead of a random board
    #[serde(default)]
    pub pattern_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of live cells in the still lifes to search for
    pub target_still_life_size: usize,
    pub parallel: bool,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human readable boards
    Text,
    Json,
    /// One `.life` file per still life
    Pattern,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board: BoardConfig { rows: 20, cols: 20 },
            simulation: SimulationConfig {
                density_percent: 25,
                generations: 100,
                display_every: 1,
                seed: None,
                stop_when_extinct: true,
                pattern_file: None,
            },
            search: SearchConfig {
                target_still_life_size: 8,
                parallel: false,
                timeout_seconds: None,
                max_results: None,
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                output_directory: PathBuf::from("output/still_lifes"),
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.board.rows == 0 || self.board.cols == 0 {
            anyhow::bail!(
                "Board dimensions must be positive, got {}x{}",
                self.board.rows,
                self.board.cols
            );
        }

        if self.simulation.density_percent > 100 {
            anyhow::bail!(
                "Density must be between 0 and 100 percent, got {}",
                self.simulation.density_percent
            );
        }

        if self.simulation.display_every == 0 {
            anyhow::bail!("display_every must be positive");
        }

        if self.search.max_results == Some(0) {
            anyhow::bail!("Maximum results must be positive when set");
        }

        if let Some(ref pattern_file) = self.simulation.pattern_file {
            if !pattern_file.exists() {
                anyhow::bail!("Pattern file does not exist: {}", pattern_file.display());
            }
        }

        Ok(())
    }

    /// Check that the board leaves room for a still-life search
    pub fn validate_search(&self) -> Result<()> {
        self.validate()?;
        if self.board.rows < 3 || self.board.cols < 3 {
            anyhow::bail!(
                "A still-life search needs a board of at least 3x3 (got {}x{})",
                self.board.rows,
                self.board.cols
            );
        }
        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(rows) = cli_overrides.rows {
            self.board.rows = rows;
        }
        if let Some(cols) = cli_overrides.cols {
            self.board.cols = cols;
        }
        if let Some(density) = cli_overrides.density_percent {
            self.simulation.density_percent = density;
        }
        if let Some(generations) = cli_overrides.generations {
            self.simulation.generations = generations;
        }
        if let Some(every) = cli_overrides.display_every {
            self.simulation.display_every = every;
        }
        if cli_overrides.seed.is_some() {
            self.simulation.seed = cli_overrides.seed;
        }
        if let Some(ref pattern_file) = cli_overrides.pattern_file {
            self.simulation.pattern_file = Some(pattern_file.clone());
        }
        if let Some(size) = cli_overrides.target_still_life_size {
            self.search.target_still_life_size = size;
        }
        if cli_overrides.parallel {
            self.search.parallel = true;
        }
        if cli_overrides.timeout_seconds.is_some() {
            self.search.timeout_seconds = cli_overrides.timeout_seconds;
        }
        if cli_overrides.max_results.is_some() {
            self.search.max_results = cli_overrides.max_results;
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub density_percent: Option<u8>,
    pub generations: Option<u64>,
    pub display_every: Option<u64>,
    pub seed: Option<u64>,
    pub pattern_file: Option<PathBuf>,
    pub target_still_life_size: Option<usize>,
    pub parallel: bool,
    pub timeout_seconds: Option<u64>,
    pub max_results: Option<usize>,
    pub format: Option<OutputFormat>,
    pub output_dir: Option<PathBuf>,
}
