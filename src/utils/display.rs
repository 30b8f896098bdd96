//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::game_of_life::{io::PATTERN_EXTENSION, save_pattern_to_file, Grid};
use crate::still_life::{SearchStatistics, StillLife};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

/// Formats boards and search results for the console and for files
pub struct SearchFormatter;

/// JSON document written for a whole search
#[derive(Debug, Serialize)]
struct SearchReport<'a> {
    rows: usize,
    cols: usize,
    size: usize,
    statistics: &'a SearchStatistics,
    still_lifes: Vec<StillLifeEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct StillLifeEntry<'a> {
    id: String,
    extent: (usize, usize),
    cells: &'a [usize],
}

impl SearchFormatter {
    /// Format a grid in compact form
    pub fn format_grid_compact(grid: &Grid) -> String {
        let mut output = String::with_capacity(grid.len() + grid.rows());
        for row in grid.cells().chunks(grid.cols()) {
            output.extend(row.iter().map(|&alive| if alive { '█' } else { '·' }));
            output.push('\n');
        }
        output
    }

    /// Format a grid with coordinates
    pub fn format_grid_with_coords(grid: &Grid) -> String {
        let mut output = String::new();

        output.push_str("   ");
        for x in 0..grid.cols() {
            output.push_str(&format!("{:2}", x % 10));
        }
        output.push('\n');

        for (y, row) in grid.cells().chunks(grid.cols()).enumerate() {
            output.push_str(&format!("{:2} ", y));
            for &alive in row {
                output.push_str(if alive { "██" } else { "··" });
            }
            output.push('\n');
        }

        output
    }

    /// Status line shown after each displayed generation
    pub fn format_status(grid: &Grid) -> String {
        format!(
            "Generation {} | Population {}",
            grid.generation(),
            grid.population()
        )
    }

    /// Format a single still life for console output
    pub fn format_still_life(index: usize, still_life: &StillLife) -> Result<String> {
        let (height, width) = still_life.extent();
        let grid = still_life.to_grid()?;

        let mut output = String::new();
        output.push_str(&"=".repeat(30));
        output.push('\n');
        output.push_str(&format!(
            "#{} {} ({} cells, {}x{})\n",
            index + 1,
            still_life.id(),
            still_life.population(),
            height,
            width
        ));
        output.push_str(&crate::game_of_life::io::format_index_tuple(&still_life.cells));
        output.push('\n');
        output.push_str(&Self::format_grid_compact(&grid));
        Ok(output)
    }

    /// Format multiple still lifes as a summary table
    pub fn format_summary(still_lifes: &[StillLife]) -> String {
        let mut output = String::new();

        output.push_str("Still Lifes Summary:\n");
        output.push_str("#    | ID                  | Cells | Extent\n");
        output.push_str("-----|---------------------|-------|-------\n");

        for (i, still_life) in still_lifes.iter().enumerate() {
            let (height, width) = still_life.extent();
            output.push_str(&format!(
                "{:4} | {:19} | {:5} | {}x{}\n",
                i + 1,
                still_life.id(),
                still_life.population(),
                height,
                width
            ));
        }

        output
    }

    /// Save search results to `output_dir` in the given format
    pub fn save_still_lifes<P: AsRef<Path>>(
        still_lifes: &[StillLife],
        statistics: &SearchStatistics,
        size: usize,
        output_dir: P,
        format: OutputFormat,
    ) -> Result<()> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

        match format {
            OutputFormat::Text => {
                let mut content = String::new();
                for (i, still_life) in still_lifes.iter().enumerate() {
                    content.push_str(&Self::format_still_life(i, still_life)?);
                }
                content.push('\n');
                content.push_str(&statistics.to_string());
                let path = output_dir.join(format!("still_lifes_{}.txt", size));
                std::fs::write(&path, content)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            OutputFormat::Json => {
                let (rows, cols) = still_lifes
                    .first()
                    .map(|s| (s.rows, s.cols))
                    .unwrap_or_default();
                let report = SearchReport {
                    rows,
                    cols,
                    size,
                    statistics,
                    still_lifes: still_lifes
                        .iter()
                        .map(|s| StillLifeEntry {
                            id: s.id(),
                            extent: s.extent(),
                            cells: &s.cells,
                        })
                        .collect(),
                };
                let path = output_dir.join(format!("still_lifes_{}.json", size));
                let json = serde_json::to_string_pretty(&report)?;
                std::fs::write(&path, json)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            OutputFormat::Pattern => {
                for (i, still_life) in still_lifes.iter().enumerate() {
                    let path = output_dir.join(format!(
                        "still_life_{}_{:03}.{}",
                        size,
                        i + 1,
                        PATTERN_EXTENSION
                    ));
                    save_pattern_to_file(&still_life.to_pattern(), path)?;
                }
            }
        }

        Ok(())
    }
}

/// Redraws a one-line progress report while a sequential search runs
pub struct SearchProgress {
    total_candidates: u64,
    stats: SearchStatistics,
    started: Instant,
    last_draw: Option<Instant>,
}

const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

impl SearchProgress {
    /// `total_candidates` is an upper bound; the half-width cutoff usually
    /// ends the search well before it.
    pub fn new(total_candidates: u64) -> Self {
        Self {
            total_candidates,
            stats: SearchStatistics::default(),
            started: Instant::now(),
            last_draw: None,
        }
    }

    pub fn update(&mut self, stats: &SearchStatistics) {
        self.stats = *stats;
        let due = self
            .last_draw
            .map_or(true, |last| last.elapsed() >= REDRAW_INTERVAL);
        if due {
            self.draw();
            self.last_draw = Some(Instant::now());
        }
    }

    /// Candidates examined at the last update
    pub fn examined(&self) -> u64 {
        self.stats.combinations_examined
    }

    fn draw(&self) {
        let examined = self.stats.combinations_examined;
        let percent = match self.total_candidates {
            0 => 0.0,
            total => examined as f64 * 100.0 / total as f64,
        };
        print!(
            "\rExamined {}/{} candidates ({:.1}%) | {} found | {:.0}/s",
            examined,
            self.total_candidates,
            percent,
            self.stats.still_lifes_found,
            self.rate()
        );
        let _ = std::io::stdout().flush();
    }

    fn rate(&self) -> f64 {
        let seconds = self.started.elapsed().as_secs_f64();
        if seconds > 0.0 {
            self.stats.combinations_examined as f64 / seconds
        } else {
            0.0
        }
    }

    /// Overwrite the progress line with the final counts
    pub fn finish(&mut self, stats: &SearchStatistics) {
        self.stats = *stats;
        println!(
            "\rExamined {} candidates, simulated {}, found {} in {:.1}s",
            stats.combinations_examined,
            stats.simulated,
            stats.still_lifes_found,
            self.started.elapsed().as_secs_f64()
        );
    }
}

/// Number of `k`-combinations of `n` items, saturating at `u64::MAX`
pub fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        result = result * (n - i) as u128 / (i + 1) as u128;
        if result > u64::MAX as u128 {
            return u64::MAX;
        }
    }
    result as u64
}

const RESET: &str = "\x1b[0m";

/// ANSI-coloured console messages. Plain text when `NO_COLOR` is set or
/// `TERM` is `dumb`.
pub struct ColorOutput;

impl ColorOutput {
    pub fn colored(text: &str, color: Color) -> String {
        if Self::enabled() {
            format!("{}{}{}", color.escape(), text, RESET)
        } else {
            text.to_owned()
        }
    }

    fn enabled() -> bool {
        std::env::var_os("NO_COLOR").is_none()
            && std::env::var("TERM").map_or(true, |term| term != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn escape(self) -> &'static str {
        match self {
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Yellow => "\x1b[33m",
            Color::Blue => "\x1b[34m",
        }
    }
}
