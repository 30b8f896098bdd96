//! Command line driver: play boards forward and search for still lifes

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use game_of_life_still_lifes::{
    config::{CliOverrides, OutputFormat, Settings},
    game_of_life::{create_example_patterns, load_grid_from_file, load_pattern_from_file, save_grid_to_file, Grid},
    still_life::{
        CancelToken, SearchStep, StillLife, StillLifeEnumerator, StillLifeSearch, StillLifeValidator,
    },
    utils::{binomial, ColorOutput, SearchFormatter, SearchProgress},
};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "game_of_life_still_lifes")]
#[command(about = "Toroidal Game of Life and still-life enumerator")]
#[command(version = "0.1.0")]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
    Pattern,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Pattern => OutputFormat::Pattern,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Play a board forward generation by generation
    Run {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Start from a saved `.life` pattern instead of a random board
        #[arg(short, long)]
        pattern: Option<PathBuf>,

        #[arg(long)]
        rows: Option<usize>,

        #[arg(long)]
        cols: Option<usize>,

        /// Percentage of cells alive on a random board
        #[arg(short, long)]
        density: Option<u8>,

        /// Number of generations to play
        #[arg(short, long)]
        generations: Option<u64>,

        /// Print every N-th generation
        #[arg(short, long)]
        every: Option<u64>,

        /// Seed for the random board
        #[arg(long)]
        seed: Option<u64>,

        /// Save the final board to this `.life` file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Enumerate still lifes of a given size
    Search {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        #[arg(long)]
        rows: Option<usize>,

        #[arg(long)]
        cols: Option<usize>,

        /// Number of live cells
        #[arg(short = 'k', long)]
        size: Option<usize>,

        /// Search shards on all cores
        #[arg(long)]
        parallel: bool,

        /// Abandon the search after this many seconds
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Stop after this many still lifes
        #[arg(short, long)]
        max_results: Option<usize>,

        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check whether a saved pattern is a still life
    Verify {
        /// Pattern file
        #[arg(short, long)]
        pattern: PathBuf,
    },

    /// Create example configuration and pattern files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Run {
            config,
            pattern,
            rows,
            cols,
            density,
            generations,
            every,
            seed,
            save,
        } => {
            let overrides = CliOverrides {
                rows,
                cols,
                density_percent: density,
                generations,
                display_every: every,
                seed,
                pattern_file: pattern,
                ..Default::default()
            };
            run_command(config, overrides, save)
        }
        Commands::Search {
            config,
            rows,
            cols,
            size,
            parallel,
            timeout,
            max_results,
            format,
            output,
        } => {
            let overrides = CliOverrides {
                rows,
                cols,
                target_still_life_size: size,
                parallel,
                timeout_seconds: timeout,
                max_results,
                format: format.map(OutputFormat::from),
                output_dir: output,
                ..Default::default()
            };
            search_command(config, overrides, cli.verbose)
        }
        Commands::Verify { pattern } => verify_command(pattern),
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

fn load_settings(config_path: &PathBuf, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        warn!("Config file {} not found, using defaults", config_path.display());
        Settings::default()
    };

    settings.merge_with_cli(overrides);
    settings.validate().context("Configuration validation failed")?;
    Ok(settings)
}

fn run_command(config_path: PathBuf, overrides: CliOverrides, save: Option<PathBuf>) -> Result<()> {
    let settings = load_settings(&config_path, &overrides)?;
    let simulation = &settings.simulation;

    let mut grid = match simulation.pattern_file {
        Some(ref path) => {
            let grid = load_grid_from_file(path)?;
            info!(
                "Loaded {}x{} pattern from {} at generation {}",
                grid.rows(),
                grid.cols(),
                path.display(),
                grid.generation()
            );
            grid
        }
        None => {
            let mut rng = match simulation.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let mut grid = Grid::new(settings.board.rows, settings.board.cols)?;
            grid.randomize(simulation.density_percent, &mut rng)?;
            grid
        }
    };

    println!("{}", ColorOutput::info(&grid.summary()));
    println!("{}", SearchFormatter::format_status(&grid));
    println!("{}", SearchFormatter::format_grid_compact(&grid));

    for step in 1..=simulation.generations {
        grid.advance();

        if step % simulation.display_every == 0 {
            println!("{}", SearchFormatter::format_status(&grid));
            println!("{}", SearchFormatter::format_grid_compact(&grid));
        }

        if simulation.stop_when_extinct && grid.population() == 0 {
            println!(
                "{}",
                ColorOutput::warning(&format!("Population died out at generation {}", grid.generation()))
            );
            break;
        }
    }

    if let Some(path) = save {
        save_grid_to_file(&grid, &path)?;
        println!("{}", ColorOutput::success(&format!("Saved board to {}", path.display())));
    }

    Ok(())
}

fn search_command(config_path: PathBuf, overrides: CliOverrides, verbose: bool) -> Result<()> {
    let settings = load_settings(&config_path, &overrides)?;
    settings.validate_search()?;

    let size = settings.search.target_still_life_size;
    println!(
        "{}",
        ColorOutput::info(&format!(
            "🔍 Searching a {}x{} board for still lifes of {} cells",
            settings.board.rows, settings.board.cols, size
        ))
    );

    let cancel = CancelToken::new();
    if let Some(seconds) = settings.search.timeout_seconds {
        let token = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_secs(seconds));
            warn!("Search timeout of {}s reached, abandoning search", seconds);
            token.cancel();
        });
    }

    let enumerator = StillLifeEnumerator::new(settings.board.rows, settings.board.cols, size)?
        .with_cancel_token(cancel)
        .with_max_results(settings.search.max_results);

    let start_time = Instant::now();
    let (found, stats) = if settings.search.parallel {
        enumerator.collect_parallel()
    } else {
        let total = binomial(enumerator.interior().len() as u64, size as u64);
        let mut progress = SearchProgress::new(total);
        let mut search = enumerator.search();
        let found = drain_with_progress(&mut search, &mut progress, verbose)?;
        progress.finish(search.statistics());
        (found, *search.statistics())
    };
    let total_time = start_time.elapsed();

    if stats.cancelled {
        println!("{}", ColorOutput::warning("Search abandoned before completion"));
    }

    if found.is_empty() {
        println!("{}", ColorOutput::warning("❌ No still lifes found"));
    } else {
        println!(
            "{}",
            ColorOutput::success(&format!(
                "✅ Found {} still life(s) in {:.3}s",
                found.len(),
                total_time.as_secs_f64()
            ))
        );
        println!("\n{}", SearchFormatter::format_summary(&found));
        if !verbose && found.len() <= 3 {
            for (i, still_life) in found.iter().enumerate() {
                println!("{}", SearchFormatter::format_still_life(i, still_life)?);
            }
        }
    }

    if verbose {
        println!("\n{}", stats);
    }

    SearchFormatter::save_still_lifes(
        &found,
        &stats,
        size,
        &settings.output.output_directory,
        settings.output.format,
    )
    .context("Failed to save still lifes")?;

    println!(
        "{}",
        ColorOutput::success(&format!(
            "Results saved to {}",
            settings.output.output_directory.display()
        ))
    );

    Ok(())
}

/// Run a sequential search to the end, redrawing progress after every candidate
fn drain_with_progress(
    search: &mut StillLifeSearch,
    progress: &mut SearchProgress,
    verbose: bool,
) -> Result<Vec<StillLife>> {
    let mut found = Vec::new();
    loop {
        match search.step() {
            SearchStep::Found(still_life) => {
                if verbose {
                    println!("\n{}", SearchFormatter::format_still_life(found.len(), &still_life)?);
                }
                found.push(still_life);
            }
            SearchStep::Rejected => {}
            SearchStep::Finished => break,
        }
        progress.update(search.statistics());
    }
    Ok(found)
}

fn verify_command(pattern_path: PathBuf) -> Result<()> {
    println!("{}", ColorOutput::info("🔍 Verifying pattern..."));

    let pattern = load_pattern_from_file(&pattern_path)?;
    let grid = pattern.to_grid()?;
    println!("{}", grid.summary());
    println!("{}", SearchFormatter::format_grid_with_coords(&grid));

    let result = StillLifeValidator::default().validate(&StillLife::from_pattern(&pattern))?;
    println!("{}", result);

    if result.is_valid {
        println!("{}", ColorOutput::success("✅ Pattern is a still life"));
    } else {
        println!("{}", ColorOutput::error("❌ Pattern is not a still life"));
        if let Some(error) = result.error_message {
            println!("Error: {}", error);
        }
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🛠️  Setting up project structure..."));

    let config_dir = directory.join("config");
    let patterns_dir = directory.join("patterns");
    let output_dir = directory.join("output/still_lifes");

    for dir in [&config_dir, &patterns_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_patterns(&patterns_dir).context("Failed to create example patterns")?;
    println!("Created example patterns in: {}", patterns_dir.display());

    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)?;

    let mut small_search = Settings::default();
    small_search.board.rows = 6;
    small_search.board.cols = 6;
    small_search.search.target_still_life_size = 6;
    small_search.to_file(&examples_dir.join("small_search.yaml"))?;

    let mut glider_run = Settings::default();
    glider_run.simulation.generations = 32;
    glider_run.simulation.display_every = 4;
    glider_run.simulation.pattern_file = Some(PathBuf::from("patterns/glider.life"));
    glider_run.to_file(&examples_dir.join("glider_run.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());

    println!("\n{}", ColorOutput::success("✅ Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Run: cargo run -- search --rows 7 --cols 7 -k 7");
    println!("3. Run: cargo run -- run --pattern patterns/glider.life -g 20");

    Ok(())
}
