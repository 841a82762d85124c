//! floodfill - bounded-parallelism flood fill over lazily loaded graphs.
//!
//! Usage:
//!   floodfill fill [FILE]        Fill an ASCII grid from its `@` tiles
//!   floodfill fill - -p 8        Read the grid from stdin, 8 visits at once
//!   floodfill --help             Show help

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use floodfill_core::{FailureStage, FillConfig, FillSummary};
use floodfill_engine::Floodfiller;
use floodfill_grid::{Grid, TileId};

#[derive(Parser)]
#[command(
    name = "floodfill",
    version,
    about = "Bounded-parallelism flood fill over lazily loaded graphs",
    long_about = "floodfill visits every node reachable from a set of seeds, \
                  at most N at a time, each exactly once.\n\n\
                  The `fill` subcommand runs it over an ASCII tile grid."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fill an ASCII grid from every `@` tile
    Fill {
        /// Grid file, or `-` for stdin
        #[arg(default_value = "-")]
        path: PathBuf,

        /// Maximum number of tiles visited at once
        #[arg(short, long, default_value = "4")]
        parallelism: usize,

        /// Simulated per-tile visit latency in milliseconds
        #[arg(long, default_value = "0")]
        latency_ms: u64,

        /// Print progress updates to stderr
        #[arg(long)]
        progress: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// JSON report for a fill.
#[derive(Serialize)]
struct FillReport {
    grid: String,
    summary: FillSummary,
    failures: Vec<FailureReport>,
}

#[derive(Serialize)]
struct FailureReport {
    id: TileId,
    stage: FailureStage,
    message: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Fill {
            path,
            parallelism,
            latency_ms,
            progress,
            format,
        } => {
            run_fill(&path, parallelism, latency_ms, progress, format).await?;
        }
    }

    Ok(())
}

/// Fill a grid and print the result.
async fn run_fill(
    path: &PathBuf,
    parallelism: usize,
    latency_ms: u64,
    show_progress: bool,
    format: OutputFormat,
) -> Result<()> {
    let grid = read_grid(path)?;
    grid.set_latency(Duration::from_millis(latency_ms));

    let config = FillConfig::new(parallelism).context("Invalid parallelism")?;
    let engine = Floodfiller::new(config);

    let starts = grid.starts();
    eprintln!(
        "Filling {}x{} grid from {} start tile(s)...",
        grid.width(),
        grid.height(),
        starts.len()
    );

    if show_progress {
        let mut progress_rx = engine.subscribe();
        tokio::spawn(async move {
            while let Ok(progress) = progress_rx.recv().await {
                eprintln!(
                    " {} visited, {} pending, {} failed",
                    progress.visited,
                    progress.pending(),
                    progress.failed
                );
            }
        });
    }

    let (summary, failures) = match engine.run(starts).await {
        Ok(summary) => (summary, Vec::new()),
        Err(err) => {
            let failures = err
                .failures
                .iter()
                .map(|failure| FailureReport {
                    id: failure.id,
                    stage: failure.stage,
                    message: failure.cause.to_string(),
                })
                .collect();
            (err.summary, failures_sorted(failures))
        }
    };

    match format {
        OutputFormat::Text => {
            println!("{}", grid.render());
            eprintln!();
            eprintln!(
                " {} visited, {} duplicate discoveries, {} failed in {:.2}s",
                summary.visited,
                summary.duplicates,
                summary.failed,
                summary.elapsed.as_secs_f64()
            );
            for failure in &failures {
                eprintln!(" {} failed during {}: {}", failure.id, failure.stage, failure.message);
            }
        }
        OutputFormat::Json => {
            let report = FillReport {
                grid: grid.render(),
                summary,
                failures,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.failures.is_empty() {
                bail!("{} tile(s) failed", report.failures.len());
            }
            return Ok(());
        }
    }

    if !failures.is_empty() {
        bail!("{} tile(s) failed", failures.len());
    }

    Ok(())
}

/// Read a grid from a file, or from stdin for `-`.
fn read_grid(path: &PathBuf) -> Result<Grid> {
    if path.as_os_str() == "-" {
        let mut ascii = String::new();
        std::io::stdin()
            .read_to_string(&mut ascii)
            .context("Failed to read grid from stdin")?;
        return Grid::parse(&ascii).context("Invalid grid");
    }
    Grid::load(path).with_context(|| format!("Failed to load grid from {}", path.display()))
}

/// Failures in row-major tile order, for stable output.
fn failures_sorted(mut failures: Vec<FailureReport>) -> Vec<FailureReport> {
    failures.sort_by_key(|failure| (failure.id.y, failure.id.x));
    failures
}
