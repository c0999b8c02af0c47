//! cellgraph - load, edit and print a sheet of cells from the command line

mod config;

use anyhow::{Context, Result, anyhow};
use cellgraph_core::{
    Grid, Position, load_grd, print_texts, print_values, write_grd, write_markdown,
};
use clap::Parser;
use config::{DisplayMode, load_config};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cellgraph")]
#[command(about = "Evaluate a sheet of cells with formulas and print the result")]
#[command(version)]
struct Cli {
    /// Sheet file to load (.grd)
    file: Option<PathBuf>,

    /// Set a cell before printing, e.g. `-s A1=42` or `-s "B1==A1*2"` (can be repeated)
    #[arg(short = 's', long = "set", value_name = "CELL=TEXT")]
    sets: Vec<String>,

    /// Print cell texts (formulas as written) instead of values
    #[arg(long, conflicts_with = "markdown")]
    texts: bool,

    /// Print values as a markdown table
    #[arg(long)]
    markdown: bool,

    /// Save the resulting sheet to this .grd file
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Read configuration from this TOML file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, warnings) = load_config(cli.config.as_deref());
    init_logging(config.log_filter.as_deref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let mode = if cli.texts {
        DisplayMode::Texts
    } else if cli.markdown {
        DisplayMode::Markdown
    } else {
        config.display_mode
    };

    match run(&cli, mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// `CELLGRAPH_LOG` wins over the config file; both fall back to `warn`.
fn init_logging(config_filter: Option<&str>) {
    let filter = EnvFilter::try_from_env("CELLGRAPH_LOG")
        .or_else(|_| EnvFilter::try_new(config_filter.unwrap_or("warn")))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli, mode: DisplayMode) -> Result<()> {
    let mut grid = match &cli.file {
        Some(path) => {
            load_grd(path).with_context(|| format!("failed to load {}", path.display()))?
        }
        None => Grid::new(),
    };

    for assignment in &cli.sets {
        apply_set(&mut grid, assignment)?;
    }

    if let Some(path) = &cli.output {
        write_grd(path, &grid).with_context(|| format!("failed to save {}", path.display()))?;
    }

    let mut out = io::stdout().lock();
    match mode {
        DisplayMode::Values => print_values(&grid, &mut out)?,
        DisplayMode::Texts => print_texts(&grid, &mut out)?,
        DisplayMode::Markdown => write_markdown(&grid, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

/// Apply one `CELL=TEXT` assignment. Only the first `=` separates the two.
fn apply_set(grid: &mut Grid, assignment: &str) -> Result<()> {
    let (cell, text) = assignment
        .split_once('=')
        .ok_or_else(|| anyhow!("expected CELL=TEXT, got '{}'", assignment))?;
    let cell = cell.trim();
    let pos = Position::from_a1(cell).ok_or_else(|| anyhow!("invalid cell reference '{}'", cell))?;
    grid.set_cell(pos, text)
        .with_context(|| format!("cannot set {}", pos))?;
    debug!(cell = %pos, "applied --set");
    Ok(())
}
