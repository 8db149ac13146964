//! Unified CLI entry point: `brc-engine [OPTIONS] [PATH]`.
//!
//! A thin `main` that parses arguments, sets up logging, drives the engine,
//! times the run, and prints the rendered result.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use brc_engine::{render, Parallelism};

/// Summarizes minimum, mean, and maximum temperature per weather station.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the measurements file.
    #[arg(default_value = "./measurements.txt")]
    path: PathBuf,

    /// Number of worker threads to use. Defaults to the available
    /// parallelism.
    #[arg(long)]
    workers: Option<usize>,

    /// Disable the parallel driver and process the whole file on one
    /// thread.
    #[arg(long)]
    single_threaded: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let parallelism = if args.single_threaded {
        Parallelism::Fixed(1)
    } else {
        args.workers.map_or(Parallelism::Auto, Parallelism::Fixed)
    };

    match run(&args.path, parallelism) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:?}");
            ExitCode::from(1)
        }
    }
}

fn run(path: &PathBuf, parallelism: Parallelism) -> anyhow::Result<()> {
    let begin = Instant::now();

    let table = brc_engine::run(path, parallelism)
        .with_context(|| format!("failed to process {}", path.display()))?;

    let rows = render::sorted_rows(&table);
    let rendered = render::render(&rows);
    print!("{rendered}");

    info!(elapsed = ?begin.elapsed(), stations = rows.len(), "done");
    Ok(())
}
