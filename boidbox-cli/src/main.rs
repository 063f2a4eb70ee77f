use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use boidbox_cli::{load_settings, open_frames, run, FlockHost, RunOptions};
use boidbox_shared::{ResponsiveViewport, SettingsFile};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run the boidbox flock headless", long_about = None)]
struct Args {
    /// JSON settings file (simulation settings and theme catalog)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Override the population from the settings
    #[arg(short = 'n', long)]
    population: Option<usize>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Simulated frame rate
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Fit the boundaries to a viewport, e.g. 1280x720
    #[arg(long)]
    viewport: Option<ResponsiveViewport>,

    /// Write JSON-lines frames to this file, or '-' for stdout
    #[arg(short = 'o', long)]
    frames: Option<String>,

    /// Write a frame every N ticks
    #[arg(long, default_value_t = 1)]
    every: u64,

    /// Step agents on the rayon thread pool
    #[arg(long)]
    parallel: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let mut settings = match &args.settings {
        Some(path) => load_settings(path)?,
        None => SettingsFile::default(),
    };
    if let Some(population) = args.population {
        settings.simulation.population = population;
    }

    log::info!("boidbox starting...");
    log::info!("Theme: {}", settings.simulation.theme);
    if let Some(seed) = args.seed {
        log::info!("Seed: {}", seed);
    }

    let mut host = FlockHost::new(settings, args.viewport, args.seed)
        .context("Failed to initialize simulation")?;

    let options = RunOptions {
        ticks: args.ticks,
        fps: args.fps,
        every: args.every,
        parallel: args.parallel,
    };

    let mut writer = open_frames(args.frames.as_deref())?;
    let frames = writer.as_mut().map(|w| &mut **w as &mut dyn Write);
    let summary = run(&mut host, &options, frames).context("Simulation error")?;

    log::info!(
        "Done: {} ticks, {} agents, {} contained agent-ticks, {} frames written",
        summary.ticks,
        summary.agents,
        summary.contained,
        summary.frames_written
    );
    log::info!(
        "Fastest agent moved {:.4} per tick (cap {:.4})",
        summary.max_speed_seen,
        summary.speed_limit
    );

    Ok(())
}
