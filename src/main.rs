//! `pulse-echo` CLI: runs the doppler and pulse compression demos headless
//! and exports the drawn frames.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pulse_echo::render::FrameRecorder;
use pulse_echo::scene::{CompressionScene, DopplerScene, Scene};
use pulse_echo::{ClockConfig, Config, Driver, Storable};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "pulse-echo", about = "Pulsed radar echo and pulse compression demos")]
struct Cli {
    /// JSON file overriding the built-in demo parameters
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// CW echo off a moving target.
    Doppler {
        #[command(flatten)]
        run: RunArgs,
    },
    /// Two close targets, with and without a chirp and matched filter.
    Compression {
        /// Transmit a plain CW pulse instead of a chirp
        #[arg(long)]
        cw: bool,
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Number of frames to simulate
    #[arg(long, default_value_t = 120)]
    frames: u64,
    /// Pace frames to the configured frame rate
    #[arg(long)]
    realtime: bool,
    /// Write every frame as JSON polylines
    #[arg(long)]
    record: Option<PathBuf>,
    /// Write the final frame as an SVG image
    #[arg(long)]
    svg: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Doppler { run } => {
            let scene = DopplerScene::new(&config.doppler)?;
            run_scene(scene, &config.clock, &run)
        }
        Commands::Compression { cw, run } => {
            let mut compression = config.compression.clone();
            if cw {
                compression.pulse_compression = false;
            }
            let scene = CompressionScene::new(&compression)?;
            run_scene(scene, &config.clock, &run)
        }
    }
}

fn run_scene<S: Scene>(scene: S, clock: &ClockConfig, args: &RunArgs) -> Result<()> {
    let name = scene.name();
    let surface = scene.surface();
    let recorder = FrameRecorder::new(surface.width, surface.height);

    let mut driver = Driver::new(scene, recorder, clock);
    if args.realtime {
        driver = driver.paced(clock.frame_rate);
    }

    let start = std::time::Instant::now();
    let frames = args.frames;
    let drawn = driver.run(|c| c.frame >= frames);
    let end_time = driver.clock().t;
    let recorder = driver.into_renderer();

    println!(
        "{}: {} frames, t={:.3}, elapsed={:.2}s",
        name,
        drawn,
        end_time,
        start.elapsed().as_secs_f64()
    );

    if let Some(path) = &args.record {
        recorder
            .to_file(path)
            .with_context(|| format!("writing frames to {}", path.display()))?;
        info!(path = %path.display(), "frames saved");
    }

    if let Some(path) = &args.svg {
        match recorder.last_svg() {
            Some(svg) => {
                std::fs::write(path, svg)
                    .with_context(|| format!("writing svg to {}", path.display()))?;
                info!(path = %path.display(), "last frame saved");
            }
            None => info!("no frame drawn, svg skipped"),
        }
    }

    Ok(())
}
