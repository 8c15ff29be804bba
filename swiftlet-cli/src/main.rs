use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use swiftlet_cli::{run, RunOptions, Variant};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless swiftlet animation harness", long_about = None)]
struct Args {
    /// Simulation variant: flock or bird
    #[arg(short, long, default_value = "flock")]
    variant: String,

    /// Simulated duration in seconds
    #[arg(short, long, default_value_t = 10.0)]
    duration: f32,

    /// Fixed timestep in milliseconds
    #[arg(short, long, default_value_t = 16.0)]
    step_ms: f32,

    /// Scene width in canvas units
    #[arg(long, default_value_t = 800.0)]
    width: f32,

    /// Scene height in canvas units
    #[arg(long, default_value_t = 600.0)]
    height: f32,

    /// Flock agent count
    #[arg(short, long, default_value_t = 48)]
    count: usize,

    /// Sweep the pointer across the scene during the run
    #[arg(long)]
    sweep: bool,

    /// Path to a JSON bird profile (BirdSettings)
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let variant = match args.variant.as_str() {
        "flock" => Variant::Flock,
        "bird" => Variant::Bird,
        other => bail!("unknown variant `{other}`, expected `flock` or `bird`"),
    };

    let bird_settings = match &args.profile {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading profile {}", path.display()))?;
            Some(
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing profile {}", path.display()))?,
            )
        }
        None => None,
    };

    let options = RunOptions {
        variant,
        duration: args.duration,
        step: args.step_ms / 1000.0,
        width: args.width,
        height: args.height,
        count: args.count,
        sweep_pointer: args.sweep,
        bird_settings,
        ..RunOptions::default()
    };

    let summary = run(&options)?;
    log::info!(
        "finished: {} ticks over {:.1}s simulated",
        summary.ticks,
        summary.sim_seconds
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
