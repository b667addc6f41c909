//! Isomap - Command line host for the isometric device map
//!
//! Prints the projection, computes orientation dials and replays scripted
//! pointer gestures against a scene file.

mod config;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use isomap_core::{build_projection, compute_dial, ranging};
use isomap_scene::{GestureScript, Scene};
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::report::Report;

#[derive(Parser, Debug)]
#[command(name = "isomap")]
#[command(about = "Isometric device map: projection, dials and gesture replay")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "isomap.toml", global = true)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the isometric projection matrix
    Projection,
    /// Compute the orientation dial for a bearing and tilt
    Dial {
        /// Bearing in degrees, [-180, 180]
        #[arg(long, allow_hyphen_values = true)]
        bearing: f64,
        /// Tilt in degrees, [-90, 90]
        #[arg(long, allow_hyphen_values = true)]
        tilt: f64,
    },
    /// Replay a gesture script against a scene
    Replay {
        /// Scene file (TOML device list)
        scene: PathBuf,
        /// Gesture script (TOML event list)
        gesture: PathBuf,
    },
    /// Recompute neighbor measurements for every device of a scene
    Ranging {
        /// Scene file (TOML device list)
        scene: PathBuf,
    },
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays machine readable
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&args.log_level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    debug!("Isomap v{}", env!("CARGO_PKG_VERSION"));

    let config = config::load_config(&args.config)?;
    let report = Report::new(config.output.format);

    match args.command {
        Command::Projection => report.projection(&build_projection()),
        Command::Dial { bearing, tilt } => report.dial(&compute_dial(bearing, tilt)),
        Command::Replay { scene, gesture } => {
            let mut scene = Scene::from_file(&scene)
                .with_context(|| format!("Failed to load scene {}", scene.display()))?;
            scene.set_viewport(config.viewport.to_viewport());
            let script = GestureScript::from_file(&gesture)
                .with_context(|| format!("Failed to load gestures {}", gesture.display()))?;

            info!(events = script.events.len(), "Replaying gesture script");
            let events = scene.replay(&script);
            report.replay(&script, &events, scene.devices())
        }
        Command::Ranging { scene } => {
            let mut scene = Scene::from_file(&scene)
                .with_context(|| format!("Failed to load scene {}", scene.display()))?;
            ranging::refresh_neighbors(scene.devices_mut());
            report.devices(scene.devices())
        }
    }
}
