//! Application entry point for the fractal viewer.
//!
//! This binary parses the command line, installs logging, sets up
//! eframe/egui and delegates all animation and drawing to [`Viewer`]
//! from the `viewer` module.

mod viewer;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use fractal_core::FractalConfig;
use tracing_subscriber::EnvFilter;
use viewer::Viewer;

#[derive(Parser, Debug)]
#[command(name = "fractal-view", about = "Animated five-way branching fractal")]
struct Args {
    /// JSON file with a fractal configuration; missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the hierarchy's random parameters.
    #[arg(long)]
    seed: Option<u64>,

    /// Overrides the configured depth (3..=8).
    #[arg(long)]
    depth: Option<usize>,
}

fn load_config(args: &Args) -> anyhow::Result<FractalConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            FractalConfig::from_json_str(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => FractalConfig::default(),
    };
    if let Some(depth) = args.depth {
        cfg.depth = depth;
    }
    Ok(cfg)
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if the config cannot be read or eframe fails to start.
fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let cfg = load_config(&args)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, depth = cfg.depth, "starting viewer");

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Fractal",
        options,
        Box::new(move |_cc| Ok(Box::new(Viewer::new(cfg, seed)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe failed: {e}"))
}
