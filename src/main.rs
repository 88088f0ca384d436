//! Batch revision tool for head-direction trial data.

use anyhow::Result;
use clap::Parser;
use head_direction::app::{BatchConfig, RevisionApp};
use head_direction::config::Config;
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing trial CSV files (detector output or revised form)
    input: PathBuf,

    /// Output directory for revised trial CSVs
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Override the configured frames per trial
    #[arg(long)]
    frame_count: Option<usize>,

    /// Override the configured stimulus onset frame
    #[arg(long)]
    onset: Option<usize>,

    /// Override the configured smoothing radius
    #[arg(long)]
    radius: Option<usize>,

    /// Commit interpolated estimates as accepted data before saving
    #[arg(short, long)]
    promote: bool,

    /// Export per-subject summary CSVs
    #[arg(short, long)]
    summaries: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Head Direction Revision");

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    // Apply command line overrides
    if let Some(frame_count) = args.frame_count {
        config.trial.frame_count = frame_count;
    }
    if let Some(onset) = args.onset {
        config.trial.stimulus_onset_frame = onset;
    }
    if let Some(radius) = args.radius {
        config.smoothing.radius = radius;
    }

    let batch = BatchConfig {
        input_dir: args.input,
        output_dir: args.output,
        promote_hypotheses: args.promote,
        export_summaries: args.summaries,
    };

    // Create and run application
    let app = RevisionApp::new(config, batch)?;
    app.run()?;

    Ok(())
}
