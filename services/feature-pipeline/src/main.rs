//! Climate feature grid pipeline.
//!
//! Turns normalized station records into dense, regularly-gridded
//! feature series:
//! - `interpolate` builds the surface and aloft series from multi-level
//!   station records and persists them to the feature store.
//! - `derive` combines two stored series into a derived feature
//!   (surface minus aloft), optionally anomaly-normalized first.

mod config;
mod pipeline;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use interpolation::CancelToken;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::PipelineConfig;

#[derive(Parser, Debug)]
#[command(name = "feature-pipeline")]
#[command(about = "Interpolate sparse climate observations into dense feature grids")]
struct Args {
    /// Pipeline configuration file (YAML)
    #[arg(long, env = "PIPELINE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interpolate station records into surface and aloft series
    Interpolate {
        /// Directory of normalized station record JSON files
        #[arg(long, default_value = "data/processed/noaa")]
        input_dir: PathBuf,

        /// Feature store directory for the interpolated series
        #[arg(long, default_value = "data/features")]
        output_dir: PathBuf,
    },

    /// Derive a difference feature from two stored series
    Derive {
        /// Feature store directory
        #[arg(long, default_value = "data/features")]
        store_dir: PathBuf,

        /// Series to subtract from (minuend)
        #[arg(long, default_value = "surface")]
        minuend: String,

        /// Series to subtract (subtrahend)
        #[arg(long, default_value = "aloft")]
        subtrahend: String,

        /// Name of the derived series
        #[arg(long, default_value = "surface-minus-aloft")]
        output: String,

        /// Normalize both inputs to their anomaly baseline first
        #[arg(long)]
        normalize: bool,
    },
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = PipelineConfig::load(args.config.as_deref())?;

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            info!("got SIGINT, cancelling batch");
            cancel.cancel();
        })?;
    }

    match args.command {
        Command::Interpolate {
            input_dir,
            output_dir,
        } => {
            info!(
                input = %input_dir.display(),
                output = %output_dir.display(),
                "starting interpolation"
            );
            pipeline::run_interpolate(&config, &input_dir, &output_dir, &cancel)?;
        }
        Command::Derive {
            store_dir,
            minuend,
            subtrahend,
            output,
            normalize,
        } => {
            info!(
                store = %store_dir.display(),
                minuend = %minuend,
                subtrahend = %subtrahend,
                output = %output,
                "starting derivation"
            );
            pipeline::run_derive(&config, &store_dir, &minuend, &subtrahend, &output, normalize)?;
        }
    }

    Ok(())
}
