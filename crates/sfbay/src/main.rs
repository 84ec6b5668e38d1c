use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sfbay_core::{pipeline, PipelineConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "SF Bay water-quality preprocessing CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean and join the raw survey tables into the analysis table
    Process(ProcessArgs),
}

#[derive(Args, Debug, Default)]
struct ProcessArgs {
    /// TOML file with paths and filter settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the survey files under their default names
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Semicolon-delimited sensor-reading file
    #[arg(long)]
    readings: Option<PathBuf>,

    /// Comma-delimited station-location file
    #[arg(long)]
    locations: Option<PathBuf>,

    /// Destination for the joined analysis table
    #[arg(long)]
    output: Option<PathBuf>,

    /// First survey year to keep (inclusive)
    #[arg(long)]
    year_from: Option<i32>,

    /// Last survey year to keep (inclusive)
    #[arg(long)]
    year_to: Option<i32>,

    /// Station id to drop; repeat for multiple stations
    #[arg(long = "exclude", value_name = "STATION")]
    excluded_stations: Vec<i32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Process(args) => {
            let config = build_config(args)?;
            let summary = pipeline::run(&config)?;
            info!(
                stations = summary.station_count,
                readings = summary.cleaned_reading_rows,
                rows = summary.output_rows,
                "run complete"
            );
            Ok(())
        }
    }
}

fn build_config(args: ProcessArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(dir) = args.data_dir {
        config = config.with_data_dir(&dir);
    }
    if let Some(path) = args.readings {
        config.readings_path = path;
    }
    if let Some(path) = args.locations {
        config.locations_path = path;
    }
    if let Some(path) = args.output {
        config.output_path = path;
    }
    if let Some(year) = args.year_from {
        config.year_from = year;
    }
    if let Some(year) = args.year_to {
        config.year_to = year;
    }
    if !args.excluded_stations.is_empty() {
        config.excluded_stations = args.excluded_stations;
    }

    Ok(config)
}
