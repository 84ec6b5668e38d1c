use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::{export, locations, readings};

/// Row counts and timing for a completed preprocessing run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub station_count: usize,
    pub cleaned_reading_rows: usize,
    pub output_rows: usize,
    pub output_path: PathBuf,
}

/// Runs the whole pipeline: read both tables, clean, join, project, export.
///
/// Stages run synchronously over in-memory tables; the first error aborts
/// the run and no output file is produced.
pub fn run(config: &PipelineConfig) -> Result<RunSummary> {
    let started_at = Utc::now();
    info!(
        readings = %config.readings_path.display(),
        locations = %config.locations_path.display(),
        "starting to process survey data"
    );

    let locations = locations::read_station_locations(&config.locations_path)?;
    let station_count = locations.height();

    let raw = readings::read_readings(&config.readings_path)?;
    let cleaned = readings::clean_readings(
        raw,
        config.year_from,
        config.year_to,
        &config.excluded_stations,
        &config.readings_path.display().to_string(),
    )?;
    let cleaned_reading_rows = cleaned.height();

    let joined = export::join_readings(cleaned, locations)?;
    let final_table = export::select_output_columns(&joined, &export::OUTPUT_COLUMNS)?;
    export::write_output(&final_table, &config.output_path)?;

    let finished_at = Utc::now();
    info!(
        output = %config.output_path.display(),
        rows = final_table.height(),
        "processed data has been saved"
    );

    Ok(RunSummary {
        started_at,
        finished_at,
        station_count,
        cleaned_reading_rows,
        output_rows: final_table.height(),
        output_path: config.output_path.clone(),
    })
}
