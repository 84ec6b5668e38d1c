use std::fs::File;
use std::path::Path;

use polars::prelude::*;

use crate::error::{PipelineError, Result};
use crate::locations::STATION_COLUMN;

/// Column name the survey publishes the station id under.
pub const STATION_SOURCE_COLUMN: &str = "Station.Number";
pub const TIMESTAMP_COLUMN: &str = "TimeStamp";

const READINGS_SEPARATOR: u8 = b';';

/// Reads the semicolon-delimited sensor-reading table as published.
pub fn read_readings(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .with_parse_options(CsvParseOptions::default().with_separator(READINGS_SEPARATOR))
        .into_reader_with_file_handle(file)
        .finish()?;
    Ok(df)
}

/// Canonicalizes the station column and filters the readings by year range
/// and excluded stations.
///
/// The `TimeStamp` column is parsed strictly to derive the year but is
/// otherwise left in its published string form, as are all other columns.
pub fn clean_readings(
    mut df: DataFrame,
    year_from: i32,
    year_to: i32,
    excluded_stations: &[i32],
    file: &str,
) -> Result<DataFrame> {
    if df.column(STATION_SOURCE_COLUMN).is_err() {
        return Err(PipelineError::Schema {
            column: STATION_SOURCE_COLUMN.to_string(),
            context: file.to_string(),
        });
    }
    if df.column(TIMESTAMP_COLUMN).is_err() {
        return Err(PipelineError::Schema {
            column: TIMESTAMP_COLUMN.to_string(),
            context: file.to_string(),
        });
    }

    df.rename(STATION_SOURCE_COLUMN, STATION_COLUMN.into())?;

    let stations = df
        .column(STATION_COLUMN)?
        .as_materialized_series()
        .strict_cast(&DataType::Int32)
        .map_err(|err| PipelineError::Parse {
            file: file.to_string(),
            column: STATION_COLUMN,
            message: err.to_string(),
        })?;
    df.with_column(stations)?;

    let year = col(TIMESTAMP_COLUMN)
        .str()
        .to_datetime(
            Some(TimeUnit::Microseconds),
            None,
            StrptimeOptions {
                strict: true,
                ..Default::default()
            },
            lit("raise"),
        )
        .dt()
        .year();

    let mut keep = year
        .clone()
        .gt_eq(lit(year_from))
        .and(year.lt_eq(lit(year_to)));
    for station in excluded_stations {
        keep = keep.and(col(STATION_COLUMN).neq(lit(*station)));
    }

    df.lazy().filter(keep).collect().map_err(|err| match err {
        PolarsError::ComputeError(message) => PipelineError::Parse {
            file: file.to_string(),
            column: TIMESTAMP_COLUMN,
            message: message.to_string(),
        },
        other => PipelineError::Polars(other),
    })
}
