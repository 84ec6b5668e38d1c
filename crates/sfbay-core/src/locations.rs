use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;
use polars::prelude::*;

use crate::error::{PipelineError, Result};
use crate::mercator::to_mercator;

pub const STATION_COLUMN: &str = "Stations";
pub const MERCATOR_X_COLUMN: &str = "mercator_x";
pub const MERCATOR_Y_COLUMN: &str = "mercator_y";

// Positional layout of the published station table. The trailing free-text
// comment field is discarded.
const STATION_FIELD: usize = 0;
const LAT_DEG_FIELD: usize = 1;
const LAT_MIN_FIELD: usize = 2;
const LON_DEG_FIELD: usize = 3;
const LON_MIN_FIELD: usize = 4;
const REQUIRED_FIELDS: usize = 5;

/// Reads the comma-delimited station-location table and normalizes it to
/// one `{Stations, mercator_x, mercator_y}` row per station.
pub fn read_station_locations(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let label = path.display().to_string();
    normalize_locations(BufReader::new(file), &label)
}

/// Reader-generic core of [`read_station_locations`].
///
/// Degree/minute fields are combined into decimal degrees with the source's
/// hemisphere convention: north latitude adds the minutes, west longitude
/// stores them as a positive offset subtracted from the degrees. Duplicate
/// station ids are a hard error so the later join cannot fan out.
pub fn normalize_locations<R: Read>(reader: R, file: &str) -> Result<DataFrame> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut stations: Vec<i32> = Vec::new();
    let mut xs: Vec<f64> = Vec::new();
    let mut ys: Vec<f64> = Vec::new();
    let mut seen: HashSet<i32> = HashSet::new();
    let mut duplicates: Vec<i32> = Vec::new();

    for (index, record) in csv_reader.records().enumerate() {
        let record = record.map_err(|source| PipelineError::Csv {
            file: file.to_string(),
            source,
        })?;
        let line = record
            .position()
            .map(|position| position.line() as usize)
            .unwrap_or(index + 2);

        if record.len() < REQUIRED_FIELDS {
            return Err(PipelineError::Schema {
                column: format!("field {}", record.len()),
                context: format!("{file} line {line}: expected at least {REQUIRED_FIELDS} fields"),
            });
        }

        let station =
            parse_field(file, line, "Stations", record.get(STATION_FIELD).unwrap_or_default())?
                as i32;
        let lat_deg =
            parse_field(file, line, "lat_deg", record.get(LAT_DEG_FIELD).unwrap_or_default())?;
        let lat_min =
            parse_field(file, line, "lat_min", record.get(LAT_MIN_FIELD).unwrap_or_default())?;
        let lon_deg =
            parse_field(file, line, "lon_deg", record.get(LON_DEG_FIELD).unwrap_or_default())?;
        let lon_min =
            parse_field(file, line, "lon_min", record.get(LON_MIN_FIELD).unwrap_or_default())?;

        if !seen.insert(station) && !duplicates.contains(&station) {
            duplicates.push(station);
        }

        let lat = lat_deg + lat_min / 60.0;
        let lon = lon_deg - lon_min / 60.0;
        let (x, y) = to_mercator(lat, lon);

        stations.push(station);
        xs.push(x);
        ys.push(y);
    }

    if !duplicates.is_empty() {
        duplicates.sort_unstable();
        return Err(PipelineError::DuplicateStations {
            file: file.to_string(),
            stations: duplicates,
        });
    }

    let df = DataFrame::new(vec![
        Series::new(STATION_COLUMN.into(), stations).into(),
        Series::new(MERCATOR_X_COLUMN.into(), xs).into(),
        Series::new(MERCATOR_Y_COLUMN.into(), ys).into(),
    ])?;
    Ok(df)
}

/// Strips one trailing minute mark (`'`) if present; values without the
/// suffix pass through unchanged.
fn strip_minute_suffix(value: &str) -> &str {
    let trimmed = value.trim();
    trimmed.strip_suffix('\'').unwrap_or(trimmed)
}

fn parse_field(file: &str, line: usize, column: &'static str, value: &str) -> Result<f64> {
    strip_minute_suffix(value)
        .parse::<f64>()
        .map_err(|err| PipelineError::Field {
            file: file.to_string(),
            line,
            column,
            message: format!("'{}': {err}", value.trim()),
        })
}
