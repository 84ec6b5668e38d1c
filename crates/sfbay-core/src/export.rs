use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::*;

use crate::error::{PipelineError, Result};
use crate::locations::STATION_COLUMN;

/// Canonical output schema, in serialization order.
pub const OUTPUT_COLUMNS: [&str; 11] = [
    "TimeStamp",
    "Stations",
    "Distance.from.36",
    "Depth",
    "Fluorescence",
    "Calculated.Chlorophyll",
    "Calculated.Oxygen",
    "Salinity",
    "Temperature",
    "mercator_x",
    "mercator_y",
];

/// Inner-joins cleaned readings with normalized station locations on the
/// station id. Readings without a known location (and locations without
/// readings) are dropped.
pub fn join_readings(readings: DataFrame, locations: DataFrame) -> Result<DataFrame> {
    for (df, context) in [(&readings, "cleaned readings"), (&locations, "station locations")] {
        if df.column(STATION_COLUMN).is_err() {
            return Err(PipelineError::Schema {
                column: STATION_COLUMN.to_string(),
                context: context.to_string(),
            });
        }
    }

    let joined = readings
        .lazy()
        .join(
            locations.lazy(),
            [col(STATION_COLUMN)],
            [col(STATION_COLUMN)],
            JoinArgs::new(JoinType::Inner),
        )
        .collect()?;
    Ok(joined)
}

/// Projects the join result to exactly `columns`, in order.
pub fn select_output_columns(df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
    for column in columns {
        if df.column(column).is_err() {
            return Err(PipelineError::Schema {
                column: (*column).to_string(),
                context: "join result".to_string(),
            });
        }
    }
    let selected = df.select(columns.iter().copied())?;
    Ok(selected)
}

/// Writes the final table as comma-delimited text with a header row and a
/// leading unlabeled row-index column, replacing `path` atomically via a
/// sibling `.tmp` file.
///
/// The downstream dashboard reads the positional index for its time-series
/// x-axis, so the index column is part of the output contract.
pub fn write_output(df: &DataFrame, path: &Path) -> Result<()> {
    let mut indexed = df.with_row_index("".into(), None)?;

    let staging = staging_path(path);
    let file = File::create(&staging).map_err(|source| PipelineError::Io {
        path: staging.clone(),
        source,
    })?;

    CsvWriter::new(file)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut indexed)?;

    std::fs::rename(&staging, path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readings(stations: &[i32]) -> DataFrame {
        DataFrame::new(vec![
            Series::new(STATION_COLUMN.into(), stations).into(),
            Series::new(
                "Temperature".into(),
                (0..stations.len()).map(|i| 10.0 + i as f64).collect::<Vec<_>>(),
            )
            .into(),
        ])
        .unwrap()
    }

    fn locations(stations: &[i32]) -> DataFrame {
        DataFrame::new(vec![
            Series::new(STATION_COLUMN.into(), stations).into(),
            Series::new(
                "mercator_x".into(),
                vec![13_500_000.0f64; stations.len()],
            )
            .into(),
            Series::new("mercator_y".into(), vec![4_500_000.0f64; stations.len()]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn join_keeps_only_matching_station_pairs() {
        let joined = join_readings(readings(&[5, 5, 6, 9]), locations(&[5, 6, 7])).unwrap();

        assert_eq!(joined.height(), 3);
        let stations = joined.column(STATION_COLUMN).unwrap().i32().unwrap();
        for station in stations.into_no_null_iter() {
            assert!([5, 6].contains(&station));
        }
    }

    #[test]
    fn join_without_key_column_is_a_schema_error() {
        let no_key = DataFrame::new(vec![Series::new("Temperature".into(), [1.0f64]).into()])
            .unwrap();
        let err = join_readings(no_key, locations(&[5])).unwrap_err();
        assert!(matches!(err, PipelineError::Schema { .. }));
    }

    #[test]
    fn selection_preserves_requested_order() {
        let joined = join_readings(readings(&[5]), locations(&[5])).unwrap();
        let selected =
            select_output_columns(&joined, &["mercator_y", STATION_COLUMN, "Temperature"])
                .unwrap();
        assert_eq!(
            selected.get_column_names(),
            ["mercator_y", STATION_COLUMN, "Temperature"]
        );
    }

    #[test]
    fn selecting_a_missing_column_names_it() {
        let joined = join_readings(readings(&[5]), locations(&[5])).unwrap();
        let err = select_output_columns(&joined, &["Salinity"]).unwrap_err();
        match err {
            PipelineError::Schema { column, .. } => assert_eq!(column, "Salinity"),
            other => panic!("expected Schema error, got {other}"),
        }
    }

    #[test]
    fn output_has_header_and_leading_index_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let df = readings(&[5, 6]);

        write_output(&df, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some(",Stations,Temperature"));
        assert_eq!(lines.next(), Some("0,5,10.0"));
        assert_eq!(lines.next(), Some("1,6,11.0"));
    }

    #[test]
    fn no_stale_staging_file_remains() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_output(&readings(&[5]), &path).unwrap();

        assert!(path.exists());
        assert!(!staging_path(&path).exists());
    }
}
