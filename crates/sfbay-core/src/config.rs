use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PipelineError, Result};

pub const DEFAULT_READINGS_FILE: &str = "SFBay.csv";
pub const DEFAULT_LOCATIONS_FILE: &str = "StationLocations.csv";
pub const DEFAULT_OUTPUT_FILE: &str = "sfbay_final.csv";

/// Paths and filter settings for one preprocessing run.
///
/// Defaults reproduce the reference survey configuration: the 1994-2014
/// window and the three stations excluded from analysis.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub readings_path: PathBuf,
    pub locations_path: PathBuf,
    pub output_path: PathBuf,
    pub year_from: i32,
    pub year_to: i32,
    pub excluded_stations: Vec<i32>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let data = Path::new("data");
        Self {
            readings_path: data.join(DEFAULT_READINGS_FILE),
            locations_path: data.join(DEFAULT_LOCATIONS_FILE),
            output_path: data.join(DEFAULT_OUTPUT_FILE),
            year_from: 1994,
            year_to: 2014,
            excluded_stations: vec![649, 657, 653],
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|err| PipelineError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Rebases the configured file names onto `dir`.
    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        for path in [
            &mut self.readings_path,
            &mut self.locations_path,
            &mut self.output_path,
        ] {
            if let Some(name) = path.file_name() {
                *path = dir.join(name);
            }
        }
        self
    }
}
