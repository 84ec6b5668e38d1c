use std::path::PathBuf;

use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{file} line {line}: failed to parse column '{column}': {message}")]
    Field {
        file: String,
        line: usize,
        column: &'static str,
        message: String,
    },

    #[error("{file}: failed to convert column '{column}': {message}")]
    Parse {
        file: String,
        column: &'static str,
        message: String,
    },

    #[error("missing column '{column}' in {context}")]
    Schema { column: String, context: String },

    #[error("duplicate station ids in {file}: {stations:?}")]
    DuplicateStations { file: String, stations: Vec<i32> },

    #[error("failed to load config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("{file} CSV error: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
