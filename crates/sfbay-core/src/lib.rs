pub mod config;
pub mod error;
pub mod export;
pub mod locations;
pub mod mercator;
pub mod pipeline;
pub mod readings;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use pipeline::{run, RunSummary};
