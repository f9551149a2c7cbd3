//! Paperscout Core — paper records, configuration, CSV export.

pub mod config;
pub mod error;
pub mod export;
pub mod models;

pub use config::{OutputConfig, PipelineConfig, ScoutConfig, SourceConfig};
pub use error::{CoreError, ExitCode, Result};
pub use export::{save_csv, write_csv};
pub use models::{OutputSchema, PaperRecord};
