use std::path::PathBuf;
use thiserror::Error;

use super::worker_status::WorkerStatus;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Could not read report {path:?}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed data row at line {line_number} ({line:?}): {source}")]
    MalformedRow {
        line_number: usize,
        line: String,
        #[source]
        source: std::num::ParseFloatError,
    },
    #[error("Malformed detector declaration at line {line_number} ({line:?})")]
    MalformedDeclaration { line_number: usize, line: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
    #[error("Config failed to parse energy list {text:?}: {source}")]
    BadEnergies {
        text: String,
        #[source]
        source: std::num::ParseFloatError,
    },
}

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Sweep failed due to report error: {0}")]
    ReportError(#[from] ReportError),
    #[error("Sweep failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Sweep failed due to Send error: {0}")]
    SendError(#[from] std::sync::mpsc::SendError<WorkerStatus>),
    #[error("Sweep failed because worker {0} panicked")]
    WorkerPanic(usize),
    #[error("Sweep requires at least one worker thread, config asked for {0}")]
    InvalidThreads(i32),
    #[error("Sweep failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Sweep failed to convert to yaml: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}
