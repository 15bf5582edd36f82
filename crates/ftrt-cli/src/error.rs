use ftrt_core::CorrelationError;
use ftrt_io::{LoaderError, WriterError};
use thiserror::Error;

/// Errors surfaced by the command-line tools
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to load configuration: {0}")]
    Config(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No {0} input: pass --{0} <FILE> or set data.{0}_path")]
    MissingInput(&'static str),

    #[error(transparent)]
    Load(#[from] LoaderError),

    #[error("Correlation failed: {0}")]
    Analysis(#[from] CorrelationError),

    #[error("Failed to write report: {0}")]
    Write(#[from] WriterError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
