//! Correlation error types

use std::fmt;
use thiserror::Error;

/// Which input series an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Series {
    Ftrt,
    Solar,
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Series::Ftrt => write!(f, "FTRT"),
            Series::Solar => write!(f, "solar"),
        }
    }
}

/// Correlation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorrelationError {
    #[error("Empty {series} data")]
    EmptyData { series: Series },

    #[error("{series} records not sorted by timestamp at index {index}")]
    UnsortedRecords { series: Series, index: usize },

    #[error("Non-finite {series} value at index {index}")]
    NonFiniteValue { series: Series, index: usize },

    #[error("Series length mismatch: left={left}, right={right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Insufficient data: need at least {required} pairs, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Zero variance in {series} series, correlation undefined")]
    ZeroVariance { series: Series },

    #[error("Invalid window: {window_days} days. Window must be at least 1 day")]
    InvalidWindow { window_days: u32 },

    #[error("Invalid peak threshold: {reason}")]
    InvalidThreshold { reason: String },

    #[error("Distribution error: {0}")]
    Distribution(String),
}

impl CorrelationError {
    /// Errors caused by too little usable data rather than malformed input
    ///
    /// Lag scans treat these as "no result at this lag" instead of failing.
    pub fn is_data_insufficiency(&self) -> bool {
        matches!(
            self,
            CorrelationError::InsufficientData { .. } | CorrelationError::ZeroVariance { .. }
        )
    }
}

/// Timestamp parsing errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimestampError {
    #[error("Unrecognized timestamp format: '{input}'")]
    UnrecognizedFormat { input: String },

    #[error("Timestamp out of supported range (1600-2200): '{input}'")]
    OutOfRange { input: String },
}
